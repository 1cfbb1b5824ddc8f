use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::types::RpcReply;
use super::validate_endpoint_url;
use crate::connection::WalletProvider;
use crate::error::ConnectError;
use crate::types::Address;

/// EIP-1193 "user rejected request".
const USER_REJECTED: i64 = 4001;

/// Wallet reached over JSON-RPC on HTTP, e.g. a desktop wallet's local
/// provider endpoint. Asks for accounts with `eth_requestAccounts`.
pub struct JsonRpcWalletProvider {
    http: reqwest::Client,
    url: Url,
    next_id: AtomicU64,
}

impl JsonRpcWalletProvider {
    pub fn new(url: &str, timeout: Duration, allow_insecure: bool) -> Result<Self> {
        let url = validate_endpoint_url(url, allow_insecure)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWalletProvider {
    fn is_available(&self) -> bool {
        true
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ConnectError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "eth_requestAccounts",
            "params": [],
        });
        debug!(endpoint = %self.url, id, "eth_requestAccounts");

        let response = self
            .http
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("wallet endpoint unreachable: {e}");
                ConnectError::ProviderError(format!("wallet unreachable: {e}"))
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| ConnectError::ProviderError(e.to_string()))?;
        decode_accounts(&body)
    }
}

pub(super) fn decode_accounts(body: &str) -> Result<Vec<Address>, ConnectError> {
    let reply: RpcReply = serde_json::from_str(body)
        .map_err(|e| ConnectError::ProviderError(format!("malformed wallet reply: {e}")))?;

    if let Some(err) = reply.error {
        if err.code == USER_REJECTED {
            return Err(ConnectError::UserRejected);
        }
        return Err(ConnectError::ProviderError(format!(
            "{} (code {})",
            err.message, err.code
        )));
    }

    let Some(Value::Array(accounts)) = reply.result else {
        return Err(ConnectError::ProviderError(
            "wallet reply has no account list".into(),
        ));
    };

    accounts
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Address::new(s)
                .ok_or_else(|| ConnectError::ProviderError("wallet returned an empty address".into())),
            other => Err(ConnectError::ProviderError(format!(
                "unexpected account entry: {other}"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_account_list() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":["0xabc","0xdef"]}"#;
        let accounts = decode_accounts(body).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].as_str(), "0xabc");
    }

    #[test]
    fn code_4001_is_user_rejection() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#;
        assert_eq!(decode_accounts(body), Err(ConnectError::UserRejected));
    }

    #[test]
    fn other_error_codes_are_provider_errors() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32603,"message":"Internal error"}}"#;
        match decode_accounts(body) {
            Err(ConnectError::ProviderError(msg)) => assert!(msg.contains("-32603")),
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    #[test]
    fn empty_account_list_decodes() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":[]}"#;
        assert_eq!(decode_accounts(body), Ok(Vec::new()));
    }

    #[test]
    fn garbage_is_provider_error() {
        assert!(matches!(
            decode_accounts("nope"),
            Err(ConnectError::ProviderError(_))
        ));
        assert!(matches!(
            decode_accounts(r#"{"result":"0xabc"}"#),
            Err(ConnectError::ProviderError(_))
        ));
        assert!(matches!(
            decode_accounts(r#"{"result":[42]}"#),
            Err(ConnectError::ProviderError(_))
        ));
    }

    #[test]
    fn constructor_validates_url() {
        assert!(JsonRpcWalletProvider::new("http://127.0.0.1:1248", Duration::from_secs(5), false).is_ok());
        assert!(JsonRpcWalletProvider::new("http://wallet.example.com", Duration::from_secs(5), false).is_err());
    }
}
