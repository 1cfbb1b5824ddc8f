/// HTTP collaborators: the account-history API client and the JSON-RPC wallet.
mod history;
mod types;
mod wallet_rpc;

pub use history::decode_history;
pub use wallet_rpc::JsonRpcWalletProvider;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::fetcher::{HistoryResponse, TransactionHistoryApi};
use crate::types::Address;

/// Etherscan v2 multichain endpoint.
pub const DEFAULT_API_URL: &str = "https://api.etherscan.io/v2/api";
/// Sepolia testnet.
pub const DEFAULT_CHAIN_ID: u64 = 11_155_111;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Reject non-HTTPS URLs unless `allow_insecure` is set. Plain HTTP to the
/// loopback interface is always allowed, since local wallets listen there.
pub fn validate_endpoint_url(url: &str, allow_insecure: bool) -> Result<Url> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid endpoint URL: {url}"))?;
    match parsed.scheme() {
        "https" => Ok(parsed),
        "http" => {
            let loopback = matches!(
                parsed.host_str(),
                Some("localhost") | Some("127.0.0.1") | Some("[::1]")
            );
            if loopback || allow_insecure {
                return Ok(parsed);
            }
            bail!("Refusing to connect over plain HTTP: {url}\nUse --insecure to allow unencrypted connections.");
        }
        _ => bail!("Invalid endpoint URL scheme: {url}\nExpected an https:// URL."),
    }
}

/// Settings for [`HistoryClient`].
#[derive(Clone)]
pub struct HistoryConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    /// Sent as `chainid`; omit for single-chain deployments of the API.
    pub chain_id: Option<u64>,
    pub timeout: Duration,
    pub allow_insecure: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            chain_id: Some(DEFAULT_CHAIN_ID),
            timeout: DEFAULT_TIMEOUT,
            allow_insecure: false,
        }
    }
}

impl std::fmt::Debug for HistoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("chain_id", &self.chain_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client for Etherscan-compatible `module=account&action=txlist` endpoints.
pub struct HistoryClient {
    http: reqwest::Client,
    url: Url,
    api_key: Option<String>,
    chain_id: Option<u64>,
}

impl HistoryClient {
    pub fn new(config: &HistoryConfig) -> Result<Self> {
        let url = validate_endpoint_url(&config.api_url, config.allow_insecure)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            url,
            api_key: config.api_key.clone(),
            chain_id: config.chain_id,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.url.as_str()
    }

    fn query(&self, address: &Address) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", address.to_string()),
            ("sort", "asc".to_string()),
        ];
        if let Some(chain_id) = self.chain_id {
            query.push(("chainid", chain_id.to_string()));
        }
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }
        query
    }
}

/// 429 is throttling; any other non-2xx status is a transport failure.
fn classify_status(status: StatusCode) -> Result<(), FetchError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited);
    }
    if !status.is_success() {
        return Err(FetchError::Network(format!("HTTP {}", status.as_u16())));
    }
    Ok(())
}

#[async_trait]
impl TransactionHistoryApi for HistoryClient {
    async fn list_transactions(&self, address: &Address) -> Result<HistoryResponse, FetchError> {
        debug!(%address, endpoint = %self.url, "querying transaction history");

        // `without_url` keeps the API key out of error messages and logs.
        let response = self
            .http
            .get(self.url.clone())
            .query(&self.query(address))
            .send()
            .await
            .map_err(|e| FetchError::network(e.without_url()))?;

        if let Err(e) = classify_status(response.status()) {
            warn!(%address, "history API refused the request: {e}");
            return Err(e);
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(e.without_url()))?;
        decode_history(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_http_url_without_insecure() {
        let err = validate_endpoint_url("http://api.example.com/api", false)
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("--insecure"));
    }

    #[test]
    fn accepts_http_url_with_insecure() {
        assert!(validate_endpoint_url("http://api.example.com/api", true).is_ok());
    }

    #[test]
    fn accepts_loopback_http() {
        assert!(validate_endpoint_url("http://127.0.0.1:1248", false).is_ok());
        assert!(validate_endpoint_url("http://localhost:8545/", false).is_ok());
    }

    #[test]
    fn rejects_invalid_url_scheme() {
        let err = validate_endpoint_url("ftp://example.com/api", false)
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("Invalid endpoint URL scheme"));
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(validate_endpoint_url("not a url", true).is_err());
    }

    #[test]
    fn success_status_passes() {
        assert_eq!(classify_status(StatusCode::OK), Ok(()));
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            Err(FetchError::RateLimited)
        );
    }

    #[test]
    fn other_error_status_is_network_error() {
        assert_eq!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE),
            Err(FetchError::Network("HTTP 503".into()))
        );
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND),
            Err(FetchError::Network("HTTP 404".into()))
        );
    }

    #[test]
    fn query_includes_key_and_chain() {
        let client = HistoryClient::new(&HistoryConfig {
            api_key: Some("secret".into()),
            ..HistoryConfig::default()
        })
        .unwrap();
        let query = client.query(&Address::new("0xabc").unwrap());
        assert!(query.contains(&("address", "0xabc".to_string())));
        assert!(query.contains(&("apikey", "secret".to_string())));
        assert!(query.contains(&("chainid", DEFAULT_CHAIN_ID.to_string())));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = HistoryConfig {
            api_key: Some("secret".into()),
            ..HistoryConfig::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
