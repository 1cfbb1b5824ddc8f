//! Wire shapes of the account-history and wallet JSON-RPC replies.

use std::borrow::Cow;

use serde::Deserialize;

/// `{ "status": "1", "message": "OK", "result": [...] }`
#[derive(Debug, Deserialize)]
pub(super) struct Envelope {
    pub(super) status: String,
    #[serde(default)]
    pub(super) message: String,
    pub(super) result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawTransaction {
    pub(super) hash: String,
    pub(super) from: String,
    /// Empty for contract creation.
    #[serde(default)]
    pub(super) to: Option<String>,
    pub(super) value: Numeric,
    pub(super) time_stamp: Numeric,
}

/// Integers arrive as decimal strings, occasionally as bare JSON numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Numeric {
    Text(String),
    Int(u64),
}

impl Numeric {
    pub(super) fn digits(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Int(n) => Cow::Owned(n.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RpcReply {
    #[serde(default)]
    pub(super) result: Option<serde_json::Value>,
    #[serde(default)]
    pub(super) error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RpcError {
    pub(super) code: i64,
    #[serde(default)]
    pub(super) message: String,
}
