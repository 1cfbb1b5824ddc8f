//! Domain error types for wallet connection and history retrieval.

use serde::Serialize;
use thiserror::Error;

/// Why a connect attempt ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ConnectError {
    /// No wallet capability is present.
    #[error("no wallet provider available")]
    ProviderUnavailable,

    /// The user declined the account request.
    #[error("connection request was rejected")]
    UserRejected,

    /// The wallet answered with an error or an unusable reply.
    #[error("wallet provider error: {0}")]
    ProviderError(String),
}

/// Why a history fetch ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    /// Transport failure, timeout or non-success HTTP status.
    #[error("network error: {0}")]
    Network(String),

    /// The history API throttled the request.
    #[error("rate limited by the history API")]
    RateLimited,

    /// The payload could not be decoded into transactions.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The API answered with an error status and message.
    #[error("history API error: {0}")]
    Api(String),
}

impl FetchError {
    pub(crate) fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_serialize_with_kind_tag() {
        let json = serde_json::to_value(ConnectError::UserRejected).unwrap();
        assert_eq!(json["kind"], "user_rejected");

        let json = serde_json::to_value(FetchError::Network("timeout".into())).unwrap();
        assert_eq!(json["kind"], "network");
        assert_eq!(json["detail"], "timeout");
    }
}
