//! Value types shared by the connection, fetch and pagination layers.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Account identifier handed out by a wallet provider.
///
/// Opaque: the only check is that it is non-empty. Comparison is an exact
/// string match, so providers that mix checksummed and lowercase spellings
/// produce distinct addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Surrounding whitespace is stripped at this boundary; it is the only
    /// normalization. Everything else, case included, is kept verbatim.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.len() == raw.len() {
            Some(Self(raw))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for prompts: `0x1234…abcd`.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| "Address cannot be empty.".to_string())
    }
}

/// Non-negative integer amount in the chain's smallest unit (wei).
///
/// Kept as canonical decimal digits so amounts beyond `u128` survive intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    /// Parse a decimal digit string. Leading zeros are dropped; signs,
    /// fractions and exponents are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = raw.trim_start_matches('0');
        if digits.is_empty() {
            Some(Self("0".to_string()))
        } else {
            Some(Self(digits.to_string()))
        }
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One historical transfer as shown in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub hash: String,
    pub from: Address,
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub value: Amount,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
}

/// Ordered transactions exactly as the history API returned them.
pub type TransactionList = Arc<[Transaction]>;
