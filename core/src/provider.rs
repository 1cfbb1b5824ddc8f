//! Watch-only wallet provider over a fixed set of addresses.

use async_trait::async_trait;

use crate::connection::WalletProvider;
use crate::error::ConnectError;
use crate::types::Address;

/// Hands out pre-configured addresses without prompting anyone. Useful for
/// inspecting an account whose keys live elsewhere.
#[derive(Debug, Clone)]
pub struct StaticWalletProvider {
    accounts: Vec<Address>,
}

impl StaticWalletProvider {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self { accounts }
    }

    pub fn single(address: Address) -> Self {
        Self::new(vec![address])
    }
}

#[async_trait]
impl WalletProvider for StaticWalletProvider {
    /// Unavailable when no address was configured.
    fn is_available(&self) -> bool {
        !self.accounts.is_empty()
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ConnectError> {
        Ok(self.accounts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_accounts() {
        let addr = Address::new("0xabc").unwrap();
        let provider = StaticWalletProvider::single(addr.clone());
        assert!(provider.is_available());
        assert_eq!(provider.request_accounts().await, Ok(vec![addr]));
    }

    #[test]
    fn empty_provider_is_unavailable() {
        assert!(!StaticWalletProvider::new(Vec::new()).is_available());
    }
}
