//! Wallet connection state and the controller that drives it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::ConnectError;
use crate::fetcher::TransactionFetcher;
use crate::types::Address;

/// Capability to hand out the user's account addresses.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether the wallet can be asked at all (installed, enabled, configured).
    fn is_available(&self) -> bool;

    /// Ask the wallet for its accounts. May prompt the user.
    async fn request_accounts(&self) -> Result<Vec<Address>, ConnectError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(Address),
    Failed(ConnectError),
}

impl ConnectionState {
    pub fn address(&self) -> Option<&Address> {
        match self {
            Self::Connected(address) => Some(address),
            _ => None,
        }
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting)
    }
}

/// Owns the [`ConnectionState`] and starts a history fetch for every
/// successful connection.
///
/// Overlapping `connect` calls are resolved like fetches: only the most
/// recent attempt may publish its outcome.
pub struct ConnectionController {
    provider: Option<Arc<dyn WalletProvider>>,
    fetcher: Arc<TransactionFetcher>,
    latest_attempt: AtomicU64,
    state: watch::Sender<ConnectionState>,
}

impl ConnectionController {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, fetcher: Arc<TransactionFetcher>) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            provider,
            fetcher,
            latest_attempt: AtomicU64::new(0),
            state,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Request the wallet's accounts and connect to the first one.
    ///
    /// Starting an attempt clears the history of the previous account. On
    /// success the history for the new address is fetched before returning,
    /// so the returned state reflects the connection and the fetch has
    /// settled (or been superseded). Allowed from any state.
    pub async fn connect(&self) -> ConnectionState {
        let provider = match &self.provider {
            Some(p) if p.is_available() => p.clone(),
            _ => {
                warn!("connect requested but no wallet provider is available");
                self.state.send_modify(|state| {
                    self.latest_attempt.fetch_add(1, Ordering::SeqCst);
                    self.fetcher.supersede();
                    *state = ConnectionState::Failed(ConnectError::ProviderUnavailable);
                });
                return self.state();
            }
        };

        let mut attempt = 0;
        // The previous account's history stops being visible as soon as a
        // new attempt starts, even if its reply is still on the way.
        self.state.send_modify(|state| {
            attempt = self.latest_attempt.fetch_add(1, Ordering::SeqCst) + 1;
            self.fetcher.supersede();
            *state = ConnectionState::Connecting;
        });
        debug!(attempt, "requesting wallet accounts");

        let outcome = match provider.request_accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(address) => ConnectionState::Connected(address),
                None => ConnectionState::Failed(ConnectError::ProviderError(
                    "wallet returned no accounts".into(),
                )),
            },
            Err(e) => ConnectionState::Failed(e),
        };

        let connected = outcome.address().cloned();
        let applied = self.state.send_if_modified(|state| {
            if self.latest_attempt.load(Ordering::SeqCst) != attempt {
                return false;
            }
            *state = outcome;
            true
        });

        if !applied {
            debug!(attempt, "discarding superseded connect result");
            return self.state();
        }

        match connected {
            Some(address) => {
                info!(%address, "wallet connected");
                self.fetcher.fetch(address).await;
            }
            None => warn!(attempt, state = ?self.state(), "wallet connection failed"),
        }
        self.state()
    }
}
