//! Transaction-history fetch lifecycle with last-request-wins supersession.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::types::{Address, Transaction, TransactionList};

/// Outcome flag reported by the history API alongside its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    Success,
    Failure,
}

/// Decoded reply of one `list_transactions` call.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryResponse {
    pub status: HistoryStatus,
    pub items: Vec<Transaction>,
    pub message: Option<String>,
}

impl HistoryResponse {
    pub fn success(items: Vec<Transaction>) -> Self {
        Self {
            status: HistoryStatus::Success,
            items,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: HistoryStatus::Failure,
            items: Vec::new(),
            message: Some(message.into()),
        }
    }
}

/// Source of an account's transaction history.
#[async_trait]
pub trait TransactionHistoryApi: Send + Sync {
    /// Fetch the full history for `address`, in the order the source keeps it.
    async fn list_transactions(&self, address: &Address) -> Result<HistoryResponse, FetchError>;
}

/// Lifecycle of the current history retrieval, tagged with its target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FetchState {
    Idle,
    Loading {
        address: Address,
    },
    Ready {
        address: Address,
        #[serde(skip)]
        items: TransactionList,
    },
    Failed {
        address: Address,
        error: FetchError,
    },
}

impl FetchState {
    pub fn address(&self) -> Option<&Address> {
        match self {
            Self::Idle => None,
            Self::Loading { address }
            | Self::Ready { address, .. }
            | Self::Failed { address, .. } => Some(address),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Items to paginate: the ready list, or nothing.
    pub fn items(&self) -> &[Transaction] {
        match self {
            Self::Ready { items, .. } => items,
            _ => &[],
        }
    }

    fn settled(address: Address, outcome: Result<HistoryResponse, FetchError>) -> Self {
        match outcome {
            Ok(HistoryResponse {
                status: HistoryStatus::Success,
                items,
                ..
            }) => Self::Ready {
                address,
                items: items.into(),
            },
            Ok(HistoryResponse {
                status: HistoryStatus::Failure,
                message,
                ..
            }) => Self::Failed {
                address,
                error: FetchError::Api(message.unwrap_or_else(|| "unknown error".to_string())),
            },
            Err(error) => Self::Failed { address, error },
        }
    }
}

/// Owns the published [`FetchState`].
///
/// Each call to [`fetch`](Self::fetch) takes a fresh request token. A reply
/// is applied only while its token is still the latest one issued; anything
/// older is dropped on arrival. Token issue and the apply check both run
/// under the watch channel's lock.
pub struct TransactionFetcher {
    api: Arc<dyn TransactionHistoryApi>,
    latest_request: AtomicU64,
    state: watch::Sender<FetchState>,
}

impl TransactionFetcher {
    pub fn new(api: Arc<dyn TransactionHistoryApi>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            api,
            latest_request: AtomicU64::new(0),
            state,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Fetch the history for `address`, superseding any request in flight.
    ///
    /// Returns the visible state once this request settles: its own result,
    /// or whatever a newer request has published meanwhile.
    pub async fn fetch(&self, address: Address) -> FetchState {
        let mut request = 0;
        self.state.send_modify(|state| {
            request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            *state = FetchState::Loading {
                address: address.clone(),
            };
        });
        debug!(request, %address, "history request issued");

        let outcome = self.api.list_transactions(&address).await;
        if let Err(e) = &outcome {
            warn!(request, %address, "history request failed: {e}");
        }
        let settled = FetchState::settled(address.clone(), outcome);

        let applied = self.state.send_if_modified(|state| {
            if self.latest_request.load(Ordering::SeqCst) != request {
                return false;
            }
            *state = settled;
            true
        });

        if applied {
            info!(request, %address, items = self.state.borrow().items().len(), "history settled");
        } else {
            debug!(request, %address, "discarding superseded history response");
        }
        self.state()
    }

    /// Retire the request in flight, if any, and go back to `Idle`. A reply
    /// for the retired request is dropped on arrival.
    pub fn supersede(&self) {
        let mut request = 0;
        self.state.send_modify(|state| {
            request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            *state = FetchState::Idle;
        });
        debug!(request, "history cleared");
    }

    /// Re-fetch whatever address the current state targets. Idle stays idle.
    pub async fn refresh(&self) -> FetchState {
        match self.state().address().cloned() {
            Some(address) => self.fetch(address).await,
            None => FetchState::Idle,
        }
    }
}
