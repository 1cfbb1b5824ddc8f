//! Control layer: wires the connection, fetch and pagination parts together
//! and produces read-only snapshots for a renderer.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::connection::{ConnectionController, ConnectionState, WalletProvider};
use crate::fetcher::{FetchState, TransactionFetcher, TransactionHistoryApi};
use crate::pagination::{self, PageSizePolicy, PageView, PaginationState, DEFAULT_PAGE_SIZE};

/// Pagination defaults for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExplorerConfig {
    pub page_size: usize,
    pub page_size_policy: PageSizePolicy,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_policy: PageSizePolicy::default(),
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub connection: ConnectionState,
    pub fetch: FetchState,
    pub page: PageView,
    pub loading: bool,
}

/// Pagination plus the fetch state it was last synced with.
struct PagerState {
    state: PaginationState,
    fetch: watch::Receiver<FetchState>,
}

pub struct Explorer {
    connection: ConnectionController,
    fetcher: Arc<TransactionFetcher>,
    pager: Mutex<PagerState>,
    pager_tx: watch::Sender<PaginationState>,
    policy: PageSizePolicy,
}

impl Explorer {
    pub fn new(
        provider: Option<Arc<dyn WalletProvider>>,
        api: Arc<dyn TransactionHistoryApi>,
        config: ExplorerConfig,
    ) -> Self {
        let fetcher = Arc::new(TransactionFetcher::new(api));
        let connection = ConnectionController::new(provider, fetcher.clone());
        let state = PaginationState::new(config.page_size);
        let (pager_tx, _) = watch::channel(state);
        Self {
            connection,
            pager: Mutex::new(PagerState {
                state,
                fetch: fetcher.subscribe(),
            }),
            fetcher,
            pager_tx,
            policy: config.page_size_policy,
        }
    }

    pub fn page_size_policy(&self) -> PageSizePolicy {
        self.policy
    }

    /// Connect the wallet; a successful connection loads its history.
    pub async fn connect(&self) -> Snapshot {
        self.connection.connect().await;
        self.snapshot()
    }

    /// Re-fetch the history of the current address.
    pub async fn refresh(&self) -> Snapshot {
        self.fetcher.refresh().await;
        self.snapshot()
    }

    pub fn go_to(&self, index: i64) -> Snapshot {
        self.navigate(|state, count| state.go_to(index, count))
    }

    pub fn next(&self) -> Snapshot {
        self.navigate(|state, count| state.next(count))
    }

    pub fn previous(&self) -> Snapshot {
        self.navigate(|state, count| state.previous(count))
    }

    pub fn first(&self) -> Snapshot {
        self.navigate(|state, _| state.first())
    }

    pub fn last(&self) -> Snapshot {
        self.navigate(|state, count| state.last(count))
    }

    pub fn set_page_size(&self, page_size: usize) -> Snapshot {
        let policy = self.policy;
        self.navigate(|state, count| state.set_page_size(page_size, count, policy))
    }

    /// Current view.
    ///
    /// Every fetch cycle passes through an empty list (`Loading`, or `Idle`
    /// when a reconnect clears the history), so any fetch-state change since
    /// the last call puts the stored index back on the first page. The
    /// outcome is the same whether or not the intermediate states were
    /// observed.
    pub fn snapshot(&self) -> Snapshot {
        let connection = self.connection.state();
        let (fetch, state) = {
            let mut pager = self.pager();
            let fetch = self.sync_fetch(&mut pager);
            (fetch, pager.state)
        };

        let loading = fetch.is_loading() || connection.is_connecting();
        Snapshot {
            page: pagination::page(fetch.items(), &state),
            connection,
            fetch,
            loading,
        }
    }

    /// Change notifications for connection, fetch and pagination state.
    ///
    /// For renderers that redraw on their own schedule; the REPL instead
    /// takes a [`snapshot`](Self::snapshot) after each command.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            connection: self.connection.subscribe(),
            fetch: self.fetcher.subscribe(),
            pager: self.pager_tx.subscribe(),
        }
    }

    fn navigate(&self, apply: impl FnOnce(&mut PaginationState, usize)) -> Snapshot {
        {
            let mut pager = self.pager();
            let count = self.sync_fetch(&mut pager).items().len();
            apply(&mut pager.state, count);
            self.publish(&pager.state);
        }
        self.snapshot()
    }

    /// Latest fetch state; resets the page index if it changed since the
    /// last sync.
    fn sync_fetch(&self, pager: &mut PagerState) -> FetchState {
        let changed = pager.fetch.has_changed().unwrap_or(false);
        let fetch = pager.fetch.borrow_and_update().clone();
        if changed {
            debug!(items = fetch.items().len(), "history changed, back to the first page");
            pager.state.first();
            self.publish(&pager.state);
        }
        fetch
    }

    fn publish(&self, state: &PaginationState) {
        self.pager_tx.send_if_modified(|current| {
            if *current == *state {
                return false;
            }
            *current = *state;
            true
        });
    }

    fn pager(&self) -> MutexGuard<'_, PagerState> {
        // A poisoned lock still holds a usable state.
        self.pager.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Receivers for every state a snapshot is built from.
pub struct Subscription {
    connection: watch::Receiver<ConnectionState>,
    fetch: watch::Receiver<FetchState>,
    pager: watch::Receiver<PaginationState>,
}

impl Subscription {
    /// Wait until any of the underlying states changes. Returns `false` once
    /// the explorer has been dropped.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            r = self.connection.changed() => r.is_ok(),
            r = self.fetch.changed() => r.is_ok(),
            r = self.pager.changed() => r.is_ok(),
        }
    }

    /// Wait until nothing is in flight: not connecting and not loading.
    pub async fn settled(&mut self) -> bool {
        loop {
            let busy = self.connection.borrow_and_update().is_connecting()
                || self.fetch.borrow_and_update().is_loading();
            if !busy {
                return true;
            }
            if !self.changed().await {
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConnectError, FetchError};
    use crate::fetcher::HistoryResponse;
    use crate::types::{Address, Amount, Transaction};
    use async_trait::async_trait;

    struct OneAccount(&'static str);

    #[async_trait]
    impl WalletProvider for OneAccount {
        fn is_available(&self) -> bool {
            true
        }

        async fn request_accounts(&self) -> Result<Vec<Address>, ConnectError> {
            Ok(vec![Address::new(self.0).unwrap()])
        }
    }

    struct Listing(usize);

    #[async_trait]
    impl TransactionHistoryApi for Listing {
        async fn list_transactions(
            &self,
            address: &Address,
        ) -> Result<HistoryResponse, FetchError> {
            let items = (0..self.0)
                .map(|i| Transaction {
                    hash: format!("0x{i:04x}"),
                    from: address.clone(),
                    to: None,
                    value: Amount::parse("0").unwrap(),
                    timestamp: i as u64,
                })
                .collect();
            Ok(HistoryResponse::success(items))
        }
    }

    fn explorer(count: usize) -> Explorer {
        Explorer::new(
            Some(Arc::new(OneAccount("0xabc"))),
            Arc::new(Listing(count)),
            ExplorerConfig::default(),
        )
    }

    #[tokio::test]
    async fn initial_snapshot_is_disconnected_and_empty() {
        let ex = explorer(3);
        let snap = ex.snapshot();
        assert_eq!(snap.connection, ConnectionState::Disconnected);
        assert_eq!(snap.fetch, FetchState::Idle);
        assert_eq!(snap.page.page_count, 0);
        assert!(!snap.loading);
    }

    #[tokio::test]
    async fn navigation_before_connect_is_harmless() {
        let ex = explorer(3);
        let snap = ex.next();
        assert_eq!(snap.page.page_index, 0);
        let snap = ex.go_to(-3);
        assert_eq!(snap.page.page_index, 0);
    }

    #[tokio::test]
    async fn connect_then_page_through() {
        let ex = explorer(20);
        let snap = ex.connect().await;
        assert_eq!(snap.page.page_count, 3);
        assert_eq!(snap.page.items.len(), 8);

        ex.next();
        ex.next();
        let snap = ex.previous();
        assert_eq!(snap.page.page_index, 1);
        assert_eq!(snap.page.items[0].hash, "0x0008");

        let snap = ex.last();
        assert_eq!(snap.page.items.len(), 4);
        let snap = ex.first();
        assert_eq!(snap.page.page_index, 0);
    }

    #[tokio::test]
    async fn page_size_change_keeps_position() {
        let ex = explorer(20);
        ex.connect().await;
        ex.go_to(1);

        let snap = ex.set_page_size(10);
        assert_eq!(snap.page.page_index, 1);
        assert_eq!(snap.page.page_count, 2);

        let snap = ex.set_page_size(50);
        assert_eq!(snap.page.page_index, 0);
        assert_eq!(snap.page.items.len(), 20);
    }

    #[tokio::test]
    async fn navigation_notifies_subscribers() {
        let ex = explorer(20);
        ex.connect().await;
        let mut sub = ex.subscribe();
        ex.next();
        assert!(sub.changed().await);
        assert!(sub.settled().await);
    }
}
