//! Wallet connection, transaction-history fetching and client-side
//! pagination, composed into one [`Explorer`] controller.

pub mod commands;
pub mod connection;
pub mod display;
pub mod error;
pub mod explorer;
pub mod fetcher;
pub mod network;
pub mod pagination;
pub mod provider;
pub mod types;

pub use commands::Command;
pub use connection::{ConnectionController, ConnectionState, WalletProvider};
pub use error::{ConnectError, FetchError};
pub use explorer::{Explorer, ExplorerConfig, Snapshot, Subscription};
pub use fetcher::{
    FetchState, HistoryResponse, HistoryStatus, TransactionFetcher, TransactionHistoryApi,
};
pub use network::{HistoryClient, HistoryConfig, JsonRpcWalletProvider};
pub use pagination::{page, PageSizePolicy, PageView, PaginationState};
pub use provider::StaticWalletProvider;
pub use types::{Address, Amount, Transaction, TransactionList};
