//! Output formatting: wei conversion, transaction tables and status messages.
//!
//! Ether uses 18 decimal places. 1 ETH = 10^18 wei.
use chrono::DateTime;

use crate::connection::ConnectionState;
use crate::error::{ConnectError, FetchError};
use crate::explorer::Snapshot;
use crate::fetcher::FetchState;
use crate::pagination::{PageSizePolicy, PageView};
use crate::types::{Amount, Transaction};

const WEI_DECIMALS: usize = 18;

/// Convert a wei amount to an ETH string without going through floats.
/// Trailing fractional zeros are dropped.
/// Examples: 1500000000000000000 -> "1.5", 0 -> "0", 1 -> "0.000000000000000001"
#[must_use]
pub fn wei_to_eth(amount: &Amount) -> String {
    let digits = amount.digits();
    let padded = format!("{digits:0>width$}", width = WEI_DECIMALS + 1);
    let (whole, frac) = padded.split_at(padded.len() - WEI_DECIMALS);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}

#[must_use]
pub fn format_value(amount: &Amount) -> String {
    format!("{} ETH", wei_to_eth(amount))
}

/// UTC rendering of a Unix timestamp; falls back to the raw number when it
/// is out of chrono's range.
#[must_use]
pub fn format_timestamp(seconds: u64) -> String {
    i64::try_from(seconds)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| seconds.to_string())
}

/// Format one page of transactions, numbered from `offset + 1`.
#[must_use]
pub fn format_transactions(txs: &[Transaction], offset: usize) -> String {
    if txs.is_empty() {
        return "No transactions found for this account.".to_string();
    }

    let mut lines = Vec::with_capacity(txs.len() + 1);
    lines.push(format!(
        "{:>4}  {:<19}  {:<23}  {:<10}  {:<10}  {}",
        "#", "Time", "Value", "From", "To", "Hash"
    ));
    for (i, tx) in txs.iter().enumerate() {
        let to = match &tx.to {
            Some(addr) => addr.short(),
            None => "(create)".to_string(),
        };
        lines.push(format!(
            "{:>4}  {:<19}  {:<23}  {:<10}  {:<10}  {}",
            offset + i + 1,
            format_timestamp(tx.timestamp).trim_end_matches(" UTC"),
            format_value(&tx.value),
            tx.from.short(),
            to,
            tx.hash,
        ));
    }
    lines.join("\n")
}

/// Navigation line, e.g. `< prev | Page 2 of 3 | next >  (8 per page, 20 total)`.
/// Unavailable directions are shown as blanks.
#[must_use]
pub fn format_navigation<T>(page: &PageView<T>) -> String {
    let prev = if page.can_previous { "< prev" } else { "      " };
    let next = if page.can_next { "next >" } else { "      " };
    format!(
        "{prev} | {} | {next}  ({} per page, {} total)",
        page.label(),
        page.page_size,
        page.total_items
    )
}

/// User-facing explanation for a failed connect.
#[must_use]
pub fn connection_message(err: &ConnectError) -> String {
    match err {
        ConnectError::ProviderUnavailable => {
            "No wallet available. Install or enable a wallet, or start with --address or --wallet-rpc."
                .to_string()
        }
        ConnectError::UserRejected => {
            "Connection was declined in the wallet. Type 'connect' to try again.".to_string()
        }
        ConnectError::ProviderError(detail) => {
            format!("Wallet error: {detail}. Type 'connect' to try again.")
        }
    }
}

/// User-facing explanation for a failed history fetch.
#[must_use]
pub fn fetch_message(err: &FetchError) -> String {
    let reason = match err {
        FetchError::RateLimited => "the history API is rate limiting requests".to_string(),
        other => other.to_string(),
    };
    format!("Could not load transactions: {reason}. Type 'refresh' to try again.")
}

/// Render a full snapshot for the terminal.
#[must_use]
pub fn format_snapshot(snapshot: &Snapshot) -> String {
    let mut lines = Vec::new();

    match &snapshot.connection {
        ConnectionState::Disconnected => {
            lines.push("Not connected. Type 'connect' to connect a wallet.".to_string())
        }
        ConnectionState::Connecting => lines.push("Connecting to wallet...".to_string()),
        ConnectionState::Connected(address) => lines.push(format!("Connected account: {address}")),
        ConnectionState::Failed(err) => lines.push(connection_message(err)),
    }

    match &snapshot.fetch {
        FetchState::Idle => {}
        FetchState::Loading { .. } => lines.push("Loading transactions...".to_string()),
        FetchState::Failed { error, .. } => lines.push(fetch_message(error)),
        FetchState::Ready { .. } => {
            lines.push(format_transactions(&snapshot.page.items, snapshot.page.offset));
            if snapshot.page.total_items > 0 {
                lines.push(format_navigation(&snapshot.page));
            }
        }
    }

    lines.join("\n")
}

/// Connection, fetch and paging state in a few lines.
#[must_use]
pub fn format_status(snapshot: &Snapshot, policy: PageSizePolicy) -> String {
    let connection = match &snapshot.connection {
        ConnectionState::Disconnected => "disconnected".to_string(),
        ConnectionState::Connecting => "connecting".to_string(),
        ConnectionState::Connected(address) => format!("connected ({address})"),
        ConnectionState::Failed(err) => format!("failed ({err})"),
    };
    let history = match &snapshot.fetch {
        FetchState::Idle => "not loaded".to_string(),
        FetchState::Loading { address } => format!("loading for {address}"),
        FetchState::Ready { address, items } => {
            format!("{} transactions for {address}", items.len())
        }
        FetchState::Failed { address, error } => format!("failed for {address} ({error})"),
    };
    format!(
        "  Connection: {connection}\n  History:    {history}\n  Page:       {}, {} per page (on resize: {policy})",
        snapshot.page.label(),
        snapshot.page.page_size,
    )
}

/// Snapshot as pretty JSON (for `--json`).
pub fn format_snapshot_json(snapshot: &Snapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{page, PaginationState};
    use crate::types::Address;

    fn wei(s: &str) -> Amount {
        Amount::parse(s).unwrap()
    }

    fn tx(hash: &str, to: Option<&str>) -> Transaction {
        Transaction {
            hash: hash.to_string(),
            from: Address::new("0x1234567890abcdef1234567890abcdef12345678").unwrap(),
            to: to.and_then(Address::new),
            value: wei("1500000000000000000"),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn wei_to_eth_zero() {
        assert_eq!(wei_to_eth(&wei("0")), "0");
    }

    #[test]
    fn wei_to_eth_one() {
        assert_eq!(wei_to_eth(&wei("1000000000000000000")), "1");
    }

    #[test]
    fn wei_to_eth_fractional() {
        assert_eq!(wei_to_eth(&wei("1500000000000000000")), "1.5");
    }

    #[test]
    fn wei_to_eth_smallest_unit() {
        assert_eq!(wei_to_eth(&wei("1")), "0.000000000000000001");
    }

    #[test]
    fn wei_to_eth_beyond_u128() {
        assert_eq!(
            wei_to_eth(&wei("1000000000000000000000000000000000000000000")),
            "1000000000000000000000000"
        );
    }

    #[test]
    fn format_value_display() {
        assert_eq!(format_value(&wei("2000000000000000000")), "2 ETH");
    }

    #[test]
    fn timestamp_is_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn timestamp_out_of_range_falls_back() {
        assert_eq!(format_timestamp(u64::MAX), u64::MAX.to_string());
    }

    #[test]
    fn format_empty_transactions() {
        assert_eq!(
            format_transactions(&[], 0),
            "No transactions found for this account."
        );
    }

    #[test]
    fn format_transactions_rows() {
        let txs = vec![tx("0xaaaa", Some("0xfeedfacefeedfacefeedface")), tx("0xbbbb", None)];
        let output = format_transactions(&txs, 8);
        let rows: Vec<&str> = output.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("Hash"));
        assert!(rows[1].trim_start().starts_with("9 "));
        assert!(rows[1].contains("0xaaaa"));
        assert!(rows[1].contains("1.5 ETH"));
        assert!(rows[1].contains("0x1234…5678"));
        assert!(rows[2].contains("(create)"));
    }

    #[test]
    fn navigation_hides_unavailable_directions() {
        let items: Vec<u32> = (0..20).collect();
        let view = page(&items, &PaginationState::new(8));
        let nav = format_navigation(&view);
        assert!(!nav.contains("prev"));
        assert!(nav.contains("next >"));
        assert!(nav.contains("Page 1 of 3"));
        assert!(nav.contains("20 total"));
    }

    #[test]
    fn messages_distinguish_failures() {
        let unavailable = connection_message(&ConnectError::ProviderUnavailable);
        let rejected = connection_message(&ConnectError::UserRejected);
        let fetch = fetch_message(&FetchError::Network("timeout".into()));
        assert!(unavailable.contains("Install"));
        assert!(rejected.contains("declined"));
        assert!(fetch.contains("refresh"));
        assert_ne!(unavailable, rejected);
    }

    #[test]
    fn snapshot_renders_empty_result() {
        let address = Address::new("0xabc").unwrap();
        let items: Vec<Transaction> = Vec::new();
        let snapshot = Snapshot {
            connection: ConnectionState::Connected(address.clone()),
            fetch: FetchState::Ready {
                address,
                items: items.clone().into(),
            },
            page: page(&items, &PaginationState::default()),
            loading: false,
        };
        let output = format_snapshot(&snapshot);
        assert!(output.contains("Connected account: 0xabc"));
        assert!(output.contains("No transactions found for this account."));
        assert!(!output.contains("Page"));
    }

    #[test]
    fn status_reports_each_part() {
        let address = Address::new("0xabc").unwrap();
        let items: Vec<Transaction> = Vec::new();
        let snapshot = Snapshot {
            connection: ConnectionState::Connected(address.clone()),
            fetch: FetchState::Failed {
                address,
                error: FetchError::RateLimited,
            },
            page: page(&items, &PaginationState::default()),
            loading: false,
        };
        let output = format_status(&snapshot, PageSizePolicy::PreserveIndex);
        assert!(output.contains("connected (0xabc)"));
        assert!(output.contains("failed for 0xabc"));
        assert!(output.contains("8 per page"));
        assert!(output.contains("on resize: preserve"));
    }

    #[test]
    fn snapshot_json_has_loading_flag() {
        let items: Vec<Transaction> = Vec::new();
        let snapshot = Snapshot {
            connection: ConnectionState::Connecting,
            fetch: FetchState::Idle,
            page: page(&items, &PaginationState::default()),
            loading: true,
        };
        let json = format_snapshot_json(&snapshot).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["loading"], true);
        assert_eq!(v["connection"]["state"], "connecting");
        assert_eq!(v["fetch"]["state"], "idle");
    }
}
