use serde_json::Value;

use super::types::{Envelope, RawTransaction};
use crate::error::FetchError;
use crate::fetcher::HistoryResponse;
use crate::types::{Address, Amount, Transaction};

const NO_TRANSACTIONS: &str = "no transactions found";
const RATE_LIMIT: &str = "rate limit";

/// Decode an account-history reply body.
///
/// Every entry must validate; a single bad entry rejects the whole payload
/// rather than being skipped or coerced.
pub fn decode_history(body: &str) -> Result<HistoryResponse, FetchError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(format!("undecodable body: {e}")))?;

    match envelope.status.as_str() {
        "1" => {
            let Value::Array(entries) = envelope.result else {
                return Err(FetchError::malformed("result is not a list"));
            };
            let items = entries
                .into_iter()
                .enumerate()
                .map(|(i, entry)| {
                    decode_entry(entry).map_err(|e| FetchError::malformed(format!("entry {i}: {e}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(HistoryResponse::success(items))
        }
        "0" => {
            let detail = match &envelope.result {
                Value::String(s) if !s.is_empty() => s.clone(),
                _ => envelope.message.clone(),
            };
            let haystack = format!("{} {}", envelope.message, detail).to_lowercase();
            if haystack.contains(NO_TRANSACTIONS) {
                Ok(HistoryResponse::success(Vec::new()))
            } else if haystack.contains(RATE_LIMIT) {
                Err(FetchError::RateLimited)
            } else {
                Ok(HistoryResponse::failure(detail))
            }
        }
        other => Err(FetchError::malformed(format!("unknown status '{other}'"))),
    }
}

fn decode_entry(entry: Value) -> Result<Transaction, String> {
    let raw: RawTransaction = serde_json::from_value(entry).map_err(|e| e.to_string())?;

    if raw.hash.trim().is_empty() {
        return Err("missing hash".into());
    }
    let from = Address::new(raw.from).ok_or("missing sender")?;
    let to = raw.to.and_then(Address::new);
    let value = Amount::parse(&raw.value.digits())
        .ok_or_else(|| format!("value '{}' is not an integer", raw.value.digits()))?;
    let timestamp = raw
        .time_stamp
        .digits()
        .parse::<u64>()
        .map_err(|_| format!("timestamp '{}' is not an integer", raw.time_stamp.digits()))?;

    Ok(Transaction {
        hash: raw.hash,
        from,
        to,
        value,
        timestamp,
    })
}
