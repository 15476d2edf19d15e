//! Query-string and cache-busting URL helpers

use serde_json::Value;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::codec;

/// Query parameter carrying the cache-busting timestamp
pub const TIMESTAMP_PARAM: &str = "_t";

/// Append `data` serialized as a query string to `url`
///
/// Uses `&` when `url` already has a query, `?` otherwise. `url` is returned
/// unchanged when `data` is `None` or serializes to nothing.
pub fn build_url_with_query_data(url: &str, data: Option<&Value>) -> String {
    match data.map(codec::stringify) {
        Some(query) if !query.is_empty() => append_query(url, &query),
        _ => url.to_string(),
    }
}

/// Append `_t=<milliseconds since epoch>` to `url`
///
/// Two calls within the same millisecond produce the same value.
pub fn add_timestamp_query(url: &str) -> String {
    add_timestamp_query_at(url, now_millis())
}

/// Append `_t=<millis>` to `url` using a caller-supplied timestamp
pub fn add_timestamp_query_at(url: &str, millis: u128) -> String {
    append_query(url, &format!("{TIMESTAMP_PARAM}={millis}"))
}

fn append_query(url: &str, query: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
