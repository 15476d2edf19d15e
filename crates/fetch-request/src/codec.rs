//! Query-string codec
//!
//! Serializes structured data the way browser query-string libraries do:
//! nested objects become `a[b]=1`, arrays become `a[0]=x`, and `null` is
//! written as an empty value. Keys and values are percent-encoded with
//! spaces written as `%20`.

use serde_json::Value;
use url::form_urlencoded;

use crate::error::HttpError;
use crate::response::Response;

/// Serialize a mapping into a URL-encoded query string
///
/// Anything other than an object serializes to an empty string.
pub fn stringify(value: &Value) -> String {
    let mut pairs = Vec::new();
    if let Value::Object(map) = value {
        for (key, value) in map {
            flatten(key.clone(), value, &mut pairs);
        }
    }

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

// `byte_serialize` writes spaces as `+` and escapes a literal `+` as `%2B`
fn encode(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Parse a URL-encoded query string into decoded `(key, value)` pairs
pub fn parse(query: &str) -> Response<Vec<(String, String)>> {
    serde_urlencoded::from_str(query.trim_start_matches('?')).map_err(HttpError::from)
}

fn flatten(prefix: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                flatten(format!("{prefix}[{key}]"), value, pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten(format!("{prefix}[{index}]"), value, pairs);
            }
        }
        Value::Null => pairs.push((prefix, String::new())),
        Value::String(s) => pairs.push((prefix, s.clone())),
        Value::Bool(b) => pairs.push((prefix, b.to_string())),
        Value::Number(n) => pairs.push((prefix, n.to_string())),
    }
}
