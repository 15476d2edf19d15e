//! Case-insensitive header map

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// `content-type` header name
pub const CONTENT_TYPE: &str = "content-type";

/// Header map whose names are stored lower-cased
///
/// Inserting a name that differs only in case from an existing one replaces
/// the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "BTreeMap<String, String>")]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, lower-casing its name
    ///
    /// Returns the previous value stored under the same lower-cased name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.0
            .insert(name.as_ref().to_ascii_lowercase(), value.into())
    }

    /// Look up a header by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether a header is present, ignoring case
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    /// Remove a header, ignoring case
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(&name.to_ascii_lowercase())
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> Extend<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        headers.extend(iter);
        headers
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<BTreeMap<String, String>> for Headers {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Headers> for BTreeMap<String, String> {
    fn from(headers: Headers) -> Self {
        headers.0
    }
}

// Entries are inserted in document order so that a later duplicate-cased
// name replaces an earlier one.
impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = Headers;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of header names to values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut headers = Headers::new();
                while let Some((name, value)) = map.next_entry::<String, String>()? {
                    headers.insert(name, value);
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_lowercases_names() {
        let mut headers = Headers::new();
        headers.insert("X-Request-Id", "abc");

        assert_eq!(headers.iter().next(), Some(("x-request-id", "abc")));
        assert_eq!(headers.get("X-REQUEST-ID"), Some("abc"));
    }

    #[test]
    fn test_duplicate_cased_names_collapse_last_write_wins() {
        let headers: Headers = vec![
            ("Content-Type", "application/json"),
            ("content-type", "text/plain"),
        ]
        .into_iter()
        .collect();

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(CONTENT_TYPE), Some("text/plain"));
    }

    #[test]
    fn test_deserialize_lowercases_names() {
        let headers: Headers =
            serde_json::from_str(r#"{"Authorization": "Bearer t", "ACCEPT": "*/*"}"#)
                .expect("valid header map");

        assert!(headers.contains("authorization"));
        assert_eq!(headers.get("accept"), Some("*/*"));
        assert!(headers.iter().all(|(name, _)| name == name.to_lowercase()));
    }

    #[test]
    fn test_deserialize_duplicate_cased_names_keep_last() {
        let headers: Headers = serde_json::from_str(
            r#"{"content-type": "text/plain", "Content-Type": "application/json"}"#,
        )
        .expect("valid header map");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(CONTENT_TYPE), Some("application/json"));

        let headers: Headers = serde_json::from_str(
            r#"{"Content-Type": "application/json", "content-type": "text/plain"}"#,
        )
        .expect("valid header map");
        assert_eq!(headers.get(CONTENT_TYPE), Some("text/plain"));
    }

    #[test]
    fn test_remove_ignores_case() {
        let mut headers = Headers::new();
        headers.insert("Accept", "*/*");
        assert_eq!(headers.remove("ACCEPT"), Some("*/*".to_string()));
        assert!(headers.is_empty());
    }
}
