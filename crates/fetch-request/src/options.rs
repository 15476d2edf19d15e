//! Client defaults and per-call request options

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::body::Payload;
use crate::error::HttpError;
use crate::headers::Headers;
use crate::parser::ResponseType;
use crate::response::Response;

/// Credentials mode forwarded to the transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    /// Always send credentials
    #[default]
    Include,
    /// Send credentials to same-origin URLs only
    SameOrigin,
    /// Never send credentials
    Omit,
}

impl Credentials {
    /// Name as used by fetch
    pub fn as_str(&self) -> &'static str {
        match self {
            Credentials::Include => "include",
            Credentials::SameOrigin => "same-origin",
            Credentials::Omit => "omit",
        }
    }
}

/// Defaults applied to every request issued by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Prefix for every request URL
    pub base_url: String,
    /// Method used when a call does not name one
    pub method: String,
    /// Headers merged under every call's headers
    pub headers: Headers,
    /// Body data used when a call supplies none
    pub data: Option<Value>,
    /// Query parameters used when a call supplies none
    pub params: Option<Value>,
    /// Reader for response bodies
    pub response_type: ResponseType,
    /// Append a `_t=<millis>` cache-busting parameter
    pub with_timestamp: bool,
    /// Credentials mode
    pub credentials: Credentials,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            method: "GET".to_string(),
            headers: Headers::new(),
            data: None,
            params: None,
            response_type: ResponseType::Json,
            with_timestamp: true,
            credentials: Credentials::Include,
        }
    }
}

impl RequestConfig {
    /// Merge call options over these defaults
    ///
    /// Call values win. Headers are merged name by name, so a call only
    /// overrides the headers it names.
    pub fn merge(&self, options: RequestOptions) -> Response<MergedOptions> {
        let url = options
            .url
            .ok_or_else(|| HttpError::Config("request url is required".to_string()))?;

        let mut headers = self.headers.clone();
        headers.extend(options.headers);

        Ok(MergedOptions {
            url,
            base_url: options.base_url.unwrap_or_else(|| self.base_url.clone()),
            method: options.method.unwrap_or_else(|| self.method.clone()),
            headers,
            data: options.data.or_else(|| self.data.clone().map(Payload::Json)),
            params: options.params.or_else(|| self.params.clone()),
            response_type: options.response_type.unwrap_or(self.response_type),
            with_timestamp: options.with_timestamp.unwrap_or(self.with_timestamp),
            credentials: options.credentials.unwrap_or(self.credentials),
        })
    }
}

/// Options for a single request; unset fields fall back to the client defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Request URL, relative to the base URL
    pub url: Option<String>,
    /// Method override
    pub method: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Headers merged over the default headers
    pub headers: Headers,
    /// Body data
    pub data: Option<Payload>,
    /// Query parameters
    pub params: Option<Value>,
    /// Response reader override
    pub response_type: Option<ResponseType>,
    /// Timestamp override
    pub with_timestamp: Option<bool>,
    /// Credentials override
    pub credentials: Option<Credentials>,
}

impl RequestOptions {
    /// Options for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Set the URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the body data
    pub fn data(mut self, data: impl Into<Payload>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the query parameters
    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Set the response reader
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Enable or disable the cache-busting timestamp
    pub fn with_timestamp(mut self, with_timestamp: bool) -> Self {
        self.with_timestamp = Some(with_timestamp);
        self
    }

    /// Set the credentials mode
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Call options merged over client defaults, before URL and body building
#[derive(Debug, Clone, PartialEq)]
pub struct MergedOptions {
    /// Request URL as given by the call
    pub url: String,
    /// Base URL
    pub base_url: String,
    /// Method, in the caller's casing
    pub method: String,
    /// Lower-cased headers
    pub headers: Headers,
    /// Body data
    pub data: Option<Payload>,
    /// Query parameters
    pub params: Option<Value>,
    /// Response reader
    pub response_type: ResponseType,
    /// Append a cache-busting timestamp
    pub with_timestamp: bool,
    /// Credentials mode
    pub credentials: Credentials,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = RequestConfig::default();
        assert_eq!(config.base_url, "");
        assert_eq!(config.method, "GET");
        assert_eq!(config.response_type, ResponseType::Json);
        assert!(config.with_timestamp);
        assert_eq!(config.credentials, Credentials::Include);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_call_options_win() {
        let config = RequestConfig {
            base_url: "https://api.test".to_string(),
            params: Some(json!({"lang": "en"})),
            ..RequestConfig::default()
        };

        let merged = config
            .merge(
                RequestOptions::new("/users")
                    .method("POST")
                    .params(json!({"page": 2}))
                    .with_timestamp(false)
                    .response_type(ResponseType::Text),
            )
            .expect("url present");

        assert_eq!(merged.url, "/users");
        assert_eq!(merged.base_url, "https://api.test");
        assert_eq!(merged.method, "POST");
        assert_eq!(merged.params, Some(json!({"page": 2})));
        assert!(!merged.with_timestamp);
        assert_eq!(merged.response_type, ResponseType::Text);
    }

    #[test]
    fn test_headers_merge_by_name() {
        let mut config = RequestConfig::default();
        config.headers.insert("Authorization", "Bearer default");
        config.headers.insert("Accept", "application/json");

        let merged = config
            .merge(
                RequestOptions::new("/x")
                    .header("AUTHORIZATION", "Bearer call")
                    .header("X-Trace", "1"),
            )
            .expect("url present");

        assert_eq!(merged.headers.len(), 3);
        assert_eq!(merged.headers.get("authorization"), Some("Bearer call"));
        assert_eq!(merged.headers.get("accept"), Some("application/json"));
        assert!(merged
            .headers
            .iter()
            .all(|(name, _)| name == name.to_ascii_lowercase()));
    }

    #[test]
    fn test_default_data_used_when_call_has_none() {
        let config = RequestConfig {
            data: Some(json!({"client": "web"})),
            ..RequestConfig::default()
        };
        let merged = config.merge(RequestOptions::new("/x")).expect("url present");
        assert_eq!(merged.data, Some(Payload::Json(json!({"client": "web"}))));
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let result = RequestConfig::default().merge(RequestOptions::default());
        assert!(matches!(result, Err(HttpError::Config(_))));
    }

    #[test]
    fn test_credentials_serde_names() {
        let encoded = serde_json::to_string(&Credentials::SameOrigin).expect("serialize");
        assert_eq!(encoded, "\"same-origin\"");
        assert_eq!(Credentials::Omit.as_str(), "omit");
    }
}
