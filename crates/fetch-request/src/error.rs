//! HTTP error types

use thiserror::Error;

use crate::response::RawResponse;

/// Errors produced while building, dispatching or reading a request
///
/// Every variant reaches the error interceptor, so callers that install one
/// can recover from any of them.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Response status outside `200..300`
    ///
    /// The message is the status text. The response is attached unread so the
    /// caller can still inspect headers or consume the body.
    #[error("{status_text}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Status text reported by the transport
        status_text: String,
        /// The raw response that failed the status check
        response: Box<RawResponse>,
    },
    /// Network or connection failure before a status was known
    #[error("Connection error: {0}")]
    Transport(String),
    /// Request timeout
    #[error("Request timeout")]
    Timeout,
    /// Response body could not be read as the configured response type
    #[error("Parse error: {0}")]
    Parse(String),
    /// Request body or query string could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Proxy error
    #[error("Proxy error: {0}")]
    Proxy(String),
    /// Client build error
    #[error("Client build error: {0}")]
    Build(String),
    /// Invalid request options or settings
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HttpError {
    /// Status code of a [`HttpError::Status`] error
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response attached to a [`HttpError::Status`] error
    ///
    /// Transport, parse and configuration errors carry no response.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            HttpError::Status { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Take ownership of the attached raw response, e.g. to read its body
    pub fn into_response(self) -> Option<RawResponse> {
        match self {
            HttpError::Status { response, .. } => Some(*response),
            _ => None,
        }
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else if err.is_builder() {
            HttpError::Build(err.to_string())
        } else if err.is_decode() || err.is_body() {
            HttpError::Parse(err.to_string())
        } else {
            HttpError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Parse(err.to_string())
    }
}

impl From<serde_urlencoded::de::Error> for HttpError {
    fn from(err: serde_urlencoded::de::Error) -> Self {
        HttpError::Parse(err.to_string())
    }
}

impl From<config::ConfigError> for HttpError {
    fn from(err: config::ConfigError) -> Self {
        HttpError::Config(err.to_string())
    }
}
