//! Request payloads and body encoding

use serde::Serialize;
use serde_json::Value;

use crate::codec;
use crate::error::HttpError;
use crate::response::Response;

/// `application/x-www-form-urlencoded`
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
/// `application/json`
pub const APPLICATION_JSON: &str = "application/json";

/// Encoding selected from a `content-type` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Query-codec encoded form body
    FormUrlEncoded,
    /// JSON body
    Json,
    /// Anything else; the payload is sent as-is
    Other,
}

impl ContentKind {
    /// Classify a `content-type` header value by substring
    pub fn classify(content_type: &str) -> Self {
        if content_type.contains(FORM_URLENCODED) {
            ContentKind::FormUrlEncoded
        } else if content_type.contains(APPLICATION_JSON) {
            ContentKind::Json
        } else {
            ContentKind::Other
        }
    }
}

/// Data supplied for a body-bearing request
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured data, encoded according to the content type
    Json(Value),
    /// Pre-encoded text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Payload {
    /// Build a structured payload from any serializable value
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Response<Self> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(|e| HttpError::Serialization(e.to_string()))
    }

    /// Whether this payload is a JSON `null`
    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Json(Value::Null))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

/// Encoded request body handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Text body
    Text(String),
    /// Binary body
    Bytes(Vec<u8>),
}

impl Body {
    /// Borrow the body as bytes
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(text) => text.as_bytes(),
            Body::Bytes(bytes) => bytes,
        }
    }

    /// Convert the body into bytes
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Text(text) => text.into_bytes(),
            Body::Bytes(bytes) => bytes,
        }
    }

    /// Text form of the body, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            Body::Bytes(_) => None,
        }
    }
}

/// Encode `data` for the given content kind
///
/// Form bodies go through the query codec and JSON bodies through
/// `serde_json`. Text and bytes already are a body and pass through, except
/// that text declared as JSON is written as a JSON string.
pub fn build_request_body(data: &Payload, kind: ContentKind) -> Response<Body> {
    let body = match (kind, data) {
        (ContentKind::FormUrlEncoded, Payload::Json(value)) => Body::Text(codec::stringify(value)),
        (ContentKind::Json, Payload::Json(value)) => Body::Text(
            serde_json::to_string(value).map_err(|e| HttpError::Serialization(e.to_string()))?,
        ),
        (ContentKind::Json, Payload::Text(text)) => Body::Text(
            serde_json::to_string(text).map_err(|e| HttpError::Serialization(e.to_string()))?,
        ),
        (ContentKind::Other, Payload::Json(Value::String(text))) => Body::Text(text.clone()),
        (ContentKind::Other, Payload::Json(value)) => Body::Text(value.to_string()),
        (_, Payload::Text(text)) => Body::Text(text.clone()),
        (_, Payload::Bytes(bytes)) => Body::Bytes(bytes.clone()),
    };

    Ok(body)
}
