//! HTTP response types

use std::fmt;
use std::future::Future;
use std::sync::Mutex;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec;
use crate::error::HttpError;
use crate::headers::{Headers, CONTENT_TYPE};

/// HTTP Response type - generic over the body type R and error type E
/// This is the primary return type for all HTTP operations
pub type Response<R, E = HttpError> = Result<R, E>;

type BodyFuture = BoxFuture<'static, Response<Vec<u8>>>;

/// Status line, headers and final URL of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    status: u16,
    status_text: String,
    url: String,
    headers: Headers,
}

impl ResponseHead {
    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the status text
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Get the URL the response was served from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the response headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Response as returned by a transport, body not yet read
///
/// Each body reader consumes the response, so the body is read at most once.
pub struct RawResponse {
    head: ResponseHead,
    body: Mutex<BodyFuture>,
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.head.status)
            .field("status_text", &self.head.status_text)
            .field("url", &self.head.url)
            .finish_non_exhaustive()
    }
}

impl RawResponse {
    /// Create a response with an in-memory body
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self::deferred(status, status_text, async move { Ok(body) })
    }

    /// Create a response whose body is produced by `body` when first read
    pub fn deferred<F>(status: u16, status_text: impl Into<String>, body: F) -> Self
    where
        F: Future<Output = Response<Vec<u8>>> + Send + 'static,
    {
        Self {
            head: ResponseHead {
                status,
                status_text: status_text.into(),
                url: String::new(),
                headers: Headers::new(),
            },
            body: Mutex::new(Box::pin(body)),
        }
    }

    /// Add a response header
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.head.headers.insert(name, value);
        self
    }

    /// Set the URL the response was served from
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.head.url = url.into();
        self
    }

    /// Status line, headers and URL
    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.head.status
    }

    /// Get the status text
    pub fn status_text(&self) -> &str {
        &self.head.status_text
    }

    /// Look up a response header, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name)
    }

    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        self.head.is_success()
    }

    /// Check if the response status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.head.is_client_error()
    }

    /// Check if the response status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.head.is_server_error()
    }

    pub(crate) fn into_parts(self) -> Response<(ResponseHead, BodyFuture)> {
        let body = self
            .body
            .into_inner()
            .map_err(|_| HttpError::Parse("response body lock poisoned".to_string()))?;
        Ok((self.head, body))
    }

    /// Get the response body as bytes
    pub async fn array_buffer(self) -> Response<Vec<u8>> {
        let (_, body) = self.into_parts()?;
        body.await
    }

    /// Get the response body as text, replacing invalid UTF-8
    pub async fn text(self) -> Response<String> {
        let bytes = self.array_buffer().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Get the response body as JSON
    pub async fn json<T: DeserializeOwned>(self) -> Response<T> {
        let bytes = self.array_buffer().await?;
        serde_json::from_slice(&bytes).map_err(HttpError::from)
    }

    /// Get the response body as a [`Blob`] typed by its `content-type`
    pub async fn blob(self) -> Response<Blob> {
        let content_type = self.header(CONTENT_TYPE).unwrap_or_default().to_string();
        let bytes = self.array_buffer().await?;
        Ok(Blob {
            content_type,
            bytes,
        })
    }

    /// Get a form-urlencoded response body as decoded pairs
    ///
    /// Bodies declared with any other content type are rejected.
    pub async fn form_data(self) -> Response<Vec<(String, String)>> {
        let content_type = self.header(CONTENT_TYPE).unwrap_or_default();
        if !content_type.contains(crate::body::FORM_URLENCODED) {
            return Err(HttpError::Parse(format!(
                "Could not parse content as form data: unsupported content type '{content_type}'"
            )));
        }
        let text = self.text().await?;
        codec::parse(&text)
    }
}

/// Binary response body with its declared media type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    /// Value of the `content-type` header, empty if absent
    pub content_type: String,
    /// Body bytes
    pub bytes: Vec<u8>,
}

impl Blob {
    /// Size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Parsed response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    /// JSON document
    Json(Value),
    /// Binary body with media type
    Blob(Blob),
    /// Decoded form fields
    FormData(Vec<(String, String)>),
    /// Raw bytes
    ArrayBuffer(Vec<u8>),
    /// Text
    Text(String),
}

impl ResponseData {
    /// Borrow the JSON document, if any
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the text body, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Deserialize JSON or JSON text into `T`
    pub fn into_json<T: DeserializeOwned>(self) -> Response<T> {
        match self {
            ResponseData::Json(value) => serde_json::from_value(value).map_err(HttpError::from),
            ResponseData::Text(text) => serde_json::from_str(&text).map_err(HttpError::from),
            ResponseData::Blob(_) | ResponseData::FormData(_) | ResponseData::ArrayBuffer(_) => {
                Err(HttpError::Parse("response data is not JSON".to_string()))
            }
        }
    }
}

/// Response with its body parsed according to the configured response type
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    head: ResponseHead,
    /// Parsed body
    pub data: ResponseData,
}

impl FetchResponse {
    /// Create a parsed response
    pub fn new(head: ResponseHead, data: ResponseData) -> Self {
        Self { head, data }
    }

    /// Status line, headers and URL
    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.head.status
    }

    /// Get the status text
    pub fn status_text(&self) -> &str {
        &self.head.status_text
    }

    /// Look up a response header, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name)
    }

    /// Take the parsed body
    pub fn into_data(self) -> ResponseData {
        self.data
    }
}

/// Value a request resolves to
///
/// Without interceptors this is always the parsed response. Response and
/// error interceptors may substitute any other data.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Parsed response
    Response(FetchResponse),
    /// Data substituted by an interceptor
    Data(ResponseData),
}

impl Resolved {
    /// Resolve to a JSON value
    pub fn json(value: Value) -> Self {
        Resolved::Data(ResponseData::Json(value))
    }

    /// The parsed response, if the call resolved to one
    pub fn into_response(self) -> Option<FetchResponse> {
        match self {
            Resolved::Response(response) => Some(response),
            Resolved::Data(_) => None,
        }
    }

    /// The resolved data, taken from the response when there is one
    pub fn into_data(self) -> ResponseData {
        match self {
            Resolved::Response(response) => response.data,
            Resolved::Data(data) => data,
        }
    }

    /// Deserialize the resolved data into `T`
    pub fn into_json<T: DeserializeOwned>(self) -> Response<T> {
        self.into_data().into_json()
    }
}

impl From<FetchResponse> for Resolved {
    fn from(response: FetchResponse) -> Self {
        Resolved::Response(response)
    }
}

impl From<ResponseData> for Resolved {
    fn from(data: ResponseData) -> Self {
        Resolved::Data(data)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_response_type_is_result() {
        let success: Response<i32> = Ok(42);
        assert!(matches!(success, Ok(42)));

        let error: Response<i32> = Err(HttpError::Timeout);
        assert!(matches!(error, Err(HttpError::Timeout)));
    }

    #[test]
    fn test_status_classes() {
        let ok = RawResponse::new(204, "No Content", Vec::new());
        assert!(ok.is_success());
        assert!(!ok.is_client_error());

        let missing = RawResponse::new(404, "Not Found", Vec::new());
        assert!(missing.is_client_error());
        assert!(!missing.is_success());

        let failed = RawResponse::new(503, "Service Unavailable", Vec::new());
        assert!(failed.is_server_error());
        assert!(!RawResponse::new(300, "Multiple Choices", Vec::new()).is_success());
    }

    #[tokio::test]
    async fn test_text_and_json_readers() {
        let text = RawResponse::new(200, "OK", "héllo").text().await.expect("text");
        assert_eq!(text, "héllo");

        let value: Value = RawResponse::new(200, "OK", r#"{"a":[1,2]}"#)
            .json()
            .await
            .expect("json");
        assert_eq!(value, json!({"a": [1, 2]}));
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let result: Response<Value> = RawResponse::new(200, "OK", "<html>").json().await;
        assert!(matches!(result, Err(HttpError::Parse(_))));
    }

    #[tokio::test]
    async fn test_blob_keeps_content_type() {
        let blob = RawResponse::new(200, "OK", vec![1u8, 2, 3])
            .with_header("Content-Type", "image/png")
            .blob()
            .await
            .expect("blob");

        assert_eq!(blob.content_type, "image/png");
        assert_eq!(blob.size(), 3);
    }

    #[tokio::test]
    async fn test_form_data_reader() {
        let fields = RawResponse::new(200, "OK", "a=1&b=two+words")
            .with_header("content-type", "application/x-www-form-urlencoded")
            .form_data()
            .await
            .expect("form data");
        assert_eq!(
            fields,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "two words".to_string()),
            ]
        );

        let rejected = RawResponse::new(200, "OK", "{}")
            .with_header("content-type", "application/json")
            .form_data()
            .await;
        assert!(matches!(rejected, Err(HttpError::Parse(_))));
    }

    #[tokio::test]
    async fn test_deferred_body_error_surfaces_on_read() {
        let response = RawResponse::deferred(200, "OK", async {
            Err(HttpError::Transport("connection reset".to_string()))
        });
        assert!(matches!(
            response.array_buffer().await,
            Err(HttpError::Transport(_))
        ));
    }

    #[test]
    fn test_resolved_into_json() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Page {
            data: Vec<u32>,
        }

        let resolved = Resolved::json(json!({"data": [1, 2]}));
        let page: Page = resolved.into_json().expect("deserializable");
        assert_eq!(page, Page { data: vec![1, 2] });

        let bytes = Resolved::Data(ResponseData::ArrayBuffer(vec![1]));
        assert!(bytes.into_json::<Page>().is_err());
    }
}
