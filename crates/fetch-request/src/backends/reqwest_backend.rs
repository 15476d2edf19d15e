//! reqwest-based transport

use crate::error::HttpError;
use crate::response::{RawResponse, Response};
use crate::transport::{Transport, TransportRequest};

/// Transport backed by a `reqwest::Client`
///
/// The credentials mode is not applied: reqwest keeps no cookie jar unless
/// the wrapped client was built with one.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default `reqwest::Client`
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing `reqwest::Client`
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    /// Borrow the wrapped client
    pub fn client(&self) -> &reqwest::Client {
        &self.inner
    }
}

impl Transport for ReqwestTransport {
    async fn fetch(&self, request: &TransportRequest) -> Response<RawResponse> {
        // Method names are lower-cased upstream; the wire wants them upper-cased
        let method = reqwest::Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|e| HttpError::Build(format!("Invalid method '{}': {}", request.method, e)))?;

        let mut builder = self.inner.request(method, &request.url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone().into_bytes());
        }

        let response = builder.send().await.map_err(HttpError::from)?;
        Ok(into_raw_response(response))
    }
}

fn into_raw_response(response: reqwest::Response) -> RawResponse {
    let status = response.status();
    let url = response.url().to_string();
    let headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    let mut raw = RawResponse::deferred(
        status.as_u16(),
        status_text(status),
        async move {
            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(HttpError::from)
        },
    )
    .with_url(url);

    for (name, value) in headers {
        raw = raw.with_header(name, value);
    }
    raw
}

/// Reason phrase for `status`, or the numeric code when it has none
fn status_text(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => status.as_str().to_string(),
    }
}
