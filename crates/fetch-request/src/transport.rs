//! Transport contract
//!
//! A transport is the fetch primitive: it sends a fully built request and
//! hands back the raw response. Everything above it (defaults, URL
//! building, body encoding, status checks, parsing, interceptors) lives in
//! this crate.

use std::future::Future;
use std::sync::Arc;

use crate::body::Body;
use crate::headers::Headers;
use crate::options::Credentials;
use crate::parser::ResponseType;
use crate::response::{RawResponse, Response};

/// Fully built request as seen by interceptors and the transport
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// Final URL, including base URL, query and timestamp
    pub url: String,
    /// Lower-cased method name
    pub method: String,
    /// Lower-cased headers
    pub headers: Headers,
    /// Encoded body, only for post/put/patch with data
    pub body: Option<Body>,
    /// Credentials mode
    pub credentials: Credentials,
    /// Reader used for the response body
    pub response_type: ResponseType,
}

/// Sends requests on behalf of a [`crate::FetchClient`]
pub trait Transport: Send + Sync {
    /// Send `request`, resolving to the raw response or a transport failure
    ///
    /// Implementations must not check the status; non-2xx responses are
    /// returned as `Ok`.
    fn fetch(
        &self,
        request: &TransportRequest,
    ) -> impl Future<Output = Response<RawResponse>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn fetch(
        &self,
        request: &TransportRequest,
    ) -> impl Future<Output = Response<RawResponse>> + Send {
        (**self).fetch(request)
    }
}
