//! Fetch-style HTTP request helper
//!
//! [`FetchClient`] wraps a [`Transport`] with configurable defaults, base URL
//! concatenation, query-string serialization, body encoding by content type,
//! and request, response and error interceptors.
//!
//! # Example
//!
//! ```no_run
//! use fetch_request::{FetchClient, RequestOptions, Resolved};
//! use serde_json::json;
//!
//! async fn example() -> fetch_request::Response<Resolved> {
//!     let client = FetchClient::builder()
//!         .base_url("https://api.example.com")
//!         .build()?;
//!
//!     // Resolve straight to the parsed body instead of the response
//!     client.on_response(|response| async move { Ok(Resolved::Data(response.into_data())) });
//!
//!     client
//!         .get("/users", RequestOptions::default().params(json!({"page": 2})))
//!         .await
//! }
//! ```

pub mod backends;
mod body;
mod client;
pub mod codec;
mod error;
mod headers;
pub mod interceptor;
mod options;
mod parser;
mod response;
pub mod settings;
mod transport;
pub mod url_builder;

#[cfg(feature = "reqwest")]
pub use backends::ReqwestTransport;
pub use body::{build_request_body, Body, ContentKind, Payload, APPLICATION_JSON, FORM_URLENCODED};
pub use client::{FetchClient, FetchClientBuilder, METHODS_WITH_BODY};
pub use error::HttpError;
pub use headers::{Headers, CONTENT_TYPE};
pub use interceptor::{ErrorInterceptor, Interceptors, RequestInterceptor, ResponseInterceptor};
pub use options::{Credentials, MergedOptions, RequestConfig, RequestOptions};
pub use parser::{parse_data, ResponseType};
pub use response::{Blob, FetchResponse, RawResponse, Resolved, Response, ResponseData, ResponseHead};
pub use transport::{Transport, TransportRequest};
