//! Request client

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::instrument;

#[cfg(feature = "reqwest")]
use crate::backends::ReqwestTransport;
use crate::body::{build_request_body, ContentKind, Payload, FORM_URLENCODED};
use crate::error::HttpError;
use crate::headers::CONTENT_TYPE;
use crate::interceptor::{
    dispatch, error_interceptor, request_interceptor, response_interceptor, ErrorInterceptor,
    Interceptors, RequestInterceptor, ResponseInterceptor,
};
use crate::options::{Credentials, MergedOptions, RequestConfig, RequestOptions};
use crate::parser::ResponseType;
use crate::response::{FetchResponse, Resolved, Response};
use crate::transport::{Transport, TransportRequest};
use crate::url_builder::{add_timestamp_query, build_url_with_query_data};

/// Methods that carry a request body
pub const METHODS_WITH_BODY: [&str; 3] = ["post", "put", "patch"];

/// HTTP request client
///
/// Holds the default options and interceptors applied to every request.
/// Clones share the same interceptors.
///
/// Interceptors can be replaced at any time, but a request picks them up
/// when it starts, so replacing them while requests are in flight does not
/// order against those requests.
pub struct FetchClient<T> {
    transport: Arc<T>,
    defaults: Arc<RequestConfig>,
    interceptors: Arc<RwLock<Interceptors>>,
}

impl<T> Clone for FetchClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            defaults: Arc::clone(&self.defaults),
            interceptors: Arc::clone(&self.interceptors),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for FetchClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("transport", &self.transport)
            .field("defaults", &self.defaults)
            .field("interceptors", &*self.read_interceptors())
            .finish()
    }
}

#[cfg(feature = "reqwest")]
impl FetchClient<ReqwestTransport> {
    /// Create a client with the given defaults and a default reqwest transport
    pub fn new(config: RequestConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

#[cfg(feature = "reqwest")]
impl Default for FetchClient<ReqwestTransport> {
    fn default() -> Self {
        Self::new(RequestConfig::default())
    }
}

impl FetchClient<()> {
    /// Create a new client builder
    pub fn builder() -> FetchClientBuilder {
        FetchClientBuilder::default()
    }
}

impl<T: Transport> FetchClient<T> {
    /// Create a client with the given defaults and transport
    pub fn with_transport(config: RequestConfig, transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            defaults: Arc::new(config),
            interceptors: Arc::new(RwLock::new(Interceptors::default())),
        }
    }

    /// Default options
    pub fn config(&self) -> &RequestConfig {
        &self.defaults
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of the installed interceptors
    pub fn interceptors(&self) -> Interceptors {
        self.read_interceptors().clone()
    }

    /// Build the request that [`FetchClient::request`] would dispatch
    ///
    /// The request interceptor has not run yet on the returned value.
    pub fn prepare(&self, options: RequestOptions) -> Response<TransportRequest> {
        let MergedOptions {
            url,
            base_url,
            method,
            mut headers,
            data,
            params,
            response_type,
            with_timestamp,
            credentials,
        } = self.defaults.merge(options)?;

        let url = build_url_with_query_data(&url, params.as_ref());
        let method = method.to_lowercase();

        let body = match data {
            Some(data) if METHODS_WITH_BODY.contains(&method.as_str()) && !data.is_null() => {
                if headers.get(CONTENT_TYPE).is_none_or(str::is_empty) {
                    headers.insert(CONTENT_TYPE, FORM_URLENCODED);
                }
                let kind = ContentKind::classify(headers.get(CONTENT_TYPE).unwrap_or_default());
                Some(build_request_body(&data, kind)?)
            }
            _ => None,
        };

        let mut url = format!("{base_url}{url}");
        if with_timestamp {
            url = add_timestamp_query(&url);
        }

        Ok(TransportRequest {
            url,
            method,
            headers,
            body,
            credentials,
            response_type,
        })
    }

    /// Send a request built from `options` merged over the defaults
    ///
    /// Resolves to the parsed response, or to whatever the response or error
    /// interceptor produced.
    #[instrument(skip_all, fields(url = options.url.as_deref().unwrap_or_default()))]
    pub async fn request(&self, options: RequestOptions) -> Response<Resolved> {
        let interceptors = self.interceptors();
        let request = match self.prepare(options) {
            Ok(request) => request,
            Err(err) => {
                tracing::error!("Failed to build request: {}", err);
                return Err(err);
            }
        };

        dispatch(self.transport.as_ref(), request, interceptors).await
    }

    /// GET request
    pub async fn get(&self, url: &str, options: RequestOptions) -> Response<Resolved> {
        self.request(without_body("get", url, options)).await
    }

    /// DELETE request
    pub async fn delete(&self, url: &str, options: RequestOptions) -> Response<Resolved> {
        self.request(without_body("delete", url, options)).await
    }

    /// HEAD request
    pub async fn head(&self, url: &str, options: RequestOptions) -> Response<Resolved> {
        self.request(without_body("head", url, options)).await
    }

    /// OPTIONS request
    pub async fn options(&self, url: &str, options: RequestOptions) -> Response<Resolved> {
        self.request(without_body("options", url, options)).await
    }

    /// POST request with `data` as body
    pub async fn post(
        &self,
        url: &str,
        data: impl Into<Payload>,
        options: RequestOptions,
    ) -> Response<Resolved> {
        self.request(with_body("post", url, data.into(), options))
            .await
    }

    /// PUT request with `data` as body
    pub async fn put(
        &self,
        url: &str,
        data: impl Into<Payload>,
        options: RequestOptions,
    ) -> Response<Resolved> {
        self.request(with_body("put", url, data.into(), options))
            .await
    }

    /// PATCH request with `data` as body
    pub async fn patch(
        &self,
        url: &str,
        data: impl Into<Payload>,
        options: RequestOptions,
    ) -> Response<Resolved> {
        self.request(with_body("patch", url, data.into(), options))
            .await
    }

    /// Replace the request interceptor; `None` leaves it unchanged
    pub fn setup_request_interceptor(&self, interceptor: Option<RequestInterceptor>) {
        if let Some(interceptor) = interceptor {
            self.write_interceptors().request = Some(interceptor);
        }
    }

    /// Replace the response and error interceptors; each `None` leaves the
    /// corresponding hook unchanged
    pub fn setup_response_interceptor(
        &self,
        response: Option<ResponseInterceptor>,
        error: Option<ErrorInterceptor>,
    ) {
        let mut interceptors = self.write_interceptors();
        if let Some(response) = response {
            interceptors.response = Some(response);
        }
        if let Some(error) = error {
            interceptors.error = Some(error);
        }
    }

    /// Install a request interceptor from a closure
    pub fn on_request<F>(&self, f: F)
    where
        F: Fn(TransportRequest) -> TransportRequest + Send + Sync + 'static,
    {
        self.setup_request_interceptor(Some(request_interceptor(f)));
    }

    /// Install a response interceptor from an async closure
    pub fn on_response<F, Fut>(&self, f: F)
    where
        F: Fn(FetchResponse) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Response<Resolved>> + Send + 'static,
    {
        self.setup_response_interceptor(Some(response_interceptor(f)), None);
    }

    /// Install an error interceptor from an async closure
    pub fn on_error<F, Fut>(&self, f: F)
    where
        F: Fn(HttpError) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Response<Resolved>> + Send + 'static,
    {
        self.setup_response_interceptor(None, Some(error_interceptor(f)));
    }
}

impl<T> FetchClient<T> {
    fn read_interceptors(&self) -> RwLockReadGuard<'_, Interceptors> {
        self.interceptors
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_interceptors(&self) -> RwLockWriteGuard<'_, Interceptors> {
        self.interceptors
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// Call options win over the verb's method and URL, as with an object spread
fn without_body(method: &str, url: &str, mut options: RequestOptions) -> RequestOptions {
    options.method.get_or_insert_with(|| method.to_string());
    options.url.get_or_insert_with(|| url.to_string());
    options
}

fn with_body(method: &str, url: &str, data: Payload, options: RequestOptions) -> RequestOptions {
    let mut options = without_body(method, url, options);
    options.data.get_or_insert(data);
    options
}

/// Builder for [`FetchClient`] defaults and reqwest settings
#[derive(Debug, Default)]
pub struct FetchClientBuilder {
    config: RequestConfig,
    #[cfg(feature = "reqwest")]
    accept_invalid_certs: bool,
    #[cfg(feature = "reqwest")]
    proxy: Option<url::Url>,
}

impl FetchClientBuilder {
    /// Replace all defaults
    pub fn config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the default method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.config.method = method.into();
        self
    }

    /// Add a default header
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name, value);
        self
    }

    /// Set default query parameters
    pub fn params(mut self, params: Value) -> Self {
        self.config.params = Some(params);
        self
    }

    /// Set the default response reader
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.config.response_type = response_type;
        self
    }

    /// Enable or disable the cache-busting timestamp
    pub fn with_timestamp(mut self, with_timestamp: bool) -> Self {
        self.config.with_timestamp = with_timestamp;
        self
    }

    /// Set the credentials mode
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = credentials;
        self
    }

    /// Accept invalid TLS certificates
    #[cfg(feature = "reqwest")]
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Route all requests through a proxy
    #[cfg(feature = "reqwest")]
    pub fn proxy(mut self, url: url::Url) -> Self {
        self.proxy = Some(url);
        self
    }

    /// Build a client using a custom transport
    ///
    /// reqwest settings on the builder do not apply to custom transports.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> FetchClient<T> {
        FetchClient::with_transport(self.config, transport)
    }

    /// Build a client backed by reqwest
    #[cfg(feature = "reqwest")]
    pub fn build(self) -> Response<FetchClient<ReqwestTransport>> {
        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(proxy_url) = self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .map_err(|e| HttpError::Proxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(HttpError::from)?;
        Ok(FetchClient::with_transport(
            self.config,
            ReqwestTransport::from_reqwest(client),
        ))
    }
}
