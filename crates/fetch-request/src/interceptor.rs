//! Interceptor hooks and the dispatch pipeline
//!
//! A request goes through five stages:
//!
//! 1. the request interceptor rewrites the built request,
//! 2. the transport sends it,
//! 3. statuses outside `200..300` are turned into [`HttpError::Status`]
//!    without reading the body,
//! 4. the body is parsed with the configured [`crate::ResponseType`],
//! 5. the response interceptor maps the parsed response to the result.
//!
//! Any failure in stages 2 to 5 goes to the error interceptor, whose output
//! becomes the result. Without one, the failure is returned unchanged.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::HttpError;
use crate::parser::parse_data;
use crate::response::{FetchResponse, RawResponse, Resolved, Response};
use crate::transport::{Transport, TransportRequest};

/// Rewrites a request before it is sent; its output replaces the request
pub type RequestInterceptor = Arc<dyn Fn(TransportRequest) -> TransportRequest + Send + Sync>;

/// Maps a parsed, successful response to the call's result
pub type ResponseInterceptor =
    Arc<dyn Fn(FetchResponse) -> BoxFuture<'static, Response<Resolved>> + Send + Sync>;

/// Handles a failed call; `Ok` absorbs the failure
pub type ErrorInterceptor =
    Arc<dyn Fn(HttpError) -> BoxFuture<'static, Response<Resolved>> + Send + Sync>;

/// Wrap a closure as a [`RequestInterceptor`]
pub fn request_interceptor<F>(f: F) -> RequestInterceptor
where
    F: Fn(TransportRequest) -> TransportRequest + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap an async closure as a [`ResponseInterceptor`]
pub fn response_interceptor<F, Fut>(f: F) -> ResponseInterceptor
where
    F: Fn(FetchResponse) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response<Resolved>> + Send + 'static,
{
    Arc::new(move |response| Box::pin(f(response)))
}

/// Wrap an async closure as an [`ErrorInterceptor`]
pub fn error_interceptor<F, Fut>(f: F) -> ErrorInterceptor
where
    F: Fn(HttpError) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response<Resolved>> + Send + 'static,
{
    Arc::new(move |error| Box::pin(f(error)))
}

/// The three optional hooks of a client
#[derive(Clone, Default)]
pub struct Interceptors {
    /// Runs before dispatch
    pub request: Option<RequestInterceptor>,
    /// Runs on success
    pub response: Option<ResponseInterceptor>,
    /// Runs on failure
    pub error: Option<ErrorInterceptor>,
}

impl fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptors")
            .field("request", &self.request.is_some())
            .field("response", &self.response.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

/// Reject responses whose status is outside `200..300`
///
/// The body is left unread and the response travels inside the error.
pub fn check_status(response: RawResponse) -> Response<RawResponse> {
    if response.is_success() {
        return Ok(response);
    }

    tracing::warn!(
        "Request failed with status {} {}",
        response.status(),
        response.status_text()
    );
    Err(HttpError::Status {
        status: response.status(),
        status_text: response.status_text().to_string(),
        response: Box::new(response),
    })
}

/// Run `request` through the interceptors and the transport
pub async fn dispatch<T>(
    transport: &T,
    request: TransportRequest,
    interceptors: Interceptors,
) -> Response<Resolved>
where
    T: Transport,
{
    let request = match &interceptors.request {
        Some(intercept) => intercept(request),
        None => request,
    };

    match send(transport, request, interceptors.response.as_ref()).await {
        Ok(resolved) => Ok(resolved),
        Err(err) => match &interceptors.error {
            Some(on_error) => {
                tracing::debug!("Handing request failure to error interceptor: {}", err);
                on_error(err).await
            }
            None => Err(err),
        },
    }
}

async fn send<T>(
    transport: &T,
    request: TransportRequest,
    on_response: Option<&ResponseInterceptor>,
) -> Response<Resolved>
where
    T: Transport,
{
    tracing::debug!("Making {} request to {}", request.method, request.url);
    let response = transport.fetch(&request).await?;
    tracing::debug!("Response status: {}", response.status());

    let response = check_status(response)?;
    let parsed = parse_data(response, request.response_type).await?;

    match on_response {
        Some(intercept) => intercept(parsed).await,
        None => Ok(Resolved::Response(parsed)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::headers::Headers;
    use crate::options::Credentials;
    use crate::parser::ResponseType;
    use crate::response::ResponseData;

    struct StaticTransport {
        status: u16,
        status_text: &'static str,
        body: &'static str,
        calls: AtomicUsize,
    }

    impl StaticTransport {
        fn new(status: u16, status_text: &'static str, body: &'static str) -> Self {
            Self {
                status,
                status_text,
                body,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Transport for StaticTransport {
        async fn fetch(&self, _request: &TransportRequest) -> Response<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawResponse::new(self.status, self.status_text, self.body))
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        async fn fetch(&self, _request: &TransportRequest) -> Response<RawResponse> {
            Err(HttpError::Transport("connection refused".to_string()))
        }
    }

    fn request() -> TransportRequest {
        TransportRequest {
            url: "https://api.test/items".to_string(),
            method: "get".to_string(),
            headers: Headers::new(),
            body: None,
            credentials: Credentials::Include,
            response_type: ResponseType::Json,
        }
    }

    #[tokio::test]
    async fn test_success_without_interceptors_returns_parsed_response() {
        let transport = StaticTransport::new(200, "OK", r#"[1,2]"#);
        let resolved = dispatch(&transport, request(), Interceptors::default())
            .await
            .expect("success");

        let response = resolved.into_response().expect("parsed response");
        assert_eq!(response.data, ResponseData::Json(json!([1, 2])));
    }

    #[tokio::test]
    async fn test_status_gate_rejects_without_reading_body() {
        let transport = StaticTransport::new(404, "Not Found", "not json at all");
        let err = dispatch(&transport, request(), Interceptors::default())
            .await
            .expect_err("404 rejects");

        assert_eq!(err.to_string(), "Not Found");
        let response = err.into_response().expect("response attached");
        assert_eq!(response.status(), 404);
        assert_eq!(
            response.text().await.expect("body still readable"),
            "not json at all"
        );
    }

    #[tokio::test]
    async fn test_request_interceptor_replaces_request() {
        let transport = StaticTransport::new(200, "OK", "{}");
        let interceptors = Interceptors {
            request: Some(request_interceptor(|mut req| {
                req.response_type = ResponseType::Text;
                req
            })),
            ..Interceptors::default()
        };

        let resolved = dispatch(&transport, request(), interceptors)
            .await
            .expect("success");
        assert_eq!(resolved.into_data(), ResponseData::Text("{}".to_string()));
    }

    #[tokio::test]
    async fn test_response_interceptor_result_is_returned() {
        let transport = StaticTransport::new(200, "OK", r#"{"a":1}"#);
        let interceptors = Interceptors {
            response: Some(response_interceptor(|response| async move {
                Ok(Resolved::Data(response.into_data()))
            })),
            ..Interceptors::default()
        };

        let resolved = dispatch(&transport, request(), interceptors)
            .await
            .expect("success");
        assert_eq!(resolved, Resolved::json(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_error_interceptor_absorbs_every_failure_kind() {
        let absorb = || Interceptors {
            error: Some(error_interceptor(|_| async {
                Ok(Resolved::json(json!({"data": []})))
            })),
            ..Interceptors::default()
        };

        let status = StaticTransport::new(500, "Internal Server Error", "");
        let parse = StaticTransport::new(200, "OK", "<html>");

        for resolved in [
            dispatch(&status, request(), absorb()).await,
            dispatch(&parse, request(), absorb()).await,
            dispatch(&FailingTransport, request(), absorb()).await,
        ] {
            assert_eq!(
                resolved.expect("absorbed"),
                Resolved::json(json!({"data": []}))
            );
        }
    }

    #[tokio::test]
    async fn test_error_interceptor_may_reject() {
        let interceptors = Interceptors {
            error: Some(error_interceptor(|err| async move {
                Err(HttpError::Config(format!("wrapped: {err}")))
            })),
            ..Interceptors::default()
        };

        let err = dispatch(&FailingTransport, request(), interceptors)
            .await
            .expect_err("still rejects");
        assert!(matches!(err, HttpError::Config(msg) if msg.contains("connection refused")));
    }

    #[tokio::test]
    async fn test_response_interceptor_error_reaches_error_interceptor() {
        let transport = StaticTransport::new(200, "OK", "{}");
        let interceptors = Interceptors {
            response: Some(response_interceptor(|_| async {
                Err(HttpError::Parse("rejected by interceptor".to_string()))
            })),
            error: Some(error_interceptor(|err| async move {
                Ok(Resolved::Data(ResponseData::Text(err.to_string())))
            })),
            ..Interceptors::default()
        };

        let resolved = dispatch(&transport, request(), interceptors)
            .await
            .expect("absorbed");
        assert_eq!(
            resolved.into_data().as_text(),
            Some("Parse error: rejected by interceptor")
        );
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_interceptors_debug_shows_presence() {
        let interceptors = Interceptors {
            request: Some(request_interceptor(|req| req)),
            ..Interceptors::default()
        };
        assert_eq!(
            format!("{:?}", interceptors),
            "Interceptors { request: true, response: false, error: false }"
        );
    }
}
