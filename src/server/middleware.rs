//! axum middleware that injects links into JSON responses
//!
//! The handler runs first. Its response is rewritten only when all of the
//! following hold:
//!
//! - at least one link specification admits the response status
//! - the response declares a JSON content type (`application/json` or `*+json`)
//! - the body fits within the buffering limit
//!
//! Anything else, including a body that turns out not to be JSON, is passed
//! through unchanged. A streamed body that outgrows the limit midway is
//! replayed to the client from the frames already read followed by the rest
//! of the stream.

use crate::config::{DEFAULT_MAX_BODY_SIZE, HypermediaConfig};
use crate::core::error::ConfigError;
use crate::links::LinkInjector;
use axum::Router;
use axum::body::{Body, Bytes, HttpBody};
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::Response;
use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;

/// Shared state of the injection middleware
#[derive(Debug, Clone)]
pub struct HypermediaState {
    injector: Arc<LinkInjector>,
    max_body_size: usize,
}

impl HypermediaState {
    pub fn new(injector: LinkInjector) -> Self {
        Self {
            injector: Arc::new(injector),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// State for one configured endpoint
    pub fn from_config(config: &HypermediaConfig, endpoint: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(config.injector_for(endpoint)?).max_body_size(config.max_body_size))
    }

    /// Largest response body that will be buffered and rewritten
    pub fn max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub fn injector(&self) -> &LinkInjector {
        &self.injector
    }
}

/// Extension trait to mount the middleware on a router
///
/// # Example
///
/// ```rust,ignore
/// let orders = Router::new()
///     .route("/orders", get(list_orders))
///     .with_hypermedia(HypermediaState::from_config(&config, "list_orders")?);
/// ```
pub trait HypermediaRouterExt {
    fn with_hypermedia(self, state: HypermediaState) -> Self;
}

impl<S> HypermediaRouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_hypermedia(self, state: HypermediaState) -> Self {
        self.layer(middleware::from_fn_with_state(state, inject_links))
    }
}

/// Middleware function for [`axum::middleware::from_fn_with_state`]
pub async fn inject_links(
    State(state): State<HypermediaState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status().as_u16();

    if !state.injector.admits(status) {
        tracing::debug!(status, "no link specification admits status, passing through");
        return response;
    }
    if !is_json(response.headers()) {
        tracing::debug!(status, "response is not JSON, passing through");
        return response;
    }
    let declared = content_length(response.headers()).or_else(|| {
        HttpBody::size_hint(response.body())
            .exact()
            .and_then(|n| usize::try_from(n).ok())
    });
    if let Some(length) = declared {
        if length > state.max_body_size {
            tracing::debug!(
                length,
                limit = state.max_body_size,
                "response too large, passing through"
            );
            return response;
        }
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match buffer_body(body, state.max_body_size).await {
        Buffered::Complete(bytes) => bytes,
        Buffered::Replay(body) => return Response::from_parts(parts, body),
    };

    let codec = state.injector.walker().codec();
    let mut document = match codec.decode(&bytes) {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "JSON response could not be decoded, passing through"
            );
            return Response::from_parts(parts, Body::from(bytes));
        }
    };

    let report = state.injector.inject(&mut document, status);
    if report.links_added == 0 {
        return Response::from_parts(parts, Body::from(bytes));
    }

    let encoded = match codec.encode(&document) {
        Ok(encoded) => Bytes::from(encoded),
        Err(err) => {
            tracing::warn!(
                error = %err,
                "rewritten document could not be encoded, passing through"
            );
            return Response::from_parts(parts, Body::from(bytes));
        }
    };

    tracing::debug!(
        status,
        specs = report.specs_applied,
        links = report.links_added,
        "hypermedia injected"
    );
    parts
        .headers
        .insert(CONTENT_LENGTH, HeaderValue::from(encoded.len()));
    Response::from_parts(parts, Body::from(encoded))
}

enum Buffered {
    Complete(Bytes),
    /// The body as the handler produced it, frames already read included
    Replay(Body),
}

/// Read `body` frame by frame, giving up once more than `limit` bytes arrive
async fn buffer_body(body: Body, limit: usize) -> Buffered {
    let mut frames = body.into_data_stream();
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut size = 0;

    while let Some(frame) = frames.next().await {
        match frame {
            Ok(chunk) => {
                size += chunk.len();
                chunks.push(chunk);
                if size > limit {
                    tracing::debug!(limit, "response body outgrew the limit, passing through");
                    return Buffered::Replay(replay(chunks, frames));
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to buffer response body, passing through");
                return Buffered::Replay(replay(chunks, stream::iter([Err(err)])));
            }
        }
    }

    match chunks.len() {
        0 => Buffered::Complete(Bytes::new()),
        1 => Buffered::Complete(chunks.swap_remove(0)),
        _ => Buffered::Complete(Bytes::from(chunks.concat())),
    }
}

fn replay<S>(chunks: Vec<Bytes>, rest: S) -> Body
where
    S: Stream<Item = Result<Bytes, axum::Error>> + Send + 'static,
{
    Body::from_stream(stream::iter(chunks.into_iter().map(Ok)).chain(rest))
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LinkSpec;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Json;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn state() -> HypermediaState {
        let detail = LinkSpec::new("detail", "/orders/{OrderNo}", ["Results", "[]"]).unwrap();
        HypermediaState::new(LinkInjector::default().with_link(detail))
    }

    fn streamed_json(chunks: Vec<Result<&'static str, std::io::Error>>) -> Response {
        let body = Body::from_stream(stream::iter(chunks));
        ([(CONTENT_TYPE, "application/json")], body).into_response()
    }

    async fn send(router: Router) -> Response {
        router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn call(router: Router) -> (StatusCode, HeaderMap, Bytes) {
        let response = send(router).await;
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body)
    }

    #[test]
    fn test_is_json() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(is_json(&headers));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("Application/HAL+JSON; charset=utf-8"),
        );
        assert!(is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
    }

    #[tokio::test]
    async fn test_rewrites_json_response() {
        let router = Router::new()
            .route("/", get(|| async { Json(json!({"Results": [{"OrderNo": 1}]})) }))
            .with_hypermedia(state());

        let (status, headers, body) = call(router).await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["Results"][0]["links"][0]["href"], "/orders/1");
        assert_eq!(content_length(&headers), Some(body.len()));
    }

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let router = Router::new()
            .route("/", get(|| async { "{\"Results\":[{\"OrderNo\":1}]}" }))
            .with_hypermedia(state());

        let (_, _, body) = call(router).await;
        assert_eq!(&body[..], b"{\"Results\":[{\"OrderNo\":1}]}");
    }

    #[tokio::test]
    async fn test_oversized_response_passes_through() {
        let router = Router::new()
            .route("/", get(|| async { Json(json!({"Results": [{"OrderNo": 1}]})) }))
            .with_hypermedia(state().max_body_size(4));

        let (_, _, body) = call(router).await;
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert!(value["Results"][0].get("links").is_none());
    }

    #[tokio::test]
    async fn test_streamed_response_outgrowing_limit_passes_through() {
        let router = Router::new()
            .route(
                "/",
                get(|| async {
                    streamed_json(vec![Ok(r#"{"Results":["#), Ok(r#"{"OrderNo":1}"#), Ok("]}")])
                }),
            )
            .with_hypermedia(state().max_body_size(16));

        let (status, _, body) = call(router).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], br#"{"Results":[{"OrderNo":1}]}"#);
    }

    #[tokio::test]
    async fn test_streamed_response_within_limit_is_rewritten() {
        let router = Router::new()
            .route(
                "/",
                get(|| async {
                    streamed_json(vec![Ok(r#"{"Results":["#), Ok(r#"{"OrderNo":5}]}"#)])
                }),
            )
            .with_hypermedia(state());

        let (status, headers, body) = call(router).await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["Results"][0]["links"][0]["href"], "/orders/5");
        assert_eq!(content_length(&headers), Some(body.len()));
    }

    #[tokio::test]
    async fn test_failing_stream_keeps_handler_status() {
        let router = Router::new()
            .route(
                "/",
                get(|| async {
                    streamed_json(vec![
                        Ok(r#"{"Results":["#),
                        Err(std::io::Error::other("connection reset")),
                    ])
                }),
            )
            .with_hypermedia(state());

        let response = send(router).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(axum::body::to_bytes(response.into_body(), usize::MAX).await.is_err());
    }
}
