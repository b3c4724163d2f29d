//! Tests for AG-UI HTTP handlers focusing on error paths and edge cases.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::config::HandlerConfig;
use crate::source::{EventSource, SourceEvent, SourceStream};
use agstream_core::DomainEvent;
use axum::http::HeaderValue;
use futures::stream;
use parking_lot::Mutex;
use serde_json::Value;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Echoes a fixed reply and records the context it was run with.
#[derive(Default)]
struct RecordingSource {
    seen: Mutex<Option<RunContext>>,
}

impl EventSource for RecordingSource {
    fn run(&self, ctx: RunContext) -> SourceStream {
        *self.seen.lock() = Some(ctx);
        stream::iter(vec![Ok(SourceEvent::from(DomainEvent::text("ok")))]).boxed()
    }
}

fn state_with(source: Arc<RecordingSource>) -> AppState {
    AppState::new(HandlerConfig::from_arc(source))
}

fn json_headers(accept: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_str(accept).unwrap());
    headers
}

async fn body_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let state = state_with(Arc::default());
    let result = agui_handler(
        State(state),
        json_headers("text/event-stream"),
        Bytes::from_static(b"not-json"),
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, ServerError::InvalidJson(_)));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_shape_rejected() {
    let state = state_with(Arc::default());
    let result = agui_handler(
        State(state),
        json_headers(""),
        Bytes::from_static(br#"{"messages": "not-a-list"}"#),
    )
    .await;

    assert!(matches!(result, Err(ServerError::InvalidJson(_))));
}

#[tokio::test]
async fn test_buffered_run_returns_array() {
    let source = Arc::new(RecordingSource::default());
    let response = agui_handler(
        State(state_with(source.clone())),
        json_headers("application/json"),
        Bytes::from_static(br#"{"threadId": "t1", "runId": "r1"}"#),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let events: Vec<Value> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let types: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(
        types,
        vec![
            "RUN_STARTED",
            "TEXT_MESSAGE_START",
            "TEXT_MESSAGE_CONTENT",
            "TEXT_MESSAGE_END",
            "RUN_FINISHED"
        ]
    );
    assert_eq!(events[0]["threadId"], "t1");
    assert_eq!(events[0]["runId"], "r1");
}

#[tokio::test]
async fn test_context_carries_ids_and_user() {
    let source = Arc::new(RecordingSource::default());
    let mut headers = json_headers("application/json");
    headers.insert(USER_ID_HEADER, HeaderValue::from_static("user-7"));

    let response = agui_handler(
        State(state_with(source.clone())),
        headers,
        Bytes::from_static(br#"{"threadId": "", "messages": [{"id": "m1", "role": "user", "content": "hi"}]}"#),
    )
    .await
    .unwrap();
    body_bytes(response).await;

    let ctx = source.seen.lock().take().unwrap();
    assert!(!ctx.thread_id.is_empty());
    assert!(!ctx.run_id.is_empty());
    assert_eq!(ctx.input.thread_id.as_deref(), Some(ctx.thread_id.as_str()));
    assert_eq!(ctx.user_id.as_deref(), Some("user-7"));
    assert_eq!(ctx.input.last_user_text().as_deref(), Some("hi"));
    assert!(ctx.headers.contains_key(USER_ID_HEADER));
}

#[tokio::test]
async fn test_streaming_response_headers() {
    let response = agui_handler(
        State(state_with(Arc::default())),
        json_headers("text/event-stream"),
        Bytes::from_static(b"{}"),
    )
    .await
    .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/event-stream");
    assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-cache");
    assert_eq!(headers.get("x-accel-buffering").unwrap(), "no");
    assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");

    let text = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
    assert!(text.starts_with("data: "));
    assert!(text.contains("\"RUN_FINISHED\""));
}

#[tokio::test]
async fn test_preflight_headers() {
    let response = preflight_handler().await.into_response();
    let headers = response.headers();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    assert_eq!(
        headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "POST, OPTIONS"
    );
    assert_eq!(
        headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
        "Content-Type, Accept, Authorization, X-User-ID"
    );
    assert!(body_bytes(response).await.is_empty());
}

struct CountingLayer(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for CountingLayer {
    fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_logs_go_to_configured_logger() {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(CountingLayer(count.clone()));

    let mut config = HandlerConfig::from_arc(Arc::new(RecordingSource::default()));
    config.logger = Some(tracing::Dispatch::new(subscriber));

    let response = agui_handler(
        State(AppState::new(config)),
        json_headers("application/json"),
        Bytes::from_static(b"{}"),
    )
    .await
    .unwrap();
    body_bytes(response).await;

    assert!(count.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn test_missing_logger_is_silent() {
    let config = HandlerConfig::from_arc(Arc::new(RecordingSource::default()));
    assert!(config.logger.is_none());

    let response = agui_handler(
        State(AppState::new(config)),
        json_headers("application/x-ndjson"),
        Bytes::from_static(b"{}"),
    )
    .await
    .unwrap();

    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/x-ndjson"
    );
    let text = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn test_header_str_ignores_non_ascii() {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_ID_HEADER,
        HeaderValue::from_bytes(b"caf\xe9").unwrap(),
    );
    assert_eq!(header_str(&headers, USER_ID_HEADER), None);
    assert_eq!(header_str(&headers, "missing"), None);
}
