//! Tests for the router builder.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use crate::config::HandlerConfig;
use crate::error::BuildError;
use crate::router::AgstreamRouter;
use crate::source::{EventSource, RunContext, SourceStream};

struct EmptySource;

impl EventSource for EmptySource {
    fn run(&self, _ctx: RunContext) -> SourceStream {
        Box::pin(futures::stream::empty())
    }
}

fn builder() -> AgstreamRouter {
    AgstreamRouter::new(HandlerConfig::new(EmptySource))
}

#[test]
fn test_build_without_endpoints_fails() {
    let result = builder().build();
    assert!(matches!(result, Err(BuildError::NoEndpoints)));
}

#[test]
fn test_build_nested_without_endpoints_fails() {
    let result = builder().build_nested("/agent");
    assert!(matches!(result, Err(BuildError::NoEndpoints)));
}

#[test]
fn test_health_only_router_builds() {
    assert!(builder().with_health("/health").build().is_ok());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = builder().with_health("/health").build().unwrap();
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "healthy", "protocol": "ag-ui", "version": "1.0.0"})
    );
}

#[tokio::test]
async fn test_custom_health_path() {
    let app = builder()
        .with_agui("/api/agent")
        .with_health("/status")
        .build()
        .unwrap();
    let server = TestServer::new(app).unwrap();

    server.get("/status").await.assert_status_ok();
    server
        .get("/health")
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_agui_rejects_other_methods() {
    let app = builder().with_agui("/api/agent").build().unwrap();
    let server = TestServer::new(app).unwrap();

    server
        .get("/api/agent")
        .expect_failure()
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
    server
        .put("/api/agent")
        .expect_failure()
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_nested_router_prefixes_paths() {
    let app = builder()
        .with_agui("/stream")
        .with_health("/health")
        .build_nested("/agent")
        .unwrap();
    let server = TestServer::new(app).unwrap();

    server.get("/agent/health").await.assert_status_ok();
    server
        .post("/agent/stream")
        .json(&json!({}))
        .await
        .assert_status_ok();
}

#[test]
fn test_router_path_types() {
    let _ = builder().with_agui(String::from("/api/agent"));
    let _ = builder().with_health("health");
}
