//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

/// Protocol version reported by the health endpoint.
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Body of a health response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub protocol: &'static str,
    pub version: &'static str,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy",
            protocol: "ag-ui",
            version: PROTOCOL_VERSION,
        }
    }
}

/// Handle `GET` health checks.
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus::default())
}
