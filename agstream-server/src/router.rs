//! Router builder for agstream HTTP endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::agui::handler::{agui_handler, preflight_handler};
use crate::config::HandlerConfig;
use crate::error::BuildError;
use crate::health::health_handler;
use crate::state::AppState;

/// Builder for configuring agstream HTTP endpoints.
///
/// # Example
///
/// ```rust,no_run
/// use agstream_server::{AgstreamRouter, EventSource, HandlerConfig, RunContext, SourceStream};
///
/// struct Silent;
///
/// impl EventSource for Silent {
///     fn run(&self, _ctx: RunContext) -> SourceStream {
///         Box::pin(futures::stream::empty())
///     }
/// }
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let app = AgstreamRouter::new(HandlerConfig::new(Silent))
///     .with_agui("/api/agent")
///     .with_health("/health")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AgstreamRouter {
    config: HandlerConfig,
    agui_path: Option<String>,
    health_path: Option<String>,
}

impl AgstreamRouter {
    pub fn new(config: HandlerConfig) -> Self {
        Self {
            config,
            agui_path: None,
            health_path: None,
        }
    }

    /// Enable the AG-UI endpoint at the specified path.
    ///
    /// The path accepts `POST` runs and `OPTIONS` preflights; other methods
    /// get 405.
    pub fn with_agui(mut self, path: impl Into<String>) -> Self {
        self.agui_path = Some(path.into());
        self
    }

    /// Enable the health endpoint at the specified path.
    pub fn with_health(mut self, path: impl Into<String>) -> Self {
        self.health_path = Some(path.into());
        self
    }

    /// Build the router with all configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoEndpoints`] if no endpoints were configured.
    pub fn build(self) -> Result<Router, BuildError> {
        if self.agui_path.is_none() && self.health_path.is_none() {
            return Err(BuildError::NoEndpoints);
        }

        let mut router = Router::new();

        if let Some(agui_path) = &self.agui_path {
            router = router.route(agui_path, post(agui_handler).options(preflight_handler));
        }

        if let Some(health_path) = &self.health_path {
            router = router.route(health_path, get(health_handler));
        }

        Ok(router.with_state(AppState::new(self.config)))
    }

    /// Build the router and nest it under a prefix path.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoEndpoints`] if no endpoints were configured.
    pub fn build_nested(self, prefix: impl Into<String>) -> Result<Router, BuildError> {
        Ok(Router::new().nest(&prefix.into(), self.build()?))
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
