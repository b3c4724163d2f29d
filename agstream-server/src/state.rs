//! Application state for the agstream server.

use std::sync::Arc;

use crate::config::HandlerConfig;

/// Shared application state, cloned for each request handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<HandlerConfig>,
}

impl AppState {
    pub fn new(config: HandlerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
