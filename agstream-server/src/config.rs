//! Per-handler configuration.

use std::fmt;
use std::sync::Arc;

use agstream_core::ConverterOptions;
use tracing::Dispatch;

use crate::source::EventSource;

/// Configuration for one AG-UI endpoint.
#[derive(Clone)]
pub struct HandlerConfig {
    /// Producer of run events.
    pub source: Arc<dyn EventSource>,
    /// Name reported in logs.
    pub app_name: String,
    /// Options for the converter created for each run.
    pub options: ConverterOptions,
    /// Subscriber the handler logs to. `None` disables logging for the handler.
    pub logger: Option<Dispatch>,
}

impl HandlerConfig {
    pub fn new(source: impl EventSource) -> Self {
        Self::from_arc(Arc::new(source))
    }

    /// Create a config from a shared source.
    pub fn from_arc(source: Arc<dyn EventSource>) -> Self {
        Self {
            source,
            app_name: "agstream".to_string(),
            options: ConverterOptions::default(),
            logger: None,
        }
    }

    /// The dispatcher handler work runs under.
    pub fn dispatch(&self) -> Dispatch {
        self.logger.clone().unwrap_or_else(Dispatch::none)
    }
}

impl fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerConfig")
            .field("app_name", &self.app_name)
            .field("options", &self.options)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}
