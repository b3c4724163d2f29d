//! The producer side of a run.
//!
//! An [`EventSource`] wraps an agent framework. For each request the handler
//! builds a [`RunContext`], calls [`EventSource::prepare`], then consumes the
//! stream returned by [`EventSource::run`] until it ends or fails.

use agstream_core::{DomainEvent, Event, RunAgentInput};
use async_trait::async_trait;
use axum::http::HeaderMap;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

/// One item produced by an event source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// A framework event, translated by the adapter.
    Domain(DomainEvent),
    /// A protocol event, forwarded as-is.
    Protocol(Event),
}

impl From<DomainEvent> for SourceEvent {
    fn from(event: DomainEvent) -> Self {
        SourceEvent::Domain(event)
    }
}

impl From<Event> for SourceEvent {
    fn from(event: Event) -> Self {
        SourceEvent::Protocol(event)
    }
}

/// A failure reported by an event source. Ends the run with `RUN_ERROR`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SourceError {
    message: String,
    code: Option<String>,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Attach a machine-readable code, sent as the `code` of `RUN_ERROR`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl From<String> for SourceError {
    fn from(message: String) -> Self {
        SourceError::new(message)
    }
}

impl From<&str> for SourceError {
    fn from(message: &str) -> Self {
        SourceError::new(message)
    }
}

/// Everything an event source knows about the run it serves.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub thread_id: String,
    pub run_id: String,
    /// Value of the `X-User-ID` request header.
    pub user_id: Option<String>,
    /// The decoded request body, with ids filled in.
    pub input: RunAgentInput,
    /// Request headers, as received.
    pub headers: HeaderMap,
    /// Cancelled when the client goes away.
    pub cancel: CancellationToken,
}

/// Stream of items produced for one run.
pub type SourceStream = BoxStream<'static, Result<SourceEvent, SourceError>>;

/// Produces the events of agent runs.
#[async_trait]
pub trait EventSource: Send + Sync + 'static {
    /// Set up a run. A failure is reported to the client as a single `RUN_ERROR`.
    async fn prepare(&self, _ctx: &RunContext) -> Result<(), SourceError> {
        Ok(())
    }

    /// Start the run and return its events.
    ///
    /// The stream ending normally finishes the run; an `Err` item ends it
    /// with an error. Implementations should stop once `ctx.cancel` fires.
    fn run(&self, ctx: RunContext) -> SourceStream;
}
