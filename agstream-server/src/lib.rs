//! HTTP serving of AG-UI event streams.
//!
//! This crate exposes an [`EventSource`] over the AG-UI protocol. Each `POST`
//! is decoded as a run input, a format is negotiated from `Accept`, and the
//! source's events are converted and streamed back as Server-Sent Events,
//! newline-delimited JSON, or one JSON array.
//!
//! # Example
//!
//! ```rust,no_run
//! use agstream_core::DomainEvent;
//! use agstream_server::{AgstreamRouter, EventSource, HandlerConfig, RunContext, SourceStream};
//! use futures::StreamExt;
//!
//! struct Hello;
//!
//! impl EventSource for Hello {
//!     fn run(&self, _ctx: RunContext) -> SourceStream {
//!         futures::stream::iter(vec![Ok(DomainEvent::text("Hello!").into())]).boxed()
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = AgstreamRouter::new(HandlerConfig::new(Hello))
//!     .with_agui("/api/agent")
//!     .with_health("/health")
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod agui;
pub mod config;
pub mod error;
pub mod health;
pub mod router;
pub mod source;
pub(crate) mod state;

// Re-exports
pub use agui::stream::RunOutcome;
pub use config::HandlerConfig;
pub use error::{BuildError, ServerError, ServerResult};
pub use health::HealthStatus;
pub use router::AgstreamRouter;
pub use source::{EventSource, RunContext, SourceError, SourceEvent, SourceStream};
