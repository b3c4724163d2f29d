//! AG-UI event conversion and encoding.
//!
//! This crate turns the progress of an agent run into a strictly ordered
//! sequence of AG-UI protocol events and writes that sequence onto the wire.
//!
//! - [`Converter`] tracks the open message and active tool calls for one run
//!   and emits the closing events the protocol requires.
//! - [`Adapter`] maps framework-neutral [`DomainEvent`]s onto converter
//!   operations.
//! - [`Encoder`] implementations write events as Server-Sent Events,
//!   newline-delimited JSON, or a single JSON array.
//!
//! # Example
//!
//! ```rust
//! use agstream_core::{Converter, ConverterOptions, MessageRole, MessageStream, RunLifecycle};
//!
//! let converter = Converter::new("thread-1", "run-1", ConverterOptions::default());
//!
//! let mut events = vec![converter.start_run()];
//! events.extend(converter.start_message(MessageRole::Assistant));
//! events.extend(converter.add_message_content("Hello"));
//! events.extend(converter.finish_run());
//!
//! let types: Vec<_> = events.iter().map(|e| e.event_type()).collect();
//! assert_eq!(
//!     types,
//!     ["RUN_STARTED", "TEXT_MESSAGE_START", "TEXT_MESSAGE_CONTENT", "TEXT_MESSAGE_END", "RUN_FINISHED"]
//! );
//! ```

pub mod adapter;
pub mod convert;
pub mod domain;
pub mod encoder;
pub mod error;
pub mod events;
pub mod input;
pub mod message;

// Re-exports
pub use adapter::Adapter;
pub use convert::{
    Converter, ConverterOptions, MessageStream, RunLifecycle, StateEvents, ToolCallState,
    ToolCallStream,
};
pub use domain::{Actions, DomainEvent, DomainPart};
pub use encoder::{Encoder, JsonArrayEncoder, NdjsonEncoder, OutputFormat, SseEncoder};
pub use error::EncodeError;
pub use events::{Activity, ActivityStatus, Event, EventKind};
pub use input::{RunAgentInput, Tool};
pub use message::{Content, ContentPart, Message, MessageRole};
