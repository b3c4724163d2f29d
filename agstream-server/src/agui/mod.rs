//! AG-UI protocol endpoint.
//!
//! A request moves through these states:
//!
//! | State | Leaves to |
//! |-------|-----------|
//! | Decoding | Rejected (400, no events) or Negotiated |
//! | Negotiated | Streaming, once ids and output format are fixed |
//! | Streaming | Completed, ErrorTerminated, Disconnected or Cancelled |
//!
//! Streaming formats (SSE, NDJSON) are written by a spawned task into a pipe
//! whose read half is the response body. The buffered JSON format runs the
//! same driver inline and answers with the whole array.

pub mod handler;
pub mod stream;
