//! Wire encoders for AG-UI events.
//!
//! Three formats share the [`Encoder`] interface:
//!
//! | Format | Framing | Delivery |
//! |--------|---------|----------|
//! | [`OutputFormat::EventStream`] | `data: <json>\n\n` | flushed after every event |
//! | [`OutputFormat::Ndjson`] | `<json>\n` | flushed after every event |
//! | [`OutputFormat::Json`] | `[<json>,...]` | written once on [`Encoder::flush`] |
//!
//! Serialization failures are reported per event as [`EncodeError::Serialize`]
//! and leave the stream usable; write failures are [`EncodeError::Io`] and
//! are fatal for the stream.

use std::fmt::Display;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::EncodeError;
use crate::events::{Event, EventKind};

/// Media type of the live-push format.
pub const EVENT_STREAM: &str = "text/event-stream";
/// Media type of the line-delimited format.
pub const NDJSON: &str = "application/x-ndjson";
/// Media type of the buffered array format.
pub const JSON: &str = "application/json";

/// Output format of an event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Server-Sent Events.
    #[default]
    EventStream,
    /// Newline-delimited JSON.
    Ndjson,
    /// A single JSON array.
    Json,
}

impl OutputFormat {
    /// Choose a format from an `Accept` header value.
    ///
    /// NDJSON wins wherever it appears, then plain JSON wherever it appears.
    /// Everything else, including an empty or wildcard header, gets the
    /// event stream.
    pub fn negotiate(accept: &str) -> Self {
        let accept = accept.to_ascii_lowercase();

        if accept.contains(NDJSON) {
            OutputFormat::Ndjson
        } else if accept.contains(JSON) {
            OutputFormat::Json
        } else {
            OutputFormat::EventStream
        }
    }

    /// `Content-Type` of responses in this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::EventStream => EVENT_STREAM,
            OutputFormat::Ndjson => NDJSON,
            OutputFormat::Json => JSON,
        }
    }

    /// Whether events are delivered incrementally.
    pub fn is_streaming(&self) -> bool {
        !matches!(self, OutputFormat::Json)
    }

    /// Create an encoder of this format over `writer`.
    pub fn encoder<W>(self, writer: W) -> Box<dyn Encoder>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        match self {
            OutputFormat::EventStream => Box::new(SseEncoder::new(writer)),
            OutputFormat::Ndjson => Box::new(NdjsonEncoder::new(writer)),
            OutputFormat::Json => Box::new(JsonArrayEncoder::new(writer)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.content_type())
    }
}

/// Encodes events onto a transport.
#[async_trait]
pub trait Encoder: Send {
    /// Encode one event.
    async fn encode(&mut self, event: &Event) -> Result<(), EncodeError>;

    /// Encode events in order.
    ///
    /// Events that fail to serialize are logged and skipped; the first
    /// transport failure aborts the rest.
    async fn encode_multiple(&mut self, events: &[Event]) -> Result<(), EncodeError> {
        for event in events {
            match self.encode(event).await {
                Err(EncodeError::Serialize(e)) => {
                    tracing::warn!(
                        event_type = event.event_type(),
                        error = %e,
                        "skipping event that failed to serialize"
                    );
                }
                other => other?,
            }
        }
        Ok(())
    }

    /// Make sure everything encoded so far reaches the transport.
    async fn flush(&mut self) -> Result<(), EncodeError>;

    /// The wire format this encoder produces.
    fn format(&self) -> OutputFormat;
}

/// Server-Sent Events encoder.
#[derive(Debug)]
pub struct SseEncoder<W> {
    writer: W,
}

impl<W> SseEncoder<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write a `RUN_ERROR` for the given run.
    pub async fn encode_error(
        &mut self,
        thread_id: &str,
        run_id: &str,
        error: &dyn Display,
    ) -> Result<(), EncodeError> {
        let event = Event::new(EventKind::RunError {
            thread_id: Some(thread_id.to_string()),
            run_id: Some(run_id.to_string()),
            message: error.to_string(),
            code: None,
        });
        self.encode(&event).await
    }
}

#[async_trait]
impl<W> Encoder for SseEncoder<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn encode(&mut self, event: &Event) -> Result<(), EncodeError> {
        let json = serde_json::to_string(event)?;
        let frame = format!("data: {}\n\n", json);
        write_and_flush(&mut self.writer, frame.as_bytes()).await
    }

    async fn flush(&mut self) -> Result<(), EncodeError> {
        self.writer.flush().await?;
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::EventStream
    }
}

/// Newline-delimited JSON encoder.
#[derive(Debug)]
pub struct NdjsonEncoder<W> {
    writer: W,
}

impl<W> NdjsonEncoder<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> Encoder for NdjsonEncoder<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn encode(&mut self, event: &Event) -> Result<(), EncodeError> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        write_and_flush(&mut self.writer, line.as_bytes()).await
    }

    async fn flush(&mut self) -> Result<(), EncodeError> {
        self.writer.flush().await?;
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Ndjson
    }
}

/// Buffered encoder writing all events as one JSON array.
///
/// Events are serialized as they arrive; nothing reaches the writer until
/// [`flush`](Encoder::flush), which writes the array once.
#[derive(Debug)]
pub struct JsonArrayEncoder<W> {
    writer: W,
    items: Vec<String>,
    written: bool,
}

impl<W> JsonArrayEncoder<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            items: Vec::new(),
            written: false,
        }
    }

    /// Number of events buffered so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> Encoder for JsonArrayEncoder<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn encode(&mut self, event: &Event) -> Result<(), EncodeError> {
        self.items.push(serde_json::to_string(event)?);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), EncodeError> {
        if self.written {
            return Ok(());
        }
        let body = format!("[{}]", self.items.join(","));
        write_and_flush(&mut self.writer, body.as_bytes()).await?;
        self.written = true;
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

async fn write_and_flush<W>(writer: &mut W, bytes: &[u8]) -> Result<(), EncodeError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_all(bytes).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "encoder_tests.rs"]
mod tests;
