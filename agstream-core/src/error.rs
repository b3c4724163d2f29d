//! Error types for event encoding.

/// Errors that can occur while encoding events onto a transport.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// A single event could not be serialized. The stream itself is intact.
    #[error("Failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing or flushing the transport failed, e.g. the peer disconnected.
    #[error("Failed to write event: {0}")]
    Io(#[from] std::io::Error),
}

impl EncodeError {
    /// Whether the transport is broken and the stream must stop.
    pub fn is_transport(&self) -> bool {
        matches!(self, EncodeError::Io(_))
    }
}
