//! AG-UI protocol event types.
//!
//! Every event is an [`Event`]: a variant-specific [`EventKind`] plus the
//! common `timestamp` and optional `rawEvent` fields. On the wire the kind is
//! flattened into the same object, discriminated by `type`:
//!
//! ```json
//! {"type":"TEXT_MESSAGE_CONTENT","messageId":"m1","delta":"Hi","timestamp":1700000000000}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::{Message, MessageRole};

/// An AG-UI protocol event as sent to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Variant-specific payload, including the `type` discriminator.
    #[serde(flatten)]
    pub kind: EventKind,
    /// Creation time in milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: i64,
    /// The source event this one was derived from, when raw events are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

impl Event {
    /// Create an event stamped with the current time.
    pub fn new(kind: EventKind) -> Self {
        Self::at(kind, now_millis())
    }

    /// Create an event with an explicit timestamp.
    pub fn at(kind: EventKind, timestamp: i64) -> Self {
        Self {
            kind,
            timestamp,
            raw_event: None,
        }
    }

    /// Attach the originating source event.
    pub fn with_raw_event(mut self, raw: Value) -> Self {
        self.raw_event = Some(raw);
        self
    }

    /// The `type` discriminator of this event.
    pub fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Event::new(kind)
    }
}

/// Current wall-clock time in milliseconds since the epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// AG-UI event payloads.
///
/// Serialized with a `type` field in SCREAMING_SNAKE_CASE and camelCase
/// field names, as per the AG-UI specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum EventKind {
    // ===== Lifecycle Events =====
    /// Agent run started.
    RunStarted {
        /// Thread ID for conversation continuity.
        thread_id: String,
        /// Unique run ID for this execution.
        run_id: String,
        /// Run that spawned this one, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_run_id: Option<String>,
    },

    /// Agent run finished successfully.
    RunFinished { thread_id: String, run_id: String },

    /// Agent run failed with an error.
    RunError {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thread_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        run_id: Option<String>,
        /// Error message describing the failure.
        message: String,
        /// Optional error code.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },

    // ===== Step Events =====
    /// A processing step started.
    StepStarted { step_name: String, step_id: String },

    /// A processing step finished.
    StepFinished { step_id: String },

    // ===== Text Message Events =====
    /// Start of a new text message.
    TextMessageStart {
        message_id: String,
        role: MessageRole,
    },

    /// Incremental content for a text message. `delta` is never empty.
    TextMessageContent { message_id: String, delta: String },

    /// End of a text message.
    TextMessageEnd { message_id: String },

    // ===== Tool Call Events =====
    /// Start of a tool call.
    ToolCallStart {
        tool_call_id: String,
        tool_call_name: String,
        /// Message the tool call belongs to.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_message_id: Option<String>,
    },

    /// Incremental arguments for a tool call.
    ToolCallArgs {
        tool_call_id: String,
        /// JSON fragment to append to the arguments.
        delta: String,
    },

    /// End of tool call arguments.
    ToolCallEnd { tool_call_id: String },

    /// Result from a tool call.
    ToolCallResult {
        /// Unique message ID for this result.
        message_id: String,
        tool_call_id: String,
        /// Role (typically Tool).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<MessageRole>,
        /// Result content (text or JSON string).
        content: String,
    },

    // ===== State Management Events =====
    /// Complete state snapshot.
    StateSnapshot { state: Value },

    /// Incremental state update.
    StateDelta { delta: Value },

    /// Complete message history.
    MessagesSnapshot { messages: Vec<Message> },

    // ===== Activity Events =====
    /// Current set of activities.
    ActivitySnapshot { activities: Vec<Activity> },

    /// Update to a single activity.
    ActivityDelta { activity: Activity },

    // ===== Special Events =====
    /// Opaque passthrough data.
    Raw { data: Value },

    /// Vendor-specific extension.
    Custom { name: String, data: Value },
}

impl EventKind {
    /// The `type` discriminator of this payload.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventKind::RunStarted { .. } => "RUN_STARTED",
            EventKind::RunFinished { .. } => "RUN_FINISHED",
            EventKind::RunError { .. } => "RUN_ERROR",
            EventKind::StepStarted { .. } => "STEP_STARTED",
            EventKind::StepFinished { .. } => "STEP_FINISHED",
            EventKind::TextMessageStart { .. } => "TEXT_MESSAGE_START",
            EventKind::TextMessageContent { .. } => "TEXT_MESSAGE_CONTENT",
            EventKind::TextMessageEnd { .. } => "TEXT_MESSAGE_END",
            EventKind::ToolCallStart { .. } => "TOOL_CALL_START",
            EventKind::ToolCallArgs { .. } => "TOOL_CALL_ARGS",
            EventKind::ToolCallEnd { .. } => "TOOL_CALL_END",
            EventKind::ToolCallResult { .. } => "TOOL_CALL_RESULT",
            EventKind::StateSnapshot { .. } => "STATE_SNAPSHOT",
            EventKind::StateDelta { .. } => "STATE_DELTA",
            EventKind::MessagesSnapshot { .. } => "MESSAGES_SNAPSHOT",
            EventKind::ActivitySnapshot { .. } => "ACTIVITY_SNAPSHOT",
            EventKind::ActivityDelta { .. } => "ACTIVITY_DELTA",
            EventKind::Raw { .. } => "RAW",
            EventKind::Custom { .. } => "CUSTOM",
        }
    }

    /// Whether this payload ends a run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EventKind::RunFinished { .. } | EventKind::RunError { .. }
        )
    }
}

/// Progress status of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// An agent activity or step, for progress tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub status: ActivityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl Activity {
    pub fn new(
        id: impl Into<String>,
        activity_type: impl Into<String>,
        status: ActivityStatus,
    ) -> Self {
        Self {
            id: id.into(),
            activity_type: activity_type.into(),
            status,
            description: None,
            started_at: None,
            completed_at: None,
        }
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
