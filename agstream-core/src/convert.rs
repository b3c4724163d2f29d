//! Stateful conversion core.
//!
//! A [`Converter`] tracks what is currently open in one run (at most one text
//! message, any number of tool calls) and hands out the protocol events needed
//! to keep the stream well-formed. Every operation is self-closing: starting a
//! message or a tool call while a message is open first yields the
//! `TEXT_MESSAGE_END` for that message, so producers may interleave text and
//! tool calls freely.
//!
//! The operations are grouped into four capability traits, [`RunLifecycle`],
//! [`MessageStream`], [`ToolCallStream`] and [`StateEvents`], which framework
//! adapters compose with their own translation logic.

use std::collections::HashMap;
use std::fmt::Display;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::{now_millis, Activity, Event, EventKind};
use crate::message::{Message, MessageRole};

/// Options controlling which optional events a run emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterOptions {
    /// Attach the originating source event to every produced event as `rawEvent`.
    pub include_raw_events: bool,
    /// Emit `STEP_STARTED`/`STEP_FINISHED` around reasoning traces.
    pub emit_step_events: bool,
    /// Emit `ACTIVITY_DELTA` for progress tracking.
    pub emit_activity_events: bool,
}

/// Tracking entry for one in-flight tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallState {
    pub tool_call_id: String,
    pub name: String,
    /// Argument fragments received so far, concatenated.
    pub args_buffer: String,
    pub started: bool,
    pub ended: bool,
}

#[derive(Debug, Clone)]
struct CurrentMessage {
    id: String,
    open: bool,
}

/// Mutable state of one run.
///
/// Owned by a [`Converter`] and only reachable through its lock.
#[derive(Debug, Default)]
struct ConversionContext {
    /// Most recent message. Kept after it closes so a following tool call
    /// can name it as its parent.
    current_message: Option<CurrentMessage>,
    active_tool_calls: HashMap<String, ToolCallState>,
    last_timestamp: i64,
}

impl ConversionContext {
    /// Build an event whose timestamp never goes backwards within the run.
    fn stamp(&mut self, kind: EventKind) -> Event {
        let timestamp = now_millis().max(self.last_timestamp);
        self.last_timestamp = timestamp;
        Event::at(kind, timestamp)
    }

    fn is_message_open(&self) -> bool {
        self.current_message.as_ref().is_some_and(|m| m.open)
    }

    fn current_message_id(&self) -> Option<&str> {
        self.current_message.as_ref().map(|m| m.id.as_str())
    }

    /// Close the open message, if any, returning its end event.
    fn close_message(&mut self) -> Option<Event> {
        let message = self.current_message.as_mut().filter(|m| m.open)?;
        message.open = false;
        let message_id = message.id.clone();
        Some(self.stamp(EventKind::TextMessageEnd { message_id }))
    }
}

/// Converts run activity into a well-ordered AG-UI event sequence.
///
/// One converter per run. The internal lock only guards against accidental
/// concurrent use; a run is expected to have a single producer.
pub struct Converter {
    thread_id: String,
    run_id: String,
    options: ConverterOptions,
    ctx: Mutex<ConversionContext>,
}

impl Converter {
    /// Create a converter for one run. Blank IDs are replaced with fresh UUIDs.
    pub fn new(
        thread_id: impl Into<String>,
        run_id: impl Into<String>,
        options: ConverterOptions,
    ) -> Self {
        Self {
            thread_id: id_or_new(thread_id.into()),
            run_id: id_or_new(run_id.into()),
            options,
            ctx: Mutex::new(ConversionContext::default()),
        }
    }

    pub fn options(&self) -> ConverterOptions {
        self.options
    }

    /// Snapshot of the tracking entry for a tool call.
    pub fn tool_call(&self, tool_call_id: &str) -> Option<ToolCallState> {
        self.ctx.lock().active_tool_calls.get(tool_call_id).cloned()
    }

    /// Number of tool calls currently tracked.
    pub fn active_tool_call_count(&self) -> usize {
        self.ctx.lock().active_tool_calls.len()
    }

    fn close_run(&self, ctx: &mut ConversionContext) -> Vec<Event> {
        let mut events = Vec::with_capacity(2);
        events.extend(ctx.close_message());

        if !ctx.active_tool_calls.is_empty() {
            tracing::debug!(
                run_id = %self.run_id,
                count = ctx.active_tool_calls.len(),
                "dropping tool calls that never received a result"
            );
            ctx.active_tool_calls.clear();
        }
        events
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("thread_id", &self.thread_id)
            .field("run_id", &self.run_id)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

pub(crate) fn id_or_new(id: String) -> String {
    if id.trim().is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        id
    }
}

/// Run start and termination.
pub trait RunLifecycle {
    fn thread_id(&self) -> &str;

    fn run_id(&self) -> &str;

    /// `RUN_STARTED` for this run.
    fn start_run(&self) -> Event;

    /// Close any open message, then `RUN_FINISHED`.
    fn finish_run(&self) -> Vec<Event>;

    /// Close any open message, then `RUN_ERROR` carrying the error's message.
    fn error_run(&self, error: &dyn Display) -> Vec<Event> {
        self.error_run_with_code(error, None)
    }

    /// Like [`error_run`](Self::error_run) with an error code attached.
    fn error_run_with_code(&self, error: &dyn Display, code: Option<&str>) -> Vec<Event>;
}

/// Text message streaming.
pub trait MessageStream {
    /// Close any open message, then open a new one with a fresh ID.
    fn start_message(&self, role: MessageRole) -> Vec<Event>;

    /// `TEXT_MESSAGE_CONTENT` for the current message. Empty text yields nothing.
    fn add_message_content(&self, text: &str) -> Option<Event>;

    /// `TEXT_MESSAGE_END` for the current message.
    fn end_message(&self) -> Event;

    fn is_message_open(&self) -> bool;

    /// ID of the most recent message, open or not.
    fn current_message_id(&self) -> Option<String>;
}

/// Tool call streaming.
pub trait ToolCallStream {
    /// Close any open message, then register and start a tool call.
    ///
    /// A missing or blank `tool_call_id` is replaced with a fresh UUID; read it
    /// back from the returned `TOOL_CALL_START`.
    fn start_tool_call(&self, name: &str, tool_call_id: Option<&str>) -> Vec<Event>;

    fn add_tool_call_args(&self, tool_call_id: &str, delta: &str) -> Event;

    /// `TOOL_CALL_END`. The tracking entry stays until the result arrives.
    fn end_tool_call(&self, tool_call_id: &str) -> Event;

    /// `TOOL_CALL_RESULT` under a fresh message ID; evicts the tracking entry.
    fn add_tool_call_result(&self, tool_call_id: &str, content: &str) -> Event;
}

/// Stateless event factories for steps, activities, state and extensions.
pub trait StateEvents {
    /// `STEP_STARTED` when `started`, else `STEP_FINISHED`.
    fn create_step_event(&self, step_name: &str, step_id: &str, started: bool) -> Event;

    fn create_activity_event(&self, activity: Activity) -> Event;

    fn create_state_delta_event(&self, delta: Value) -> Event;

    fn create_state_snapshot_event(&self, state: Value) -> Event;

    fn create_messages_snapshot_event(&self, messages: Vec<Message>) -> Event;

    fn create_custom_event(&self, name: &str, data: Value) -> Event;
}

impl RunLifecycle for Converter {
    fn thread_id(&self) -> &str {
        &self.thread_id
    }

    fn run_id(&self) -> &str {
        &self.run_id
    }

    fn start_run(&self) -> Event {
        self.ctx.lock().stamp(EventKind::RunStarted {
            thread_id: self.thread_id.clone(),
            run_id: self.run_id.clone(),
            parent_run_id: None,
        })
    }

    fn finish_run(&self) -> Vec<Event> {
        let mut ctx = self.ctx.lock();
        let mut events = self.close_run(&mut ctx);
        events.push(ctx.stamp(EventKind::RunFinished {
            thread_id: self.thread_id.clone(),
            run_id: self.run_id.clone(),
        }));
        events
    }

    fn error_run_with_code(&self, error: &dyn Display, code: Option<&str>) -> Vec<Event> {
        let mut ctx = self.ctx.lock();
        let mut events = self.close_run(&mut ctx);
        events.push(ctx.stamp(EventKind::RunError {
            thread_id: Some(self.thread_id.clone()),
            run_id: Some(self.run_id.clone()),
            message: error.to_string(),
            code: code.map(str::to_string),
        }));
        events
    }
}

impl MessageStream for Converter {
    fn start_message(&self, role: MessageRole) -> Vec<Event> {
        let mut ctx = self.ctx.lock();
        let mut events = Vec::with_capacity(2);
        events.extend(ctx.close_message());

        let message_id = uuid::Uuid::new_v4().to_string();
        ctx.current_message = Some(CurrentMessage {
            id: message_id.clone(),
            open: true,
        });
        events.push(ctx.stamp(EventKind::TextMessageStart { message_id, role }));
        events
    }

    fn add_message_content(&self, text: &str) -> Option<Event> {
        if text.is_empty() {
            return None;
        }

        let mut ctx = self.ctx.lock();
        if !ctx.is_message_open() {
            tracing::warn!(
                run_id = %self.run_id,
                "message content added while no message is open"
            );
        }
        let message_id = ctx.current_message_id().unwrap_or_default().to_string();
        Some(ctx.stamp(EventKind::TextMessageContent {
            message_id,
            delta: text.to_string(),
        }))
    }

    fn end_message(&self) -> Event {
        let mut ctx = self.ctx.lock();
        let message_id = match ctx.current_message.as_mut() {
            Some(message) => {
                message.open = false;
                message.id.clone()
            }
            None => String::new(),
        };
        ctx.stamp(EventKind::TextMessageEnd { message_id })
    }

    fn is_message_open(&self) -> bool {
        self.ctx.lock().is_message_open()
    }

    fn current_message_id(&self) -> Option<String> {
        self.ctx.lock().current_message_id().map(str::to_string)
    }
}

impl ToolCallStream for Converter {
    fn start_tool_call(&self, name: &str, tool_call_id: Option<&str>) -> Vec<Event> {
        let tool_call_id = id_or_new(tool_call_id.unwrap_or_default().to_string());

        let mut ctx = self.ctx.lock();
        let mut events = Vec::with_capacity(2);
        events.extend(ctx.close_message());

        ctx.active_tool_calls.insert(
            tool_call_id.clone(),
            ToolCallState {
                tool_call_id: tool_call_id.clone(),
                name: name.to_string(),
                args_buffer: String::new(),
                started: true,
                ended: false,
            },
        );

        let parent_message_id = ctx.current_message_id().map(str::to_string);
        events.push(ctx.stamp(EventKind::ToolCallStart {
            tool_call_id,
            tool_call_name: name.to_string(),
            parent_message_id,
        }));
        events
    }

    fn add_tool_call_args(&self, tool_call_id: &str, delta: &str) -> Event {
        let mut ctx = self.ctx.lock();
        match ctx.active_tool_calls.get_mut(tool_call_id) {
            Some(call) => call.args_buffer.push_str(delta),
            None => tracing::debug!(tool_call_id, "arguments for untracked tool call"),
        }
        ctx.stamp(EventKind::ToolCallArgs {
            tool_call_id: tool_call_id.to_string(),
            delta: delta.to_string(),
        })
    }

    fn end_tool_call(&self, tool_call_id: &str) -> Event {
        let mut ctx = self.ctx.lock();
        match ctx.active_tool_calls.get_mut(tool_call_id) {
            Some(call) => call.ended = true,
            None => tracing::debug!(tool_call_id, "end of untracked tool call"),
        }
        ctx.stamp(EventKind::ToolCallEnd {
            tool_call_id: tool_call_id.to_string(),
        })
    }

    fn add_tool_call_result(&self, tool_call_id: &str, content: &str) -> Event {
        let mut ctx = self.ctx.lock();
        ctx.active_tool_calls.remove(tool_call_id);
        ctx.stamp(EventKind::ToolCallResult {
            message_id: uuid::Uuid::new_v4().to_string(),
            tool_call_id: tool_call_id.to_string(),
            role: Some(MessageRole::Tool),
            content: content.to_string(),
        })
    }
}

impl StateEvents for Converter {
    fn create_step_event(&self, step_name: &str, step_id: &str, started: bool) -> Event {
        let kind = if started {
            EventKind::StepStarted {
                step_name: step_name.to_string(),
                step_id: step_id.to_string(),
            }
        } else {
            EventKind::StepFinished {
                step_id: step_id.to_string(),
            }
        };
        self.ctx.lock().stamp(kind)
    }

    fn create_activity_event(&self, activity: Activity) -> Event {
        self.ctx.lock().stamp(EventKind::ActivityDelta { activity })
    }

    fn create_state_delta_event(&self, delta: Value) -> Event {
        self.ctx.lock().stamp(EventKind::StateDelta { delta })
    }

    fn create_state_snapshot_event(&self, state: Value) -> Event {
        self.ctx.lock().stamp(EventKind::StateSnapshot { state })
    }

    fn create_messages_snapshot_event(&self, messages: Vec<Message>) -> Event {
        self.ctx.lock().stamp(EventKind::MessagesSnapshot { messages })
    }

    fn create_custom_event(&self, name: &str, data: Value) -> Event {
        self.ctx.lock().stamp(EventKind::Custom {
            name: name.to_string(),
            data,
        })
    }
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
