//! Translation from [`DomainEvent`]s to AG-UI events.
//!
//! The adapter owns one [`Converter`] and delegates all bookkeeping to it; it
//! only decides which converter operations a domain event maps to.
//!
//! | Domain input | AG-UI Event(s) |
//! |--------------|----------------|
//! | `Text` | `TEXT_MESSAGE_START` (if none open), `TEXT_MESSAGE_CONTENT` |
//! | `Thought` | `CUSTOM "thinking"`, or `STEP_STARTED`, `ACTIVITY_DELTA`?, `STEP_FINISHED` |
//! | `FunctionCall` | `TEXT_MESSAGE_END`?, `TOOL_CALL_START`, `TOOL_CALL_ARGS`?, `TOOL_CALL_END` |
//! | `FunctionResponse` | `TOOL_CALL_RESULT` |
//! | state delta | `STATE_DELTA` |
//! | artifact delta | `CUSTOM "artifact_delta"` |
//! | agent transfer | `CUSTOM "agent_transfer"` |
//! | escalation | `CUSTOM "escalation"` |

use serde_json::{json, Value};

use crate::convert::{Converter, MessageStream, StateEvents, ToolCallStream};
use crate::domain::{Actions, DomainEvent, DomainPart};
use crate::events::{Activity, ActivityStatus, Event};
use crate::message::MessageRole;

/// Converts domain events for one run.
#[derive(Debug)]
pub struct Adapter {
    converter: Converter,
}

impl Adapter {
    pub fn new(converter: Converter) -> Self {
        Self { converter }
    }

    /// The converter this adapter delegates to, for run lifecycle events.
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Convert one domain event into zero or more AG-UI events.
    pub fn convert(&self, event: &DomainEvent) -> Vec<Event> {
        let mut events = Vec::new();

        for part in &event.parts {
            match part {
                DomainPart::Thought { text } if !text.is_empty() => {
                    events.extend(self.handle_thought(event.author.as_deref(), text));
                }
                DomainPart::Text { text } if !text.is_empty() => {
                    events.extend(self.handle_text(event, text));
                }
                DomainPart::FunctionCall { id, name, args } => {
                    events.extend(self.handle_function_call(id.as_deref(), name, args.as_ref()));
                }
                DomainPart::FunctionResponse { id, response } => {
                    events.push(self.handle_function_response(id.as_deref(), response.as_ref()));
                }
                _ => {}
            }
        }

        events.extend(self.handle_actions(&event.actions));

        if self.converter.options().include_raw_events && !events.is_empty() {
            match serde_json::to_value(event) {
                Ok(raw) => {
                    for e in &mut events {
                        e.raw_event = Some(raw.clone());
                    }
                }
                Err(e) => tracing::warn!(error = %e, "failed to serialize raw event"),
            }
        }

        events
    }

    fn handle_thought(&self, author: Option<&str>, thought: &str) -> Vec<Event> {
        let conv = &self.converter;
        let options = conv.options();

        if !options.emit_step_events {
            return vec![conv.create_custom_event(
                "thinking",
                json!({
                    "content": thought,
                    "author": author.unwrap_or_default(),
                }),
            )];
        }

        let step_id = uuid::Uuid::new_v4().to_string();
        let step_name = match author {
            Some(author) if !author.is_empty() => format!("{}_thinking", author),
            _ => "thinking".to_string(),
        };

        let mut events = vec![conv.create_step_event(&step_name, &step_id, true)];

        if options.emit_activity_events {
            let mut activity = Activity::new(step_id.clone(), "thinking", ActivityStatus::Running);
            activity.description = Some(thought.to_string());
            events.push(conv.create_activity_event(activity));
        }

        events.push(conv.create_step_event(&step_name, &step_id, false));
        events
    }

    fn handle_text(&self, event: &DomainEvent, text: &str) -> Vec<Event> {
        let mut events = Vec::new();

        if !self.converter.is_message_open() {
            let role = if event.is_from_user() {
                MessageRole::User
            } else {
                MessageRole::Assistant
            };
            events.extend(self.converter.start_message(role));
        }

        events.extend(self.converter.add_message_content(text));
        events
    }

    fn handle_function_call(&self, id: Option<&str>, name: &str, args: Option<&Value>) -> Vec<Event> {
        let tool_call_id = match id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };

        // Closes any open message first.
        let mut events = self.converter.start_tool_call(name, Some(&tool_call_id));

        if let Some(args) = args.filter(|a| !a.is_null()) {
            events.push(self.converter.add_tool_call_args(&tool_call_id, &args.to_string()));
        }

        events.push(self.converter.end_tool_call(&tool_call_id));
        events
    }

    fn handle_function_response(&self, id: Option<&str>, response: Option<&Value>) -> Event {
        let tool_call_id = match id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };
        let content = response.map(Value::to_string).unwrap_or_default();

        self.converter.add_tool_call_result(&tool_call_id, &content)
    }

    fn handle_actions(&self, actions: &Actions) -> Vec<Event> {
        let conv = &self.converter;
        let mut events = Vec::new();

        if !actions.state_delta.is_empty() {
            events.push(conv.create_state_delta_event(Value::Object(actions.state_delta.clone())));
        }

        if !actions.artifact_delta.is_empty() {
            events.push(conv.create_custom_event(
                "artifact_delta",
                Value::Object(actions.artifact_delta.clone()),
            ));
        }

        if let Some(target) = actions.transfer_to_agent.as_deref().filter(|t| !t.is_empty()) {
            events.push(conv.create_custom_event("agent_transfer", json!({ "targetAgent": target })));
        }

        if actions.escalate {
            events.push(conv.create_custom_event("escalation", json!({ "escalate": true })));
        }

        events
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
