//! Request body for running an agent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::{Message, MessageRole};

/// AG-UI run input.
///
/// Thread and run IDs are optional on the wire; the server generates them
/// when they are absent or blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAgentInput {
    /// Thread ID for conversation continuity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Run ID for this specific run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// Conversation history, oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Client-side tools the agent may call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarded_props: Option<Value>,
}

impl RunAgentInput {
    /// Fill in missing or blank thread/run IDs with fresh UUIDs.
    ///
    /// Returns the resolved `(thread_id, run_id)`.
    pub fn ensure_ids(&mut self) -> (String, String) {
        let thread_id = non_blank_or_new(&mut self.thread_id);
        let run_id = non_blank_or_new(&mut self.run_id);
        (thread_id, run_id)
    }

    /// The most recent message authored by the user.
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.has_role(MessageRole::User))
    }

    /// Text of the most recent user message, if it has any.
    pub fn last_user_text(&self) -> Option<String> {
        self.last_user_message()
            .map(|m| m.content.text())
            .filter(|text| !text.is_empty())
    }
}

fn non_blank_or_new(slot: &mut Option<String>) -> String {
    match slot {
        Some(id) if !id.trim().is_empty() => id.clone(),
        _ => {
            let id = uuid::Uuid::new_v4().to_string();
            *slot = Some(id.clone());
            id
        }
    }
}

/// A tool definition offered by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema of the tool parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
