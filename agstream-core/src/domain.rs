//! Framework-neutral domain events.
//!
//! Agent frameworks describe progress in their own object models. Producers
//! map those objects onto [`DomainEvent`], which the [`Adapter`](crate::Adapter)
//! translates into protocol events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One occurrence reported by an agent framework.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    /// Who produced the event: an agent name, or `user`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Content parts, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<DomainPart>,
    /// Side effects attached to the event.
    #[serde(default)]
    pub actions: Actions,
}

impl DomainEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the author.
    pub fn by(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Append a content part.
    pub fn part(mut self, part: DomainPart) -> Self {
        self.parts.push(part);
        self
    }

    /// A single text chunk.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().part(DomainPart::Text { text: text.into() })
    }

    /// A single reasoning trace.
    pub fn thought(text: impl Into<String>) -> Self {
        Self::new().part(DomainPart::Thought { text: text.into() })
    }

    /// A single tool invocation.
    pub fn function_call(id: Option<String>, name: impl Into<String>, args: Option<Value>) -> Self {
        Self::new().part(DomainPart::FunctionCall {
            id,
            name: name.into(),
            args,
        })
    }

    /// A single tool result.
    pub fn function_response(id: Option<String>, response: Option<Value>) -> Self {
        Self::new().part(DomainPart::FunctionResponse { id, response })
    }

    /// A state change with no content.
    pub fn state_delta(delta: Map<String, Value>) -> Self {
        Self {
            actions: Actions {
                state_delta: delta,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.author.as_deref() == Some("user")
    }
}

/// A content part of a domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DomainPart {
    /// Visible text.
    Text { text: String },
    /// Reasoning trace, not part of the answer.
    Thought { text: String },
    /// The model asked for a tool.
    FunctionCall {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        args: Option<Value>,
    },
    /// A tool returned.
    FunctionResponse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<Value>,
    },
}

/// Side effects signalled alongside an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Actions {
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub state_delta: Map<String, Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub artifact_delta: Map<String, Value>,
    /// Agent the conversation is handed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_to_agent: Option<String>,
    /// Escalate to a parent agent or a human.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub escalate: bool,
}
