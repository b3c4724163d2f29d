//! Chat message types shared by run input and `MESSAGES_SNAPSHOT` events.

use serde::{Deserialize, Deserializer, Serialize};

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Developer instructions.
    Developer,
    /// System message.
    System,
    /// Assistant message.
    Assistant,
    /// User message.
    User,
    /// Tool result message.
    Tool,
}

impl MessageRole {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::Developer => "developer",
            MessageRole::System => "system",
            MessageRole::Assistant => "assistant",
            MessageRole::User => "user",
            MessageRole::Tool => "tool",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a message's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPart {
    /// Part kind, e.g. `text`, `image`, `binary`.
    #[serde(rename = "type")]
    pub part_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ContentPart {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            part_type: "text".to_string(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Whether this is a text part.
    pub fn is_text(&self) -> bool {
        self.part_type == "text"
    }
}

/// Message content.
///
/// Accepts either a plain string (read as a single text part) or an array of
/// parts. Always serialized as the array form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Content(pub Vec<ContentPart>);

impl Content {
    /// Content made of a single text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(vec![ContentPart::text(text)])
    }

    /// Concatenated text of all non-empty text parts.
    pub fn text(&self) -> String {
        self.0
            .iter()
            .filter(|part| part.is_text())
            .filter_map(|part| part.text.as_deref())
            .collect()
    }

    /// Only the text parts.
    pub fn text_parts(&self) -> impl Iterator<Item = &ContentPart> {
        self.0.iter().filter(|part| part.is_text())
    }

    pub fn parts(&self) -> &[ContentPart] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Parts(Vec<ContentPart>),
        }

        Ok(match Option::<Repr>::deserialize(deserializer)? {
            None => Content::default(),
            Some(Repr::Text(text)) => Content::from_text(text),
            Some(Repr::Parts(parts)) => Content(parts),
        })
    }
}

/// A chat message in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// Author role. Kept as received; clients send roles beyond [`MessageRole`],
    /// e.g. `activity` or `reasoning`.
    pub role: String,
    #[serde(default)]
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation time in milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl Message {
    /// Create a message with plain text content.
    pub fn text(id: impl Into<String>, role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: role.as_str().to_string(),
            content: Content::from_text(text),
            name: None,
            created_at: None,
        }
    }

    pub fn has_role(&self, role: MessageRole) -> bool {
        self.role == role.as_str()
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
