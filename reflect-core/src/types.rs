// Core type definitions for agentreflect

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::roles::normalize_role;

/// Role of a message in a conversation
///
/// The four canonical roles cover what the grammars recognize. Labels that do
/// not map onto one of them (`unknown`, `observer`, ...) are kept verbatim in
/// `Other`, lower-cased and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Tool => "tool",
            Self::Other(label) => label,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        normalize_role(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(label) => label,
            canonical => canonical.as_str().to_string(),
        }
    }
}

/// Normalized message format produced by every grammar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Sibling fields of a structured entry (tool call ids, names, ...).
    /// Always empty for narrative grammars.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(role: Role, content: impl Into<String>, metadata: Map<String, Value>) -> Self {
        Message {
            role,
            content: content.into(),
            metadata,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]\n{}", self.role.as_str().to_uppercase(), self.content)
    }
}

/// Grammar a transcript was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionFormat {
    /// One JSON array of `{role, content}` objects
    StructuredArray,
    /// One JSON object per line
    LineDelimited,
    /// `## Human` / `## Assistant` sections with an optional metadata header
    MarkerNarrative,
    /// `User:` / `Assistant:` style plain text, or anything else
    GenericNarrative,
}

impl SessionFormat {
    pub const ALL: [SessionFormat; 4] = [
        Self::StructuredArray,
        Self::LineDelimited,
        Self::MarkerNarrative,
        Self::GenericNarrative,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StructuredArray => "structured-array",
            Self::LineDelimited => "line-delimited",
            Self::MarkerNarrative => "marker-narrative",
            Self::GenericNarrative => "generic-narrative",
        }
    }
}

impl fmt::Display for SessionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed agent session
///
/// Only constructible through [`Session::new`], which rejects an empty message
/// list, so every `Session` holds at least one message.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    messages: Vec<Message>,
    source: String,
    format_detected: SessionFormat,
}

impl Session {
    pub fn new(
        messages: Vec<Message>,
        source: impl Into<String>,
        format_detected: SessionFormat,
    ) -> Result<Self, ParseError> {
        if messages.is_empty() {
            return Err(ParseError::NoMessages {
                format: format_detected,
            });
        }
        Ok(Session {
            messages,
            source: source.into(),
            format_detected,
        })
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// File path, `stdin`, or an empty label
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn format(&self) -> SessionFormat {
        self.format_detected
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn user_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::User)
    }

    pub fn assistant_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::Assistant)
    }

    /// Render every message as `[ROLE]\ncontent`, separated by a blank line
    pub fn to_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Basic session statistics, recomputed on every call
    pub fn stats(&self) -> SessionStats {
        let total_chars: usize = self.messages.iter().map(|m| m.content.chars().count()).sum();
        SessionStats {
            total_messages: self.message_count(),
            user_messages: self.user_messages().count(),
            assistant_messages: self.assistant_messages().count(),
            total_chars,
            // Rough estimate: 1 token ~= 4 characters
            estimated_tokens: total_chars / 4,
        }
    }
}

/// Derived counts for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub total_chars: usize,
    pub estimated_tokens: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_session() -> Session {
        Session::new(
            vec![
                Message::new(Role::User, "Fix the build"),
                Message::new(Role::Assistant, "Done, the linker flag was missing."),
                Message::new(Role::Tool, "exit 0"),
            ],
            "session.log",
            SessionFormat::GenericNarrative,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_session_rejected() {
        let err = Session::new(Vec::new(), "", SessionFormat::LineDelimited).unwrap_err();
        assert!(err.to_string().contains("line-delimited"));
    }

    #[test]
    fn test_to_text() {
        let session = sample_session();
        assert_eq!(
            session.to_text(),
            "[USER]\nFix the build\n\n[ASSISTANT]\nDone, the linker flag was missing.\n\n[TOOL]\nexit 0"
        );
    }

    #[test]
    fn test_stats() {
        let stats = sample_session().stats();
        assert_eq!(stats.total_messages, 3);
        assert_eq!(stats.user_messages, 1);
        assert_eq!(stats.assistant_messages, 1);
        assert_eq!(stats.total_chars, 13 + 34 + 6);
        assert_eq!(stats.estimated_tokens, 53 / 4);
    }

    #[test]
    fn test_stats_counts_characters_not_bytes() {
        let session = Session::new(
            vec![Message::new(Role::User, "héllo")],
            "",
            SessionFormat::GenericNarrative,
        )
        .unwrap();
        assert_eq!(session.stats().total_chars, 5);
    }

    #[test]
    fn test_other_role_renders_upper_case() {
        let msg = Message::new(Role::Other("unknown".into()), "text");
        assert_eq!(msg.to_string(), "[UNKNOWN]\ntext");
    }

    #[test]
    fn test_role_serializes_as_plain_string() {
        let msg = Message::new(Role::Other("observer".into()), "hi");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"role": "observer", "content": "hi", "metadata": {}}));

        let back: Message = serde_json::from_value(json!({"role": "Human", "content": "x"})).unwrap();
        assert_eq!(back.role, Role::User);
        assert!(back.metadata.is_empty());
    }

    #[test]
    fn test_format_tags() {
        let tags: Vec<&str> = SessionFormat::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            tags,
            vec!["structured-array", "line-delimited", "marker-narrative", "generic-narrative"]
        );
        assert_eq!(
            serde_json::to_value(SessionFormat::MarkerNarrative).unwrap(),
            json!("marker-narrative")
        );
    }
}
