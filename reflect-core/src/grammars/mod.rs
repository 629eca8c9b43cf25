// Grammar trait and implementations for the supported session log formats

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::roles::normalize_role;
use crate::types::{Message, SessionFormat};

pub mod generic_narrative;
pub mod line_delimited;
pub mod marker_narrative;
pub mod structured_array;

pub use generic_narrative::GenericNarrative;
pub use line_delimited::LineDelimited;
pub use marker_narrative::MarkerNarrative;
pub use structured_array::StructuredArray;

/// Trait for turning one session log grammar into normalized messages
pub trait Grammar {
    /// Format tag this grammar handles
    fn format(&self) -> SessionFormat;

    /// Parse raw content into messages, in transcript order.
    /// Structural violations fail the whole parse; there are no partial results.
    fn parse(&self, content: &str) -> Result<Vec<Message>, ParseError>;
}

/// Dispatch table from a detected format to its grammar
pub fn grammar_for(format: SessionFormat) -> &'static dyn Grammar {
    match format {
        SessionFormat::StructuredArray => &StructuredArray,
        SessionFormat::LineDelimited => &LineDelimited,
        SessionFormat::MarkerNarrative => &MarkerNarrative,
        SessionFormat::GenericNarrative => &GenericNarrative,
    }
}

/// How a structured entry's `content` field is flattened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentParts {
    /// Join the text of `[{"type":"text","text":..}, "bare", ...]` parts
    Unwrap,
    /// Render any non-string value as JSON text
    Stringify,
}

/// Build a message from one JSON object of a structured grammar.
///
/// Missing fields are filled explicitly: no `role` means `unknown`, no
/// `content` means empty. Every other field becomes metadata.
pub(crate) fn message_from_object(mut object: Map<String, Value>, parts: ContentParts) -> Message {
    let role = match object.remove("role") {
        None | Some(Value::Null) => normalize_role("unknown"),
        Some(Value::String(raw)) => normalize_role(&raw),
        Some(other) => normalize_role(&other.to_string()),
    };

    let content = match object.remove("content") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(Value::Array(items)) if parts == ContentParts::Unwrap => join_text_parts(&items),
        Some(other) => other.to_string(),
    };

    Message::with_metadata(role, content, object)
}

/// Concatenate the text parts of a multi-part content list, skipping images,
/// tool calls and anything else that is not text
fn join_text_parts(items: &[Value]) -> String {
    items
        .iter()
        .filter_map(|part| match part {
            Value::String(text) => Some(text.clone()),
            Value::Object(fields) if fields.get("type").and_then(Value::as_str) == Some("text") => {
                Some(match fields.get("text") {
                    Some(Value::String(text)) => text.clone(),
                    None | Some(Value::Null) => String::new(),
                    Some(other) => other.to_string(),
                })
            }
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
