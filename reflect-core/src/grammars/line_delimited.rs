// Line-delimited grammar: one JSON object per line
// No lenient recovery: the first malformed line fails the parse

use serde_json::Value;

use super::{message_from_object, ContentParts, Grammar};
use crate::error::ParseError;
use crate::types::{Message, SessionFormat};

pub struct LineDelimited;

impl Grammar for LineDelimited {
    fn format(&self) -> SessionFormat {
        SessionFormat::LineDelimited
    }

    fn parse(&self, content: &str) -> Result<Vec<Message>, ParseError> {
        let mut messages = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line)
                .map_err(|source| ParseError::InvalidJsonLine { line: idx + 1, source })?;

            // Well-formed lines that are not objects carry no message
            if let Value::Object(object) = value {
                messages.push(message_from_object(object, ContentParts::Stringify));
            }
        }

        Ok(messages)
    }
}
