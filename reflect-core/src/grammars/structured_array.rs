// Structured-array grammar: one JSON array of message objects
// Mirrors the common provider shape [{"role": .., "content": ..}, ...]

use serde_json::Value;

use super::{message_from_object, ContentParts, Grammar};
use crate::error::ParseError;
use crate::types::{Message, SessionFormat};

pub struct StructuredArray;

impl Grammar for StructuredArray {
    fn format(&self) -> SessionFormat {
        SessionFormat::StructuredArray
    }

    fn parse(&self, content: &str) -> Result<Vec<Message>, ParseError> {
        let data: Value = serde_json::from_str(content.trim()).map_err(ParseError::InvalidJson)?;

        let Value::Array(items) = data else {
            return Err(ParseError::NotAnArray);
        };

        // Empty content is kept: one message per element
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(object) => Ok(message_from_object(object, ContentParts::Unwrap)),
                _ => Err(ParseError::ItemNotObject { index }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use serde_json::json;

    #[test]
    fn test_preserves_order_and_count() {
        let content = r#"[
            {"role": "system", "content": "You are terse."},
            {"role": "user", "content": "hi"},
            {"role": "assistant", "content": ""},
            {"role": "function", "content": "ok", "name": "lookup"}
        ]"#;
        let messages = StructuredArray.parse(content).unwrap();

        assert_eq!(messages.len(), 4);
        let roles: Vec<&Role> = messages.iter().map(|m| &m.role).collect();
        assert_eq!(roles, vec![&Role::System, &Role::User, &Role::Assistant, &Role::Tool]);
        assert_eq!(messages[2].content, "");
        assert_eq!(messages[3].metadata.get("name"), Some(&json!("lookup")));
    }

    #[test]
    fn test_metadata_excludes_role_and_content() {
        let content = r#"[{"role":"assistant","content":"x","tool_calls":[{"id":"call_9"}],"id":7}]"#;
        let messages = StructuredArray.parse(content).unwrap();
        let keys: Vec<&String> = messages[0].metadata.keys().collect();
        assert_eq!(keys, vec!["id", "tool_calls"]);
    }

    #[test]
    fn test_non_object_element_names_index() {
        let content = r#"[{"role":"user","content":"hi"}, "oops"]"#;
        let err = StructuredArray.parse(content).unwrap_err();
        assert!(matches!(err, ParseError::ItemNotObject { index: 1 }));
        assert_eq!(err.to_string(), "Item 1 is not a JSON object");
    }

    #[test]
    fn test_not_an_array() {
        let err = StructuredArray.parse(r#"{"role":"user"}"#).unwrap_err();
        assert!(matches!(err, ParseError::NotAnArray));
    }

    #[test]
    fn test_invalid_json() {
        let err = StructuredArray.parse("[{").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON:"));
    }
}
