// Generic narrative grammar: plain text or markdown with role markers
//
// Recognized markers, at the start of a line:
//   User: ...        Assistant: ...
//   Human: ...       AI: ...
//   **User**: ...    ## User

use std::sync::LazyLock;

use regex::Regex;

use super::Grammar;
use crate::error::ParseError;
use crate::roles::normalize_role;
use crate::types::{Message, SessionFormat};

static ROLE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?mi)^(?:\*\*|##[ \t]*)?(User|Human|Customer|Assistant|AI|Bot|Agent|System|Tool)(?:\*\*)?[:\s]+",
    )
    .unwrap()
});

pub struct GenericNarrative;

impl Grammar for GenericNarrative {
    fn format(&self) -> SessionFormat {
        SessionFormat::GenericNarrative
    }

    fn parse(&self, content: &str) -> Result<Vec<Message>, ParseError> {
        let markers: Vec<(&str, usize, usize)> = ROLE_MARKER
            .captures_iter(content)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some((caps.get(1)?.as_str(), whole.start(), whole.end()))
            })
            .collect();

        if markers.is_empty() {
            // No markers: the whole transcript is one message
            let cleaned = content.trim();
            if cleaned.is_empty() {
                return Ok(Vec::new());
            }
            return Ok(vec![Message::new(normalize_role("unknown"), cleaned)]);
        }

        // Text before the first marker is preamble and is dropped
        Ok(markers
            .iter()
            .enumerate()
            .filter_map(|(i, &(raw_role, _, body_start))| {
                let body_end = markers.get(i + 1).map_or(content.len(), |next| next.1);
                let body = content[body_start..body_end].trim();
                (!body.is_empty()).then(|| Message::new(normalize_role(raw_role), body))
            })
            .collect())
    }
}
