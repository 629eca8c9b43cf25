// Marker narrative grammar: markdown sections with an optional metadata header
//
//   session_id: abc123
//   model: some-model
//
//   ## Human
//   <content>
//
//   ## Assistant
//   <content>
//   ---

use std::sync::LazyLock;

use regex::Regex;

use super::{GenericNarrative, Grammar};
use crate::error::ParseError;
use crate::roles::normalize_role;
use crate::types::{Message, SessionFormat};

/// A `key: value` / `key = value` header line. Keys are case-sensitive.
pub(crate) static METADATA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(session_id|agent|model|timestamp)\s*[:=].*$").unwrap());

/// A line holding only `## <Role>`
static SECTION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^##\s*(Human|Assistant|User|AI|System|Tool)\s*$").unwrap()
});

/// Turn separator left at the end of a section body
static TRAILING_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n---\s*$").unwrap());

pub struct MarkerNarrative;

impl Grammar for MarkerNarrative {
    fn format(&self) -> SessionFormat {
        SessionFormat::MarkerNarrative
    }

    fn parse(&self, content: &str) -> Result<Vec<Message>, ParseError> {
        let messages = parse_sections(strip_header(content));

        if messages.is_empty() {
            tracing::debug!("no `##` sections produced messages, falling back to generic narrative");
            return GenericNarrative.parse(content);
        }

        Ok(messages)
    }
}

/// Drop everything up to the end of the last metadata line
fn strip_header(content: &str) -> &str {
    let header_end = METADATA_LINE
        .find_iter(content)
        .map(|m| m.end())
        .max()
        .unwrap_or(0);
    content[header_end..].trim()
}

fn parse_sections(body: &str) -> Vec<Message> {
    let headings: Vec<(&str, usize, usize)> = SECTION_HEADING
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((caps.get(1)?.as_str(), whole.start(), whole.end()))
        })
        .collect();

    let mut messages = Vec::new();
    for (i, &(raw_role, _, section_start)) in headings.iter().enumerate() {
        let section_end = headings.get(i + 1).map_or(body.len(), |next| next.1);
        let section = body[section_start..section_end].trim();
        let section = TRAILING_SEPARATOR.replace(section, "");
        let section = section.trim();

        if !section.is_empty() {
            messages.push(Message::new(normalize_role(raw_role), section));
        }
    }
    messages
}
