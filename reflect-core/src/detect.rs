//! Format detection for raw session logs.
//!
//! Checks run in a fixed order and the first match wins. The grammars
//! overlap (a transcript can hold JSON lines and `## Human` markers at the
//! same time), so the order is part of the contract.

use serde_json::Value;

use crate::grammars::marker_narrative::METADATA_LINE;
use crate::types::SessionFormat;

/// Number of non-blank lines sampled by the line-delimited check
const LINE_SAMPLE: usize = 5;
/// Sampled lines that must be JSON objects
const MIN_JSON_LINES: usize = 2;
/// Score needed to classify as marker-narrative
const MARKER_THRESHOLD: usize = 3;
/// Substrings worth one point each
const MARKERS: [&str; 3] = ["## Human", "## Assistant", "---"];
/// Points for a `session_id:`-style header line
const METADATA_POINTS: usize = 2;

/// Classify raw session content. Never fails; anything unrecognized is
/// generic narrative.
pub fn detect_format(content: &str) -> SessionFormat {
    let stripped = content.trim();

    let format = if is_structured_array(stripped) {
        SessionFormat::StructuredArray
    } else if is_line_delimited(stripped) {
        SessionFormat::LineDelimited
    } else if marker_score(stripped) >= MARKER_THRESHOLD {
        SessionFormat::MarkerNarrative
    } else {
        SessionFormat::GenericNarrative
    };

    tracing::debug!(format = %format, bytes = content.len(), "detected session format");
    format
}

/// A non-empty JSON array whose first element is an object carrying `role`
/// or `content`
fn is_structured_array(stripped: &str) -> bool {
    if !stripped.starts_with('[') {
        return false;
    }

    match serde_json::from_str::<Value>(stripped) {
        Ok(Value::Array(items)) => match items.first() {
            Some(Value::Object(first)) => first.contains_key("role") || first.contains_key("content"),
            _ => false,
        },
        _ => false,
    }
}

/// At least two JSON objects among the first few non-blank lines.
///
/// Sampling stops at the first line that is not valid JSON; objects counted
/// before it still count.
fn is_line_delimited(stripped: &str) -> bool {
    let mut objects = 0;

    for line in stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(LINE_SAMPLE)
    {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(_)) => objects += 1,
            Ok(_) => {}
            Err(_) => break,
        }
    }

    objects >= MIN_JSON_LINES
}

/// Heuristic score for the `## Human` / `## Assistant` transcript style
fn marker_score(stripped: &str) -> usize {
    let mut score = MARKERS.iter().filter(|m| stripped.contains(*m)).count();
    if METADATA_LINE.is_match(stripped) {
        score += METADATA_POINTS;
    }
    tracing::trace!(score, "marker-narrative score");
    score
}
