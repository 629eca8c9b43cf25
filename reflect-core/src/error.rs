//! Error types for session log parsing.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::SessionFormat;

/// Raised when a session log cannot be turned into messages.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Empty session log")]
    Empty,

    /// The selected grammar (after any fallback) produced nothing.
    #[error("No messages found in session log (detected format: {format})")]
    NoMessages { format: SessionFormat },

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("JSON content is not an array")]
    NotAnArray,

    /// `index` is the 0-based position in the array.
    #[error("Item {index} is not a JSON object")]
    ItemNotObject { index: usize },

    /// `line` is 1-based.
    #[error("Invalid JSON on line {line}: {source}")]
    InvalidJsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not a file: {}", path.display())]
    NotAFile { path: PathBuf },
}

/// Failures of the path-based entry point.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Session file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
