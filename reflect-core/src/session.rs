//! Top-level entry points: detect the format, run the matching grammar and
//! wrap the result in a [`Session`].

use std::path::Path;

use crate::detect::detect_format;
use crate::error::{Error, ParseError};
use crate::grammars::grammar_for;
use crate::types::Session;

/// Parse a session log from string content.
///
/// `source` labels where the content came from (file path, `stdin`, ...) and
/// is only carried for diagnostics.
pub fn parse_session(content: &str, source: impl Into<String>) -> Result<Session, ParseError> {
    if content.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let format = detect_format(content);
    let messages = grammar_for(format).parse(content)?;
    let session = Session::new(messages, source, format)?;

    tracing::debug!(
        format = %format,
        source = session.source(),
        messages = session.message_count(),
        "parsed session"
    );
    Ok(session)
}

/// Parse a session log from a file path.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Session, Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(ParseError::NotAFile {
            path: path.to_path_buf(),
        }
        .into());
    }

    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = decode_session_bytes(bytes);

    Ok(parse_session(&content, path.display().to_string())?)
}

/// Decode raw log bytes as UTF-8, falling back to Latin-1 so that every byte
/// sequence is readable.
pub fn decode_session_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!("session log is not valid UTF-8, decoding as Latin-1");
            // Latin-1 maps each byte to the code point of the same value
            err.into_bytes().iter().map(|&b| char::from(b)).collect()
        }
    }
}
