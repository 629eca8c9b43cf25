// agentreflect Core Library
// Session log detection, grammar parsers, and the normalized session model

pub mod types;
pub mod error;
pub mod roles;
pub mod detect;
pub mod grammars;
pub mod session;

// Re-export commonly used types
pub use types::*;
pub use error::{Error, ParseError};
pub use roles::normalize_role;
pub use detect::detect_format;
pub use grammars::{grammar_for, Grammar};
pub use session::{decode_session_bytes, parse_file, parse_session};
