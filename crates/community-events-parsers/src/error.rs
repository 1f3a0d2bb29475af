//! Parse error types.

use thiserror::Error;

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while turning an Atom document into records.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input is not well-formed XML.
    #[error("malformed XML document: {0}")]
    Xml(String),

    /// A selector failed to compile or to evaluate.
    #[error("selector `{selector}` failed: {message}")]
    Selector { selector: String, message: String },

    /// An atom id did not end with a UUID.
    #[error("no UUID suffix in identifier `{0}`")]
    MalformedIdentifier(String),

    /// The document does not have the expected feed or entry shape.
    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),

    /// A parsed record did not fit its typed representation.
    #[error("failed to decode record: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ParseError {
    pub(crate) fn selector(selector: &str, message: impl Into<String>) -> Self {
        Self::Selector {
            selector: selector.to_string(),
            message: message.into(),
        }
    }
}
