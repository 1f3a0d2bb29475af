//! Error types for request methods and transports.

use std::fmt;

use community_events_core::ConfigError;
use community_events_parsers::ParseError;
use thiserror::Error;

/// Result type for request methods.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type for HTTP transports.
pub type TransportResult<T> = Result<T, TransportError>;

/// Failure reported by an [`HttpClient`](crate::HttpClient) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Setup(String),

    /// The request URL could not be built.
    #[error("invalid request URL `{url}`: {message}")]
    InvalidUrl { url: String, message: String },

    /// The request could not be sent or no response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Stable, machine-checkable classification of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MissingParameter,
    UnexpectedStatus,
    UnexpectedContentType,
    MalformedIdentifier,
    StructuralMismatch,
    /// Any other failure to turn the body into records.
    InvalidResponse,
    Transport,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingParameter => "missing_parameter",
            Self::UnexpectedStatus => "unexpected_status",
            Self::UnexpectedContentType => "unexpected_content_type",
            Self::MalformedIdentifier => "malformed_identifier",
            Self::StructuralMismatch => "structural_mismatch",
            Self::InvalidResponse => "invalid_response",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors returned by the request methods.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required query field was absent or empty. Raised before any request
    /// is sent.
    #[error("{{query.{field}}} must be defined in [{operation}] request")]
    MissingParameter {
        field: &'static str,
        operation: &'static str,
    },

    /// The server answered with a status other than 200.
    #[error("{message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The server answered 200 with a body that is not Atom. Connections
    /// does this when authentication is missing.
    #[error("received response with unexpected content-type {content_type}")]
    UnexpectedContentType { content_type: String },

    /// The body could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Forwarded unchanged from the transport.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingParameter { .. } => ErrorCode::MissingParameter,
            Self::UnexpectedStatus { .. } => ErrorCode::UnexpectedStatus,
            Self::UnexpectedContentType { .. } => ErrorCode::UnexpectedContentType,
            Self::Parse(ParseError::MalformedIdentifier(_)) => ErrorCode::MalformedIdentifier,
            Self::Parse(ParseError::StructuralMismatch(_)) => ErrorCode::StructuralMismatch,
            Self::Parse(_) => ErrorCode::InvalidResponse,
            Self::Transport(_) => ErrorCode::Transport,
        }
    }

    /// HTTP-style status associated with the error.
    ///
    /// Parse and transport failures carry no status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::MissingParameter { .. } => Some(404),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::UnexpectedContentType { .. } => Some(401),
            Self::Parse(_) | Self::Transport(_) => None,
        }
    }
}

/// Errors of the `community-events` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("[{}] {}", .0.code(), .0)]
    Service(#[from] ServiceError),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
