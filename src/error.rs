//! Error types for KQL.
//!
//! Encoding and quoting never fail. Errors only come from the surfaces
//! that read untrusted text: templates, parameter names and config files.

use thiserror::Error;

/// The main error type for KQL operations.
#[derive(Debug, Error)]
pub enum KqlError {
    /// Failed to parse a statement template.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// A placeholder value could not be read as its declared kind.
    #[error("Invalid {kind} value '{value}': {reason}")]
    InvalidValue {
        kind: &'static str,
        value: String,
        reason: String,
    },

    /// Unknown placeholder or parameter kind.
    #[error("Unknown kind: '{0}'")]
    UnknownKind(String),

    /// Query parameter names must be simple identifiers.
    #[error("Invalid parameter name: '{0}'")]
    InvalidParameterName(String),

    /// A query parameter was declared twice.
    #[error("Duplicate parameter: '{0}'")]
    DuplicateParameter(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KqlError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid(kind: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidValue {
            kind,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for KQL operations.
pub type KqlResult<T> = Result<T, KqlError>;
