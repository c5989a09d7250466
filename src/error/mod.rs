//! Error handling for the arrival pipeline.

use arrow::error::ArrowError;

/// Errors raised while building or transforming arrival data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tuple or record does not have the shape of the declared schema
    #[error("Schema mismatch: expected {expected} fields, found {found}")]
    SchemaMismatch {
        /// Number of fields the schema declares
        expected: usize,
        /// Number of fields actually supplied
        found: usize,
    },

    /// A tuple position holds a value of the wrong kind
    #[error("Type mismatch for '{attribute}': expected {expected}")]
    TypeMismatch {
        /// Attribute name at the offending position
        attribute: &'static str,
        /// Human-readable description of the expected kind
        expected: &'static str,
    },

    /// Attribute name is unknown or outside the collection's schema
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A numeric parameter is outside its allowed range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Calendar arithmetic left chrono's representable range
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// Delimited input could not be parsed
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// I/O failure on a caller-provided reader or writer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration JSON could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow export failed
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Failure reported by an external collaborator (model, data source)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create an unknown attribute error
    pub fn unknown_attribute(name: impl Into<String>) -> Self {
        Self::UnknownAttribute(name.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
