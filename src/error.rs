use thiserror::Error;

/// Custom Result type for jsondb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for jsondb
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed statement: missing keyword, unbalanced parentheses, wrong value count
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Unknown database/table/column or duplicate name
    #[error("validation error: {0}")]
    Validation(String),
    /// A value could not be coerced to its column type
    #[error("conversion error: {0}")]
    Conversion(String),
    /// Persistence read/write failure
    #[error("io error: {0}")]
    Io(String),
    /// Internal error (serialization, unexpected state)
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::num::ParseIntError> for Error {
    fn from(value: std::num::ParseIntError) -> Self {
        Error::Conversion(value.to_string())
    }
}

impl From<std::num::ParseFloatError> for Error {
    fn from(value: std::num::ParseFloatError) -> Self {
        Error::Conversion(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Internal(value.to_string())
    }
}
