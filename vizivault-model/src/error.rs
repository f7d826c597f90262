//! Error types for local model operations.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by the in-memory model before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A mutation was handed an argument it cannot use.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A clear/delete targeted an attribute key that is not held locally.
    #[error("attribute not found: {0}")]
    NotFound(String),
}
