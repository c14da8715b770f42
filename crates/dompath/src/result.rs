//! Result and error types for dompath.

use thiserror::Error;

/// Result type for dompath operations
pub type DomPathResult<T> = Result<T, DomPathError>;

/// Errors that can occur in dompath
#[derive(Debug, Error)]
pub enum DomPathError {
    /// A combinator or builder was given an argument it cannot accept
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Element absent after the implicit timeout or after scrolling was exhausted
    #[error("Element not found: {message}")]
    NotFound {
        /// Error message
        message: String,
    },

    /// A stateful operation (clear, change) ran out of retries
    #[error("Operation failed: {message}")]
    OperationFailed {
        /// Error message
        message: String,
    },

    /// The page does not support what was asked of it
    #[error("Unsupported operation: {message}")]
    UnsupportedOperation {
        /// Error message
        message: String,
    },

    /// A grid row index does not exist in the table
    #[error("Index out of bounds: {message}")]
    IndexOutOfBounds {
        /// Error message
        message: String,
    },

    /// A count assertion did not hold
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Error reported by the underlying browser driver
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Configuration could not be parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DomPathError {
    /// Shorthand for [`DomPathError::NotFound`]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Shorthand for [`DomPathError::InvalidArgument`]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Shorthand for [`DomPathError::OperationFailed`]
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::OperationFailed {
            message: message.into(),
        }
    }

    /// Shorthand for [`DomPathError::Driver`]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// True for the one error kind tolerant lookups are allowed to swallow
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
