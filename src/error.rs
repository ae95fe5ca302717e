//! Error Types
//!
//! Two failure contracts share the same storage: script-facing operations raise
//! [`ViewError`] (translated into a script exception by the embedding layer), while the
//! host collection adapter raises [`CollectionError`].

use thiserror::Error;

/// Errors raised by buffer and view operations on the script-facing path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Size, bounds or alignment violation.
    #[error("RangeError: {0}")]
    Range(String),

    /// Construction with the wrong kind of object (e.g. a DataView without a buffer).
    #[error("TypeError: {0}")]
    Type(String),

    /// Unrecognized constructor argument or malformed method call.
    #[error("Error: {0}")]
    InvalidArgument(String),
}

impl ViewError {
    /// Build a RangeError, logging it before it is handed back to the caller.
    pub fn range(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!(%message, "range error");
        ViewError::Range(message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        ViewError::Type(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ViewError::InvalidArgument(message.into())
    }

    /// Script error class this error should surface as.
    pub fn kind(&self) -> &'static str {
        match self {
            ViewError::Range(_) => "RangeError",
            ViewError::Type(_) => "TypeError",
            ViewError::InvalidArgument(_) => "Error",
        }
    }

    /// Message without the error class prefix.
    pub fn message(&self) -> &str {
        match self {
            ViewError::Range(msg) | ViewError::Type(msg) | ViewError::InvalidArgument(msg) => msg,
        }
    }
}

/// Result type for script-facing buffer and view operations.
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors raised by the host collection adapter ([`crate::view::ElementList`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Index outside `[0, len)`.
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    /// The collection has a fixed size; the named operation would change it.
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Cursor moved past either end.
    #[error("No such element")]
    NoSuchElement,

    /// Cursor `set` called before any `next`/`previous`.
    #[error("Cursor has no current element")]
    IllegalState,
}

/// Result type for host collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;
