use thiserror::Error;

use super::SerializationError;

/// Errors raised by cache and event-bus backends.
///
/// Services never surface these to callers: a failed read degrades to the
/// primary store and a failed write or publish is logged and skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Cache value has the wrong type for key {key}")]
    WrongType { key: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

impl From<SerializationError> for CacheError {
    fn from(err: SerializationError) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
