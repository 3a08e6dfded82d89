use thiserror::Error;

use postline_core::comment::SecretError;
use postline_core::post::ValidationError;
use postline_core::storage::RepositoryError;

/// Errors surfaced by the services to their callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    #[error("Access denied to {entity_type}: {reason}")]
    AccessDenied {
        entity_type: &'static str,
        reason: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Failed to hash comment password: {0}")]
    Secret(#[from] SecretError),
}

impl ServiceError {
    pub fn post_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }

    pub fn comment_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "Comment",
            id,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_becomes_invalid_input() {
        let err: ServiceError = ValidationError::Blank { field: "title" }.into();
        assert_eq!(err.to_string(), "Invalid input: title must not be blank");
    }

    #[test]
    fn test_not_found_display() {
        assert_eq!(
            ServiceError::comment_not_found(4).to_string(),
            "Comment not found: 4"
        );
    }
}
