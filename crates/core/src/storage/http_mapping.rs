//! Pure functions for mapping repository errors to HTTP responses.

use super::RepositoryError;
use crate::api::codes;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404
/// - `AlreadyExists` -> 409
/// - `ConnectionFailed` -> 503
/// - `QueryFailed` / `Serialization` -> 500
/// - `InvalidData` -> 400
///
/// # Examples
///
/// ```
/// use postline_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::post_not_found(7);
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}

/// Maps a [`RepositoryError`] to the error code of the response envelope.
pub fn repository_error_to_error_code(error: &RepositoryError) -> &'static str {
    match error {
        RepositoryError::NotFound { entity_type, .. } => match *entity_type {
            "Post" => codes::POST_NOT_FOUND,
            "Comment" => codes::COMMENT_NOT_FOUND,
            _ => codes::RESOURCE_NOT_FOUND,
        },
        RepositoryError::AlreadyExists { .. } | RepositoryError::InvalidData(_) => {
            codes::INVALID_INPUT
        }
        RepositoryError::ConnectionFailed(_)
        | RepositoryError::QueryFailed(_)
        | RepositoryError::Serialization(_) => codes::INTERNAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::comment_not_found(1);
        assert_eq!(repository_error_to_status_code(&error), 404);
        assert_eq!(repository_error_to_error_code(&error), "COMMENT_001");
    }

    #[test]
    fn test_already_exists_maps_to_409() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Post",
            id: "4".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("pool exhausted".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
        assert_eq!(repository_error_to_error_code(&error), "COMMON_003");
    }

    #[test]
    fn test_query_and_serialization_map_to_500() {
        assert_eq!(
            repository_error_to_status_code(&RepositoryError::QueryFailed("syntax".to_string())),
            500
        );
        assert_eq!(
            repository_error_to_status_code(&RepositoryError::Serialization("json".to_string())),
            500
        );
    }

    #[test]
    fn test_invalid_data_maps_to_400() {
        let error = RepositoryError::InvalidData("negative id".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
        assert_eq!(repository_error_to_error_code(&error), "COMMON_001");
    }

    #[test]
    fn test_unknown_entity_uses_generic_code() {
        let error = RepositoryError::NotFound {
            entity_type: "User",
            id: "9".to_string(),
        };
        assert_eq!(repository_error_to_error_code(&error), "COMMON_002");
    }
}
