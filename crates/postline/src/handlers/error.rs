use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use postline_core::api::{codes, ApiResponse};
use postline_core::auth::AuthError;
use postline_core::storage::{
    repository_error_to_error_code, repository_error_to_status_code, RepositoryError,
};

use crate::services::ServiceError;

/// Application error type that wraps `anyhow::Error`.
///
/// Known error types are recovered by downcasting and mapped onto a status
/// and envelope code. Every response carries a fresh trace id that is also
/// logged.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn classify(&self) -> (StatusCode, &'static str, String) {
        if let Some(err) = self.0.downcast_ref::<ServiceError>() {
            return classify_service_error(err);
        }
        if let Some(err) = self.0.downcast_ref::<AuthError>() {
            let code = match err {
                AuthError::Expired => codes::EXPIRED_TOKEN,
                _ => codes::INVALID_TOKEN,
            };
            return (StatusCode::UNAUTHORIZED, code, err.to_string());
        }
        if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            return classify_repository_error(err);
        }
        if let Some(err) = self.0.downcast_ref::<JsonRejection>() {
            return (StatusCode::BAD_REQUEST, codes::INVALID_INPUT, err.body_text());
        }
        if let Some(err) = self.0.downcast_ref::<QueryRejection>() {
            return (StatusCode::BAD_REQUEST, codes::INVALID_INPUT, err.body_text());
        }
        if let Some(err) = self.0.downcast_ref::<PathRejection>() {
            return (StatusCode::BAD_REQUEST, codes::INVALID_INPUT, err.body_text());
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL_ERROR,
            "Internal server error".to_string(),
        )
    }
}

fn classify_service_error(err: &ServiceError) -> (StatusCode, &'static str, String) {
    match err {
        ServiceError::NotFound { entity_type, .. } => {
            let code = match *entity_type {
                "Post" => codes::POST_NOT_FOUND,
                "Comment" => codes::COMMENT_NOT_FOUND,
                _ => codes::RESOURCE_NOT_FOUND,
            };
            (StatusCode::NOT_FOUND, code, err.to_string())
        }
        ServiceError::AccessDenied { entity_type, .. } => {
            let code = match *entity_type {
                "Post" => codes::POST_ACCESS_DENIED,
                "Comment" => codes::COMMENT_ACCESS_DENIED,
                _ => codes::ACCESS_DENIED,
            };
            (StatusCode::FORBIDDEN, code, err.to_string())
        }
        ServiceError::InvalidInput(message) => {
            (StatusCode::BAD_REQUEST, codes::INVALID_INPUT, message.clone())
        }
        ServiceError::Repository(err) => classify_repository_error(err),
        ServiceError::Secret(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL_ERROR,
            "Internal server error".to_string(),
        ),
    }
}

fn classify_repository_error(err: &RepositoryError) -> (StatusCode, &'static str, String) {
    let status = StatusCode::from_u16(repository_error_to_status_code(err))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if status.is_server_error() {
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    (status, repository_error_to_error_code(err), message)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::new_v4().to_string();
        let (status, code, message) = self.classify();

        if status.is_server_error() {
            tracing::error!(trace_id = %trace_id, code, error = %self.0, "Request failed");
        } else {
            tracing::warn!(trace_id = %trace_id, code, status = %status, error = %self.0, "Request rejected");
        }

        (status, Json(ApiResponse::<()>::error(code, message, trace_id))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
