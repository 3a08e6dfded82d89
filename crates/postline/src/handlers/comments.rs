//! Comment handlers.
//!
//! Responses use [`CommentView`], which never exposes the password hash.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use postline_core::api::ApiResponse;
use postline_core::comment::{
    CommentView, CreateCommentRequest, DeleteCommentRequest, UpdateCommentRequest,
};

use crate::{
    auth::{CurrentUser, OptionalUser},
    handlers::AppError,
    state::AppState,
};

/// List the comments of a post, newest first (GET /api/posts/{post_id}/comments).
pub async fn list_comments(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<CommentView>>>, AppError> {
    let Path(post_id) = path?;
    let comments = state.comment_service.get_comments_by_post(post_id).await?;
    Ok(Json(ApiResponse::success(comments)))
}

/// Create a comment (POST /api/comments).
pub async fn create_comment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CommentView>>), AppError> {
    let Json(request) = payload?;
    let comment = state.comment_service.create_comment(&user, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CommentView::from(comment))),
    ))
}

/// Update a comment's content (PUT /api/comments/{id}).
pub async fn update_comment(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CommentView>>, AppError> {
    let Path(id) = path?;
    let Json(request) = payload?;

    let comment = state.comment_service.update_comment(id, user, request).await?;
    Ok(Json(ApiResponse::success(CommentView::from(comment))))
}

/// Delete a comment (DELETE /api/comments/{id}).
///
/// The JSON body is optional; it only carries the password.
pub async fn delete_comment(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeleteCommentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Path(id) = path?;
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => DeleteCommentRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };

    state.comment_service.delete_comment(id, user, request).await?;
    Ok(Json(ApiResponse::empty()))
}
