//! Post handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use postline_core::api::ApiResponse;
use postline_core::post::{CreatePostRequest, Page, PageRequest, Post};

use crate::{auth::CurrentUser, handlers::AppError, state::AppState};

/// List posts newest first (GET /api/posts?page=&size=).
pub async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<ApiResponse<Page<Post>>>, AppError> {
    let Query(request) = query?;
    let page = state.post_service.get_posts_by_page(request).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// Get a single post (GET /api/posts/{id}).
pub async fn get_post(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<Post>>, AppError> {
    let Path(id) = path?;
    let post = state.post_service.get_post(id).await?;
    Ok(Json(ApiResponse::success(post)))
}

/// Create a post owned by the caller (POST /api/posts).
pub async fn create_post(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Post>>), AppError> {
    let Json(request) = payload?;
    tracing::debug!(user_id = user.id, title = %request.title, "Received create post request");

    let post = state.post_service.create_post(&user, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(post))))
}

/// Delete a post (DELETE /api/posts/{id}).
///
/// Any authenticated caller may delete; there is no ownership check on posts.
pub async fn delete_post(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Path(id) = path?;
    tracing::debug!(user_id = user.id, post_id = id, "Received delete post request");

    state.post_service.delete_post(id).await?;
    Ok(Json(ApiResponse::empty()))
}
