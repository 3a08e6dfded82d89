use async_trait::async_trait;

use crate::comment::{Comment, NewComment};
use crate::post::{NewPost, Post};

use super::Result;

/// Primary store for posts.
///
/// Listings are newest first by `created_at`, ties broken by id descending.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persists a post, assigning its id and timestamps.
    async fn insert_post(&self, post: NewPost) -> Result<Post>;

    async fn get_post(&self, id: i64) -> Result<Option<Post>>;

    async fn post_exists(&self, id: i64) -> Result<bool>;

    /// Deletes a post. Fails with `NotFound` when it does not exist.
    async fn delete_post(&self, id: i64) -> Result<()>;

    /// Returns one zero-based page and the total number of posts.
    async fn list_posts_newest_first(&self, page: u32, size: u32) -> Result<(Vec<Post>, u64)>;

    async fn count_posts(&self) -> Result<u64>;
}

/// Primary store for comments.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persists a comment, assigning its id and timestamps.
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>>;

    /// Replaces the content and bumps `updated_at`.
    async fn update_comment_content(&self, id: i64, content: &str) -> Result<Comment>;

    /// Deletes a comment. Fails with `NotFound` when it does not exist.
    async fn delete_comment(&self, id: i64) -> Result<()>;

    /// All comments of a post, newest first.
    async fn list_comments_by_post(&self, post_id: i64) -> Result<Vec<Comment>>;
}
