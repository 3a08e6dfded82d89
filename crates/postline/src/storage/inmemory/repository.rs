//! In-memory repository implementation.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use postline_core::comment::{Comment, NewComment};
use postline_core::post::{NewPost, Post};
use postline_core::storage::{CommentRepository, PostRepository, RepositoryError, Result};

/// In-memory storage backend.
///
/// Cloning is cheap; clones share the same data.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    posts: Arc<RwLock<BTreeMap<i64, Post>>>,
    comments: Arc<RwLock<BTreeMap<i64, Comment>>>,
    post_sequence: Arc<AtomicI64>,
    comment_sequence: Arc<AtomicI64>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            posts: Arc::new(RwLock::new(BTreeMap::new())),
            comments: Arc::new(RwLock::new(BTreeMap::new())),
            post_sequence: Arc::new(AtomicI64::new(1)),
            comment_sequence: Arc::new(AtomicI64::new(1)),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryRepository {
    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let id = self.post_sequence.fetch_add(1, Ordering::SeqCst);
        let post = post.into_post(id, Utc::now());

        let mut posts = self.posts.write().await;
        posts.insert(id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).cloned())
    }

    async fn post_exists(&self, id: i64) -> Result<bool> {
        let posts = self.posts.read().await;
        Ok(posts.contains_key(&id))
    }

    async fn delete_post(&self, id: i64) -> Result<()> {
        let mut posts = self.posts.write().await;
        if posts.remove(&id).is_none() {
            return Err(RepositoryError::post_not_found(id));
        }
        Ok(())
    }

    async fn list_posts_newest_first(&self, page: u32, size: u32) -> Result<(Vec<Post>, u64)> {
        let posts = self.posts.read().await;

        let mut sorted: Vec<&Post> = posts.values().collect();
        sorted.sort_by_key(|p| Reverse((p.created_at, p.id)));

        let offset = page as usize * size as usize;
        let content = sorted
            .into_iter()
            .skip(offset)
            .take(size as usize)
            .cloned()
            .collect();

        Ok((content, posts.len() as u64))
    }

    async fn count_posts(&self) -> Result<u64> {
        let posts = self.posts.read().await;
        Ok(posts.len() as u64)
    }
}

#[async_trait]
impl CommentRepository for InMemoryRepository {
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let id = self.comment_sequence.fetch_add(1, Ordering::SeqCst);
        let comment = comment.into_comment(id, Utc::now());

        let mut comments = self.comments.write().await;
        comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
        let comments = self.comments.read().await;
        Ok(comments.get(&id).cloned())
    }

    async fn update_comment_content(&self, id: i64, content: &str) -> Result<Comment> {
        let mut comments = self.comments.write().await;
        let comment = comments
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::comment_not_found(id))?;

        comment.content = content.to_string();
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: i64) -> Result<()> {
        let mut comments = self.comments.write().await;
        if comments.remove(&id).is_none() {
            return Err(RepositoryError::comment_not_found(id));
        }
        Ok(())
    }

    async fn list_comments_by_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let comments = self.comments.read().await;

        let mut matching: Vec<Comment> = comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        matching.sort_by_key(|c| Reverse((c.created_at, c.id)));
        Ok(matching)
    }
}
