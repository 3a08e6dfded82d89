//! Test doubles shared by the service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use postline_core::cache::{Cache, CacheError, ListCache, Result as CacheResult, SortedSetCache};
use postline_core::comment::{Comment, NewComment};
use postline_core::events::{BusMessage, EventBus};
use postline_core::post::{NewPost, Post};
use postline_core::storage::{CommentRepository, PostRepository, Result};

use crate::storage::InMemoryRepository;

/// In-memory repository that counts the calls the services make.
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemoryRepository,
    pub get_post_calls: AtomicUsize,
    pub list_posts_calls: AtomicUsize,
    pub count_posts_calls: AtomicUsize,
    pub delete_post_calls: AtomicUsize,
    pub list_comments_calls: AtomicUsize,
}

impl CountingRepository {
    pub fn get_post_count(&self) -> usize {
        self.get_post_calls.load(Ordering::SeqCst)
    }

    pub fn list_posts_count(&self) -> usize {
        self.list_posts_calls.load(Ordering::SeqCst)
    }

    pub fn count_posts_count(&self) -> usize {
        self.count_posts_calls.load(Ordering::SeqCst)
    }

    pub fn delete_post_count(&self) -> usize {
        self.delete_post_calls.load(Ordering::SeqCst)
    }

    pub fn list_comments_count(&self) -> usize {
        self.list_comments_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostRepository for CountingRepository {
    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        self.inner.insert_post(post).await
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        self.get_post_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_post(id).await
    }

    async fn post_exists(&self, id: i64) -> Result<bool> {
        self.inner.post_exists(id).await
    }

    async fn delete_post(&self, id: i64) -> Result<()> {
        self.delete_post_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_post(id).await
    }

    async fn list_posts_newest_first(&self, page: u32, size: u32) -> Result<(Vec<Post>, u64)> {
        self.list_posts_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_posts_newest_first(page, size).await
    }

    async fn count_posts(&self) -> Result<u64> {
        self.count_posts_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.count_posts().await
    }
}

#[async_trait]
impl CommentRepository for CountingRepository {
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        self.inner.insert_comment(comment).await
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
        self.inner.get_comment(id).await
    }

    async fn update_comment_content(&self, id: i64, content: &str) -> Result<Comment> {
        self.inner.update_comment_content(id, content).await
    }

    async fn delete_comment(&self, id: i64) -> Result<()> {
        self.inner.delete_comment(id).await
    }

    async fn list_comments_by_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.list_comments_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_comments_by_post(post_id).await
    }
}

fn unavailable() -> CacheError {
    CacheError::ConnectionFailed("cache unavailable".to_string())
}

/// Cache whose every operation fails.
pub struct FailingCache;

#[async_trait]
impl Cache for FailingCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Err(unavailable())
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
        Err(unavailable())
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(unavailable())
    }
}

#[async_trait]
impl SortedSetCache for FailingCache {
    async fn zadd(&self, _key: &str, _member: &str, _score: i64) -> CacheResult<()> {
        Err(unavailable())
    }

    async fn zrevrange(&self, _key: &str, _start: i64, _stop: i64) -> CacheResult<Vec<String>> {
        Err(unavailable())
    }

    async fn zrange_all(&self, _key: &str) -> CacheResult<Vec<String>> {
        Err(unavailable())
    }

    async fn zrem_range_by_score(&self, _key: &str, _min: i64, _max: i64) -> CacheResult<u64> {
        Err(unavailable())
    }

    async fn zrem(&self, _key: &str, _member: &str) -> CacheResult<bool> {
        Err(unavailable())
    }
}

#[async_trait]
impl ListCache for FailingCache {
    async fn lpush(&self, _key: &str, _value: &str) -> CacheResult<u64> {
        Err(unavailable())
    }

    async fn lrange(&self, _key: &str, _start: i64, _stop: i64) -> CacheResult<Vec<String>> {
        Err(unavailable())
    }

    async fn ltrim(&self, _key: &str, _start: i64, _stop: i64) -> CacheResult<()> {
        Err(unavailable())
    }

    async fn lrem(&self, _key: &str, _value: &str) -> CacheResult<bool> {
        Err(unavailable())
    }
}

/// Event bus that rejects every publish and counts the attempts.
#[derive(Default)]
pub struct FailingBus {
    pub publish_calls: AtomicUsize,
}

impl FailingBus {
    pub fn publish_count(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventBus for FailingBus {
    async fn publish(&self, _topic: &str, _key: &str, _payload: &[u8]) -> CacheResult<()> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::PublishFailed("bus unavailable".to_string()))
    }

    async fn subscribe(&self, _topic: &str) -> CacheResult<broadcast::Receiver<BusMessage>> {
        Err(CacheError::ConnectionFailed("bus unavailable".to_string()))
    }
}
