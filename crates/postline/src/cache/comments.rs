//! Full comment-list cache per post.

use std::sync::Arc;
use std::time::Duration;

use postline_core::cache::{
    comment_list_key, deserialize_comments, serialize_comments, Cache, Result,
};
use postline_core::comment::CommentView;

/// Caches the newest-first comment list of each post. Writes evict, never update.
pub struct CommentListCache<C: Cache + ?Sized = dyn Cache> {
    cache: Arc<C>,
    ttl: Duration,
}

impl<C: Cache + ?Sized> CommentListCache<C> {
    pub fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub async fn cache_comments(&self, post_id: i64, comments: &[CommentView]) -> Result<()> {
        let bytes = serialize_comments(comments)?;
        self.cache
            .set(&comment_list_key(post_id), &bytes, Some(self.ttl))
            .await
    }

    pub async fn get_cached_comments(&self, post_id: i64) -> Result<Option<Vec<CommentView>>> {
        let Some(bytes) = self.cache.get(&comment_list_key(post_id)).await? else {
            return Ok(None);
        };

        match deserialize_comments(&bytes) {
            Ok(comments) => Ok(Some(comments)),
            Err(err) => {
                tracing::warn!(post_id, error = %err, "Cached comment list deserialization failed");
                Ok(None)
            }
        }
    }

    pub async fn evict(&self, post_id: i64) -> Result<()> {
        self.cache.delete(&comment_list_key(post_id)).await
    }
}
