//! Single-post cache keyed by id.

use std::sync::Arc;
use std::time::Duration;

use postline_core::cache::{deserialize_post, post_key, serialize_post, Cache, Result};
use postline_core::post::Post;

/// Cache-aside store for individual posts with a bounded TTL.
pub struct PostCache<C: Cache + ?Sized = dyn Cache> {
    cache: Arc<C>,
    ttl: Duration,
}

impl<C: Cache + ?Sized> PostCache<C> {
    pub fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Upserts `post` under its id.
    pub async fn cache_post(&self, post: &Post) -> Result<()> {
        let bytes = serialize_post(post)?;
        self.cache.set(&post_key(post.id), &bytes, Some(self.ttl)).await
    }

    /// Returns the cached post, `Ok(None)` on a miss.
    ///
    /// A value that no longer decodes is dropped and reported as a miss.
    pub async fn get_cached_post(&self, id: i64) -> Result<Option<Post>> {
        let key = post_key(id);
        let Some(bytes) = self.cache.get(&key).await? else {
            return Ok(None);
        };

        match deserialize_post(&bytes) {
            Ok(post) => Ok(Some(post)),
            Err(err) => {
                tracing::warn!(post_id = id, error = %err, "Cached post deserialization failed");
                if let Err(err) = self.cache.delete(&key).await {
                    tracing::warn!(post_id = id, error = %err, "Failed to drop corrupt cached post");
                }
                Ok(None)
            }
        }
    }

    /// Deletes the cached post. Missing entries are not an error.
    pub async fn remove_cached_post(&self, id: i64) -> Result<()> {
        self.cache.delete(&post_key(id)).await
    }
}
