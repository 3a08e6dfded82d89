use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use postline_core::cache::{
    encode_recent_member, recent_member_id, Result, SortedSetCache, RECENT_POSTS_KEY,
};
use postline_core::post::Post;
use postline_core::recency::{calculate_expire_time, RecencyStrategy};

use super::{decode_members, RecentPosts};

/// Time-scored recency index.
///
/// The score of an entry is its expiry instant, so the set is ordered by
/// "time left". It is not otherwise bounded.
pub struct ScoredRecentPosts<C: SortedSetCache + ?Sized> {
    cache: Arc<C>,
    window: Duration,
}

impl<C: SortedSetCache + ?Sized> ScoredRecentPosts<C> {
    pub fn new(cache: Arc<C>, window: Duration) -> Self {
        Self { cache, window }
    }

    /// Removes every entry whose score is at or before now.
    async fn excise_expired(&self) -> Result<()> {
        let now = Utc::now().timestamp();
        let removed = self
            .cache
            .zrem_range_by_score(RECENT_POSTS_KEY, i64::MIN, now)
            .await?;
        if removed > 0 {
            tracing::debug!(removed, "Excised expired recency entries");
        }
        Ok(())
    }
}

#[async_trait]
impl<C: SortedSetCache + ?Sized> RecentPosts for ScoredRecentPosts<C> {
    fn strategy(&self) -> RecencyStrategy {
        RecencyStrategy::TimeScored
    }

    fn calculate_expire_time(&self) -> i64 {
        calculate_expire_time(Utc::now(), self.window)
    }

    async fn add(&self, post: &Post, expire_at: i64) -> Result<()> {
        self.excise_expired().await?;
        let member = encode_recent_member(post)?;
        self.cache.zadd(RECENT_POSTS_KEY, &member, expire_at).await
    }

    async fn range(&self, start: i64, end: i64) -> Result<Vec<Post>> {
        self.excise_expired().await?;
        let members = self.cache.zrevrange(RECENT_POSTS_KEY, start, end).await?;
        Ok(decode_members(members))
    }

    async fn remove(&self, post_id: i64) -> Result<()> {
        self.excise_expired().await?;
        // Linear scan; the index only holds one window of posts.
        let members = self.cache.zrange_all(RECENT_POSTS_KEY).await?;
        if let Some(member) = members
            .into_iter()
            .find(|m| recent_member_id(m) == Some(post_id))
        {
            self.cache.zrem(RECENT_POSTS_KEY, &member).await?;
        }
        Ok(())
    }
}
