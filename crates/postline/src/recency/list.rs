use std::sync::Arc;

use async_trait::async_trait;

use postline_core::cache::{
    encode_recent_member, recent_member_id, ListCache, Result, RECENT_POST_LIST_KEY,
};
use postline_core::post::Post;
use postline_core::recency::RecencyStrategy;

use super::{decode_members, RecentPosts};

/// Fixed-length recency index: the newest `capacity` posts, no expiry.
pub struct ListRecentPosts<C: ListCache + ?Sized> {
    cache: Arc<C>,
    capacity: usize,
}

impl<C: ListCache + ?Sized> ListRecentPosts<C> {
    pub fn new(cache: Arc<C>, capacity: usize) -> Self {
        Self {
            cache,
            capacity: capacity.max(1),
        }
    }
}

#[async_trait]
impl<C: ListCache + ?Sized> RecentPosts for ListRecentPosts<C> {
    fn strategy(&self) -> RecencyStrategy {
        RecencyStrategy::FixedList
    }

    fn calculate_expire_time(&self) -> i64 {
        i64::MAX
    }

    async fn add(&self, post: &Post, _expire_at: i64) -> Result<()> {
        let member = encode_recent_member(post)?;
        self.cache.lpush(RECENT_POST_LIST_KEY, &member).await?;
        self.cache
            .ltrim(RECENT_POST_LIST_KEY, 0, self.capacity as i64 - 1)
            .await
    }

    async fn range(&self, start: i64, end: i64) -> Result<Vec<Post>> {
        let members = self.cache.lrange(RECENT_POST_LIST_KEY, start, end).await?;
        Ok(decode_members(members))
    }

    async fn remove(&self, post_id: i64) -> Result<()> {
        let members = self.cache.lrange(RECENT_POST_LIST_KEY, 0, -1).await?;
        if let Some(member) = members
            .into_iter()
            .find(|m| recent_member_id(m) == Some(post_id))
        {
            self.cache.lrem(RECENT_POST_LIST_KEY, &member).await?;
        }
        Ok(())
    }
}
