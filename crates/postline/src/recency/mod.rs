//! Recency index of recently created posts.
//!
//! Serves the first pages of the post listing without touching the primary
//! store. Two strategies sit behind [`RecentPosts`]:
//!
//! - [`ScoredRecentPosts`]: sorted set scored by expiry epoch seconds,
//!   expired entries are excised before every read and write
//! - [`ListRecentPosts`]: list of the N newest posts kept by push + trim

mod list;
mod scored;

use async_trait::async_trait;

use postline_core::cache::Result;
use postline_core::post::Post;
use postline_core::recency::RecencyStrategy;

pub use list::ListRecentPosts;
pub use scored::ScoredRecentPosts;

#[async_trait]
pub trait RecentPosts: Send + Sync {
    fn strategy(&self) -> RecencyStrategy;

    /// Expiry score for a post added now.
    fn calculate_expire_time(&self) -> i64;

    /// Adds `post` to the index. Strategies without expiry ignore `expire_at`.
    async fn add(&self, post: &Post, expire_at: i64) -> Result<()>;

    /// Posts at ranks `[start, end]`, newest first. Empty when out of bounds.
    async fn range(&self, start: i64, end: i64) -> Result<Vec<Post>>;

    /// Removes the entry for `post_id`, if any.
    async fn remove(&self, post_id: i64) -> Result<()>;
}

/// Decodes index members, skipping entries that no longer decode.
fn decode_members(members: Vec<String>) -> Vec<Post> {
    members
        .iter()
        .filter_map(
            |member| match postline_core::cache::decode_recent_member(member) {
                Ok(post) => Some(post),
                Err(err) => {
                    tracing::warn!(error = %err, "Skipping undecodable recency entry");
                    None
                }
            },
        )
        .collect()
}
