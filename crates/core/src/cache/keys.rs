/// Sorted set holding the time-scored recency index.
pub const RECENT_POSTS_KEY: &str = "posts:recent";

/// List holding the fixed-length recency index.
pub const RECENT_POST_LIST_KEY: &str = "posts:recent:list";

/// Returns the cache key for a single post.
pub fn post_key(post_id: i64) -> String {
    format!("post:{}", post_id)
}

/// Returns the cache key for the newest-first comment list of a post.
pub fn comment_list_key(post_id: i64) -> String {
    format!("comments:post:{}", post_id)
}

/// Returns the key under which the currently valid access token of a user is stored.
pub fn user_token_key(user_id: i64) -> String {
    format!("jwt:token:{}", user_id)
}

/// Returns the pub/sub channel used to carry a domain event topic.
pub fn event_channel(topic: &str) -> String {
    format!("events:{}", topic)
}
