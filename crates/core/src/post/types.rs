use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published blog post.
///
/// `id`, `created_at` and `updated_at` are assigned by the primary store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner_id: i64,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub owner_id: i64,
    pub owner_name: String,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        owner_id: i64,
        owner_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            owner_id,
            owner_name: owner_name.into(),
        }
    }

    /// Materializes the post with the identity and timestamp chosen by the store.
    pub fn into_post(self, id: i64, now: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            owner_id: self.owner_id,
            owner_name: self.owner_name,
            created_at: now,
            updated_at: now,
        }
    }
}
