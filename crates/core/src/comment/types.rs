use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a post.
///
/// `secret_hash` is only set under the shared-secret policy and never leaves
/// the server; responses use [`CommentView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub owner_id: i64,
    pub owner_name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: i64,
    pub owner_id: i64,
    pub owner_name: String,
    pub content: String,
    pub secret_hash: Option<String>,
}

impl NewComment {
    pub fn new(
        post_id: i64,
        owner_id: i64,
        owner_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            post_id,
            owner_id,
            owner_name: owner_name.into(),
            content: content.into(),
            secret_hash: None,
        }
    }

    pub fn with_secret_hash(mut self, secret_hash: impl Into<String>) -> Self {
        self.secret_hash = Some(secret_hash.into());
        self
    }

    /// Materializes the comment with the identity and timestamp chosen by the store.
    pub fn into_comment(self, id: i64, now: DateTime<Utc>) -> Comment {
        Comment {
            id,
            post_id: self.post_id,
            owner_id: self.owner_id,
            owner_name: self.owner_name,
            content: self.content,
            secret_hash: self.secret_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public representation of a [`Comment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub owner_id: i64,
    pub owner_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            owner_id: comment.owner_id,
            owner_name: comment.owner_name,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
