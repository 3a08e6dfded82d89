use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::topics;
use crate::cache::SerializationError;
use crate::comment::Comment;
use crate::post::Post;

/// Event payloads, one variant per topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomainEvent {
    #[serde(rename_all = "camelCase")]
    PostCreated {
        post_id: i64,
        title: String,
        content: String,
        created_at: DateTime<Utc>,
        event_time: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    PostDeleted {
        post_id: i64,
        deleted_at: DateTime<Utc>,
        event_time: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    CommentCreated {
        comment_id: i64,
        post_id: i64,
        author: String,
        content: String,
        created_at: DateTime<Utc>,
        event_time: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    CommentUpdated {
        comment_id: i64,
        post_id: i64,
        content: String,
        updated_at: DateTime<Utc>,
        event_time: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    CommentDeleted {
        comment_id: i64,
        post_id: i64,
        deleted_at: DateTime<Utc>,
        event_time: DateTime<Utc>,
    },
}

impl DomainEvent {
    pub fn post_created(post: &Post, now: DateTime<Utc>) -> Self {
        Self::PostCreated {
            post_id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            created_at: post.created_at,
            event_time: now,
        }
    }

    pub fn post_deleted(post_id: i64, now: DateTime<Utc>) -> Self {
        Self::PostDeleted {
            post_id,
            deleted_at: now,
            event_time: now,
        }
    }

    pub fn comment_created(comment: &Comment, now: DateTime<Utc>) -> Self {
        Self::CommentCreated {
            comment_id: comment.id,
            post_id: comment.post_id,
            author: comment.owner_name.clone(),
            content: comment.content.clone(),
            created_at: comment.created_at,
            event_time: now,
        }
    }

    pub fn comment_updated(comment: &Comment, now: DateTime<Utc>) -> Self {
        Self::CommentUpdated {
            comment_id: comment.id,
            post_id: comment.post_id,
            content: comment.content.clone(),
            updated_at: comment.updated_at,
            event_time: now,
        }
    }

    pub fn comment_deleted(comment_id: i64, post_id: i64, now: DateTime<Utc>) -> Self {
        Self::CommentDeleted {
            comment_id,
            post_id,
            deleted_at: now,
            event_time: now,
        }
    }

    /// Topic the event is published on.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::PostCreated { .. } => topics::POST_CREATED,
            Self::PostDeleted { .. } => topics::POST_DELETED,
            Self::CommentCreated { .. } => topics::COMMENT_CREATED,
            Self::CommentUpdated { .. } => topics::COMMENT_UPDATED,
            Self::CommentDeleted { .. } => topics::COMMENT_DELETED,
        }
    }

    /// Partition key: the id of the entity the event is about.
    pub fn key(&self) -> String {
        match self {
            Self::PostCreated { post_id, .. } | Self::PostDeleted { post_id, .. } => {
                post_id.to_string()
            }
            Self::CommentCreated { comment_id, .. }
            | Self::CommentUpdated { comment_id, .. }
            | Self::CommentDeleted { comment_id, .. } => comment_id.to_string(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        serde_json::to_vec(self).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        serde_json::from_slice(bytes)
            .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
    }
}
