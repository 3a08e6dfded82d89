//! Pure functions for serializing domain types to and from cache bytes.
//!
//! Values are stored as JSON so cached entries stay readable from `redis-cli`.

use thiserror::Error;

use crate::comment::CommentView;
use crate::post::Post;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Width of the zero-padded id prefix of a recency member.
const MEMBER_ID_WIDTH: usize = 20;

pub fn serialize_post(post: &Post) -> Result<Vec<u8>> {
    serde_json::to_vec(post).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

pub fn deserialize_post(bytes: &[u8]) -> Result<Post> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Comment lists are cached as [`CommentView`]s, so password hashes never
/// reach the shared cache.
pub fn serialize_comments(comments: &[CommentView]) -> Result<Vec<u8>> {
    serde_json::to_vec(comments).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

pub fn deserialize_comments(bytes: &[u8]) -> Result<Vec<CommentView>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Encodes a post as a recency-index member: `{id:020}|{json}`.
///
/// Sorted sets order equal scores by member bytes, so the zero-padded id
/// prefix makes a reverse range return the higher id first on ties.
pub fn encode_recent_member(post: &Post) -> Result<String> {
    let json =
        serde_json::to_string(post).map_err(|e| SerializationError::SerializeFailed(e.to_string()))?;
    Ok(format!(
        "{:0width$}|{}",
        post.id,
        json,
        width = MEMBER_ID_WIDTH
    ))
}

/// Decodes a member produced by [`encode_recent_member`].
pub fn decode_recent_member(member: &str) -> Result<Post> {
    let (_, json) = member.split_once('|').ok_or_else(|| {
        SerializationError::DeserializeFailed("recency member has no id prefix".to_string())
    })?;
    serde_json::from_str(json).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Reads the post id of a recency member without decoding the post.
pub fn recent_member_id(member: &str) -> Option<i64> {
    member.split_once('|')?.0.parse().ok()
}
