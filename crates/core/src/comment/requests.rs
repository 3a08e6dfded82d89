//! API request types for comment operations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: i64,
    pub content: String,
    /// Required under the shared-secret policy, ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl CreateCommentRequest {
    pub fn new(post_id: i64, content: impl Into<String>) -> Self {
        Self {
            post_id,
            content: content.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateCommentRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Optional body of a comment deletion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteCommentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
