//! Response envelope shared by every endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Machine-readable error codes carried in [`ErrorBody::code`].
pub mod codes {
    pub const POST_NOT_FOUND: &str = "POST_001";
    pub const POST_ACCESS_DENIED: &str = "POST_005";
    pub const COMMENT_NOT_FOUND: &str = "COMMENT_001";
    pub const COMMENT_ACCESS_DENIED: &str = "COMMENT_005";
    pub const INVALID_INPUT: &str = "COMMON_001";
    pub const RESOURCE_NOT_FOUND: &str = "COMMON_002";
    pub const INTERNAL_ERROR: &str = "COMMON_003";
    pub const ACCESS_DENIED: &str = "COMMON_004";
    pub const INVALID_TOKEN: &str = "AUTH_001";
    pub const EXPIRED_TOKEN: &str = "AUTH_002";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// `{ success, data?, error?, timestamp, traceId? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
            trace_id: None,
        }
    }
}

impl ApiResponse<()> {
    /// Successful response without a body, e.g. after a delete.
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            timestamp: Utc::now(),
            trace_id: None,
        }
    }

    pub fn error(
        code: impl Into<String>,
        message: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.into(),
                message: message.into(),
            }),
            timestamp: Utc::now(),
            trace_id: Some(trace_id.into()),
        }
    }
}
