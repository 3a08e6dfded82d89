//! API request types for post operations.

use serde::{Deserialize, Serialize};

/// Page size used when a list request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Request payload for creating a post. The owner comes from the caller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Query parameters for paged listings (`?page=0&size=10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_when_fields_missing() {
        let request: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, PageRequest::new(0, 10));
    }

    #[test]
    fn test_page_request_keeps_explicit_values() {
        let request: PageRequest = serde_json::from_str(r#"{"page":3,"size":25}"#).unwrap();
        assert_eq!(request, PageRequest::new(3, 25));
    }
}
