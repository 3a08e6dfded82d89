//! Request validation.
//!
//! Pure checks run by the services before anything touches the store.

use thiserror::Error;

use super::{CreatePostRequest, PageRequest};

/// Longest accepted post title, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("page size must be between 1 and {max}, got {actual}")]
    PageSize { max: u32, actual: u32 },
}

pub fn validate_post_request(request: &CreatePostRequest) -> Result<(), ValidationError> {
    if request.title.trim().is_empty() {
        return Err(ValidationError::Blank { field: "title" });
    }
    if request.title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "title",
            max: MAX_TITLE_LENGTH,
        });
    }
    if request.content.trim().is_empty() {
        return Err(ValidationError::Blank { field: "content" });
    }
    Ok(())
}

pub fn validate_comment_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::Blank { field: "content" });
    }
    Ok(())
}

pub fn validate_page_request(request: &PageRequest) -> Result<(), ValidationError> {
    if request.size == 0 || request.size > MAX_PAGE_SIZE {
        return Err(ValidationError::PageSize {
            max: MAX_PAGE_SIZE,
            actual: request.size,
        });
    }
    Ok(())
}
