mod page;
mod requests;
mod types;
mod validation;

pub use page::{page_bounds, total_pages, Page, PageBounds};
pub use requests::{CreatePostRequest, PageRequest, DEFAULT_PAGE_SIZE};
pub use types::{NewPost, Post};
pub use validation::{
    validate_comment_content, validate_page_request, validate_post_request, ValidationError,
    MAX_PAGE_SIZE, MAX_TITLE_LENGTH,
};
