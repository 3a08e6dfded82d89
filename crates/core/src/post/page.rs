//! Paging math for the post listing.
//!
//! Pages are zero-based. A page maps onto an inclusive rank range of the
//! recency index so that the first pages can be answered from the cache.

use serde::{Deserialize, Serialize};

/// Inclusive rank range `[start, end]` covered by one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub start: i64,
    pub end: i64,
}

impl PageBounds {
    /// Number of ranks the page spans.
    pub fn len(&self) -> usize {
        (self.end - self.start + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computes `start = page * size` and `end = start + size - 1`.
pub fn page_bounds(page: u32, size: u32) -> PageBounds {
    let start = i64::from(page) * i64::from(size);
    PageBounds {
        start,
        end: start + i64::from(size) - 1,
    }
}

/// Ceiling division of `total` by `size`; zero when `size` is zero.
pub fn total_pages(total: u64, size: u32) -> u64 {
    if size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(size))
}

/// Page envelope returned by list operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, page: u32, size: u32, total_elements: u64) -> Self {
        let total_pages = total_pages(total_elements, size);
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
            first: page == 0,
            // page >= total_pages - 1, written without underflow.
            last: u64::from(page) + 1 >= total_pages,
        }
    }

    /// Transforms the page content, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}
