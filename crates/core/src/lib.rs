//! Functional core for postline.
//!
//! Pure domain types, the traits that sit at every I/O seam (cache, storage,
//! event bus) and the pure functions that the imperative shell in the
//! `postline` crate composes: cache keys, serialization, paging math, recency
//! scoring, comment authorization and HTTP status mapping.

pub mod api;
pub mod auth;
pub mod cache;
pub mod comment;
pub mod events;
pub mod post;
pub mod recency;
pub mod storage;
