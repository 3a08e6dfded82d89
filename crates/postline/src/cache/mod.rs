//! Cache and event-bus backends plus the typed caches built on top of them.
//!
//! Backends are selected at compile time:
//!
//! - `memory` (default): in-process LRU values, sorted sets, lists and a
//!   tokio broadcast event bus
//! - `redis`: Redis for all of the above, Redis pub/sub for events
//!
//! The two features are mutually exclusive.

#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p postline --features memory"
);

mod comments;
mod entity;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use comments::CommentListCache;
pub use entity::PostCache;

#[cfg(feature = "memory")]
pub use memory::{MemoryCache, MemoryEventBus};

#[cfg(feature = "redis")]
pub use redis_impl::{RedisCache, RedisEventBus};
