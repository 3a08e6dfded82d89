//! In-memory cache backend for single-instance deployments and tests.

mod bus;
mod cache;

pub use bus::MemoryEventBus;
pub use cache::MemoryCache;
