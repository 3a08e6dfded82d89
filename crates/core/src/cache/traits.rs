use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic key-value cache operations.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Score-sortable set operations (Redis `Z*` semantics).
///
/// Ranges are inclusive and negative indices count from the end.
#[async_trait]
pub trait SortedSetCache: Send + Sync {
    /// Adds `member` with `score`, replacing the score if the member exists.
    async fn zadd(&self, key: &str, member: &str, score: i64) -> Result<()>;

    /// Returns members by rank in descending score order.
    async fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>>;

    /// Returns every member in ascending score order.
    async fn zrange_all(&self, key: &str) -> Result<Vec<String>>;

    /// Removes every member whose score lies in `[min, max]`, returning how many were removed.
    async fn zrem_range_by_score(&self, key: &str, min: i64, max: i64) -> Result<u64>;

    /// Removes a single member, returning whether it was present.
    async fn zrem(&self, key: &str, member: &str) -> Result<bool>;
}

/// Bounded list operations (Redis `L*` semantics).
#[async_trait]
pub trait ListCache: Send + Sync {
    /// Pushes a value to the head of the list, returning the new length.
    async fn lpush(&self, key: &str, value: &str) -> Result<u64>;

    /// Returns the elements between `start` and `stop` inclusive.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>>;

    /// Trims the list so that only `[start, stop]` remains.
    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<()>;

    /// Removes the first occurrence of `value`, returning whether it was present.
    async fn lrem(&self, key: &str, value: &str) -> Result<bool>;
}

/// Combined trait for backends that support every cache structure.
pub trait FullCache: Cache + SortedSetCache + ListCache {}

impl<T: Cache + SortedSetCache + ListCache> FullCache for T {}
