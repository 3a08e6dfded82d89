//! Redis cache implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use postline_core::cache::{Cache, ListCache, Result, SortedSetCache};

use super::error::{map_redis_error, map_redis_key_error};

/// Redis cache backend using a connection manager for pooling and reconnects.
#[derive(Clone)]
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Creates a new Redis cache connection.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_key_error(key))?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();

        match ttl {
            Some(duration) => {
                let seconds = duration.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, seconds)
                    .await
                    .map_err(map_redis_error)?;
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(map_redis_error)?;
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(map_redis_error)?;
        Ok(())
    }
}

#[async_trait]
impl SortedSetCache for RedisCache {
    async fn zadd(&self, key: &str, member: &str, score: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.zadd::<_, _, _, ()>(key, member, score)
            .await
            .map_err(map_redis_key_error(key))?;
        Ok(())
    }

    async fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.zrevrange(key, start as isize, stop as isize)
            .await
            .map_err(map_redis_key_error(key))
    }

    async fn zrange_all(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.zrange(key, 0, -1)
            .await
            .map_err(map_redis_key_error(key))
    }

    async fn zrem_range_by_score(&self, key: &str, min: i64, max: i64) -> Result<u64> {
        let mut conn = self.conn.clone();
        conn.zrembyscore(key, min, max)
            .await
            .map_err(map_redis_key_error(key))
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn
            .zrem(key, member)
            .await
            .map_err(map_redis_key_error(key))?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl ListCache for RedisCache {
    async fn lpush(&self, key: &str, value: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        conn.lpush(key, value)
            .await
            .map_err(map_redis_key_error(key))
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.lrange(key, start as isize, stop as isize)
            .await
            .map_err(map_redis_key_error(key))
    }

    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.ltrim::<_, ()>(key, start as isize, stop as isize)
            .await
            .map_err(map_redis_key_error(key))?;
        Ok(())
    }

    async fn lrem(&self, key: &str, value: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn
            .lrem(key, 1, value)
            .await
            .map_err(map_redis_key_error(key))?;
        Ok(removed > 0)
    }
}
