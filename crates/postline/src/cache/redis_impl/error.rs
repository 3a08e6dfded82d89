//! Redis error mapping to CacheError.

use postline_core::cache::CacheError;

/// Maps Redis errors to CacheError.
pub fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}

/// Like [`map_redis_error`], but reports `WRONGTYPE` replies against `key`.
pub fn map_redis_key_error(key: &str) -> impl Fn(redis::RedisError) -> CacheError + '_ {
    move |err| {
        if err.code() == Some("WRONGTYPE") {
            CacheError::WrongType {
                key: key.to_string(),
            }
        } else {
            map_redis_error(err)
        }
    }
}
