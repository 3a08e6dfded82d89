use std::{env, num::NonZeroUsize, str::FromStr, time::Duration};

use postline_core::comment::CommentAuthPolicy;
use postline_core::recency::{RecencyStrategy, DEFAULT_RECENT_LIST_SIZE, DEFAULT_RECENT_WINDOW};

const DEFAULT_CACHE_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of in-memory cache values (default: 10,000)
    pub cache_max_entries: NonZeroUsize,
    /// Post cache TTL in seconds (default: 3600)
    pub post_cache_ttl_seconds: u64,
    /// Comment-list cache TTL in seconds (default: 43,200)
    pub comment_cache_ttl_seconds: u64,
    /// Recency index strategy (default: time-scored)
    pub recency_strategy: RecencyStrategy,
    /// Lifetime of a time-scored recency entry in seconds (default: 43,200)
    pub recent_post_window_seconds: u64,
    /// Capacity of the fixed-length recency list (default: 100)
    pub recent_post_list_size: usize,
    /// Who may change a comment (default: ownership)
    pub comment_auth_policy: CommentAuthPolicy,
    /// Path to SQLite database file (default: "postline.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// HS256 secret shared with the user service
    pub jwt_secret: Option<String>,
    /// Also require the token to be the one stored at `jwt:token:{id}` (default: false)
    pub jwt_verify_token_store: bool,
    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `POST_CACHE_TTL_SECONDS` - Post cache TTL (default: 3600)
    /// - `COMMENT_CACHE_TTL_SECONDS` - Comment-list cache TTL (default: 43,200)
    /// - `RECENCY_STRATEGY` - `time-scored` or `fixed-list` (default: time-scored)
    /// - `RECENT_POST_WINDOW_SECONDS` - Recency window (default: 43,200)
    /// - `RECENT_POST_LIST_SIZE` - Fixed-list capacity (default: 100)
    /// - `COMMENT_AUTH_POLICY` - `ownership` or `shared-secret` (default: ownership)
    /// - `SQLITE_PATH` - SQLite database path (default: "postline.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `JWT_SECRET` - Token signing secret (no default)
    /// - `JWT_VERIFY_TOKEN_STORE` - `true` to check the token store (default: false)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    ///
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_env() -> Self {
        Self {
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES),
            post_cache_ttl_seconds: parse_env("POST_CACHE_TTL_SECONDS", 3_600),
            comment_cache_ttl_seconds: parse_env("COMMENT_CACHE_TTL_SECONDS", 43_200),
            recency_strategy: parse_env("RECENCY_STRATEGY", RecencyStrategy::default()),
            recent_post_window_seconds: parse_env(
                "RECENT_POST_WINDOW_SECONDS",
                DEFAULT_RECENT_WINDOW.as_secs(),
            ),
            recent_post_list_size: parse_env("RECENT_POST_LIST_SIZE", DEFAULT_RECENT_LIST_SIZE),
            comment_auth_policy: parse_env("COMMENT_AUTH_POLICY", CommentAuthPolicy::default()),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "postline.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            jwt_verify_token_store: parse_env("JWT_VERIFY_TOKEN_STORE", false),
            request_timeout_seconds: parse_env("REQUEST_TIMEOUT_SECONDS", 10),
        }
    }

    pub fn post_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.post_cache_ttl_seconds)
    }

    pub fn comment_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.comment_cache_ttl_seconds)
    }

    pub fn recent_post_window(&self) -> Duration {
        Duration::from_secs(self.recent_post_window_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(variable = name, value = %value, error = %err, "Ignoring invalid setting");
                default
            }
        },
        Err(_) => default,
    }
}
