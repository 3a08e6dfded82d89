//! Shared application state.
//!
//! Services are built once from the configured backends and handed to the
//! handlers as trait objects. Backend combinations are chosen with Cargo
//! features; see `cache` and `storage` for the mutually exclusive sets.

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::broadcast;

use postline_core::cache::{Cache, FullCache};
use postline_core::events::{DomainEvent, EventBus, ALL_TOPICS};
use postline_core::recency::RecencyStrategy;
use postline_core::storage::{CommentRepository, PostRepository};

use crate::auth::JwtValidator;
use crate::cache::{CommentListCache, PostCache};
use crate::config::Config;
use crate::recency::{ListRecentPosts, RecentPosts, ScoredRecentPosts};
use crate::services::{CommentService, PostService};

/// Shared application state, cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    pub post_service: Arc<PostService>,
    pub comment_service: Arc<CommentService>,
    /// Primary store handle for readiness checks.
    pub store: Arc<dyn PostRepository>,
    pub jwt: Arc<JwtValidator>,
    /// Event bus the services publish to.
    pub events: Arc<dyn EventBus>,
    /// Shutdown signal for background tasks.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl FromRef<AppState> for Arc<JwtValidator> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl AppState {
    /// Wires services over the given backends.
    fn build<R, C>(
        repository: Arc<R>,
        cache: Arc<C>,
        events: Arc<dyn EventBus>,
        jwt_secret: &str,
        config: &Config,
    ) -> Self
    where
        R: PostRepository + CommentRepository + 'static,
        C: FullCache + 'static,
    {
        let recent: Arc<dyn RecentPosts> = match config.recency_strategy {
            RecencyStrategy::TimeScored => Arc::new(ScoredRecentPosts::new(
                cache.clone(),
                config.recent_post_window(),
            )),
            RecencyStrategy::FixedList => Arc::new(ListRecentPosts::new(
                cache.clone(),
                config.recent_post_list_size,
            )),
        };

        let values: Arc<dyn Cache> = cache;

        let post_service = PostService::new(
            repository.clone(),
            PostCache::new(values.clone(), config.post_cache_ttl()),
            recent,
            events.clone(),
        );

        let comment_service = CommentService::new(
            repository.clone(),
            CommentListCache::new(values.clone(), config.comment_cache_ttl()),
            events.clone(),
            config.comment_auth_policy,
        );

        let mut jwt = JwtValidator::new(jwt_secret.as_bytes());
        if config.jwt_verify_token_store {
            jwt = jwt.with_token_store(values);
        }

        tracing::info!(
            recency_strategy = %config.recency_strategy,
            comment_auth_policy = %config.comment_auth_policy,
            verify_token_store = config.jwt_verify_token_store,
            "Application state initialized"
        );

        Self {
            post_service: Arc::new(post_service),
            comment_service: Arc::new(comment_service),
            store: repository,
            jwt: Arc::new(jwt),
            events,
            shutdown_tx: broadcast::channel(1).0,
        }
    }

    /// Spawns one task per topic that logs every domain event on the bus.
    pub fn spawn_event_log(&self) {
        for topic in ALL_TOPICS {
            let events = self.events.clone();
            let mut shutdown_rx = self.shutdown_tx.subscribe();

            tokio::spawn(async move {
                let mut receiver = match events.subscribe(topic).await {
                    Ok(receiver) => receiver,
                    Err(err) => {
                        tracing::error!(topic, error = %err, "Failed to subscribe to domain events");
                        return;
                    }
                };

                loop {
                    tokio::select! {
                        result = receiver.recv() => {
                            match result {
                                Ok(message) => match DomainEvent::from_bytes(&message.payload) {
                                    Ok(event) => tracing::debug!(topic, key = %message.key, event = ?event, "Domain event"),
                                    Err(err) => tracing::warn!(topic, key = %message.key, error = %err, "Undecodable domain event"),
                                },
                                Err(broadcast::error::RecvError::Lagged(n)) => {
                                    tracing::warn!(topic, lagged = n, "Event log lagged");
                                }
                                Err(broadcast::error::RecvError::Closed) => {
                                    tracing::info!(topic, "Event channel closed");
                                    break;
                                }
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::debug!(topic, "Event log shutting down");
                            break;
                        }
                    }
                }
            });
        }
    }

    /// Signal background tasks to stop.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::{MemoryCache, MemoryEventBus};
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and in-memory cache.
        pub fn in_memory(jwt_secret: &str, config: &Config) -> Self {
            Self::build(
                Arc::new(InMemoryRepository::new()),
                Arc::new(MemoryCache::new(config.cache_max_entries)),
                Arc::new(MemoryEventBus::new()),
                jwt_secret,
                config,
            )
        }

        pub async fn new(jwt_secret: &str, config: &Config) -> Result<Self, anyhow::Error> {
            Ok(Self::in_memory(jwt_secret, config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::{RedisCache, RedisEventBus};
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(jwt_secret: &str, config: &Config) -> Result<Self, anyhow::Error> {
            let redis_cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            let redis_bus = Arc::new(RedisEventBus::new(&config.redis_url).await?);

            Ok(Self::build(
                Arc::new(InMemoryRepository::new()),
                redis_cache,
                redis_bus,
                jwt_secret,
                config,
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::{MemoryCache, MemoryEventBus};
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(jwt_secret: &str, config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);

            Ok(Self::build(
                sqlite_repo,
                Arc::new(MemoryCache::new(config.cache_max_entries)),
                Arc::new(MemoryEventBus::new()),
                jwt_secret,
                config,
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::{RedisCache, RedisEventBus};
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(jwt_secret: &str, config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let redis_cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            let redis_bus = Arc::new(RedisEventBus::new(&config.redis_url).await?);

            Ok(Self::build(
                sqlite_repo,
                redis_cache,
                redis_bus,
                jwt_secret,
                config,
            ))
        }
    }
}
