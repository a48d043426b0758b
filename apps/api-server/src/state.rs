//! Application state - shared across all handlers.
//!
//! Backend handles (Redis connections, the database pool) are opened once
//! here and injected into the timeline service; they are released when the
//! last clone of the state is dropped at shutdown.

use std::sync::Arc;

use chirp_core::ports::Cache;
use chirp_core::{Stores, TimelineConfig, TimelineService};
use chirp_infra::{InMemoryCache, InMemorySocialGraph, InMemoryTimelineIndex, InMemoryTweetStore};

use crate::config::{AppConfig, CacheBackend, StoreBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub timeline: Arc<TimelineService>,
}

impl AppState {
    /// Build the application state with the configured backends.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let cache = match config.cache_backend {
            CacheBackend::Memory => memory_cache(),
            CacheBackend::Redis => redis_cache(config).await?,
        };

        let stores = match config.store_backend {
            StoreBackend::Memory => memory_stores(),
            StoreBackend::Redis => redis_stores(config).await,
            StoreBackend::Postgres => postgres_stores(config).await,
        };

        tracing::info!(
            store = ?config.store_backend,
            cache = ?config.cache_backend,
            max_post_length = config.timeline.max_post_length,
            cache_ttl_secs = config.timeline.cache_ttl.as_secs(),
            "Application state initialized"
        );

        Ok(Self::from_parts(stores, cache, config.timeline.clone()))
    }

    /// Fully in-memory state, used when no external backend is configured.
    pub fn in_memory(config: TimelineConfig) -> Self {
        Self::from_parts(memory_stores(), memory_cache(), config)
    }

    fn from_parts(stores: Stores, cache: Arc<dyn Cache>, config: TimelineConfig) -> Self {
        Self {
            timeline: Arc::new(TimelineService::new(stores, cache, config)),
        }
    }
}

fn memory_cache() -> Arc<dyn Cache> {
    Arc::new(InMemoryCache::from_env())
}

fn memory_stores() -> Stores {
    Stores {
        tweets: Arc::new(InMemoryTweetStore::new()),
        graph: Arc::new(InMemorySocialGraph::new()),
        index: Arc::new(InMemoryTimelineIndex::new()),
    }
}

#[cfg(feature = "redis")]
async fn redis_cache(config: &AppConfig) -> anyhow::Result<Arc<dyn Cache>> {
    use chirp_infra::RedisCache;

    match chirp_infra::cache::connect(&config.redis).await {
        Ok(conn) => Ok(Arc::new(RedisCache::with_connection(conn))),
        Err(e) if config.redis.fallback_to_memory => {
            tracing::error!(
                "Failed to connect to Redis cache: {}. Using in-memory fallback.",
                e
            );
            Ok(memory_cache())
        }
        Err(e) => Err(anyhow::anyhow!("Redis cache unavailable: {e}")),
    }
}

#[cfg(not(feature = "redis"))]
async fn redis_cache(_config: &AppConfig) -> anyhow::Result<Arc<dyn Cache>> {
    tracing::warn!("Built without redis feature - using in-memory cache");
    Ok(memory_cache())
}

#[cfg(feature = "redis")]
async fn redis_stores(config: &AppConfig) -> Stores {
    use chirp_infra::{RedisSocialGraph, RedisTimelineIndex, RedisTweetStore};

    match chirp_infra::cache::connect(&config.redis).await {
        Ok(conn) => Stores {
            tweets: Arc::new(RedisTweetStore::new(conn.clone())),
            graph: Arc::new(RedisSocialGraph::new(conn.clone())),
            index: Arc::new(RedisTimelineIndex::new(conn)),
        },
        Err(e) => {
            tracing::error!(
                "Failed to connect to Redis store: {}. Using in-memory fallback.",
                e
            );
            memory_stores()
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn redis_stores(_config: &AppConfig) -> Stores {
    tracing::warn!("Built without redis feature - using in-memory stores");
    memory_stores()
}

#[cfg(feature = "postgres")]
async fn postgres_stores(config: &AppConfig) -> Stores {
    use chirp_infra::{PostgresSocialGraph, PostgresTimelineIndex, PostgresTweetStore};

    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return memory_stores();
    };

    match chirp_infra::database::connect(db_config).await {
        Ok(db) => {
            let db = Arc::new(db);
            Stores {
                tweets: Arc::new(PostgresTweetStore::new(db.clone())),
                graph: Arc::new(PostgresSocialGraph::new(db.clone())),
                index: Arc::new(PostgresTimelineIndex::new(db)),
            }
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            memory_stores()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn postgres_stores(_config: &AppConfig) -> Stores {
    tracing::info!("Running without postgres feature - using in-memory stores");
    memory_stores()
}
