//! Redis cache implementation and the shared Redis connection setup.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};

use chirp_core::ports::{Cache, CacheError};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Whether to fallback to in-memory cache if Redis is unavailable
    pub fallback_to_memory: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            fallback_to_memory: true,
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            fallback_to_memory: std::env::var("REDIS_FALLBACK_TO_MEMORY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        }
    }
}

/// Open a managed Redis connection, giving up after `connect_timeout`.
///
/// The returned manager reconnects on its own and is cheap to clone, so a
/// single one is shared by every Redis-backed adapter in the process.
pub async fn connect(config: &RedisConfig) -> Result<ConnectionManager, String> {
    let client = Client::open(config.url.as_str()).map_err(|e| e.to_string())?;

    // Use timeout to prevent hanging if Redis is unreachable
    let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
        .await
        .map_err(|_| "Connection timed out".to_string())?
        .map_err(|e| e.to_string())?;

    tracing::info!(url = %config.url, "Connected to Redis");

    Ok(conn)
}

fn operation_error(e: RedisError) -> CacheError {
    if e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout() {
        CacheError::Connection(e.to_string())
    } else {
        CacheError::Operation(e.to_string())
    }
}

/// Redis-backed cache implementation.
///
/// Capacity eviction is delegated to the server (`maxmemory-policy allkeys-lru`).
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn new(config: RedisConfig) -> Result<Self, CacheError> {
        let conn = connect(&config).await.map_err(CacheError::Connection)?;
        Ok(Self { conn })
    }

    /// Wrap an already established connection.
    pub fn with_connection(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, CacheError> {
        Self::new(RedisConfig::from_env()).await
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key).await.map_err(|e| {
            tracing::warn!(key = %key, error = %e, "Redis GET failed");
            operation_error(e)
        })
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();

        match ttl {
            Some(duration) => {
                let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX).max(1);
                conn.pset_ex::<_, _, ()>(key, value, millis)
                    .await
                    .map_err(operation_error)?;
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(operation_error)?;
            }
        }

        Ok(())
    }
}
