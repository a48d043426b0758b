//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use chirp_core::TimelineConfig;
use chirp_infra::database::DatabaseConfig;

#[cfg(feature = "redis")]
use chirp_infra::RedisConfig;
#[cfg(feature = "rate-limit")]
use chirp_infra::RateLimitConfig;

/// Where posts, follow edges and timeline indexes are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

/// Where assembled timelines are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown cache backend '{other}'")),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub cache_backend: CacheBackend,
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "redis")]
    pub redis: RedisConfig,
    pub timeline: TimelineConfig,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            store_backend: Self::parse_backend("STORE_BACKEND", StoreBackend::Memory),
            cache_backend: Self::parse_backend("CACHE_BACKEND", CacheBackend::Memory),
            database: DatabaseConfig::from_env(),
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
            timeline: TimelineConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
        }
    }

    fn parse_backend<T>(var: &str, default: T) -> T
    where
        T: FromStr<Err = String> + Copy,
    {
        match env::var(var) {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!(var = %var, error = %e, "Invalid backend, using default");
                default
            }),
            Err(_) => default,
        }
    }
}
