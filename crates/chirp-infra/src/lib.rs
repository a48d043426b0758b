//! # Chirp Infrastructure
//!
//! Concrete implementations of the ports defined in `chirp-core`.
//! This crate contains the durable stores, the timeline cache backends,
//! and the admission-control limiter.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL durable stores via SeaORM
//! - `rate-limit` - Per-client token bucket via governor
//! - `redis` - Redis cache and Redis-backed durable stores

pub mod cache;
pub mod database;
pub mod store;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use store::{InMemorySocialGraph, InMemoryTimelineIndex, InMemoryTweetStore};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
#[cfg(feature = "redis")]
pub use store::{RedisSocialGraph, RedisTimelineIndex, RedisTweetStore};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{PostgresSocialGraph, PostgresTimelineIndex, PostgresTweetStore};
