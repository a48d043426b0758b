//! Admission control port.

use async_trait::async_trait;
use std::time::Duration;

/// Rate limiter trait - gates requests before they reach the timeline core.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Take one token from the bucket identified by `key` (a client address).
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Time until the next token is available when rejected.
    pub reset_after: Duration,
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
