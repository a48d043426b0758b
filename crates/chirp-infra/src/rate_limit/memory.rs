//! In-memory per-client token bucket using the governor crate.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota};

use chirp_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

/// Token bucket configuration, applied to each client separately.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Bucket size: requests a fresh client may make back to back.
    pub burst: u32,
    /// Time to regain one token.
    pub replenish_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            burst: 100,
            replenish_interval: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            burst: std::env::var("RATE_LIMIT_BURST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            replenish_interval: Duration::from_secs(
                std::env::var("RATE_LIMIT_REPLENISH_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        }
    }
}

/// In-memory rate limiter using the GCRA algorithm, one bucket per key.
///
/// Note: Limits are per-process, not distributed across instances.
pub struct InMemoryRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Result<Self, RateLimitError> {
        let burst = NonZeroU32::new(config.burst)
            .ok_or_else(|| RateLimitError::Backend("burst must be non-zero".to_string()))?;
        let quota = Quota::with_period(config.replenish_interval)
            .ok_or_else(|| {
                RateLimitError::Backend("replenish interval must be non-zero".to_string())
            })?
            .allow_burst(burst);

        Ok(Self {
            limiter: DefaultKeyedRateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        })
    }

    pub fn from_env() -> Result<Self, RateLimitError> {
        Self::new(RateLimitConfig::from_env())
    }

    /// Forget clients whose buckets have refilled completely.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        match self.limiter.check_key(&key.to_string()) {
            Ok(_) => Ok(RateLimitResult {
                allowed: true,
                reset_after: Duration::ZERO,
            }),
            Err(not_until) => Ok(RateLimitResult {
                allowed: false,
                reset_after: not_until.wait_time_from(self.clock.now()),
            }),
        }
    }
}
