//! Tunables for the timeline subsystem.

use std::time::Duration;

/// Default maximum post length, in characters.
pub const DEFAULT_MAX_POST_LENGTH: usize = 280;

/// Default time-to-live of a cached timeline.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Timeline configuration shared by the posting and read paths.
#[derive(Debug, Clone)]
pub struct TimelineConfig {
    /// Maximum post body length, counted in characters.
    pub max_post_length: usize,
    /// TTL applied to every freshly written cache entry.
    pub cache_ttl: Duration,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            max_post_length: DEFAULT_MAX_POST_LENGTH,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl TimelineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_post_length: std::env::var("MAX_POST_LENGTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_POST_LENGTH),
            cache_ttl: std::env::var("TIMELINE_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CACHE_TTL),
        }
    }
}
