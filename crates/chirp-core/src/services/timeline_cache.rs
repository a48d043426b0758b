//! Cache layer for assembled timelines.
//!
//! Entries are derived data: a missing, expired, unreadable or undecodable
//! entry is reported as a miss and the caller rebuilds from the stores.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::Post;
use crate::ports::{Cache, CacheError};

const KEY_PREFIX: &str = "timeline";

/// Typed view over a [`Cache`] holding one serialized timeline per user.
#[derive(Clone)]
pub struct TimelineCache {
    cache: Arc<dyn Cache>,
}

impl TimelineCache {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    fn key(user_id: &str) -> String {
        format!("{KEY_PREFIX}:{user_id}")
    }

    /// Cached timeline for `user_id`, or `None` on a miss.
    pub async fn get_timeline(&self, user_id: &str) -> Option<Vec<Post>> {
        let raw = match self.cache.get(&Self::key(user_id)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(user_id = %user_id, "Timeline cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Timeline cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<Vec<Post>>(&raw) {
            Ok(posts) => {
                tracing::debug!(user_id = %user_id, posts = posts.len(), "Timeline cache hit");
                Some(posts)
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Undecodable cached timeline, treating as miss");
                None
            }
        }
    }

    /// Store `posts` as the user's timeline, replacing any entry and its TTL.
    pub async fn put_timeline(
        &self,
        user_id: &str,
        posts: &[Post],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let raw =
            serde_json::to_string(posts).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.cache.set(&Self::key(user_id), &raw, Some(ttl)).await
    }
}
