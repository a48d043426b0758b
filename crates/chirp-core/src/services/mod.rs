//! Services - the write and read paths over the injected ports.

mod aggregator;
mod posting;
mod timeline_cache;

use std::sync::Arc;

use crate::config::TimelineConfig;
use crate::domain::{FollowEdge, Post, validate_user_id};
use crate::error::{DomainError, RepoError};
use crate::ports::{Cache, SocialGraphStore, TimelineIndex, TweetStore};

pub use aggregator::TimelineAggregator;
pub use posting::PostingPipeline;
pub use timeline_cache::TimelineCache;

/// The three durable stores, injected together at construction time.
#[derive(Clone)]
pub struct Stores {
    pub tweets: Arc<dyn TweetStore>,
    pub graph: Arc<dyn SocialGraphStore>,
    pub index: Arc<dyn TimelineIndex>,
}

/// Entry point used by callers (the HTTP layer): post, follow, read.
pub struct TimelineService {
    stores: Stores,
    cache: TimelineCache,
    aggregator: TimelineAggregator,
    pipeline: PostingPipeline,
    config: TimelineConfig,
}

impl TimelineService {
    pub fn new(stores: Stores, cache: Arc<dyn Cache>, config: TimelineConfig) -> Self {
        let cache = TimelineCache::new(cache);
        let aggregator = TimelineAggregator::new(
            stores.tweets.clone(),
            stores.graph.clone(),
            stores.index.clone(),
        );
        let pipeline = PostingPipeline::new(
            stores.tweets.clone(),
            stores.index.clone(),
            cache.clone(),
            config.clone(),
        );

        Self {
            stores,
            cache,
            aggregator,
            pipeline,
            config,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Publish a post for `user_id`, returning the new post id.
    pub async fn post(&self, user_id: &str, body: &str) -> Result<String, DomainError> {
        self.pipeline.post(user_id, body).await
    }

    /// Make `follower_id` follow `followee_id`. Idempotent.
    pub async fn follow(&self, follower_id: &str, followee_id: &str) -> Result<(), DomainError> {
        let edge = FollowEdge::new(follower_id, followee_id)?;
        self.stores.graph.follow(&edge).await?;
        tracing::info!(follower = %edge.follower_id, followee = %edge.followee_id, "Follow recorded");
        Ok(())
    }

    /// The user's feed, newest first. Served from cache when possible.
    pub async fn get_timeline(&self, user_id: &str) -> Result<Vec<Post>, DomainError> {
        validate_user_id(user_id)?;

        if let Some(cached) = self.cache.get_timeline(user_id).await {
            return Ok(cached);
        }

        let timeline = self.aggregator.build_timeline(user_id).await?;

        if let Err(e) = self
            .cache
            .put_timeline(user_id, &timeline, self.config.cache_ttl)
            .await
        {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to cache timeline");
        }

        Ok(timeline)
    }

    /// Fetch a single post by id.
    pub async fn get_post(&self, post_id: &str) -> Result<Post, DomainError> {
        self.stores.tweets.get(post_id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "post",
                id: post_id.to_string(),
            },
            other => other.into(),
        })
    }

    /// Ids `user_id` follows.
    pub async fn list_followees(&self, user_id: &str) -> Result<Vec<String>, DomainError> {
        validate_user_id(user_id)?;
        Ok(self.stores.graph.list_followees(user_id).await?)
    }

    /// Ids following `user_id`.
    pub async fn list_followers(&self, user_id: &str) -> Result<Vec<String>, DomainError> {
        validate_user_id(user_id)?;
        Ok(self.stores.graph.list_followers(user_id).await?)
    }
}
