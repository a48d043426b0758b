//! Write path: validate, store, index, then refresh the author's cache.

use std::sync::Arc;

use crate::config::TimelineConfig;
use crate::domain::{Post, PostIdGenerator, sort_timeline, validate_user_id};
use crate::error::{DomainError, RepoError};
use crate::ports::{TimelineIndex, TweetStore};

use super::timeline_cache::TimelineCache;

/// Ids minted by other processes can collide with ours; give up after this many.
const MAX_ID_ATTEMPTS: u32 = 3;

/// Records new posts and keeps the derived index consistent.
pub struct PostingPipeline {
    tweets: Arc<dyn TweetStore>,
    index: Arc<dyn TimelineIndex>,
    cache: TimelineCache,
    ids: PostIdGenerator,
    config: TimelineConfig,
}

impl PostingPipeline {
    pub fn new(
        tweets: Arc<dyn TweetStore>,
        index: Arc<dyn TimelineIndex>,
        cache: TimelineCache,
        config: TimelineConfig,
    ) -> Self {
        Self {
            tweets,
            index,
            cache,
            ids: PostIdGenerator::new(),
            config,
        }
    }

    /// Reject bodies longer than the configured maximum.
    pub fn validate_body(&self, body: &str) -> Result<(), DomainError> {
        let length = body.chars().count();
        if length > self.config.max_post_length {
            return Err(DomainError::PostTooLong {
                length,
                max: self.config.max_post_length,
            });
        }
        Ok(())
    }

    /// Publish a post and return its id.
    ///
    /// The post is stored before it is indexed, so a failure in between
    /// leaves an unreachable post rather than a dangling index entry.
    pub async fn post(&self, user_id: &str, body: &str) -> Result<String, DomainError> {
        validate_user_id(user_id)?;
        self.validate_body(body)?;

        let post = self.store_new(user_id, body).await?;
        self.index.append(user_id, &post.id).await?;

        tracing::info!(post_id = %post.id, author = %user_id, "Post stored");

        self.refresh_author_cache(&post).await;

        Ok(post.id)
    }

    /// Store a post under a fresh id, minting another when the id is taken.
    async fn store_new(&self, user_id: &str, body: &str) -> Result<Post, DomainError> {
        let mut attempt = 1;
        loop {
            let post = Post::new(self.ids.next_stamp(), user_id, body);
            match self.tweets.put(&post).await {
                Ok(()) => return Ok(post),
                Err(RepoError::Constraint(reason)) if attempt < MAX_ID_ATTEMPTS => {
                    tracing::warn!(
                        post_id = %post.id,
                        attempt,
                        reason = %reason,
                        "Post id already taken, retrying with a fresh id"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Merge the new post into the author's own cached timeline, if one exists.
    ///
    /// Followers' cached timelines are not touched; they serve stale data
    /// until their TTL lapses.
    async fn refresh_author_cache(&self, post: &Post) {
        let Some(mut timeline) = self.cache.get_timeline(&post.author_id).await else {
            return;
        };

        timeline.retain(|p| p.id != post.id);
        timeline.push(post.clone());
        sort_timeline(&mut timeline);

        if let Err(e) = self
            .cache
            .put_timeline(&post.author_id, &timeline, self.config.cache_ttl)
            .await
        {
            tracing::warn!(author = %post.author_id, error = %e, "Cache write-through failed");
        }
    }
}
