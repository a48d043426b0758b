//! Fan-out-on-read timeline assembly.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;

use crate::domain::{Post, sort_timeline};
use crate::error::DomainError;
use crate::ports::{SocialGraphStore, TimelineIndex, TweetStore};

/// Builds a user's feed from the durable stores.
///
/// Cost is linear in followees times their post counts; the timeline cache
/// exists to amortize it across repeated reads.
#[derive(Clone)]
pub struct TimelineAggregator {
    tweets: Arc<dyn TweetStore>,
    graph: Arc<dyn SocialGraphStore>,
    index: Arc<dyn TimelineIndex>,
}

impl TimelineAggregator {
    pub fn new(
        tweets: Arc<dyn TweetStore>,
        graph: Arc<dyn SocialGraphStore>,
        index: Arc<dyn TimelineIndex>,
    ) -> Self {
        Self {
            tweets,
            graph,
            index,
        }
    }

    /// Merge the posts of `user_id` and everyone they follow, newest first.
    ///
    /// Failing to read the followee list is an error. A followee whose index
    /// cannot be read, or a post that cannot be loaded, is left out of the
    /// result instead.
    pub async fn build_timeline(&self, user_id: &str) -> Result<Vec<Post>, DomainError> {
        let mut authors: BTreeSet<String> =
            self.graph.list_followees(user_id).await?.into_iter().collect();
        authors.insert(user_id.to_string());

        let mut timeline = Vec::new();
        let mut skipped = 0usize;

        for author in &authors {
            let ids = match self.index.list_ids(author).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!(author = %author, error = %e, "Skipping unreadable timeline index");
                    continue;
                }
            };

            let loads = join_all(ids.iter().map(|id| self.tweets.get(id))).await;
            for (id, load) in ids.iter().zip(loads) {
                match load {
                    Ok(post) => timeline.push(post),
                    Err(e) => {
                        skipped += 1;
                        tracing::warn!(post_id = %id, author = %author, error = %e, "Skipping post that failed to load");
                    }
                }
            }
        }

        sort_timeline(&mut timeline);

        tracing::debug!(
            user_id = %user_id,
            authors = authors.len(),
            posts = timeline.len(),
            skipped,
            "Timeline aggregated"
        );

        Ok(timeline)
    }
}
