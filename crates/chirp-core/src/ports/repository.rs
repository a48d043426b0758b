use async_trait::async_trait;

use crate::domain::{FollowEdge, Post};
use crate::error::RepoError;

/// Durable, keyed storage of individual posts.
///
/// Posts are immutable: there is no update or delete.
#[async_trait]
pub trait TweetStore: Send + Sync {
    /// Persist a post under its id.
    /// Fails with `RepoError::Constraint` if the id is already taken.
    async fn put(&self, post: &Post) -> Result<(), RepoError>;

    /// Fetch a post by id. Fails with `RepoError::NotFound` when unknown.
    async fn get(&self, id: &str) -> Result<Post, RepoError>;
}

/// Durable storage of directed follow edges, kept in both directions.
#[async_trait]
pub trait SocialGraphStore: Send + Sync {
    /// Record `follower follows followee` and the reciprocal
    /// `followee is followed by follower`. Re-adding an edge is a no-op.
    async fn follow(&self, edge: &FollowEdge) -> Result<(), RepoError>;

    /// Ids the user follows. Order is irrelevant.
    async fn list_followees(&self, user_id: &str) -> Result<Vec<String>, RepoError>;

    /// Ids following the user. Order is irrelevant.
    async fn list_followers(&self, user_id: &str) -> Result<Vec<String>, RepoError>;
}

/// Append-only, per-user ordered list of authored post ids.
#[async_trait]
pub trait TimelineIndex: Send + Sync {
    /// Append a post id to the end of the user's sequence.
    async fn append(&self, user_id: &str, post_id: &str) -> Result<(), RepoError>;

    /// The user's full sequence in insertion order (possibly empty).
    async fn list_ids(&self, user_id: &str) -> Result<Vec<String>, RepoError>;
}
