//! In-memory durable stores.
//!
//! Each operation takes a single lock, which gives the per-operation
//! atomicity the core relies on. Note: Data is lost on process restart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use chirp_core::domain::{FollowEdge, Post};
use chirp_core::error::RepoError;
use chirp_core::ports::{SocialGraphStore, TimelineIndex, TweetStore};

/// Posts keyed by id.
#[derive(Default)]
pub struct InMemoryTweetStore {
    posts: RwLock<HashMap<String, Post>>,
}

impl InMemoryTweetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TweetStore for InMemoryTweetStore {
    async fn put(&self, post: &Post) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!(
                "post {} already exists",
                post.id
            )));
        }
        posts.insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Post, RepoError> {
        self.posts
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }
}

#[derive(Default)]
struct Graph {
    following: HashMap<String, HashSet<String>>,
    followers: HashMap<String, HashSet<String>>,
}

/// Follow edges, stored once per direction.
#[derive(Default)]
pub struct InMemorySocialGraph {
    graph: RwLock<Graph>,
}

impl InMemorySocialGraph {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SocialGraphStore for InMemorySocialGraph {
    async fn follow(&self, edge: &FollowEdge) -> Result<(), RepoError> {
        let mut graph = self.graph.write().await;
        graph
            .following
            .entry(edge.follower_id.clone())
            .or_default()
            .insert(edge.followee_id.clone());
        graph
            .followers
            .entry(edge.followee_id.clone())
            .or_default()
            .insert(edge.follower_id.clone());
        Ok(())
    }

    async fn list_followees(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
        let graph = self.graph.read().await;
        Ok(graph
            .following
            .get(user_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_followers(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
        let graph = self.graph.read().await;
        Ok(graph
            .followers
            .get(user_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }
}

/// Per-user append-only lists of post ids.
#[derive(Default)]
pub struct InMemoryTimelineIndex {
    lists: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryTimelineIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimelineIndex for InMemoryTimelineIndex {
    async fn append(&self, user_id: &str, post_id: &str) -> Result<(), RepoError> {
        self.lists
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(post_id.to_string());
        Ok(())
    }

    async fn list_ids(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
        Ok(self
            .lists
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
