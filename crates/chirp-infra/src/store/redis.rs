//! Redis-backed durable stores.
//!
//! Key layout:
//! - `tweet:{id}` - post as JSON, written with `SET NX`
//! - `user:timeline:{user}` - list of authored post ids (`RPUSH`)
//! - `user:following:{user}` / `user:followers:{user}` - follow sets

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};

use chirp_core::domain::{FollowEdge, Post};
use chirp_core::error::RepoError;
use chirp_core::ports::{SocialGraphStore, TimelineIndex, TweetStore};

fn store_error(e: RedisError) -> RepoError {
    if e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout() {
        RepoError::Connection(e.to_string())
    } else {
        RepoError::Query(e.to_string())
    }
}

fn tweet_key(id: &str) -> String {
    format!("tweet:{id}")
}

fn timeline_key(user_id: &str) -> String {
    format!("user:timeline:{user_id}")
}

fn following_key(user_id: &str) -> String {
    format!("user:following:{user_id}")
}

fn followers_key(user_id: &str) -> String {
    format!("user:followers:{user_id}")
}

/// Posts stored as JSON documents.
pub struct RedisTweetStore {
    conn: ConnectionManager,
}

impl RedisTweetStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl TweetStore for RedisTweetStore {
    async fn put(&self, post: &Post) -> Result<(), RepoError> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(post).map_err(|e| RepoError::Query(e.to_string()))?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(tweet_key(&post.id))
            .arg(json)
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;

        match reply {
            Some(_) => Ok(()),
            None => Err(RepoError::Constraint(format!(
                "post {} already exists",
                post.id
            ))),
        }
    }

    async fn get(&self, id: &str) -> Result<Post, RepoError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(tweet_key(id)).await.map_err(store_error)?;
        let raw = raw.ok_or(RepoError::NotFound)?;

        serde_json::from_str(&raw).map_err(|e| RepoError::Decode(format!("tweet:{id}: {e}")))
    }
}

/// Follow edges as a pair of sets per user.
pub struct RedisSocialGraph {
    conn: ConnectionManager,
}

impl RedisSocialGraph {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SocialGraphStore for RedisSocialGraph {
    async fn follow(&self, edge: &FollowEdge) -> Result<(), RepoError> {
        let mut conn = self.conn.clone();

        // MULTI/EXEC so both directions land together.
        let _: () = redis::pipe()
            .atomic()
            .sadd(following_key(&edge.follower_id), &edge.followee_id)
            .ignore()
            .sadd(followers_key(&edge.followee_id), &edge.follower_id)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;

        Ok(())
    }

    async fn list_followees(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
        let mut conn = self.conn.clone();
        conn.smembers(following_key(user_id))
            .await
            .map_err(store_error)
    }

    async fn list_followers(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
        let mut conn = self.conn.clone();
        conn.smembers(followers_key(user_id))
            .await
            .map_err(store_error)
    }
}

/// Per-user lists of authored post ids.
pub struct RedisTimelineIndex {
    conn: ConnectionManager,
}

impl RedisTimelineIndex {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl TimelineIndex for RedisTimelineIndex {
    async fn append(&self, user_id: &str, post_id: &str) -> Result<(), RepoError> {
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(timeline_key(user_id), post_id)
            .await
            .map_err(store_error)
    }

    async fn list_ids(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
        let mut conn = self.conn.clone();
        conn.lrange(timeline_key(user_id), 0, -1)
            .await
            .map_err(store_error)
    }
}
