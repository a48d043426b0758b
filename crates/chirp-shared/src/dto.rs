//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to publish a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostTweetRequest {
    pub user_id: String,
    pub body: String,
}

/// Response after a post was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostTweetResponse {
    pub message: String,
    pub tweet_id: String,
}

/// Request to follow another user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowRequest {
    pub follower_id: String,
    pub followee_id: String,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// A single post as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetResponse {
    pub tweet_id: String,
    pub user_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A user's feed, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub user_id: String,
    pub tweets: Vec<TweetResponse>,
}

/// Users followed by `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowingResponse {
    pub user_id: String,
    pub following: Vec<String>,
}

/// Users following `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowersResponse {
    pub user_id: String,
    pub followers: Vec<String>,
}
