use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A directed follow relationship: `follower_id` follows `followee_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowEdge {
    pub follower_id: String,
    pub followee_id: String,
}

impl FollowEdge {
    /// Build an edge, rejecting empty ids and self-follows.
    pub fn new(
        follower_id: impl Into<String>,
        followee_id: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let follower_id = follower_id.into();
        let followee_id = followee_id.into();

        validate_user_id(&follower_id)?;
        validate_user_id(&followee_id)?;

        if follower_id == followee_id {
            return Err(DomainError::SelfFollow(follower_id));
        }

        Ok(Self {
            follower_id,
            followee_id,
        })
    }
}

/// User ids are opaque but must not be blank.
pub fn validate_user_id(user_id: &str) -> Result<(), DomainError> {
    if user_id.trim().is_empty() {
        return Err(DomainError::Validation("user id is required".to_string()));
    }
    Ok(())
}
