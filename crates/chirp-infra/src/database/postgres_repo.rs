//! PostgreSQL durable store implementations.
//!
//! The three stores share one pool through `Arc<DbConn>`.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};

use chirp_core::domain::{FollowEdge, Post};
use chirp_core::error::RepoError;
use chirp_core::ports::{SocialGraphStore, TimelineIndex, TweetStore};

use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::timeline_entry::{self, Entity as TimelineEntryEntity};

fn store_error(e: DbErr) -> RepoError {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(e.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("duplicate") || msg.contains("unique") {
                RepoError::Constraint(msg)
            } else {
                RepoError::Query(msg)
            }
        }
    }
}

/// PostgreSQL post store.
pub struct PostgresTweetStore {
    db: Arc<DbConn>,
}

impl PostgresTweetStore {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TweetStore for PostgresTweetStore {
    async fn put(&self, post: &Post) -> Result<(), RepoError> {
        let model: post::ActiveModel = post.clone().into();
        PostEntity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Post, RepoError> {
        let result = PostEntity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await
            .map_err(store_error)?;

        result.map(Into::into).ok_or(RepoError::NotFound)
    }
}

/// PostgreSQL social graph: one row per edge, queried from either end.
pub struct PostgresSocialGraph {
    db: Arc<DbConn>,
}

impl PostgresSocialGraph {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SocialGraphStore for PostgresSocialGraph {
    async fn follow(&self, edge: &FollowEdge) -> Result<(), RepoError> {
        let model: follow::ActiveModel = edge.into();
        FollowEntity::insert(model)
            .on_conflict(
                OnConflict::columns([follow::Column::FollowerId, follow::Column::FolloweeId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn list_followees(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
        let rows = FollowEntity::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().map(|row| row.followee_id).collect())
    }

    async fn list_followers(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
        let rows = FollowEntity::find()
            .filter(follow::Column::FolloweeId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().map(|row| row.follower_id).collect())
    }
}

/// PostgreSQL timeline index ordered by insertion sequence.
pub struct PostgresTimelineIndex {
    db: Arc<DbConn>,
}

impl PostgresTimelineIndex {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TimelineIndex for PostgresTimelineIndex {
    async fn append(&self, user_id: &str, post_id: &str) -> Result<(), RepoError> {
        let entry = timeline_entry::ActiveModel {
            seq: NotSet,
            user_id: Set(user_id.to_string()),
            post_id: Set(post_id.to_string()),
        };

        TimelineEntryEntity::insert(entry)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn list_ids(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
        let rows = TimelineEntryEntity::find()
            .filter(timeline_entry::Column::UserId.eq(user_id))
            .order_by_asc(timeline_entry::Column::Seq)
            .all(self.db.as_ref())
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().map(|row| row.post_id).collect())
    }
}
