//! Follow edge entity for SeaORM.
//!
//! One row per edge; the composite key makes re-following a no-op and the
//! `followee_id` index serves the reverse (followers) lookup.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub follower_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub followee_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&chirp_core::domain::FollowEdge> for ActiveModel {
    fn from(edge: &chirp_core::domain::FollowEdge) -> Self {
        Self {
            follower_id: Set(edge.follower_id.clone()),
            followee_id: Set(edge.followee_id.clone()),
        }
    }
}
