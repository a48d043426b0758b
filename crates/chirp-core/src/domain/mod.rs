//! Domain entities - the core business objects.

mod follow;
mod post;

pub use follow::{FollowEdge, validate_user_id};
pub use post::{Post, PostIdGenerator, PostStamp, sort_timeline, timeline_order};
