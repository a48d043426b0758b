//! SeaORM entities for the three durable collections.

pub mod follow;
pub mod post;
pub mod timeline_entry;
