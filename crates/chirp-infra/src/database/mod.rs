//! Database connection management and the PostgreSQL durable stores.

mod connections;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

pub use connections::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresSocialGraph, PostgresTimelineIndex, PostgresTweetStore};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
