//! # Chirp Core
//!
//! The domain layer of the Chirp timeline backend.
//! This crate holds the post/follow model, the storage ports, and the
//! write and read paths that keep a user's feed assembled and cached.
//! It has zero infrastructure dependencies: every store is injected.

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use config::TimelineConfig;
pub use error::DomainError;
pub use services::{Stores, TimelineService};
