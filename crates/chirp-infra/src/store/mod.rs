//! Durable store implementations - tweets, social graph, timeline index.

mod memory;

pub use memory::{InMemorySocialGraph, InMemoryTimelineIndex, InMemoryTweetStore};

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisSocialGraph, RedisTimelineIndex, RedisTweetStore};
