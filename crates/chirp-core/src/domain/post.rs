use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a short message authored by a user. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post from a freshly issued stamp.
    pub fn new(stamp: PostStamp, author_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: stamp.id,
            author_id: author_id.into(),
            body: body.into(),
            created_at: stamp.created_at,
        }
    }
}

/// Identity and creation time issued together for a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostStamp {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Issues post ids from a strictly increasing microsecond clock.
///
/// The id is the timestamp rendered as a zero-padded decimal string, so
/// comparing two ids lexicographically gives the same answer as comparing
/// their creation times. Microseconds match the precision of the SQL
/// backend, so a stored post reads back identical to the one written.
#[derive(Debug, Default)]
pub struct PostIdGenerator {
    last: AtomicI64,
}

impl PostIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next stamp. Never returns the same value twice per generator.
    pub fn next_stamp(&self) -> PostStamp {
        let now = Utc::now().timestamp_micros();
        let mut prev = self.last.load(Ordering::Relaxed);
        let micros = loop {
            let candidate = now.max(prev.saturating_add(1));
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break candidate,
                Err(actual) => prev = actual,
            }
        };

        PostStamp {
            id: format!("{micros:020}"),
            created_at: DateTime::from_timestamp_micros(micros).unwrap_or_default(),
        }
    }
}

/// Feed ordering: newest `created_at` first, ties broken by id descending.
pub fn timeline_order(a: &Post, b: &Post) -> CmpOrdering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Sort posts into feed order in place.
pub fn sort_timeline(posts: &mut [Post]) {
    posts.sort_by(timeline_order);
}
