//! In-memory cache implementation - used as fallback when Redis is unavailable.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use chirp_core::ports::{Cache, CacheError};

/// Default number of entries held before the least recently used is evicted.
pub const DEFAULT_CAPACITY: usize = 10_000;

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
    last_used: u64,
    written: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map(|exp| now >= exp).unwrap_or(false)
    }
}

/// Entries plus two ordered indexes over them, kept in step by
/// `insert` and `remove`.
#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Last-use tick to key, least recently used first.
    recency: BTreeMap<u64, String>,
    /// (deadline, write tick) to key, soonest expiry first.
    deadlines: BTreeMap<(Instant, u64), String>,
    clock: u64,
}

impl CacheState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn insert(&mut self, key: String, value: String, expires_at: Option<Instant>) {
        self.remove(&key);

        let tick = self.tick();
        self.recency.insert(tick, key.clone());
        if let Some(deadline) = expires_at {
            self.deadlines.insert((deadline, tick), key.clone());
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at,
                last_used: tick,
                written: tick,
            },
        );
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.recency.remove(&entry.last_used);
        if let Some(deadline) = entry.expires_at {
            self.deadlines.remove(&(deadline, entry.written));
        }
        Some(entry)
    }

    /// Mark `key` as most recently used and return its value.
    fn touch(&mut self, key: &str) -> Option<String> {
        let tick = self.tick();
        let entry = self.entries.get_mut(key)?;
        let previous = std::mem::replace(&mut entry.last_used, tick);
        let value = entry.value.clone();

        self.recency.remove(&previous);
        self.recency.insert(tick, key.to_string());
        Some(value)
    }

    fn purge_expired(&mut self, now: Instant) {
        while let Some((&(deadline, _), _)) = self.deadlines.first_key_value() {
            if deadline > now {
                break;
            }
            if let Some((_, key)) = self.deadlines.pop_first() {
                self.remove(&key);
            }
        }
    }

    /// Make room for one more entry: drop expired entries first, then the
    /// least recently used ones.
    fn make_room(&mut self, capacity: usize) {
        if self.entries.len() < capacity {
            return;
        }

        self.purge_expired(Instant::now());

        while self.entries.len() >= capacity {
            let Some((_, key)) = self.recency.pop_first() else {
                break;
            };
            tracing::debug!(key = %key, "Evicting least recently used cache entry");
            self.remove(&key);
        }
    }
}

/// In-memory cache with per-entry TTL and LRU eviction at a fixed capacity.
///
/// This is the fallback implementation when Redis is not available.
/// Note: Data is lost on process restart.
pub struct InMemoryCache {
    state: RwLock<CacheState>,
    capacity: usize,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a cache that holds at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            capacity: capacity.max(1),
        }
    }

    /// Create from environment configuration (`CACHE_CAPACITY`).
    pub fn from_env() -> Self {
        Self::with_capacity(
            std::env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
        )
    }

    /// Number of live and not-yet-collected entries.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // Reads update recency, so they take the write lock.
        let mut state = self.state.write().await;

        let expired = match state.entries.get(key) {
            Some(entry) => entry.is_expired(Instant::now()),
            None => return Ok(None),
        };

        if expired {
            state.remove(key);
            return Ok(None);
        }

        Ok(state.touch(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut state = self.state.write().await;

        if !state.entries.contains_key(key) {
            state.make_room(self.capacity);
        }

        state.insert(
            key.to_string(),
            value.to_string(),
            ttl.map(|d| Instant::now() + d),
        );

        Ok(())
    }
}
