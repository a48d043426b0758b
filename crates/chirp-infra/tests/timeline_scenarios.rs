//! End-to-end behaviour of the timeline core over the in-memory adapters.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use chirp_core::domain::{FollowEdge, Post, timeline_order};
use chirp_core::error::RepoError;
use chirp_core::ports::{
    Cache, CacheError, SocialGraphStore, TimelineIndex, TweetStore,
};
use chirp_core::{DomainError, Stores, TimelineConfig, TimelineService};
use chirp_infra::{InMemoryCache, InMemorySocialGraph, InMemoryTimelineIndex, InMemoryTweetStore};

struct Harness {
    service: TimelineService,
    index: Arc<InMemoryTimelineIndex>,
}

fn harness_with(
    tweets: Arc<dyn TweetStore>,
    graph: Arc<dyn SocialGraphStore>,
    cache: Arc<dyn Cache>,
    config: TimelineConfig,
) -> Harness {
    let index = Arc::new(InMemoryTimelineIndex::new());
    let stores = Stores {
        tweets,
        graph,
        index: index.clone(),
    };

    Harness {
        service: TimelineService::new(stores, cache, config),
        index,
    }
}

fn harness() -> Harness {
    harness_with(
        Arc::new(InMemoryTweetStore::new()),
        Arc::new(InMemorySocialGraph::new()),
        Arc::new(InMemoryCache::new()),
        TimelineConfig::default(),
    )
}

fn assert_feed_order(posts: &[Post]) {
    for pair in posts.windows(2) {
        assert_eq!(
            timeline_order(&pair[0], &pair[1]),
            std::cmp::Ordering::Less,
            "{:?} should precede {:?}",
            pair[0].id,
            pair[1].id
        );
    }
}

fn bodies(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.body.as_str()).collect()
}

/// Tweet store that refuses to serve selected ids.
struct LossyTweetStore {
    inner: InMemoryTweetStore,
    unreadable: std::sync::Mutex<HashSet<String>>,
}

impl LossyTweetStore {
    fn new() -> Self {
        Self {
            inner: InMemoryTweetStore::new(),
            unreadable: std::sync::Mutex::new(HashSet::new()),
        }
    }

    fn break_post(&self, id: &str) {
        self.unreadable.lock().unwrap().insert(id.to_string());
    }
}

#[async_trait]
impl TweetStore for LossyTweetStore {
    async fn put(&self, post: &Post) -> Result<(), RepoError> {
        self.inner.put(post).await
    }

    async fn get(&self, id: &str) -> Result<Post, RepoError> {
        if self.unreadable.lock().unwrap().contains(id) {
            return Err(RepoError::Connection("shard offline".to_string()));
        }
        self.inner.get(id).await
    }
}

/// Tweet store whose writes always fail.
struct ReadOnlyTweetStore;

#[async_trait]
impl TweetStore for ReadOnlyTweetStore {
    async fn put(&self, _post: &Post) -> Result<(), RepoError> {
        Err(RepoError::Connection("store unreachable".to_string()))
    }

    async fn get(&self, _id: &str) -> Result<Post, RepoError> {
        Err(RepoError::NotFound)
    }
}

/// Social graph that cannot be reached.
struct UnreachableGraph;

#[async_trait]
impl SocialGraphStore for UnreachableGraph {
    async fn follow(&self, _edge: &FollowEdge) -> Result<(), RepoError> {
        Err(RepoError::Connection("graph unreachable".to_string()))
    }

    async fn list_followees(&self, _user_id: &str) -> Result<Vec<String>, RepoError> {
        Err(RepoError::Connection("graph unreachable".to_string()))
    }

    async fn list_followers(&self, _user_id: &str) -> Result<Vec<String>, RepoError> {
        Err(RepoError::Connection("graph unreachable".to_string()))
    }
}

/// Cache backend that is always down.
struct UnreachableCache;

#[async_trait]
impl Cache for UnreachableCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Connection("cache unreachable".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> Result<(), CacheError> {
        Err(CacheError::Connection("cache unreachable".to_string()))
    }
}

/// Cache that keeps serving reads but rejects writes once frozen.
struct FreezableCache {
    inner: InMemoryCache,
    frozen: AtomicBool,
}

impl FreezableCache {
    fn new() -> Self {
        Self {
            inner: InMemoryCache::new(),
            frozen: AtomicBool::new(false),
        }
    }

    fn freeze(&self) {
        self.frozen.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Cache for FreezableCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        if self.frozen.load(Ordering::SeqCst) {
            return Err(CacheError::Operation("READONLY replica".to_string()));
        }
        self.inner.set(key, value, ttl).await
    }
}

#[tokio::test]
async fn posted_content_is_retrievable_unchanged() {
    let h = harness();

    let body = "Ünïcödé and emoji 🐦 survive storage";
    let id = h.service.post("u1", body).await.unwrap();
    let post = h.service.get_post(&id).await.unwrap();

    assert_eq!(post.id, id);
    assert_eq!(post.author_id, "u1");
    assert_eq!(post.body, body);
    assert_eq!(h.index.list_ids("u1").await.unwrap(), vec![id]);
}

#[tokio::test]
async fn unknown_post_is_not_found() {
    let h = harness();
    assert!(matches!(
        h.service.get_post("00000000000000000001").await,
        Err(DomainError::NotFound { entity_type: "post", .. })
    ));
}

#[tokio::test]
async fn max_length_boundary() {
    let h = harness();

    let exactly = "a".repeat(280);
    assert!(h.service.post("u1", &exactly).await.is_ok());

    let over = "a".repeat(281);
    let err = h.service.post("u1", &over).await.unwrap_err();
    assert!(matches!(err, DomainError::PostTooLong { length: 281, max: 280 }));
    assert!(err.is_validation());
}

#[tokio::test]
async fn length_counts_characters_not_bytes() {
    let h = harness();
    assert!(h.service.post("u1", &"é".repeat(280)).await.is_ok());
    assert!(h.service.post("u1", &"é".repeat(281)).await.is_err());
}

#[tokio::test]
async fn rejected_post_writes_nothing() {
    let h = harness();

    h.service.post("u1", &"x".repeat(281)).await.unwrap_err();

    assert!(h.index.list_ids("u1").await.unwrap().is_empty());
    assert!(h.service.get_timeline("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn configured_limit_is_honoured() {
    let h = harness_with(
        Arc::new(InMemoryTweetStore::new()),
        Arc::new(InMemorySocialGraph::new()),
        Arc::new(InMemoryCache::new()),
        TimelineConfig {
            max_post_length: 5,
            ..TimelineConfig::default()
        },
    );

    assert!(h.service.post("u1", "hello").await.is_ok());
    assert!(h.service.post("u1", "hello!").await.is_err());
}

#[tokio::test]
async fn blank_author_is_rejected() {
    let h = harness();
    assert!(matches!(
        h.service.post("  ", "hi").await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn self_follow_always_fails() {
    let h = harness();
    for user in ["u1", "u2", "someone-else"] {
        assert!(matches!(
            h.service.follow(user, user).await,
            Err(DomainError::SelfFollow(_))
        ));
        assert!(h.service.list_followees(user).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn follow_is_idempotent() {
    let h = harness();

    h.service.follow("u1", "u2").await.unwrap();
    let once = (
        h.service.list_followees("u1").await.unwrap(),
        h.service.list_followers("u2").await.unwrap(),
    );

    h.service.follow("u1", "u2").await.unwrap();
    let twice = (
        h.service.list_followees("u1").await.unwrap(),
        h.service.list_followers("u2").await.unwrap(),
    );

    assert_eq!(once, twice);
    assert_eq!(twice.0, vec!["u2"]);
    assert_eq!(twice.1, vec!["u1"]);
}

#[tokio::test]
async fn followee_posts_appear_newest_first() {
    let h = harness();

    h.service.post("u2", "Hello World").await.unwrap();
    h.service.post("u2", "Another tweet").await.unwrap();
    h.service.post("u3", "not followed").await.unwrap();
    h.service.follow("u1", "u2").await.unwrap();

    let timeline = h.service.get_timeline("u1").await.unwrap();

    assert_eq!(bodies(&timeline), vec!["Another tweet", "Hello World"]);
    assert_feed_order(&timeline);
}

#[tokio::test]
async fn empty_graph_gives_empty_timeline() {
    let h = harness();
    assert!(h.service.get_timeline("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn own_posts_are_included() {
    let h = harness();

    h.service.follow("u1", "u2").await.unwrap();
    h.service.post("u2", "theirs").await.unwrap();
    h.service.post("u1", "mine").await.unwrap();

    let timeline = h.service.get_timeline("u1").await.unwrap();
    assert_eq!(bodies(&timeline), vec!["mine", "theirs"]);
}

#[tokio::test]
async fn interleaved_authors_merge_by_recency() {
    let h = harness();

    for followee in ["u2", "u3", "u4"] {
        h.service.follow("u1", followee).await.unwrap();
    }

    let mut expected = Vec::new();
    for round in 0..5 {
        for author in ["u3", "u1", "u4", "u2"] {
            let body = format!("{author}-{round}");
            h.service.post(author, &body).await.unwrap();
            expected.push(body);
        }
    }
    expected.reverse();

    let fresh = h.service.get_timeline("u1").await.unwrap();
    assert_feed_order(&fresh);
    assert_eq!(bodies(&fresh), expected);

    let cached = h.service.get_timeline("u1").await.unwrap();
    assert_feed_order(&cached);
}

#[tokio::test]
async fn cached_read_matches_aggregated_read() {
    let h = harness();

    h.service.follow("u1", "u2").await.unwrap();
    h.service.post("u2", "one").await.unwrap();
    h.service.post("u1", "two").await.unwrap();
    h.service.post("u2", "three").await.unwrap();

    let aggregated = h.service.get_timeline("u1").await.unwrap();
    let from_cache = h.service.get_timeline("u1").await.unwrap();

    assert_eq!(aggregated, from_cache);
}

#[tokio::test]
async fn follower_cache_stays_stale_until_ttl() {
    let ttl = Duration::from_millis(100);
    let h = harness_with(
        Arc::new(InMemoryTweetStore::new()),
        Arc::new(InMemorySocialGraph::new()),
        Arc::new(InMemoryCache::new()),
        TimelineConfig {
            cache_ttl: ttl,
            ..TimelineConfig::default()
        },
    );

    h.service.follow("u1", "u2").await.unwrap();
    assert!(h.service.get_timeline("u1").await.unwrap().is_empty());

    h.service.post("u2", "Hello World").await.unwrap();

    // Within the TTL the follower still sees the cached, empty feed.
    // This is the accepted staleness of write-through without fan-out.
    let within_ttl = h.service.get_timeline("u1").await.unwrap();
    assert!(within_ttl.is_empty());

    tokio::time::sleep(ttl * 3).await;

    let after_ttl = h.service.get_timeline("u1").await.unwrap();
    assert_eq!(bodies(&after_ttl), vec!["Hello World"]);
}

#[tokio::test]
async fn author_cache_is_refreshed_on_post() {
    let h = harness();

    h.service.post("u1", "first").await.unwrap();
    assert_eq!(bodies(&h.service.get_timeline("u1").await.unwrap()), vec!["first"]);

    h.service.post("u1", "second").await.unwrap();

    let timeline = h.service.get_timeline("u1").await.unwrap();
    assert_eq!(bodies(&timeline), vec!["second", "first"]);
}

#[tokio::test]
async fn unreadable_posts_are_skipped() {
    let tweets = Arc::new(LossyTweetStore::new());
    let h = harness_with(
        tweets.clone(),
        Arc::new(InMemorySocialGraph::new()),
        Arc::new(InMemoryCache::new()),
        TimelineConfig::default(),
    );

    h.service.follow("u1", "u2").await.unwrap();
    h.service.post("u2", "kept").await.unwrap();
    let lost = h.service.post("u2", "lost").await.unwrap();
    h.service.post("u2", "also kept").await.unwrap();
    tweets.break_post(&lost);

    let timeline = h.service.get_timeline("u1").await.unwrap();
    assert_eq!(bodies(&timeline), vec!["also kept", "kept"]);
}

#[tokio::test]
async fn unreachable_cache_degrades_to_misses() {
    let h = harness_with(
        Arc::new(InMemoryTweetStore::new()),
        Arc::new(InMemorySocialGraph::new()),
        Arc::new(UnreachableCache),
        TimelineConfig::default(),
    );

    h.service.follow("u1", "u2").await.unwrap();
    h.service.post("u2", "still works").await.unwrap();

    for _ in 0..2 {
        let timeline = h.service.get_timeline("u1").await.unwrap();
        assert_eq!(bodies(&timeline), vec!["still works"]);
    }
}

#[tokio::test]
async fn failed_cache_write_through_does_not_fail_the_post() {
    let cache = Arc::new(FreezableCache::new());
    let h = harness_with(
        Arc::new(InMemoryTweetStore::new()),
        Arc::new(InMemorySocialGraph::new()),
        cache.clone(),
        TimelineConfig::default(),
    );

    h.service.post("u1", "first").await.unwrap();
    assert_eq!(bodies(&h.service.get_timeline("u1").await.unwrap()), vec!["first"]);

    cache.freeze();
    let id = h.service.post("u1", "second").await.unwrap();

    assert_eq!(h.service.get_post(&id).await.unwrap().body, "second");
    assert_eq!(h.index.list_ids("u1").await.unwrap().len(), 2);

    // The cached entry could not be refreshed, so it still holds the old feed.
    assert_eq!(bodies(&h.service.get_timeline("u1").await.unwrap()), vec!["first"]);
}

#[tokio::test]
async fn failed_store_write_is_surfaced_and_not_indexed() {
    let h = harness_with(
        Arc::new(ReadOnlyTweetStore),
        Arc::new(InMemorySocialGraph::new()),
        Arc::new(InMemoryCache::new()),
        TimelineConfig::default(),
    );

    let err = h.service.post("u1", "hi").await.unwrap_err();

    assert!(matches!(err, DomainError::StoreUnavailable(_)));
    assert!(h.index.list_ids("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_graph_fails_the_read() {
    let h = harness_with(
        Arc::new(InMemoryTweetStore::new()),
        Arc::new(UnreachableGraph),
        Arc::new(InMemoryCache::new()),
        TimelineConfig::default(),
    );

    assert!(matches!(
        h.service.get_timeline("u1").await,
        Err(DomainError::StoreUnavailable(_))
    ));
    assert!(matches!(
        h.service.follow("u1", "u2").await,
        Err(DomainError::StoreUnavailable(_))
    ));
}

#[tokio::test]
async fn concurrent_posts_get_distinct_ordered_ids() {
    let h = Arc::new(harness());
    h.service.follow("reader", "a").await.unwrap();
    h.service.follow("reader", "b").await.unwrap();

    let mut tasks = Vec::new();
    for author in ["a", "b"] {
        for n in 0..25 {
            let h = h.clone();
            tasks.push(tokio::spawn(async move {
                h.service.post(author, &format!("{author}{n}")).await
            }));
        }
    }

    let mut ids = HashSet::new();
    for task in tasks {
        ids.insert(task.await.unwrap().unwrap());
    }
    assert_eq!(ids.len(), 50);

    let timeline = h.service.get_timeline("reader").await.unwrap();
    assert_eq!(timeline.len(), 50);
    assert_feed_order(&timeline);
}
