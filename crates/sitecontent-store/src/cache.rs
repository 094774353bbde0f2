//! Read-through cache over a [`DocumentClient`].
//!
//! One slot per path holds the last completed read and, while a read is
//! running, a shared handle to it. Callers arriving during a read join it
//! instead of issuing their own. Each read is tagged with a per-path
//! sequence number; a completion only lands in the slot if no newer read
//! has landed and the slot has not been invalidated since it started.
//! Failed reads are never cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use sitecontent_core::{ItemGroup, ItemParent, LoadState, Query, attach_groups};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{DocumentClient, FetchError, StoreError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// When set, replaces every query's own staleness window.
    pub stale_time_override: Option<Duration>,
}

impl CacheConfig {
    fn effective(&self, requested: Duration) -> Duration {
        self.stale_time_override.unwrap_or(requested)
    }
}

/// A completed read.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub path: String,
    pub fetched_at: Instant,
    /// `None` when the store held nothing at the path.
    pub raw: Option<Value>,
    pub seq: u64,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, stale_time: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) <= stale_time
    }
}

type FetchResult = Result<Option<Value>, FetchError>;
type InFlight = Shared<BoxFuture<'static, FetchResult>>;

#[derive(Default)]
struct Slot {
    entry: Option<CacheEntry>,
    in_flight: Option<(u64, InFlight)>,
    next_seq: u64,
    /// Reads with a sequence at or below this started before the last
    /// invalidation.
    floor: u64,
}

struct Inner {
    client: Arc<dyn DocumentClient>,
    slots: Mutex<HashMap<String, Slot>>,
    remote_reads: AtomicU64,
}

impl Inner {
    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Shared, cloneable read cache. Create one per session and pass it to
/// whatever needs content.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
    config: CacheConfig,
}

impl QueryCache {
    pub fn new(client: Arc<dyn DocumentClient>) -> Self {
        Self::with_config(client, CacheConfig::default())
    }

    pub fn with_config(client: Arc<dyn DocumentClient>, config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                slots: Mutex::new(HashMap::new()),
                remote_reads: AtomicU64::new(0),
            }),
            config,
        }
    }

    pub fn client(&self) -> &Arc<dyn DocumentClient> {
        &self.inner.client
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Read `path`, from cache if the last read is at most `stale_time` old.
    pub async fn fetch(&self, path: &str, stale_time: Duration) -> FetchResult {
        let stale_time = self.config.effective(stale_time);
        let pending = {
            let mut slots = self.inner.slots();
            let slot = slots.entry(path.to_string()).or_default();

            if let Some(entry) = &slot.entry
                && entry.is_fresh(Instant::now(), stale_time)
            {
                debug!(path, "cache hit");
                return Ok(entry.raw.clone());
            }

            match &slot.in_flight {
                Some((seq, in_flight)) => {
                    debug!(path, seq, "joining in-flight read");
                    in_flight.clone()
                }
                None => {
                    slot.next_seq += 1;
                    let seq = slot.next_seq;
                    let in_flight =
                        run_read(Arc::downgrade(&self.inner), path.to_string(), seq)
                            .boxed()
                            .shared();
                    slot.in_flight = Some((seq, in_flight.clone()));
                    in_flight
                }
            }
        };
        pending.await
    }

    /// Fetch and normalize one section.
    pub async fn load<T: 'static>(&self, query: &Query<T>) -> Result<T, FetchError> {
        let raw = self.fetch(query.path(), query.stale_time()).await?;
        Ok(query.normalize(raw.as_ref()))
    }

    /// Load a list section and its side table together, then merge the
    /// side table's non-empty groups over the inline sub-items.
    pub async fn load_with_items<R: ItemParent + 'static>(
        &self,
        parents: &Query<Vec<R>>,
        groups: &Query<Vec<ItemGroup>>,
    ) -> Result<Vec<R>, FetchError> {
        let (mut records, groups) = futures::try_join!(self.load(parents), self.load(groups))?;
        attach_groups(&mut records, &groups);
        Ok(records)
    }

    /// [`load`](Self::load), folded into a [`LoadState`].
    pub async fn load_state<T: 'static>(&self, query: &Query<T>) -> LoadState<T> {
        self.load(query).await.into()
    }

    /// Drop the cached read for `path`. A read already running for it will
    /// still answer its callers but will not repopulate the slot.
    pub fn invalidate(&self, path: &str) {
        let mut slots = self.inner.slots();
        if let Some(slot) = slots.get_mut(path) {
            invalidate_slot(slot);
            debug!(path, "invalidated");
        }
    }

    /// Invalidate every cached path equal to or nested under `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        let prefix = prefix.trim_end_matches('/');
        let mut slots = self.inner.slots();
        let mut count = 0usize;
        for (path, slot) in slots.iter_mut() {
            let nested = path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
            if nested {
                invalidate_slot(slot);
                count += 1;
            }
        }
        debug!(prefix, count, "invalidated prefix");
    }

    /// The last completed read for `path`, fresh or not.
    pub fn peek(&self, path: &str) -> Option<CacheEntry> {
        self.inner.slots().get(path).and_then(|s| s.entry.clone())
    }

    /// Number of paths with a completed read.
    pub fn len(&self) -> usize {
        self.inner
            .slots()
            .values()
            .filter(|s| s.entry.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads issued against the remote client so far.
    pub fn remote_reads(&self) -> u64 {
        self.inner.remote_reads.load(Ordering::Relaxed)
    }
}

fn invalidate_slot(slot: &mut Slot) {
    slot.entry = None;
    slot.in_flight = None;
    slot.floor = slot.next_seq;
}

/// The slot map is reached through a `Weak` so a read nobody drives any
/// more does not keep the cache alive.
async fn run_read(inner: Weak<Inner>, path: String, seq: u64) -> FetchResult {
    let Some(client) = inner.upgrade().map(|inner| {
        inner.remote_reads.fetch_add(1, Ordering::Relaxed);
        Arc::clone(&inner.client)
    }) else {
        return Err(FetchError {
            path,
            source: Arc::new(StoreError::Other("cache dropped".into())),
        });
    };

    info!(path = %path, seq, "remote read");
    let result = client.get(&path).await;
    if let Some(inner) = inner.upgrade() {
        complete_read(&inner, &path, seq, &result);
    }

    result.map_err(|e| {
        warn!(path = %path, seq, error = %e, "remote read failed");
        FetchError {
            path,
            source: Arc::new(e),
        }
    })
}

/// Clear the in-flight marker and store a successful result unless a newer
/// read or an invalidation has overtaken it.
fn complete_read(
    inner: &Inner,
    path: &str,
    seq: u64,
    result: &Result<Option<Value>, StoreError>,
) {
    let mut slots = inner.slots();
    let slot = slots.entry(path.to_string()).or_default();
    if slot.in_flight.as_ref().is_some_and(|(s, _)| *s == seq) {
        slot.in_flight = None;
    }

    let Ok(raw) = result else {
        return;
    };
    let superseded = seq <= slot.floor || slot.entry.as_ref().is_some_and(|e| e.seq > seq);
    if superseded {
        debug!(path, seq, "discarding superseded read");
        return;
    }
    slot.entry = Some(CacheEntry {
        path: path.to_string(),
        fetched_at: Instant::now(),
        raw: raw.clone(),
        seq,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryDocumentClient, StoreError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::{Notify, oneshot};

    fn memory(root: Value) -> Arc<dyn DocumentClient> {
        Arc::new(MemoryDocumentClient::with_root(root))
    }

    /// Blocks every read until released.
    struct GatedClient {
        tree: MemoryDocumentClient,
        gate: Notify,
    }

    #[async_trait]
    impl DocumentClient for GatedClient {
        async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
            self.gate.notified().await;
            self.tree.get(path).await
        }

        async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
            self.tree.set(path, value).await
        }
    }

    /// Fails the first `failures` reads.
    struct FlakyClient {
        tree: MemoryDocumentClient,
        failures: AtomicUsize,
    }

    #[async_trait]
    impl DocumentClient for FlakyClient {
        async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err(StoreError::Other("permission denied".into()));
            }
            self.tree.get(path).await
        }

        async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
            self.tree.set(path, value).await
        }
    }

    /// Each read waits for the next scripted answer.
    struct ScriptedClient {
        answers: std::sync::Mutex<VecDeque<oneshot::Receiver<Option<Value>>>>,
        started: AtomicUsize,
    }

    #[async_trait]
    impl DocumentClient for ScriptedClient {
        async fn get(&self, _path: &str) -> Result<Option<Value>, StoreError> {
            let answer = self.answers.lock().unwrap().pop_front().unwrap();
            self.started.fetch_add(1, Ordering::SeqCst);
            answer
                .await
                .map_err(|_| StoreError::Other("script dropped".into()))
        }

        async fn set(&self, _path: &str, _value: Value) -> Result<(), StoreError> {
            Ok(())
        }
    }

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn fresh_reads_hit_cache() {
        let cache = QueryCache::new(memory(json!({ "siteContent": { "stats": { "s1": {} } } })));

        let first = cache.fetch("siteContent/stats", MINUTE).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        let second = cache.fetch("siteContent/stats", MINUTE).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.remote_reads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_reads_refetch() {
        let cache = QueryCache::new(memory(json!({})));

        cache.fetch("siteContent/stats", MINUTE).await.unwrap();
        tokio::time::advance(MINUTE).await;
        cache.fetch("siteContent/stats", MINUTE).await.unwrap();
        assert_eq!(cache.remote_reads(), 1, "exactly at the window is still fresh");

        tokio::time::advance(Duration::from_millis(1)).await;
        cache.fetch("siteContent/stats", MINUTE).await.unwrap();
        assert_eq!(cache.remote_reads(), 2);
    }

    #[tokio::test]
    async fn absent_values_are_cached() {
        let cache = QueryCache::new(memory(json!({})));
        assert_eq!(cache.fetch("siteContent/faculty", MINUTE).await.unwrap(), None);
        assert_eq!(cache.fetch("siteContent/faculty", MINUTE).await.unwrap(), None);
        assert_eq!(cache.remote_reads(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_reads_coalesce() {
        let client = Arc::new(GatedClient {
            tree: MemoryDocumentClient::with_root(json!({ "p": 1 })),
            gate: Notify::new(),
        });
        let cache = QueryCache::new(client.clone());

        let release = async {
            tokio::task::yield_now().await;
            client.gate.notify_one();
        };
        let (a, b, ()) = tokio::join!(cache.fetch("p", MINUTE), cache.fetch("p", MINUTE), release);

        assert_eq!(a.unwrap(), Some(json!(1)));
        assert_eq!(b.unwrap(), Some(json!(1)));
        assert_eq!(cache.remote_reads(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let client = Arc::new(FlakyClient {
            tree: MemoryDocumentClient::with_root(json!({ "p": "ok" })),
            failures: AtomicUsize::new(1),
        });
        let cache = QueryCache::new(client);

        let err = cache.fetch("p", MINUTE).await.unwrap_err();
        assert_eq!(err.path, "p");
        assert!(err.to_string().contains("permission denied"));
        assert!(cache.peek("p").is_none());

        assert_eq!(cache.fetch("p", MINUTE).await.unwrap(), Some(json!("ok")));
        assert_eq!(cache.remote_reads(), 2);
    }

    #[tokio::test]
    async fn superseded_read_does_not_overwrite() {
        let (old_tx, old_rx) = oneshot::channel();
        let (new_tx, new_rx) = oneshot::channel();
        let client = Arc::new(ScriptedClient {
            answers: std::sync::Mutex::new(VecDeque::from([old_rx, new_rx])),
            started: AtomicUsize::new(0),
        });
        let cache = QueryCache::new(client.clone());

        let c = cache.clone();
        let old = tokio::spawn(async move { c.fetch("p", MINUTE).await });
        while client.started.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }

        cache.invalidate("p");
        let c = cache.clone();
        let new = tokio::spawn(async move { c.fetch("p", MINUTE).await });
        while client.started.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        new_tx.send(Some(json!("new"))).unwrap();
        assert_eq!(new.await.unwrap().unwrap(), Some(json!("new")));

        old_tx.send(Some(json!("old"))).unwrap();
        assert_eq!(old.await.unwrap().unwrap(), Some(json!("old")));

        assert_eq!(cache.peek("p").unwrap().raw, Some(json!("new")));
    }

    #[tokio::test]
    async fn invalidate_prefix_matches_nested_paths_only() {
        let cache = QueryCache::new(memory(json!({})));
        for path in ["siteContent/heroes/home", "siteContent/heroes", "siteContent/heroesX"] {
            cache.fetch(path, MINUTE).await.unwrap();
        }
        cache.invalidate_prefix("siteContent/heroes/");
        assert!(cache.peek("siteContent/heroes/home").is_none());
        assert!(cache.peek("siteContent/heroes").is_none());
        assert!(cache.peek("siteContent/heroesX").is_some());
    }

    #[tokio::test]
    async fn stale_time_override_applies() {
        let config = CacheConfig {
            stale_time_override: Some(Duration::ZERO),
        };
        let cache = QueryCache::with_config(memory(json!({})), config);
        cache.fetch("p", MINUTE).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.fetch("p", MINUTE).await.unwrap();
        assert_eq!(cache.remote_reads(), 2);
    }

    #[tokio::test]
    async fn abandoned_read_does_not_keep_cache_alive() {
        let client = Arc::new(GatedClient {
            tree: MemoryDocumentClient::new(),
            gate: Notify::new(),
        });
        let cache = QueryCache::new(client);
        assert!(cache.fetch("p", MINUTE).now_or_never().is_none());

        let inner = Arc::downgrade(&cache.inner);
        drop(cache);
        assert!(inner.upgrade().is_none());
    }

    #[tokio::test]
    async fn load_with_items_merges_side_table() {
        let cache = QueryCache::new(memory(json!({ "siteContent": {
            "courses": {
                "c1": { "title": "Welding", "topics": ["inline"], "order": 1 },
                "c2": { "title": "Rigging", "topics": ["kept"], "order": 2 },
            },
            "courseTopics": {
                "c1": { "items": ["Safety", "Joints"] },
                "c2": [],
            },
        }})));

        let courses = cache
            .load_with_items(
                &sitecontent_core::query::courses(),
                &sitecontent_core::query::course_topics(),
            )
            .await
            .unwrap();
        assert_eq!(courses[0].topics, vec!["Safety", "Joints"]);
        assert_eq!(courses[1].topics, vec!["kept"]);
    }

    #[tokio::test]
    async fn load_normalizes() {
        let cache = QueryCache::new(memory(json!({
            "siteContent": { "stats": { "b": { "order": 2 }, "a": { "order": 1, "value": "12" } } }
        })));
        let stats = cache.load(&sitecontent_core::query::stats()).await.unwrap();
        assert_eq!(stats[0].id, "a");
        assert_eq!(stats[0].value, 12.0);

        let hero = cache.load_state(&sitecontent_core::query::hero("home")).await;
        assert!(matches!(hero, LoadState::Ready(h) if h.headline.is_empty()));
    }
}
