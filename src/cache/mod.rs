//! Result Cache
//!
//! Bounded memoization of analysis results with per-entry TTL and LRU
//! eviction. A single mutex guards the recency list, the entries and the
//! counters, so promote-on-get and evict-then-insert are atomic with respect
//! to every other operation.
//!
//! Expiry is checked lazily on `get`/`has` and eagerly by `cleanup`, which the
//! sweeper task runs on a fixed interval.

mod clock;
mod key;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{cache_key, digest_key};
pub use sweeper::spawn_cleanup;

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::constants::cache::{DEFAULT_CAPACITY, DEFAULT_TTL_SECS, ENTRY_OVERHEAD_BYTES};

pub type SharedCache<V> = Arc<ResultCache<V>>;

/// Approximate heap footprint of a cached value
pub trait Weigh {
    fn weight(&self) -> usize;
}

impl Weigh for String {
    fn weight(&self) -> usize {
        self.len()
    }
}

impl<T: Weigh + ?Sized> Weigh for Arc<T> {
    fn weight(&self) -> usize {
        (**self).weight()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
    /// hits / (hits + misses), 0 before any lookup
    pub hit_rate: f64,
    pub memory_bytes: usize,
    /// Entries removed by capacity pressure or expiry
    pub evictions: u64,
}

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
    access_count: u64,
    last_accessed_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.ttl
    }
}

struct CacheInner<V> {
    entries: LruCache<String, CacheEntry<V>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

pub struct ResultCache<V> {
    inner: Mutex<CacheInner<V>>,
    capacity: NonZeroUsize,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Weigh> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new(
            NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            Duration::from_secs(DEFAULT_TTL_SECS),
        )
    }
}

impl<V: Clone + Weigh> ResultCache<V> {
    pub fn new(capacity: NonZeroUsize, default_ttl: Duration) -> Self {
        Self::with_clock(capacity, default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        capacity: NonZeroUsize,
        default_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            capacity,
            default_ttl,
            clock,
        }
    }

    /// Fetch a live entry, promoting it to most recently used
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        match inner.entries.peek(key).map(|e| e.is_expired(now)) {
            None => {
                inner.misses += 1;
                return None;
            }
            Some(true) => {
                inner.entries.pop(key);
                inner.misses += 1;
                inner.evictions += 1;
                debug!(key, "cache entry expired");
                return None;
            }
            Some(false) => {}
        }

        let entry = inner.entries.get_mut(key)?;
        entry.access_count += 1;
        entry.last_accessed_at = now;
        let value = entry.value.clone();
        inner.hits += 1;
        Some(value)
    }

    /// Insert or replace with fresh metadata; `ttl` falls back to the default
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if !inner.entries.contains(&key)
            && inner.entries.len() >= self.capacity.get()
            && let Some((evicted, _)) = inner.entries.pop_lru()
        {
            inner.evictions += 1;
            debug!(key = %evicted, "cache entry evicted");
        }

        inner.entries.put(
            key,
            CacheEntry {
                value,
                created_at: now,
                ttl: ttl.unwrap_or(self.default_ttl),
                access_count: 0,
                last_accessed_at: now,
            },
        );
    }

    /// Existence probe; drops the entry if expired, leaves recency and
    /// counters alone otherwise
    pub fn has(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        match inner.entries.peek(key).map(|e| e.is_expired(now)) {
            None => false,
            Some(true) => {
                inner.entries.pop(key);
                inner.evictions += 1;
                false
            }
            Some(false) => true,
        }
    }

    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().entries.pop(key).is_some()
    }

    /// Drop every entry and reset hit/miss counters
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    /// Evict all expired entries, returning how many were removed
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            inner.entries.pop(key);
        }
        inner.evictions += expired.len() as u64;
        expired.len()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let total = inner.hits + inner.misses;
        let memory_bytes = inner
            .entries
            .iter()
            .map(|(k, e)| k.len() + e.value.weight() + ENTRY_OVERHEAD_BYTES)
            .sum();

        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            size: inner.entries.len(),
            capacity: self.capacity.get(),
            hit_rate: if total == 0 {
                0.0
            } else {
                inner.hits as f64 / total as f64
            },
            memory_bytes,
            evictions: inner.evictions,
        }
    }

    /// Times a live entry has been read, None when absent
    pub fn access_count(&self, key: &str) -> Option<u64> {
        self.inner.lock().entries.peek(key).map(|e| e.access_count)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn cache(capacity: usize) -> (ResultCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ResultCache::with_clock(
            NonZeroUsize::new(capacity).unwrap(),
            TTL,
            clock.clone(),
        );
        (cache, clock)
    }

    #[test]
    fn test_set_then_get() {
        let (cache, _) = cache(4);
        cache.set("k", "v".to_string(), None);
        assert_eq!(cache.get("k").as_deref(), Some("v"));
        assert_eq!(cache.access_count("k"), Some(1));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let (cache, clock) = cache(4);
        cache.set("k", "v".to_string(), None);

        clock.advance(TTL);
        assert!(cache.get("k").is_some(), "entry lives through exactly ttl");

        clock.advance(Duration::from_millis(1));
        assert!(cache.get("k").is_none());
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn test_per_entry_ttl_overrides_default() {
        let (cache, clock) = cache(4);
        cache.set("short", "a".to_string(), Some(Duration::from_secs(1)));
        cache.set("long", "b".to_string(), None);
        clock.advance(Duration::from_secs(2));
        assert!(cache.get("short").is_none());
        assert!(cache.get("long").is_some());
    }

    #[test]
    fn test_capacity_plus_one_evicts_least_recently_used() {
        let (cache, _) = cache(3);
        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);
        cache.set("c", "3".to_string(), None);

        // touch "a" so "b" becomes least recently used
        assert!(cache.get("a").is_some());
        cache.set("d", "4".to_string(), None);

        assert_eq!(cache.len(), 3);
        assert!(!cache.has("b"));
        assert!(cache.has("a"));
        assert!(cache.has("c"));
        assert!(cache.has("d"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_replacing_key_at_capacity_does_not_evict() {
        let (cache, _) = cache(2);
        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);
        cache.set("a", "updated".to_string(), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b").as_deref(), Some("2"));
        assert_eq!(cache.get("a").as_deref(), Some("updated"));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_hit_rate() {
        let (cache, _) = cache(4);
        assert_eq!(cache.stats().hit_rate, 0.0);

        cache.set("k", "v".to_string(), None);
        cache.get("k");
        cache.get("k");
        cache.get("k");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 0.75);
    }

    #[test]
    fn test_has_does_not_touch_counters_or_recency() {
        let (cache, _) = cache(2);
        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);

        assert!(cache.has("a"));
        assert!(!cache.has("zzz"));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (0, 0));

        // "a" is still least recently used despite the probe
        cache.set("c", "3".to_string(), None);
        assert!(!cache.has("a"));
    }

    #[test]
    fn test_has_evicts_expired() {
        let (cache, clock) = cache(2);
        cache.set("a", "1".to_string(), None);
        clock.advance(TTL * 2);
        assert!(!cache.has("a"));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_cleanup_removes_only_expired() {
        let (cache, clock) = cache(8);
        cache.set("old1", "x".to_string(), Some(Duration::from_secs(5)));
        cache.set("old2", "x".to_string(), Some(Duration::from_secs(5)));
        cache.set("fresh", "x".to_string(), None);

        clock.advance(Duration::from_secs(10));
        assert_eq!(cache.cleanup(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.cleanup(), 0);
    }

    #[test]
    fn test_delete_and_clear() {
        let (cache, _) = cache(4);
        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);
        cache.get("a");
        cache.get("zzz");

        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));

        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!((stats.hits, stats.misses), (0, 0));
    }

    #[test]
    fn test_memory_estimate_tracks_entries() {
        let (cache, _) = cache(4);
        assert_eq!(cache.stats().memory_bytes, 0);
        cache.set("key", "value".to_string(), None);
        assert_eq!(cache.stats().memory_bytes, 3 + 5 + ENTRY_OVERHEAD_BYTES);
    }

    #[test]
    fn test_concurrent_access_keeps_size_bounded() {
        let (cache, _) = cache(16);
        let cache = Arc::new(cache);

        std::thread::scope(|s| {
            for t in 0..8 {
                let cache = cache.clone();
                s.spawn(move || {
                    for i in 0..200 {
                        let key = format!("{}-{}", t, i % 32);
                        cache.set(key.clone(), key.clone(), None);
                        cache.get(&key);
                    }
                });
            }
        });

        let stats = cache.stats();
        assert!(stats.size <= 16);
        assert_eq!(stats.hits + stats.misses, 8 * 200);
    }
}
