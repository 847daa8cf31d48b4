//! Thread-Safe Cache Module
//!
//! Wraps a [`CacheStore`] in a single mutex so it can be shared across
//! threads via `Arc<LruCache<..>>`.

use std::borrow::Borrow;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore, Clock, MonotonicClock};
use crate::config::Config;
use crate::error::Result;

// == LRU Cache ==
/// Thread-safe, fixed-capacity cache with TTL expiration and LRU eviction.
///
/// Every operation, reads included, runs to completion under one exclusive
/// lock, so concurrent calls behave as if executed one after another.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ttl_lru::LruCache;
///
/// let cache = LruCache::new(2, Duration::from_secs(10));
/// cache.put(1, "a", None);
/// cache.put(2, "b", None);
/// cache.get(&1);
/// cache.put(3, "c", None);
///
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.get(&1), Some("a"));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V, C = MonotonicClock> {
    inner: Mutex<CacheStore<K, V, C>>,
}

impl<K, V> LruCache<K, V, MonotonicClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is accepted; such a cache never retains anything.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self::with_clock(capacity, default_ttl, MonotonicClock)
    }

    /// Creates a cache from capacity and default TTL in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.capacity, config.default_ttl)
    }
}

impl<K, V, C> LruCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Creates a cache reading time from `clock`.
    pub fn with_clock(capacity: usize, default_ttl: Duration, clock: C) -> Self {
        Self {
            inner: Mutex::new(CacheStore::with_clock(capacity, default_ttl, clock)),
        }
    }

    /// Returns the value for `key` if present and not expired.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().get(key)
    }

    /// Stores `value` under `key`. `ttl` of `None` or zero uses the default.
    pub fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        self.inner.lock().put(key, value, ttl);
    }

    /// Fallible [`put`](Self::put) that leaves the cache untouched when
    /// memory for the entry cannot be reserved.
    pub fn try_put(&self, key: K, value: V, ttl: Option<Duration>) -> Result<()> {
        self.inner.lock().try_put(key, value, ttl)
    }

    /// Removes `key`; returns whether an entry was removed.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    /// Number of entries that have not expired. Never reclaims anything.
    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    /// Number of physically stored entries, expired ones included.
    pub fn stored_len(&self) -> usize {
        self.inner.lock().stored_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Checks for a live entry without affecting recency or statistics.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// Remaining lifetime of a live entry.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().ttl_remaining(key)
    }

    /// Snapshot of the hit/miss counters.
    pub fn get_stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn default_ttl(&self) -> Duration {
        self.inner.lock().default_ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_cache_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LruCache<String, Vec<u8>>>();
        assert_send_sync::<LruCache<u64, String, ManualClock>>();
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            capacity: 8,
            default_ttl: Duration::from_secs(3),
            shards: 1,
        };
        let cache: LruCache<u32, u32> = LruCache::from_config(&config);
        assert_eq!(cache.capacity(), 8);
        assert_eq!(cache.default_ttl(), Duration::from_secs(3));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unbounded_capacity_builds_lazily() {
        let cache: LruCache<u64, u64> = LruCache::new(usize::MAX, Duration::from_secs(10));
        cache.put(1, 10, None);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.capacity(), usize::MAX);

        let sharded: crate::ShardedLruCache<u64, u64> =
            crate::ShardedLruCache::new(usize::MAX, Duration::from_secs(10), 4);
        sharded.put(2, 20, None);
        assert_eq!(sharded.get(&2), Some(20));
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(LruCache::new(1000, Duration::from_secs(60)));

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..100u64 {
                        let key = t * 1000 + i;
                        cache.put(key, key * 2, None);
                        assert_eq!(cache.get(&key), Some(key * 2));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.size(), 400);
        let stats = cache.get_stats();
        assert_eq!(stats.hits, 400);
        assert_eq!(stats.total_requests, stats.hits + stats.misses);
    }

    #[test]
    fn test_manual_clock_expiry() {
        let clock = ManualClock::new();
        let cache = LruCache::with_clock(4, Duration::from_secs(1), clock.clone());
        cache.put("k", 1, None);

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.stored_len(), 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.stored_len(), 0);
    }
}
