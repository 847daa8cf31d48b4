//! Cache Store Module
//!
//! Main cache engine combining a HashMap key index with the recency list
//! and TTL expiration. Not synchronized; see [`LruCache`](crate::LruCache)
//! for the shareable wrapper.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::cache::{CacheEntry, CacheStats, Clock, EntryHandle, MonotonicClock, RecencyList};
use crate::error::Result;

/// Upper bound on entries preallocated at construction; larger caches grow on demand.
const PREALLOC_LIMIT: usize = 1024;

// == Cache Store ==
/// Cache storage with LRU eviction and TTL support.
///
/// The index only holds handles into `entries`; the list owns every entry.
#[derive(Debug)]
pub struct CacheStore<K, V, C = MonotonicClock> {
    /// Key to position in the recency list
    index: HashMap<K, EntryHandle>,
    /// Entries, most recently used first
    entries: RecencyList<K, V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for entries stored without an explicit TTL
    default_ttl: Duration,
    clock: C,
}

impl<K, V> CacheStore<K, V, MonotonicClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `default_ttl` - TTL for entries stored without an explicit TTL
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self::with_clock(capacity, default_ttl, MonotonicClock)
    }
}

impl<K, V, C> CacheStore<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Creates a new CacheStore reading time from `clock`.
    pub fn with_clock(capacity: usize, default_ttl: Duration, clock: C) -> Self {
        let prealloc = capacity.min(PREALLOC_LIMIT);
        Self {
            index: HashMap::with_capacity(prealloc),
            entries: RecencyList::with_capacity(prealloc),
            stats: CacheStats::new(),
            capacity,
            default_ttl,
            clock,
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit marks the key as most recently used. An expired entry is
    /// removed on the spot and reported as a miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let now = self.clock.now();
        let expired = self
            .entries
            .get(handle)
            .map_or(true, |entry| entry.is_expired(now));
        if expired {
            self.entries.remove(handle);
            self.index.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            trace!("Lazily expired entry on read");
            return None;
        }

        self.entries.move_to_front(handle);
        self.stats.record_hit();
        self.entries.get(handle).map(|entry| entry.value.clone())
    }

    // == Put ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// Expired entries are swept first. An existing entry for `key` is
    /// replaced, taking the new TTL. If the cache is still at capacity the
    /// least recently used entry is evicted.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - TTL override; `None` or zero uses the default TTL
    pub fn put(&mut self, key: K, value: V, ttl: Option<Duration>) {
        self.remove_expired();

        if let Some(handle) = self.index.remove(&key) {
            self.entries.remove(handle);
        }

        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        let ttl = match ttl {
            Some(ttl) if !ttl.is_zero() => ttl,
            _ => self.default_ttl,
        };
        let entry = CacheEntry::new(key.clone(), value, self.clock.now(), ttl);
        let handle = self.entries.insert_front(entry);
        self.index.insert(key, handle);

        // Only reachable with capacity 0: the new entry is the LRU one.
        if self.entries.len() > self.capacity {
            self.evict_lru();
        }
    }

    // == Try Put ==
    /// Like [`put`](Self::put), but reserves every allocation the put may
    /// need (index slot, arena slot, free-list room) before touching anything.
    ///
    /// On error the store is exactly as it was before the call.
    pub fn try_put(&mut self, key: K, value: V, ttl: Option<Duration>) -> Result<()> {
        let reserved = self
            .index
            .try_reserve(1)
            .and_then(|()| self.entries.try_reserve_one());
        if let Err(err) = reserved {
            warn!("Failed to reserve room for a cache entry: {}", err);
            return Err(err.into());
        }
        self.put(key, value, ttl);
        Ok(())
    }

    // == Remove ==
    /// Removes an entry by key, expired or not.
    ///
    /// Returns whether an entry was removed.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.remove(key) {
            Some(handle) => {
                self.entries.remove(handle);
                true
            }
            None => false,
        }
    }

    // == Size ==
    /// Returns the number of entries that have not expired.
    ///
    /// Expired entries are skipped but left in place; only `get` and `put`
    /// reclaim them.
    pub fn size(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .iter_from_tail()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Returns the number of physically stored entries, expired or not.
    pub fn stored_len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no live entry is stored.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Checks for a live entry without touching recency or statistics.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key).is_some()
    }

    /// Returns the remaining lifetime of a live entry.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.live_entry(key).map(|entry| entry.ttl_remaining(now))
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn live_entry<Q>(&self, key: &Q) -> Option<&CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.index
            .get(key)
            .and_then(|&handle| self.entries.get(handle))
            .filter(|entry| !entry.is_expired(now))
    }

    // == Evict LRU ==
    fn evict_lru(&mut self) {
        if let Some(evicted) = self.entries.remove_tail() {
            self.index.remove(&evicted.key);
            self.stats.record_eviction();
            debug!(capacity = self.capacity, "Evicted least recently used entry");
        }
    }

    // == Remove Expired ==
    /// Removes every expired entry and returns how many were removed.
    fn remove_expired(&mut self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        let mut cursor = self.entries.cursor_from_tail();

        while let Some(handle) = cursor.next(&self.entries) {
            let expired = self
                .entries
                .get(handle)
                .is_some_and(|entry| entry.is_expired(now));
            if !expired {
                continue;
            }
            if let Some(entry) = self.entries.remove(handle) {
                self.index.remove(&entry.key);
                removed += 1;
            }
        }

        if removed > 0 {
            self.stats.record_expirations(removed as u64);
            debug!("TTL sweep: removed {} expired entries", removed);
        }
        removed
    }

    /// Keys from least to most recently used.
    #[cfg(test)]
    pub(crate) fn keys_by_recency(&self) -> Vec<K> {
        self.entries
            .iter_from_tail()
            .map(|entry| entry.key.clone())
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self) {
        self.entries.debug_validate_invariants();
        assert_eq!(self.index.len(), self.entries.len());
        for (key, &handle) in &self.index {
            let entry = self.entries.get(handle).expect("index points at a free slot");
            assert!(entry.key == *key, "index handle resolves to another key");
        }
        assert!(self.entries.len() <= self.capacity);
    }
}
