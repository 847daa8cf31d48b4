//! Sharded Cache Module
//!
//! Spreads keys over several independently locked [`CacheStore`]s to cut
//! lock contention. A key always maps to the same shard, so operations on a
//! single key stay linearizable.
//!
//! Capacity is enforced per shard: `ceil(capacity / shards)` entries each.
//! A skewed key distribution can therefore evict from a full shard while
//! others still have room.

use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore, Clock, MonotonicClock};
use crate::config::Config;
use crate::error::Result;

// == Sharded LRU Cache ==
/// Thread-safe cache partitioned into independently locked shards.
///
/// Aggregates (`size`, `get_stats`) visit the shards one at a time and are
/// not a single atomic snapshot across shards.
#[derive(Debug)]
pub struct ShardedLruCache<K, V, C = MonotonicClock> {
    shards: Vec<Mutex<CacheStore<K, V, C>>>,
    capacity_per_shard: usize,
}

impl<K, V> ShardedLruCache<K, V, MonotonicClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache of `shards` partitions sharing `capacity`.
    ///
    /// A shard count of zero is treated as one.
    pub fn new(capacity: usize, default_ttl: Duration, shards: usize) -> Self {
        Self::with_clock(capacity, default_ttl, shards, MonotonicClock)
    }

    /// Creates a cache from capacity, default TTL and shard count in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.capacity, config.default_ttl, config.shards)
    }
}

impl<K, V, C> ShardedLruCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    /// Creates a sharded cache whose shards all read time from `clock`.
    pub fn with_clock(capacity: usize, default_ttl: Duration, shards: usize, clock: C) -> Self {
        let shard_count = shards.max(1);
        let capacity_per_shard = capacity.div_ceil(shard_count);
        let shards = (0..shard_count)
            .map(|_| {
                Mutex::new(CacheStore::with_clock(
                    capacity_per_shard,
                    default_ttl,
                    clock.clone(),
                ))
            })
            .collect();

        Self {
            shards,
            capacity_per_shard,
        }
    }
}

impl<K, V, C> ShardedLruCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Returns the shard index `key` maps to.
    pub fn shard_for_key<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    fn shard<Q>(&self, key: &Q) -> &Mutex<CacheStore<K, V, C>>
    where
        Q: Hash + ?Sized,
    {
        &self.shards[self.shard_for_key(key)]
    }

    /// Returns the value for `key` if present and not expired.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard(key).lock().get(key)
    }

    /// Stores `value` under `key`. `ttl` of `None` or zero uses the default.
    pub fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        self.shard(&key).lock().put(key, value, ttl);
    }

    /// Fallible [`put`](Self::put); the shard is untouched on error.
    pub fn try_put(&self, key: K, value: V, ttl: Option<Duration>) -> Result<()> {
        self.shard(&key).lock().try_put(key, value, ttl)
    }

    /// Removes `key`; returns whether an entry was removed.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard(key).lock().remove(key)
    }

    /// Checks for a live entry without affecting recency or statistics.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard(key).lock().contains(key)
    }

    /// Live entries summed over all shards.
    pub fn size(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().size()).sum()
    }

    /// Physically stored entries summed over all shards.
    pub fn stored_len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().stored_len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Statistics merged over all shards.
    pub fn get_stats(&self) -> CacheStats {
        self.shards.iter().fold(CacheStats::new(), |mut total, shard| {
            total.merge(&shard.lock().stats());
            total
        })
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn capacity_per_shard(&self) -> usize {
        self.capacity_per_shard
    }
}
