//! Concurrency Tests
//!
//! Hammers shared caches from several threads and checks that the
//! counters and capacity bound stay exact.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use ttl_lru::{LruCache, ShardedLruCache};

const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 2_000;

#[test]
fn test_concurrent_mixed_operations_keep_invariants() {
    let capacity = 64;
    let cache = Arc::new(LruCache::new(capacity, Duration::from_secs(60)));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut gets = 0u64;
                for i in 0..OPS_PER_THREAD {
                    let key = ((t * 31 + i * 7) % 256) as u64;
                    match i % 4 {
                        0 | 1 => cache.put(key, key.to_string(), None),
                        2 => {
                            // Values are never torn: a hit always returns the key's own value
                            if let Some(value) = cache.get(&key) {
                                assert_eq!(value, key.to_string());
                            }
                            gets += 1;
                        }
                        _ => {
                            cache.remove(&key);
                        }
                    }
                    assert!(cache.stored_len() <= capacity);
                }
                gets
            })
        })
        .collect();

    let total_gets: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    let stats = cache.get_stats();
    assert_eq!(stats.total_requests, total_gets);
    assert_eq!(stats.total_requests, stats.hits + stats.misses);
    assert!(cache.size() <= capacity);
}

#[test]
fn test_concurrent_counters_are_exact() {
    let cache = Arc::new(LruCache::new(16, Duration::from_secs(60)));
    cache.put("present", 1, None);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..OPS_PER_THREAD {
                    assert_eq!(cache.get("present"), Some(1));
                    assert_eq!(cache.get("absent"), None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = cache.get_stats();
    let expected = (THREADS * OPS_PER_THREAD) as u64;
    assert_eq!(stats.hits, expected);
    assert_eq!(stats.misses, expected);
    assert_eq!(stats.total_requests, expected * 2);
}

#[test]
fn test_sharded_concurrent_writers() {
    let cache = Arc::new(ShardedLruCache::new(4_096, Duration::from_secs(60), 8));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..256usize {
                    let key = t * 10_000 + i;
                    cache.put(key, i, None);
                    assert_eq!(cache.get(&key), Some(i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = cache.get_stats();
    assert_eq!(stats.hits, (THREADS * 256) as u64);
    assert_eq!(stats.misses, 0);
    assert!(cache.stored_len() <= cache.shard_count() * cache.capacity_per_shard());
}
