//! TTL LRU - demonstration driver
//!
//! Walks a cache through eviction, expiry, recency and overwrite scenarios
//! and logs what it observes.

use std::thread::sleep;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru::{CacheStats, Config, LruCache, ShardedLruCache};

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: capacity={}, default_ttl={:?}, shards={}",
        config.capacity, config.default_ttl, config.shards
    );
    let configured_stats = configured_demo(&config);

    eviction_demo();
    expiry_demo();
    recency_demo();
    let overwrite_stats = overwrite_demo();

    println!("{}", serde_json::to_string_pretty(&configured_stats)?);
    println!("{}", serde_json::to_string_pretty(&overwrite_stats)?);
    Ok(())
}

// Cache operations are bound before logging: `info!` skips its arguments
// entirely when the level is filtered out.

/// Fills the cache built from `config` one past capacity and reads back.
fn configured_demo(config: &Config) -> CacheStats {
    let keys = config.capacity.min(16) as u64 + 1;
    if config.shards > 1 {
        let cache: ShardedLruCache<u64, u64> = ShardedLruCache::from_config(config);
        for key in 0..keys {
            cache.put(key, key * key, None);
        }
        let last = cache.get(&(keys - 1));
        let size = cache.size();
        info!(
            "Configured ({} shards): get({}) = {:?}, size = {}",
            cache.shard_count(),
            keys - 1,
            last,
            size
        );
        cache.get_stats()
    } else {
        let cache: LruCache<u64, u64> = LruCache::from_config(config);
        for key in 0..keys {
            cache.put(key, key * key, None);
        }
        let last = cache.get(&(keys - 1));
        let size = cache.size();
        info!("Configured: get({}) = {:?}, size = {}", keys - 1, last, size);
        cache.get_stats()
    }
}

fn eviction_demo() {
    let cache = LruCache::new(3, Duration::from_secs(10));
    cache.put(1, "a".to_string(), None);
    cache.put(2, "b".to_string(), None);
    cache.put(3, "c".to_string(), None);
    let size = cache.size();
    info!("Eviction: size after three puts = {}", size);

    cache.put(4, "d".to_string(), None);
    let size = cache.size();
    let first = cache.get(&1);
    info!(
        "Eviction: size after fourth put = {}, get(1) = {:?}",
        size, first
    );
}

fn expiry_demo() {
    let cache = LruCache::new(10, Duration::from_secs(1));
    cache.put(1, "x".to_string(), None);
    sleep(Duration::from_secs(2));
    let value = cache.get(&1);
    let size = cache.size();
    info!("Expiry: get(1) after 2s = {:?}, size = {}", value, size);
}

fn recency_demo() -> CacheStats {
    let cache = LruCache::new(2, Duration::from_secs(10));
    cache.put(1, "a".to_string(), None);
    cache.put(2, "b".to_string(), None);
    cache.get(&1);
    cache.put(3, "c".to_string(), None);
    let (one, two, three) = (cache.get(&1), cache.get(&2), cache.get(&3));
    info!(
        "Recency: get(1) = {:?}, get(2) = {:?}, get(3) = {:?}",
        one, two, three
    );
    cache.get_stats()
}

fn overwrite_demo() -> CacheStats {
    let cache = LruCache::new(10, Duration::from_secs(10));
    cache.put(1, "a".to_string(), Some(Duration::from_secs(5)));
    cache.put(1, "b".to_string(), Some(Duration::from_secs(60)));
    let value = cache.get(&1);
    let size = cache.size();
    let ttl = cache.ttl_remaining(&1);
    info!(
        "Overwrite: get(1) = {:?}, size = {}, ttl_remaining = {:?}",
        value, size, ttl
    );
    cache.get_stats()
}
