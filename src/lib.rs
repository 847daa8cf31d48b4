//! TTL LRU - A thread-safe in-memory cache
//!
//! Fixed-capacity key/value cache with per-entry TTL expiration and
//! least-recently-used eviction.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, LruCache, ShardedLruCache};
pub use config::Config;
pub use error::{CacheError, Result};
