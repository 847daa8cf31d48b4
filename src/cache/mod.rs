//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod clock;
mod entry;
mod lru;
mod sharded;
mod stats;
mod store;
mod sync;


// Re-export public types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use entry::CacheEntry;
pub use lru::{EntryHandle, RecencyList, TailCursor};
pub use sharded::ShardedLruCache;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use sync::LruCache;
