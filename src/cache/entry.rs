//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with its key, value and expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key this entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Instant at which the entry stops being visible
    pub expires_at: Instant,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new cache entry that lives for `ttl` from `now`.
    ///
    /// An expiry that would overflow `Instant` saturates to "far future".
    pub fn new(key: K, value: V, now: Instant, ttl: Duration) -> Self {
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| far_future(now));
        Self {
            key,
            value,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `expires_at <= now`, so
    /// a TTL that has exactly elapsed already hides the entry.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`, `Duration::ZERO` once expired.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

// Roughly a century, small enough to be representable on every platform.
fn far_future(now: Instant) -> Instant {
    const CENTURY: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);
    now.checked_add(CENTURY).unwrap_or(now)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, "value", now, Duration::from_secs(60));

        assert_eq!(entry.key, 1);
        assert_eq!(entry.value, "value");
        assert_eq!(entry.expires_at, now + Duration::from_secs(60));
        assert!(!entry.is_expired(now));
    }

    #[test]
    fn test_entry_expiration() {
        let now = Instant::now();
        let entry = CacheEntry::new("k", 7, now, Duration::from_secs(1));

        assert!(!entry.is_expired(now + Duration::from_millis(999)));
        assert!(entry.is_expired(now + Duration::from_secs(2)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new("k", 7, now, Duration::from_secs(1));

        // Expired exactly when the TTL has fully elapsed
        assert!(entry.is_expired(now + Duration::from_secs(1)));
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let now = Instant::now();
        let entry = CacheEntry::new("k", 7, now, Duration::ZERO);
        assert!(entry.is_expired(now));
    }

    #[test]
    fn test_ttl_remaining() {
        let now = Instant::now();
        let entry = CacheEntry::new("k", 7, now, Duration::from_secs(10));

        assert_eq!(
            entry.ttl_remaining(now + Duration::from_secs(4)),
            Duration::from_secs(6)
        );
        assert_eq!(
            entry.ttl_remaining(now + Duration::from_secs(30)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let now = Instant::now();
        let entry = CacheEntry::new("k", 7, now, Duration::MAX);
        assert!(entry.expires_at > now);
        assert!(!entry.is_expired(now + Duration::from_secs(3600)));
    }
}
