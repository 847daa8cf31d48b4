//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::collections::TryReserveError;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Lookups never fail: a missing or expired key is reported as `None`.
/// Errors only cover allocation failure and bad configuration.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Room for one more entry could not be reserved
    #[error("Allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),

    /// A configuration variable is present but cannot be parsed
    #[error("Invalid configuration: {var}={value:?}")]
    InvalidConfig { var: &'static str, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = CacheError::InvalidConfig {
            var: "CACHE_CAPACITY",
            value: "lots".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: CACHE_CAPACITY=\"lots\""
        );
    }

    #[test]
    fn test_allocation_failed_from_try_reserve() {
        let mut v: Vec<u64> = Vec::new();
        let reserve_err = v.try_reserve(usize::MAX).unwrap_err();
        let err: CacheError = reserve_err.into();
        assert!(matches!(err, CacheError::AllocationFailed(_)));
        assert!(err.to_string().starts_with("Allocation failed"));
    }
}
