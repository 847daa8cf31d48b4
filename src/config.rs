//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Default TTL for entries stored without an explicit TTL
    pub default_ttl: Duration,
    /// Number of independently locked partitions
    pub shards: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CACHE_SHARDS` - Partition count for the sharded cache (default: 1)
    ///
    /// Unset variables fall back to the defaults. A variable that is set
    /// but does not parse is reported as [`CacheError::InvalidConfig`].
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity)?,
            default_ttl: env_or::<u64>(
                "CACHE_DEFAULT_TTL_MS",
                defaults.default_ttl.as_millis() as u64,
            )
            .map(Duration::from_millis)?,
            shards: env_or("CACHE_SHARDS", defaults.shards)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl: Duration::from_secs(300),
            shards: 1,
        }
    }
}

fn env_or<T: FromStr>(var: &'static str, default: T) -> Result<T> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidConfig { var, value }),
        Err(_) => Ok(default),
    }
}
