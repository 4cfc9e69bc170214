//! Cache configuration
//!
//! Provides sizing presets for the record cache.

use crate::{Result, StorageError};
use serde::{Deserialize, Serialize};

/// Default number of cached records
///
/// Memory usage: ~1KB/record × capacity
/// - 10000 records ≈ 10MB (default)
/// - 50000 records ≈ 50MB (high traffic)
/// - 1000 records ≈ 1MB (memory-constrained)
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Record cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries kept before the least-recently-used one is evicted
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl CacheConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Preset for memory-constrained deployments
    pub fn for_embedded() -> Self {
        Self { capacity: 1_000 }
    }

    /// Preset for read-heavy workloads
    pub fn for_high_traffic() -> Self {
        Self { capacity: 50_000 }
    }

    /// Small cache that evicts quickly
    pub fn for_testing() -> Self {
        Self { capacity: 16 }
    }

    /// Reject configurations the cache cannot be built from
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(StorageError::InvalidArgument(
                "cache capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
