//! Bounded LRU cache
//!
//! **Purpose**: Keep recently read records in memory so lookups by key can
//! skip durable storage.
//!
//! **Policy**: At most `capacity` entries. `get` and `put` move the touched
//! entry to the most-recently-used end; inserting past capacity evicts
//! exactly one entry from the least-recently-used end.
//!
//! **Threading**: None. Every recency-changing operation takes `&mut self`;
//! callers sharing a cache across threads wrap it in their own lock.

use crate::config::CacheConfig;
use crate::key::CompositeKey;
use crate::{Result, StorageError};
use lru::LruCache;
use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use tracing::{debug, trace};

/// Read cache of records keyed by their composite key
pub type RecordCache<R> = BoundedLruCache<CompositeKey, R>;

/// Cache statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Total cache hits
    pub hits: u64,
    /// Total cache misses
    pub misses: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Current cache size
    pub size: usize,
    /// Maximum cache size
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Fixed-capacity key/value cache with least-recently-used eviction
pub struct BoundedLruCache<K: Hash + Eq, V> {
    entries: LruCache<K, V, ahash::RandomState>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K: Hash + Eq, V> BoundedLruCache<K, V> {
    /// Create a cache holding at most `capacity` entries
    ///
    /// A zero capacity is rejected with `InvalidArgument`.
    pub fn new(capacity: usize) -> Result<Self> {
        let cap = NonZeroUsize::new(capacity).ok_or_else(|| {
            StorageError::InvalidArgument("cache capacity must be positive".to_string())
        })?;

        debug!(capacity, "created bounded LRU cache");

        Ok(Self {
            entries: LruCache::with_hasher(cap, ahash::RandomState::new()),
            hits: 0,
            misses: 0,
            evictions: 0,
        })
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity)
    }

    /// Look up `key`, marking it most-recently-used on a hit
    ///
    /// A miss leaves contents and order untouched; the only side effect is
    /// one more `misses` in [`stats`](Self::stats).
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Read without changing recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.peek(key)
    }

    /// Insert or overwrite `key`, marking it most-recently-used
    ///
    /// Returns the previous value when the key was already cached. A new
    /// key that pushes the cache past capacity evicts the least-recently-used
    /// entry.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.entries.contains(&key) {
            return self.entries.put(key, value);
        }

        if self.entries.push(key, value).is_some() {
            self.evictions += 1;
            trace!(
                capacity = self.entries.cap().get(),
                evictions = self.evictions,
                "evicted least-recently-used entry"
            );
        }
        None
    }

    /// Membership test; does not change recency
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains(key)
    }

    /// Drop `key`, returning its value
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.pop(key)
    }

    /// Drop every entry and reset statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size: self.entries.len(),
            capacity: self.capacity(),
        }
    }
}
