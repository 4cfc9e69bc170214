//! Cache module - bounded LRU caches for records

pub mod lru_cache;

pub use lru_cache::{BoundedLruCache, CacheStats, RecordCache};
