//! rowkey - composite record keys and a bounded record cache
//!
//! ## Components
//! - [`CompositeKey`]: identifies a row by table name plus ordered
//!   (field, value) pairs; order-sensitive equality, a process-stable hash,
//!   and a versioned binary encoding
//! - [`BoundedLruCache`]: fixed-capacity cache evicting the
//!   least-recently-used entry, generic over key type
//!
//! ## Example
//! ```
//! use rowkey::{CompositeKey, CompositeKeyBuilder, RecordCache, Value};
//!
//! let key = CompositeKeyBuilder::new("orders")
//!     .add("o_w_id", Value::Integer(1))
//!     .add("o_id", Value::BigInt(3001))
//!     .build()?;
//!
//! let mut cache: RecordCache<String> = RecordCache::new(128)?;
//! cache.put(key.clone(), "row".to_string());
//!
//! let bytes = key.encode()?;
//! let decoded: CompositeKey = CompositeKey::decode(&bytes)?;
//! assert_eq!(cache.get(&decoded).map(String::as_str), Some("row"));
//! # Ok::<(), rowkey::StorageError>(())
//! ```

pub mod cache;
pub mod config;
pub mod index;
pub mod key;
pub mod types;

mod error;

pub use cache::{BoundedLruCache, CacheStats, RecordCache};
pub use config::CacheConfig;
pub use error::{Result, StorageError};
pub use index::SearchKey;
pub use key::{CompositeKey, CompositeKeyBuilder};
pub use types::{SqlType, TypedValue, Value};
