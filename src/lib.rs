//! twincache: fixed-capacity LRU and LFU caches with O(1) `get` and `put`.
//!
//! Both engines pair a hash index with arena-backed linked structures:
//! [`policy::lru::LruCache`] keeps a sentinel-delimited recency list and
//! [`policy::lfu::LfuCache`] keeps per-frequency buckets with a
//! minimum-frequency cursor.
//!
//! ```
//! use twincache::prelude::*;
//!
//! let mut cache = LruCache::new(2);
//! cache.put(1, "one");
//! cache.put(2, "two");
//! cache.get(&1);
//! cache.put(3, "three"); // evicts 2
//! assert!(!cache.contains(&2));
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;
