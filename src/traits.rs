//! # Cache Trait Hierarchy
//!
//! The call interface shared by both eviction engines.
//!
//! ```text
//!                 ┌─────────────────────────────────────┐
//!                 │          CoreCache<K, V>            │
//!                 │                                     │
//!                 │  get(&mut, &K) → Option<&V>         │
//!                 │  put(&mut, K, V)                    │
//!                 │  peek(&, &K) → Option<&V>           │
//!                 │  contains(&, &K) → bool             │
//!                 │  len / is_empty / capacity          │
//!                 └─────────────────┬───────────────────┘
//!                                   │
//!             ┌─────────────────────┴─────────────────────┐
//!             ▼                                           ▼
//!   ┌───────────────────────────┐          ┌───────────────────────────┐
//!   │   LruCacheTrait<K, V>     │          │   LfuCacheTrait<K, V>     │
//!   │                           │          │                           │
//!   │  peek_lru() → (&K, &V)    │          │  peek_lfu() → (&K, &V)    │
//!   │  recency_rank(&K)         │          │  frequency(&K) → u64      │
//!   │                           │          │  min_frequency() → u64    │
//!   └───────────────────────────┘          └───────────────────────────┘
//! ```
//!
//! ## Semantics
//!
//! - `get` counts as an access (LRU: move to MRU, LFU: frequency bump).
//! - `put` on a present key overwrites the value and counts as an access;
//!   on an absent key it may evict exactly one victim first.
//! - `peek`, `contains` and the policy-specific inspectors never change
//!   eviction order.
//! - A miss is `None`, never an error, and leaves the cache untouched.
//!
//! There is no removal operation: entries leave a cache only by eviction.
//!
//! ## Thread Safety
//!
//! Nothing here is synchronized. Wrap a cache in a lock
//! (e.g. `parking_lot::Mutex<LruCache<K, V>>`) for shared use; note that
//! `get` needs `&mut self` because it reorders.

/// Operations every eviction engine supports.
///
/// # Example
///
/// ```
/// use twincache::policy::lru::LruCache;
/// use twincache::traits::CoreCache;
///
/// fn warm<C: CoreCache<u32, &'static str>>(cache: &mut C) {
///     cache.put(1, "one");
///     cache.put(2, "two");
/// }
///
/// let mut cache = LruCache::new(4);
/// warm(&mut cache);
/// assert_eq!(cache.get(&1), Some(&"one"));
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Returns the value for `key`, recording an access.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Inserts or overwrites `key`, evicting one entry first if a new key
    /// would exceed capacity. A capacity of 0 makes this a no-op.
    fn put(&mut self, key: K, value: V);

    /// Returns the value for `key` without recording an access.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Returns `true` if `key` is live.
    fn contains(&self, key: &K) -> bool;

    /// Returns the number of live entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed maximum number of entries.
    fn capacity(&self) -> usize;
}

/// Recency-ordered inspection for LRU engines.
pub trait LruCacheTrait<K, V>: CoreCache<K, V> {
    /// Returns the entry that the next eviction would remove.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Position of `key` in recency order, 0 being most recently used. O(n).
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// Frequency-ordered inspection for LFU engines.
pub trait LfuCacheTrait<K, V>: CoreCache<K, V> {
    /// Returns the entry that the next eviction would remove.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Returns the access count of `key` (1 right after insertion).
    fn frequency(&self, key: &K) -> Option<u64>;

    /// Returns the smallest access count among live entries.
    fn min_frequency(&self) -> Option<u64>;
}
