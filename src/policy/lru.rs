//! # Least Recently Used (LRU) Cache Implementation
//!
//! Fixed-capacity cache that evicts the entry whose most recent `get`/`put`
//! is oldest.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         LruCache<K, V>                               │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  FxHashMap<K, SlotId> (index into the list arena)            │   │
//!   │   │                                                              │   │
//!   │   │  ┌─────────┬─────────────────────────────────────────┐       │   │
//!   │   │  │   Key   │  SlotId                                 │       │   │
//!   │   │  ├─────────┼─────────────────────────────────────────┤       │   │
//!   │   │  │  key_1  │  ─────────────────────────────────┐     │       │   │
//!   │   │  │  key_2  │  ───────────────────────────┐     │     │       │   │
//!   │   │  │  key_3  │  ─────────────────────┐     │     │     │       │   │
//!   │   │  └─────────┴───────────────────────┼─────┼─────┼─────┘       │   │
//!   │   └────────────────────────────────────┼─────┼─────┼─────────────┘   │
//!   │                                        │     │     │                 │
//!   │   ┌────────────────────────────────────┼─────┼─────┼─────────────┐   │
//!   │   │  IntrusiveList<Entry<K, V>>        ▼     ▼     ▼             │   │
//!   │   │                                                              │   │
//!   │   │  [head] ◄──► [key_3] ◄──► [key_2] ◄──► [key_1] ◄──► [tail]   │   │
//!   │   │  sentinel     MRU                       LRU        sentinel  │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   capacity: usize  (fixed at construction)                           │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each entry (key + value) lives exactly once, in the list arena. The index
//! holds `SlotId`s, not references, so there is no ownership cycle.
//!
//! ## LRU Operations Flow
//!
//! ```text
//!   put(D) on a full cache (capacity = 3)
//!   ═══════════════════════════════════════════════════════════════════
//!     Before:  [head] ◄──► [A] ◄──► [B] ◄──► [C] ◄──► [tail]
//!     1. Evict [C] (node before tail), drop it from the index
//!     2. Link [D] after head, register it in the index
//!     After:   [head] ◄──► [D] ◄──► [A] ◄──► [B] ◄──► [tail]
//!
//!   get(B)
//!   ═══════════════════════════════════════════════════════════════════
//!     1. Find [B] in the index: O(1)
//!     2. Unlink [B], relink after head: O(1)
//!     After:   [head] ◄──► [B] ◄──► [D] ◄──► [A] ◄──► [tail]
//! ```
//!
//! ## Performance Characteristics
//!
//! | Operation      | Time | Notes                              |
//! |----------------|------|------------------------------------|
//! | `get`          | O(1) | Index lookup + move to front       |
//! | `put` (update) | O(1) | Overwrite + move to front          |
//! | `put` (new)    | O(1) | Optional pop_back + push_front     |
//! | `peek`         | O(1) | No reordering                      |
//! | `peek_lru`     | O(1) | Node before tail sentinel          |
//! | `recency_rank` | O(n) | Walks from head                    |
//!
//! ## Example Usage
//!
//! ```
//! use twincache::policy::lru::LruCache;
//! use twincache::traits::CoreCache;
//!
//! let mut cache = LruCache::new(3);
//! cache.put(1, 100);
//! cache.put(2, 200);
//! cache.put(3, 300);
//! assert_eq!(cache.get(&1), Some(&100));
//!
//! cache.put(4, 400); // evicts key 2
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&3), Some(&300));
//! ```
//!
//! ## Thread Safety
//!
//! `LruCache` is **not** thread-safe. Wrap it in a mutex for shared use.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::error::{ConfigError, InvariantError, capacity_from};
use crate::traits::{CoreCache, LruCacheTrait};

struct Entry<K, V> {
    key: K,
    value: V,
}

/// Fixed-capacity LRU cache.
///
/// See the module-level documentation for the layout and flows.
pub struct LruCache<K, V> {
    index: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache that holds at most `capacity` entries.
    ///
    /// A capacity of 0 creates a cache that retains nothing: every `put` is a
    /// no-op and every `get` misses.
    ///
    /// # Example
    ///
    /// ```
    /// use twincache::policy::lru::LruCache;
    /// use twincache::traits::CoreCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// ```
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: IntrusiveList::with_capacity(capacity),
            capacity,
        }
    }

    /// Creates a cache from a capacity of any integer type, rejecting
    /// negative values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is negative or does not fit in
    /// `usize`.
    ///
    /// # Example
    ///
    /// ```
    /// use twincache::policy::lru::LruCache;
    ///
    /// assert!(LruCache::<u32, u32>::try_new(8i64).is_ok());
    /// assert!(LruCache::<u32, u32>::try_new(-1i64).is_err());
    /// ```
    pub fn try_new<C>(capacity: C) -> Result<Self, ConfigError>
    where
        C: TryInto<usize> + Copy + fmt::Display,
    {
        Ok(Self::new(capacity_from(capacity)?))
    }

    /// Returns an iterator over `(key, value)` from most to least recently used.
    ///
    /// Iterating does not count as an access.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Checks that the index and the recency list describe the same entries.
    ///
    /// # Example
    ///
    /// ```
    /// use twincache::policy::lru::LruCache;
    /// use twincache::traits::CoreCache;
    ///
    /// let mut cache = LruCache::new(2);
    /// cache.put("a", 1);
    /// cache.put("b", 2);
    /// cache.put("c", 3);
    /// assert!(cache.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()?;

        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but recency list holds {}",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} live entries exceed capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some(entry) if entry.key == *key => {}
                _ => return Err(InvariantError::new("index points at a foreign list node")),
            }
        }
        Ok(())
    }

    fn evict_lru(&mut self) {
        if let Some(evicted) = self.list.pop_back() {
            self.index.remove(&evicted.key);
            trace!(capacity = self.capacity, "lru evicted least recently used entry");
        }
    }
}

impl<K, V> CoreCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    #[inline]
    fn put(&mut self, key: K, value: V) {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(id) {
                entry.value = value;
            }
            self.list.move_to_front(id);
            return;
        }

        if self.capacity == 0 {
            return;
        }

        if self.index.len() >= self.capacity {
            self.evict_lru();
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
    }

    #[inline]
    fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        let target = *self.index.get(key)?;
        self.list.iter_ids().position(|id| id == target)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}
