//! # LFU (Least Frequently Used) Cache Implementation
//!
//! Fixed-capacity cache that evicts the entry with the lowest access count.
//! Among entries sharing that count, the one that reached it first goes
//! first, which gives LRU ordering as the secondary key.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                          LfuCache<K, V>                                  │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  FxHashMap<K, SlotId>  (key → entry slot)                          │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                  │                                       │
//!   │                                  ▼                                       │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  FrequencyBuckets<Entry<K, V>>                                     │ │
//!   │   │                                                                    │ │
//!   │   │   min_freq ──► freq=1: [page_3] ◄──► [page_5]     oldest → newest  │ │
//!   │   │                freq=3: [page_2]                                    │ │
//!   │   │                freq=7: [page_4] ◄──► [page_1]                      │ │
//!   │   │                                                                    │ │
//!   │   │   Eviction: front of the min_freq bucket (page_3)                  │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                                                          │
//!   │   capacity: usize  (fixed at construction)                               │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## LFU vs LRU Comparison
//!
//! ```text
//!   Access pattern: A, B, A, C, A, D, A, E, A, F  (A accessed 5 times)
//!   Cache capacity: 3
//!
//!   LRU: A is evicted once three other keys follow its last access.
//!   LFU: A keeps a high count and survives; the freq=1 newcomers churn.
//! ```
//!
//! ## Eviction Flow
//!
//! ```text
//!   put(new_key, value)
//!        │
//!        ▼
//!   ┌────────────────────────────────────────────────────────────────────────┐
//!   │ Key already present?                                                   │
//!   │   YES → overwrite value, bump frequency, done                          │
//!   │   NO  → capacity 0? done. Otherwise continue                           │
//!   └────────────────────────────────────────────────────────────────────────┘
//!        │
//!        ▼
//!   ┌────────────────────────────────────────────────────────────────────────┐
//!   │ At capacity?                                                           │
//!   │   YES → pop the oldest entry of the min_freq bucket, unindex it        │
//!   └────────────────────────────────────────────────────────────────────────┘
//!        │
//!        ▼
//!   ┌────────────────────────────────────────────────────────────────────────┐
//!   │ Insert at freq=1 as the newest member; min_freq = 1                    │
//!   └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Performance Characteristics
//!
//! | Operation      | Time | Notes                               |
//! |----------------|------|-------------------------------------|
//! | `get`          | O(1) | Index lookup + bucket move          |
//! | `put` (update) | O(1) | Overwrite + bucket move             |
//! | `put` (new)    | O(1) | Optional bucket pop + bucket append |
//! | `peek_lfu`     | O(1) | Front of the min_freq bucket        |
//! | `frequency`    | O(1) | Index lookup                        |
//!
//! ## Example Usage
//!
//! ```
//! use twincache::policy::lfu::LfuCache;
//! use twincache::traits::{CoreCache, LfuCacheTrait};
//!
//! let mut cache = LfuCache::new(2);
//! cache.put(1, 1);
//! cache.put(2, 2);
//! assert_eq!(cache.get(&1), Some(&1)); // freq(1) = 2, freq(2) = 1
//!
//! cache.put(3, 3); // evicts key 2
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&3), Some(&3));
//! assert_eq!(cache.frequency(&1), Some(2));
//! ```
//!
//! ## Implementation Notes
//!
//! - Frequencies never decrease and saturate at `u64::MAX`.
//! - Keys are stored twice (index + entry), hence `K: Clone`.
//! - Not thread-safe; requires external synchronization.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::frequency_buckets::FrequencyBuckets;
use crate::ds::slot_arena::SlotId;
use crate::error::{ConfigError, InvariantError, capacity_from};
use crate::traits::{CoreCache, LfuCacheTrait};

struct Entry<K, V> {
    key: K,
    value: V,
}

/// Fixed-capacity LFU cache with LRU tie-breaking.
///
/// See the module-level documentation for the layout and flows.
pub struct LfuCache<K, V> {
    index: FxHashMap<K, SlotId>,
    buckets: FrequencyBuckets<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache that holds at most `capacity` entries.
    ///
    /// A capacity of 0 creates a cache that retains nothing.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FrequencyBuckets::with_capacity(capacity),
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
    pub fn try_new<C>(capacity: C) -> Result<Self, ConfigError>
    where
        C: TryInto<usize> + Copy + fmt::Display,
    {
        Ok(Self::new(capacity_from(capacity)?))
    }

    /// Checks the index against the frequency buckets.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.buckets.check_invariants()?;

        if self.index.len() != self.buckets.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but buckets hold {}",
                self.index.len(),
                self.buckets.len()
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
            match self.buckets.get(id) {
                Some(entry) if entry.key == *key => {}
                _ => return Err(InvariantError::new("index points at a foreign bucket entry")),
            }
        }
        Ok(())
    }

    fn evict_lfu(&mut self) {
        if let Some((evicted, freq)) = self.buckets.pop_min() {
            self.index.remove(&evicted.key);
            trace!(
                capacity = self.capacity,
                freq, "lfu evicted least frequently used entry"
            );
        }
    }
}

impl<K, V> CoreCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.buckets.touch(id);
        self.buckets.get(id).map(|entry| &entry.value)
    }

    #[inline]
    fn put(&mut self, key: K, value: V) {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.buckets.get_mut(id) {
                entry.value = value;
            }
            self.buckets.touch(id);
            return;
        }

        if self.capacity == 0 {
            return;
        }

        if self.index.len() >= self.capacity {
            self.evict_lfu();
        }

        let id = self.buckets.insert(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
    }

    #[inline]
    fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.buckets.get(id).map(|entry| &entry.value)
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

impl<K, V> LfuCacheTrait<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn peek_lfu(&self) -> Option<(&K, &V)> {
        self.buckets
            .peek_min()
            .map(|(entry, _)| (&entry.key, &entry.value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.buckets.frequency(id)
    }

    fn min_frequency(&self) -> Option<u64> {
        self.buckets.min_freq()
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .field("min_freq", &self.buckets.min_freq())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}
