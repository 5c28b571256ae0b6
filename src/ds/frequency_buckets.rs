//! Frequency buckets for O(1) LFU tracking.
//!
//! Owns its entries in a `SlotArena` and groups them by access frequency.
//! Each frequency that currently has entries gets a bucket: a doubly linked
//! list ordered by time of arrival at that frequency (oldest at the front),
//! plus links to the neighbouring non-empty frequencies. A `min_freq` cursor
//! points at the lowest non-empty bucket so the eviction victim is always
//! reachable in O(1).
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                      FrequencyBuckets<T> Layout                       │
//! │                                                                       │
//! │   ┌────────────────────────────────────────────────────────────────┐  │
//! │   │  entries: SlotArena<Entry<T>>                                  │  │
//! │   │                                                                │  │
//! │   │  ┌──────┬──────────────────────────────┐                       │  │
//! │   │  │ Slot │ Entry                        │                       │  │
//! │   │  ├──────┼──────────────────────────────┤                       │  │
//! │   │  │ id_0 │ value: A, freq: 2, prev/next │                       │  │
//! │   │  │ id_1 │ value: B, freq: 1, prev/next │                       │  │
//! │   │  │ id_2 │ value: C, freq: 1, prev/next │                       │  │
//! │   │  └──────┴──────────────────────────────┘                       │  │
//! │   └────────────────────────────────────────────────────────────────┘  │
//! │                                                                       │
//! │   ┌────────────────────────────────────────────────────────────────┐  │
//! │   │  buckets: FxHashMap<u64, Bucket>                               │  │
//! │   │                                                                │  │
//! │   │  min_freq = 1                                                  │  │
//! │   │       │                                                        │  │
//! │   │       ▼                                                        │  │
//! │   │  freq=1: head ──► [id_1] ◄──► [id_2] ◄── tail                  │  │
//! │   │                  oldest        newest                          │  │
//! │   │                  (evict first)                                 │  │
//! │   │                                                                │  │
//! │   │  freq=2: head ──► [id_0] ◄── tail                              │  │
//! │   │                                                                │  │
//! │   │  Bucket links: freq=1 ──next──► freq=2                         │  │
//! │   │                freq=2 ◄──prev── freq=1                         │  │
//! │   └────────────────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────────────┘
//!
//! Touch Flow (frequency bump)
//! ───────────────────────────
//!
//!   touch(id_1):
//!     1. Unlink id_1 from the freq=1 list
//!     2. If freq=1 is now empty → drop bucket; if it was min_freq, min_freq = 2
//!     3. Create the freq=2 bucket if needed
//!     4. Append id_1 to the back of freq=2 (newest at that frequency)
//!
//! Eviction Flow (pop_min)
//! ───────────────────────
//!
//!   pop_min():
//!     1. Take the front (oldest) of the min_freq bucket
//!     2. If the bucket empties → drop it, min_freq = next linked bucket
//!     3. Free the slot and return (value, freq)
//! ```
//!
//! ## Operations
//!
//! | Operation   | Time | Notes                                  |
//! |-------------|------|----------------------------------------|
//! | `insert`    | O(1) | New entry starts at freq=1             |
//! | `touch`     | O(1) | Increment frequency, append as newest  |
//! | `pop_min`   | O(1) | Evict LFU, oldest within the frequency |
//! | `peek_min`  | O(1) | Eviction candidate without removal     |
//! | `frequency` | O(1) | Query current frequency                |
//!
//! ## Example Usage
//!
//! ```
//! use twincache::ds::FrequencyBuckets;
//!
//! let mut freq = FrequencyBuckets::new();
//! let a = freq.insert("page_a");
//! let _b = freq.insert("page_b");
//!
//! freq.touch(a); // page_a at freq=2
//!
//! assert_eq!(freq.min_freq(), Some(1));
//! assert_eq!(freq.pop_min(), Some(("page_b", 1)));
//! assert_eq!(freq.min_freq(), Some(2));
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe; callers provide their own synchronization.

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Link pointers are touched on every bump and eviction, so they sit first.
#[derive(Debug)]
#[repr(C)]
struct Entry<T> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    freq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
    prev: Option<u64>,
    next: Option<u64>,
}

/// Default bucket pre-allocation for typical frequency distributions.
/// Most entries cluster at low frequencies, so 32 buckets covers most cases.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

/// O(1) LFU ordering structure with oldest-first tie-breaking within a frequency.
///
/// Entries are addressed by the [`SlotId`] returned from [`insert`](Self::insert);
/// the caller keeps its own key → `SlotId` index.
///
/// # Example
///
/// ```
/// use twincache::ds::FrequencyBuckets;
///
/// let mut freq = FrequencyBuckets::new();
/// let a = freq.insert('a');
/// let b = freq.insert('b');
/// freq.touch(a);
///
/// assert_eq!(freq.frequency(a), Some(2));
/// assert_eq!(freq.frequency(b), Some(1));
/// assert_eq!(freq.peek_min(), Some((&'b', 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyBuckets<T> {
    entries: SlotArena<Entry<T>>,
    buckets: FxHashMap<u64, Bucket>,
    // 0 means "no entries".
    min_freq: u64,
}

impl<T> FrequencyBuckets<T> {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            entries: SlotArena::new(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    /// Creates an empty tracker with reserved space for `capacity` entries.
    ///
    /// # Example
    ///
    /// ```
    /// use twincache::ds::FrequencyBuckets;
    ///
    /// let freq: FrequencyBuckets<String> = FrequencyBuckets::with_capacity(1000);
    /// assert!(freq.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SlotArena::with_capacity(capacity),
            buckets: FxHashMap::with_capacity_and_hasher(
                DEFAULT_BUCKET_PREALLOC,
                Default::default(),
            ),
            min_freq: 0,
        }
    }

    /// Returns the number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no tracked entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the lowest frequency that currently has an entry.
    ///
    /// # Example
    ///
    /// ```
    /// use twincache::ds::FrequencyBuckets;
    ///
    /// let mut freq = FrequencyBuckets::new();
    /// assert_eq!(freq.min_freq(), None);
    ///
    /// let a = freq.insert("a");
    /// freq.touch(a);
    /// assert_eq!(freq.min_freq(), Some(2));
    /// ```
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Returns the current frequency of `id`, if present.
    #[inline]
    pub fn frequency(&self, id: SlotId) -> Option<u64> {
        self.entries.get(id).map(|entry| entry.freq)
    }

    /// Returns the value stored at `id`, if present.
    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.entries.get(id).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value at `id` without changing its frequency.
    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.entries.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Returns the number of entries currently at `freq`.
    pub fn bucket_len(&self, freq: u64) -> usize {
        self.buckets.get(&freq).map(|bucket| bucket.len).unwrap_or(0)
    }

    /// Peeks the eviction candidate: the oldest entry of the min-frequency bucket.
    pub fn peek_min(&self) -> Option<(&T, u64)> {
        let id = self.peek_min_id()?;
        let entry = self.entries.get(id)?;
        Some((&entry.value, entry.freq))
    }

    /// Peeks the SlotId of the eviction candidate.
    pub fn peek_min_id(&self) -> Option<SlotId> {
        if self.min_freq == 0 {
            return None;
        }
        self.buckets.get(&self.min_freq)?.head
    }

    /// Returns an iterator over the values at `freq`, oldest first.
    ///
    /// # Example
    ///
    /// ```
    /// use twincache::ds::FrequencyBuckets;
    ///
    /// let mut freq = FrequencyBuckets::new();
    /// freq.insert("a");
    /// freq.insert("b");
    /// let c = freq.insert("c");
    /// freq.touch(c);
    ///
    /// let ones: Vec<_> = freq.iter_bucket(1).copied().collect();
    /// assert_eq!(ones, vec!["a", "b"]);
    /// ```
    pub fn iter_bucket(&self, freq: u64) -> FrequencyBucketIter<'_, T> {
        let head = self.buckets.get(&freq).and_then(|bucket| bucket.head);
        FrequencyBucketIter {
            buckets: self,
            current: head,
        }
    }

    /// Inserts a new entry with frequency 1, as the newest member of that bucket.
    #[inline]
    pub fn insert(&mut self, value: T) -> SlotId {
        let id = self.entries.insert(Entry {
            prev: None,
            next: None,
            freq: 1,
            value,
        });

        if !self.buckets.contains_key(&1) {
            let next = self.min_freq();
            self.link_bucket(1, None, next);
        }
        self.list_push_back(1, id);
        self.min_freq = 1;
        id
    }

    /// Increments the frequency of `id` and returns the new frequency.
    ///
    /// The entry becomes the newest member of its new bucket. If it leaves
    /// the min-frequency bucket empty, `min_freq` advances to the entry's new
    /// frequency. At `u64::MAX` the frequency saturates and the entry is only
    /// re-appended within its bucket.
    ///
    /// Returns `None` if `id` is not present.
    pub fn touch(&mut self, id: SlotId) -> Option<u64> {
        let current_freq = self.entries.get(id)?.freq;
        if current_freq == u64::MAX {
            self.list_remove(current_freq, id)?;
            self.list_push_back(current_freq, id);
            return Some(current_freq);
        }
        let next_freq = current_freq + 1;

        let (prev_link, next_link) = {
            let bucket = self.buckets.get(&current_freq)?;
            (bucket.prev, bucket.next)
        };

        self.list_remove(current_freq, id)?;
        let emptied = self.bucket_len(current_freq) == 0;
        if emptied {
            self.unlink_bucket(current_freq, prev_link, next_link);
            if self.min_freq == current_freq {
                self.min_freq = next_freq;
            }
        }

        if !self.buckets.contains_key(&next_freq) {
            let prev = if emptied {
                prev_link
            } else {
                Some(current_freq)
            };
            self.link_bucket(next_freq, prev, next_link);
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.freq = next_freq;
        }
        self.list_push_back(next_freq, id);
        Some(next_freq)
    }

    /// Removes and returns the oldest entry of the min-frequency bucket.
    ///
    /// An emptied bucket is dropped and `min_freq` moves to the next
    /// non-empty frequency, or to `None` when nothing is left.
    pub fn pop_min(&mut self) -> Option<(T, u64)> {
        let freq = self.min_freq()?;
        let id = self.buckets.get(&freq)?.head?;
        self.list_remove(freq, id)?;

        if self.bucket_len(freq) == 0 {
            let (prev, next) = {
                let bucket = self.buckets.get(&freq)?;
                (bucket.prev, bucket.next)
            };
            self.unlink_bucket(freq, prev, next);
            self.min_freq = next.unwrap_or(0);
        }

        let entry = self.entries.remove(id)?;
        Some((entry.value, entry.freq))
    }

    /// Checks bucket membership, link symmetry and the `min_freq` cursor.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.is_empty() {
            if !self.buckets.is_empty() {
                return Err(InvariantError::new("empty tracker still has buckets"));
            }
            if self.min_freq != 0 {
                return Err(InvariantError::new("empty tracker has a min_freq"));
            }
            return Ok(());
        }

        let lowest = self.buckets.keys().copied().min();
        if lowest != Some(self.min_freq) {
            return Err(InvariantError::new(format!(
                "min_freq is {} but lowest bucket is {:?}",
                self.min_freq, lowest
            )));
        }

        let mut total = 0usize;
        for (&freq, bucket) in &self.buckets {
            if freq == 0 {
                return Err(InvariantError::new("bucket at frequency 0"));
            }
            if bucket.len == 0 {
                return Err(InvariantError::new(format!("bucket {freq} is empty")));
            }
            match bucket.prev {
                Some(prev) => {
                    let linked = self.buckets.get(&prev).and_then(|b| b.next);
                    if prev >= freq || linked != Some(freq) {
                        return Err(InvariantError::new(format!(
                            "bucket {freq} has a broken prev link"
                        )));
                    }
                }
                None if freq != self.min_freq => {
                    return Err(InvariantError::new(format!(
                        "bucket {freq} has no prev but is not min_freq"
                    )));
                }
                None => {}
            }
            if let Some(next) = bucket.next {
                let linked = self.buckets.get(&next).and_then(|b| b.prev);
                if next <= freq || linked != Some(freq) {
                    return Err(InvariantError::new(format!(
                        "bucket {freq} has a broken next link"
                    )));
                }
            }

            let mut current = bucket.head;
            let mut last = None;
            let mut count = 0usize;
            while let Some(id) = current {
                let entry = self
                    .entries
                    .get(id)
                    .ok_or_else(|| InvariantError::new("bucket entry missing from arena"))?;
                if entry.freq != freq {
                    return Err(InvariantError::new(format!(
                        "entry at freq {} found in bucket {freq}",
                        entry.freq
                    )));
                }
                if entry.prev != last {
                    return Err(InvariantError::new("entry prev link is stale"));
                }
                last = Some(id);
                current = entry.next;
                count += 1;
                if count > self.len() {
                    return Err(InvariantError::new("cycle detected in bucket"));
                }
            }
            if bucket.tail != last || bucket.len != count {
                return Err(InvariantError::new(format!(
                    "bucket {freq} tail or length does not match its list"
                )));
            }
            total += count;
        }

        if total != self.len() {
            return Err(InvariantError::new(format!(
                "buckets hold {total} entries but arena holds {}",
                self.len()
            )));
        }
        Ok(())
    }

    /// Moves `id` straight to `freq`, linking buckets wherever they fall.
    #[cfg(test)]
    fn set_frequency(&mut self, id: SlotId, freq: u64) -> Option<()> {
        let current = self.entries.get(id)?.freq;
        self.list_remove(current, id)?;
        if self.bucket_len(current) == 0 {
            let (prev, next) = {
                let bucket = self.buckets.get(&current)?;
                (bucket.prev, bucket.next)
            };
            self.unlink_bucket(current, prev, next);
        }

        if !self.buckets.contains_key(&freq) {
            let prev = self.buckets.keys().copied().filter(|&f| f < freq).max();
            let next = self.buckets.keys().copied().filter(|&f| f > freq).min();
            self.link_bucket(freq, prev, next);
        }
        self.entries.get_mut(id)?.freq = freq;
        self.list_push_back(freq, id);
        self.min_freq = self.buckets.keys().copied().min().unwrap_or(0);
        Some(())
    }

    fn link_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                prev,
                next,
                ..Bucket::default()
            },
        );

        if let Some(prev) = prev
            && let Some(prev_bucket) = self.buckets.get_mut(&prev)
        {
            prev_bucket.next = Some(freq);
        }
        if let Some(next) = next
            && let Some(next_bucket) = self.buckets.get_mut(&next)
        {
            next_bucket.prev = Some(freq);
        }
    }

    fn unlink_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev) = prev
            && let Some(prev_bucket) = self.buckets.get_mut(&prev)
        {
            prev_bucket.next = next;
        }
        if let Some(next) = next
            && let Some(next_bucket) = self.buckets.get_mut(&next)
        {
            next_bucket.prev = prev;
        }
        self.buckets.remove(&freq);
    }

    fn list_push_back(&mut self, freq: u64, id: SlotId) {
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            return;
        };

        let old_tail = bucket.tail;
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = old_tail;
            entry.next = None;
        }
        if let Some(old_tail) = old_tail {
            if let Some(entry) = self.entries.get_mut(old_tail) {
                entry.next = Some(id);
            }
        } else {
            bucket.head = Some(id);
        }
        bucket.tail = Some(id);
        bucket.len += 1;
    }

    fn list_remove(&mut self, freq: u64, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let entry = self.entries.get(id)?;
            (entry.prev, entry.next)
        };

        let bucket = self.buckets.get_mut(&freq)?;
        if let Some(prev) = prev {
            if let Some(entry) = self.entries.get_mut(prev) {
                entry.next = next;
            }
        } else {
            bucket.head = next;
        }
        if let Some(next) = next {
            if let Some(entry) = self.entries.get_mut(next) {
                entry.prev = prev;
            }
        } else {
            bucket.tail = prev;
        }
        bucket.len = bucket.len.saturating_sub(1);

        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
        Some(())
    }
}

impl<T> Default for FrequencyBuckets<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the values of one bucket, oldest first.
pub struct FrequencyBucketIter<'a, T> {
    buckets: &'a FrequencyBuckets<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for FrequencyBucketIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let entry = self.buckets.entries.get(id)?;
        self.current = entry.next;
        Some(&entry.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_buckets_basic_flow() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert("a");
        let _b = buckets.insert("b");

        assert_eq!(buckets.frequency(a), Some(1));
        assert_eq!(buckets.min_freq(), Some(1));

        assert_eq!(buckets.touch(a), Some(2));
        assert_eq!(buckets.frequency(a), Some(2));
        assert_eq!(buckets.min_freq(), Some(1));

        assert_eq!(buckets.pop_min(), Some(("b", 1)));
        assert_eq!(buckets.min_freq(), Some(2));
        buckets.check_invariants().unwrap();
    }

    #[test]
    fn frequency_buckets_touch_missing_returns_none() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert(1u8);
        assert_eq!(buckets.pop_min(), Some((1, 1)));

        assert_eq!(buckets.touch(a), None);
        assert_eq!(buckets.min_freq(), None);
        assert!(buckets.is_empty());
    }

    #[test]
    fn frequency_buckets_pop_min_on_empty() {
        let mut buckets: FrequencyBuckets<&str> = FrequencyBuckets::new();
        assert_eq!(buckets.pop_min(), None);
        assert_eq!(buckets.peek_min(), None);
        assert_eq!(buckets.peek_min_id(), None);
        assert_eq!(buckets.min_freq(), None);
        buckets.check_invariants().unwrap();
    }

    #[test]
    fn frequency_buckets_oldest_first_within_same_frequency() {
        let mut buckets = FrequencyBuckets::new();
        buckets.insert("a");
        buckets.insert("b");
        buckets.insert("c");

        assert_eq!(buckets.pop_min(), Some(("a", 1)));
        assert_eq!(buckets.pop_min(), Some(("b", 1)));
        assert_eq!(buckets.pop_min(), Some(("c", 1)));
        assert!(buckets.is_empty());
    }

    #[test]
    fn frequency_buckets_touch_moves_behind_existing_members() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert("a");
        let b = buckets.insert("b");
        buckets.insert("c");

        // "b" reaches freq=2 before "a", so "b" is older there.
        buckets.touch(b);
        buckets.touch(a);
        let order: Vec<_> = buckets.iter_bucket(2).copied().collect();
        assert_eq!(order, vec!["b", "a"]);

        assert_eq!(buckets.pop_min(), Some(("c", 1)));
        assert_eq!(buckets.pop_min(), Some(("b", 2)));
        assert_eq!(buckets.pop_min(), Some(("a", 2)));
    }

    #[test]
    fn frequency_buckets_min_freq_advances_by_one_on_touch() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert("a");
        let b = buckets.insert("b");
        buckets.touch(a);
        buckets.touch(a);
        buckets.touch(b);

        // freq(a)=3, freq(b)=2; bumping b empties min bucket 2.
        assert_eq!(buckets.min_freq(), Some(2));
        buckets.touch(b);
        assert_eq!(buckets.min_freq(), Some(3));
        assert_eq!(buckets.bucket_len(3), 2);
        assert_eq!(buckets.bucket_len(2), 0);
        buckets.check_invariants().unwrap();
    }

    #[test]
    fn frequency_buckets_pop_min_follows_bucket_links() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert("a");
        buckets.insert("b");
        for _ in 0..4 {
            buckets.touch(a);
        }

        assert_eq!(buckets.pop_min(), Some(("b", 1)));
        assert_eq!(buckets.min_freq(), Some(5));
        assert_eq!(buckets.peek_min(), Some((&"a", 5)));
        buckets.check_invariants().unwrap();
    }

    #[test]
    fn frequency_buckets_insert_resets_min_freq_to_one() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert("a");
        buckets.touch(a);
        buckets.touch(a);
        assert_eq!(buckets.min_freq(), Some(3));

        buckets.insert("b");
        assert_eq!(buckets.min_freq(), Some(1));
        assert_eq!(buckets.peek_min(), Some((&"b", 1)));
        buckets.check_invariants().unwrap();
    }

    #[test]
    fn frequency_buckets_get_mut_keeps_frequency() {
        let mut buckets = FrequencyBuckets::new();
        let id = buckets.insert(10);
        if let Some(value) = buckets.get_mut(id) {
            *value = 20;
        }
        assert_eq!(buckets.get(id), Some(&20));
        assert_eq!(buckets.frequency(id), Some(1));
    }

    #[test]
    fn frequency_buckets_touch_bridges_gap_between_buckets() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert("a");
        let b = buckets.insert("b");
        buckets.set_frequency(b, 9);
        buckets.check_invariants().unwrap();

        // freq 2 does not exist yet and must slot in between 1 and 9
        assert_eq!(buckets.touch(a), Some(2));
        assert_eq!(buckets.min_freq(), Some(2));
        assert_eq!(buckets.pop_min(), Some(("a", 2)));
        assert_eq!(buckets.min_freq(), Some(9));
        buckets.check_invariants().unwrap();
    }

    #[test]
    fn frequency_buckets_touch_saturates_at_max() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert("a");
        let b = buckets.insert("b");
        buckets.set_frequency(a, u64::MAX);
        buckets.set_frequency(b, u64::MAX);
        assert_eq!(buckets.min_freq(), Some(u64::MAX));
        buckets.check_invariants().unwrap();

        assert_eq!(buckets.touch(a), Some(u64::MAX));
        let order: Vec<_> = buckets.iter_bucket(u64::MAX).copied().collect();
        assert_eq!(order, vec!["b", "a"]);
        buckets.check_invariants().unwrap();
    }
}
