//! Arena of values addressed by stable `SlotId` indices.
//!
//! Backing store for the linked structures in this crate: list nodes and
//! frequency-bucket entries live here and link to each other by `SlotId`
//! instead of by pointer.
//!
//! ## Layout
//!
//! ```text
//!   slots: [ Occupied(A) | Vacant(→3) | Occupied(B) | Vacant(end) | Occupied(C) ]
//!                            ▲
//!   free_head ───────────────┘          free chain: 1 → 3 → end
//! ```
//!
//! A removed slot becomes the head of the free chain and is handed out by
//! the next `insert`. The chain is threaded through the vacant slots
//! themselves, so the arena needs no side allocation for it. A `SlotId`
//! is only meaningful while its value is live; after removal it may name
//! a different value.

/// Stable handle to a value stored in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Raw slot position, mostly useful for debugging output.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

/// Vector-backed arena with O(1) insert and remove and slot reuse.
///
/// # Example
///
/// ```
/// use twincache::ds::SlotArena;
///
/// let mut arena = SlotArena::new();
/// let a = arena.insert("a");
/// let b = arena.insert("b");
/// assert_eq!(arena.remove(a), Some("a"));
///
/// // The freed slot is reused first.
/// let c = arena.insert("c");
/// assert_eq!(c, a);
/// assert_eq!(arena.get(b), Some(&"b"));
/// assert_eq!(arena.len(), 2);
/// ```
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty arena with room for `capacity` values before the
    /// backing vector reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Stores `value`, reusing the most recently freed slot if there is one.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        let Some(idx) = self.free_head else {
            self.slots.push(Slot::Occupied(value));
            return SlotId(self.slots.len() - 1);
        };

        let slot = &mut self.slots[idx];
        debug_assert!(
            matches!(slot, Slot::Vacant { .. }),
            "free chain points at an occupied slot"
        );
        if let Slot::Vacant { next_free } = *slot {
            self.free_head = next_free;
        }
        *slot = Slot::Occupied(value);
        SlotId(idx)
    }

    /// Takes the value out of `id`, leaving the slot free for reuse.
    ///
    /// Returns `None` for vacant or out-of-range ids.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let vacated = Slot::Vacant {
            next_free: self.free_head,
        };
        let Slot::Occupied(value) = std::mem::replace(slot, vacated) else {
            return None;
        };
        self.free_head = Some(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Returns `true` if `id` currently holds a value.
    pub fn contains(&self, id: SlotId) -> bool {
        matches!(self.slots.get(id.0), Some(Slot::Occupied(_)))
    }

    /// Number of live values (not slots).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the arena agrees with a map of live ids after any
        /// interleaving of inserts and removes
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_live_set(ops in prop::collection::vec((any::<bool>(), 0usize..16), 0..200)) {
            let mut arena = SlotArena::new();
            let mut live: Vec<(SlotId, usize)> = Vec::new();

            for (step, (is_insert, pick)) in ops.into_iter().enumerate() {
                if is_insert || live.is_empty() {
                    let id = arena.insert(step);
                    prop_assert!(live.iter().all(|&(other, _)| other != id));
                    live.push((id, step));
                } else {
                    let (id, value) = live.swap_remove(pick % live.len());
                    prop_assert_eq!(arena.remove(id), Some(value));
                    prop_assert!(!arena.contains(id));
                }

                prop_assert_eq!(arena.len(), live.len());
                for &(id, value) in &live {
                    prop_assert_eq!(arena.get(id), Some(&value));
                }
            }
        }
    }
}
