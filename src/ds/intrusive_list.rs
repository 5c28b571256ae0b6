//! Intrusive doubly linked list backed by `SlotArena`, delimited by sentinels.
//!
//! Stores list nodes in a `SlotArena` and links them by `SlotId`, enabling
//! stable handles and O(1) splice/move operations without pointer chasing or
//! ownership cycles. Two sentinel nodes are allocated at construction and
//! never removed, so every real node always has both a predecessor and a
//! successor.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬──────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                   │
//!   ├────────┼──────────────────────────────────────────────┤
//!   │ head   │ { value: None,    prev: -,    next: id_2 }   │
//!   │ tail   │ { value: None,    prev: id_3, next: -    }   │
//!   │ id_2   │ { value: Some(A), prev: head, next: id_3 }   │
//!   │ id_3   │ { value: Some(B), prev: id_2, next: tail }   │
//!   └────────┴──────────────────────────────────────────────┘
//!
//!   [head] ◄──► [id_2] ◄──► [id_3] ◄──► [tail]
//!              front (MRU)  back (LRU)
//! ```
//!
//! ## Operations
//! - `push_front(value)`: allocate + attach after head
//! - `move_to_front(id)`: detach + attach after head
//! - `pop_back()`: detach node before tail + free slot in arena
//!
//! ## Performance
//! - `push_front` / `pop_back` / `move_to_front`: O(1)
//! - `iter`: O(n)

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Placeholder link for a sentinel before it is wired up.
const UNLINKED: SlotId = SlotId(usize::MAX);

#[derive(Debug)]
struct Node<T> {
    // `None` only for the two sentinels.
    value: Option<T>,
    prev: SlotId,
    next: SlotId,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Node {
            value: None,
            prev: UNLINKED,
            next: UNLINKED,
        }
    }
}

/// Intrusive list that stores nodes in a `SlotArena` and links them via `SlotId`.
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
    head: SlotId,
    tail: SlotId,
}

impl<T> IntrusiveList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::from_arena(SlotArena::new())
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_arena(SlotArena::with_capacity(capacity.saturating_add(2)))
    }

    fn from_arena(mut arena: SlotArena<Node<T>>) -> Self {
        let head = arena.insert(Node::sentinel());
        let tail = arena.insert(Node::sentinel());
        if let Some(node) = arena.get_mut(head) {
            node.next = tail;
        }
        if let Some(node) = arena.get_mut(tail) {
            node.prev = head;
        }
        Self { arena, head, tail }
    }

    /// Returns the number of nodes in the list, sentinels excluded.
    pub fn len(&self) -> usize {
        self.arena.len() - 2
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` is currently a value node in this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the value at the front (MRU) of the list.
    pub fn front(&self) -> Option<&T> {
        self.front_id().and_then(|id| self.get(id))
    }

    /// Returns the SlotId at the front (MRU) of the list.
    pub fn front_id(&self) -> Option<SlotId> {
        let first = self.arena.get(self.head)?.next;
        (first != self.tail).then_some(first)
    }

    /// Returns the value at the back (LRU) of the list.
    pub fn back(&self) -> Option<&T> {
        self.back_id().and_then(|id| self.get(id))
    }

    /// Returns the SlotId at the back (LRU) of the list.
    pub fn back_id(&self) -> Option<SlotId> {
        let last = self.arena.get(self.tail)?.prev;
        (last != self.head).then_some(last)
    }

    /// Returns an iterator from front to back.
    pub fn iter(&self) -> IntrusiveListIter<'_, T> {
        IntrusiveListIter {
            list: self,
            current: self.front_id(),
        }
    }

    /// Returns an iterator of SlotIds from front to back.
    pub fn iter_ids(&self) -> IntrusiveListIdIter<'_, T> {
        IntrusiveListIdIter {
            list: self,
            current: self.front_id(),
        }
    }

    /// Returns the value for a node id, if present.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).and_then(|node| node.value.as_ref())
    }

    /// Returns a mutable reference to a node value, if present.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).and_then(|node| node.value.as_mut())
    }

    /// Inserts a new node right after the head sentinel and returns its `SlotId`.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value: Some(value),
            prev: UNLINKED,
            next: UNLINKED,
        });
        self.attach_after(self.head, id);
        id
    }

    /// Removes and returns the value right before the tail sentinel.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.back_id()?;
        self.detach(id)?;
        self.arena.remove(id).and_then(|node| node.value)
    }

    /// Moves an existing node to the front; returns `false` if `id` is not present.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.front_id() == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_after(self.head, id);
        true
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        if let Some(prev_node) = self.arena.get_mut(prev) {
            prev_node.next = next;
        }
        if let Some(next_node) = self.arena.get_mut(next) {
            next_node.prev = prev;
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = UNLINKED;
            node.next = UNLINKED;
        }

        Some(())
    }

    fn attach_after(&mut self, anchor: SlotId, id: SlotId) -> Option<()> {
        let next = self.arena.get(anchor)?.next;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = anchor;
            node.next = next;
        } else {
            return None;
        }
        if let Some(anchor_node) = self.arena.get_mut(anchor) {
            anchor_node.next = id;
        }
        if let Some(next_node) = self.arena.get_mut(next) {
            next_node.prev = id;
        }
        Some(())
    }

    /// Walks the list from head to tail and checks link symmetry, sentinel
    /// placement and the node count.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let head = self
            .arena
            .get(self.head)
            .ok_or_else(|| InvariantError::new("head sentinel missing"))?;
        if head.value.is_some() {
            return Err(InvariantError::new("head sentinel holds a value"));
        }

        let mut count = 0usize;
        let mut prev = self.head;
        let mut current = head.next;
        while current != self.tail {
            let node = self
                .arena
                .get(current)
                .ok_or_else(|| InvariantError::new("linked node missing from arena"))?;
            if node.value.is_none() {
                return Err(InvariantError::new("sentinel found inside the list"));
            }
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "node {} has prev {} but was reached from {}",
                    current.index(),
                    node.prev.index(),
                    prev.index()
                )));
            }
            count += 1;
            if count > self.len() {
                return Err(InvariantError::new("cycle detected in list"));
            }
            prev = current;
            current = node.next;
        }

        let tail = self
            .arena
            .get(self.tail)
            .ok_or_else(|| InvariantError::new("tail sentinel missing"))?;
        if tail.value.is_some() {
            return Err(InvariantError::new("tail sentinel holds a value"));
        }
        if tail.prev != prev {
            return Err(InvariantError::new("tail sentinel prev link is stale"));
        }
        if count != self.len() {
            return Err(InvariantError::new(format!(
                "walked {count} nodes but arena holds {}",
                self.len()
            )));
        }
        Ok(())
    }
}

/// Iterator over values from front to back.
pub struct IntrusiveListIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for IntrusiveListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = (node.next != self.list.tail).then_some(node.next);
        node.value.as_ref()
    }
}

/// Iterator over SlotIds from front to back.
pub struct IntrusiveListIdIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for IntrusiveListIdIter<'a, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = (node.next != self.list.tail).then_some(node.next);
        Some(id)
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}
