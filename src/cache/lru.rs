//! Recency List Module
//!
//! Implements the recency ordering used for LRU eviction: a doubly linked
//! list whose nodes live in a slot arena and link to each other by index.
//!
//! ```text
//!   slots: Vec<Option<Node>>      free: Vec<usize>
//!
//!   head ─► [2] ◄──► [0] ◄──► [3] ◄── tail
//!           MRU                LRU
//! ```
//!
//! Every operation except iteration is O(1). Freed slots are reused, so an
//! [`EntryHandle`] is only meaningful while its entry is still linked.

use std::collections::TryReserveError;

use crate::cache::CacheEntry;

// == Entry Handle ==
/// Position handle of an entry inside a [`RecencyList`].
///
/// Non-owning: holding a handle does not keep the entry alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle(usize);

impl EntryHandle {
    /// Returns the arena slot index behind this handle.
    #[cfg(test)]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node<K, V> {
    entry: CacheEntry<K, V>,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Entries ordered by recency of use.
///
/// - Head = most recently used
/// - Tail = least recently used
#[derive(Debug)]
pub struct RecencyList<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Length ==
    /// Returns the number of linked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Lookup ==
    /// Returns the entry behind `handle`, if it is still linked.
    pub fn get(&self, handle: EntryHandle) -> Option<&CacheEntry<K, V>> {
        self.node(handle.0).map(|node| &node.entry)
    }

    /// Returns the least recently used entry without removing it.
    pub fn back(&self) -> Option<&CacheEntry<K, V>> {
        self.tail.and_then(|idx| self.node(idx)).map(|node| &node.entry)
    }

    /// Returns the most recently used entry.
    #[cfg(test)]
    pub(crate) fn front(&self) -> Option<&CacheEntry<K, V>> {
        self.head.and_then(|idx| self.node(idx)).map(|node| &node.entry)
    }

    // == Reserve ==
    /// Makes sure the next [`insert_front`](Self::insert_front), and any
    /// number of removals before it, will not allocate.
    ///
    /// Every slot can sit in the free list at most once, so room for
    /// `slots.len() + 1` free indices covers all removals.
    pub fn try_reserve_one(&mut self) -> Result<(), TryReserveError> {
        if self.free.is_empty() {
            self.slots.try_reserve(1)?;
        }
        let free_needed = self.slots.len() + 1 - self.free.len();
        self.free.try_reserve(free_needed)?;
        Ok(())
    }

    // == Insert Front ==
    /// Links `entry` at the head and returns its handle.
    ///
    /// The caller is responsible for key uniqueness.
    pub fn insert_front(&mut self, entry: CacheEntry<K, V>) -> EntryHandle {
        let node = Node {
            entry,
            prev: None,
            next: self.head,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => {
                if let Some(head_node) = self.node_mut(old_head) {
                    head_node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        EntryHandle(idx)
    }

    // == Move To Front ==
    /// Marks the entry as most recently used.
    ///
    /// Returns `false` if `handle` is not linked.
    pub fn move_to_front(&mut self, handle: EntryHandle) -> bool {
        let idx = handle.0;
        if self.node(idx).is_none() {
            return false;
        }
        if self.head == Some(idx) {
            return true;
        }
        self.detach(idx);

        let old_head = self.head;
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(old_head) => {
                if let Some(head_node) = self.node_mut(old_head) {
                    head_node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        true
    }

    // == Remove ==
    /// Unlinks the entry behind `handle` and returns it.
    pub fn remove(&mut self, handle: EntryHandle) -> Option<CacheEntry<K, V>> {
        let idx = handle.0;
        self.node(idx)?;
        self.detach(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(node.entry)
    }

    // == Remove Tail ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn remove_tail(&mut self) -> Option<CacheEntry<K, V>> {
        let tail = self.tail?;
        self.remove(EntryHandle(tail))
    }

    // == Iteration ==
    /// Iterates entries from least to most recently used.
    pub fn iter_from_tail(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            current: self.tail,
        }
    }

    /// Starts a detached walk from the tail towards the head.
    ///
    /// Unlike [`iter_from_tail`](Self::iter_from_tail) the cursor does not
    /// borrow the list, so the handle it just yielded may be removed before
    /// asking for the next one.
    pub fn cursor_from_tail(&self) -> TailCursor {
        TailCursor { next: self.tail }
    }

    fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.slots.get(idx).and_then(|slot| slot.as_ref())
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(idx).and_then(|slot| slot.as_mut())
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = match self.node(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.node_mut(prev_idx) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.node_mut(next_idx) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }

    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self) {
        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(idx) = current {
            let node = self.node(idx).expect("linked slot is empty");
            assert_eq!(node.prev, prev, "broken back link at slot {}", idx);
            prev = Some(idx);
            current = node.next;
            count += 1;
            assert!(count <= self.len, "cycle in recency list");
        }
        assert_eq!(self.tail, prev);
        assert_eq!(count, self.len);
        assert_eq!(self.slots.len() - self.free.len(), self.len);
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Iterators ==
/// Borrowing iterator from tail (LRU) to head (MRU).
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    current: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a CacheEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.current?)?;
        self.current = node.prev;
        Some(&node.entry)
    }
}

/// Detached cursor from tail (LRU) to head (MRU).
#[derive(Debug)]
pub struct TailCursor {
    next: Option<usize>,
}

impl TailCursor {
    /// Yields the next handle, reading its neighbour before handing it out.
    pub fn next<K, V>(&mut self, list: &RecencyList<K, V>) -> Option<EntryHandle> {
        let idx = self.next?;
        self.next = list.node(idx).and_then(|node| node.prev);
        Some(EntryHandle(idx))
    }
}
