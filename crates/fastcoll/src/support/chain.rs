// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! An arena of entries linked into a doubly-linked chain.
//!
//! Entries are addressed by stable [`EntryId`] handles. Vacated slots form a
//! free list and are reused by later insertions.

use crate::{internal::TableValidationError, service::Direction};
use core::{
    fmt,
    iter::FusedIterator,
    marker::PhantomData,
    ops::{Index, IndexMut},
};
use derive_where::derive_where;

/// A stable handle to an entry of a map or set.
///
/// A handle stays valid until its entry is removed. It is the position type
/// of every map-backed collection.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntryId(usize);

impl EntryId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A traversal position over a chain.
///
/// The cursor holds the entry it will yield next, never the one it yielded
/// last, so removing the last yielded entry leaves it valid.
#[derive(Clone, Debug)]
pub struct ChainCursor {
    next: Option<EntryId>,
    direction: Direction,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    prev: Option<EntryId>,
    next: Option<EntryId>,
}

#[derive(Clone, Debug)]
enum Slot<T> {
    Occupied(Node<T>),
    Vacant { next_free: Option<EntryId> },
}

impl<T> Slot<T> {
    #[inline]
    fn node(&self) -> Option<&Node<T>> {
        match self {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    fn node_mut(&mut self) -> Option<&mut Node<T>> {
        match self {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }
}

#[derive(Clone)]
pub(crate) struct Chain<T> {
    slots: Vec<Slot<T>>,
    free: Option<EntryId>,
    first: Option<EntryId>,
    last: Option<EntryId>,
    len: usize,
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Chain<T> {
    pub(crate) const fn new() -> Self {
        Self { slots: Vec::new(), free: None, first: None, last: None, len: 0 }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity), ..Self::new() }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn first(&self) -> Option<EntryId> {
        self.first
    }

    #[inline]
    pub(crate) fn last(&self) -> Option<EntryId> {
        self.last
    }

    #[inline]
    pub(crate) fn get(&self, id: EntryId) -> Option<&T> {
        self.slots.get(id.0).and_then(Slot::node).map(|node| &node.value)
    }

    /// Appends `value` at the tail of the chain.
    pub(crate) fn push_back(&mut self, value: T) -> EntryId {
        self.insert_after(self.last, value)
    }

    /// Links `value` directly after `anchor`, or at the head if `anchor` is
    /// `None`.
    pub(crate) fn insert_after(
        &mut self,
        anchor: Option<EntryId>,
        value: T,
    ) -> EntryId {
        let next = match anchor {
            Some(anchor) => self.node(anchor).next,
            None => self.first,
        };
        let id = self.allocate(Node { value, prev: anchor, next });
        match anchor {
            Some(anchor) => self.node_mut(anchor).next = Some(id),
            None => self.first = Some(id),
        }
        match next {
            Some(next) => self.node_mut(next).prev = Some(id),
            None => self.last = Some(id),
        }
        self.len += 1;
        id
    }

    /// Unlinks the entry and returns its value, freeing the slot.
    pub(crate) fn remove(&mut self, id: EntryId) -> T {
        let slot = core::mem::replace(
            &mut self.slots[id.0],
            Slot::Vacant { next_free: self.free },
        );
        let Slot::Occupied(node) = slot else {
            panic!("Chain index not found: {id:?}");
        };
        self.free = Some(id);
        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.first = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.last = node.prev,
        }
        self.len -= 1;
        node.value
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
        self.first = None;
        self.last = None;
        self.len = 0;
    }

    pub(crate) fn cursor(&self, direction: Direction) -> ChainCursor {
        let next = match direction {
            Direction::Forward => self.first,
            Direction::Backward => self.last,
        };
        ChainCursor { next, direction }
    }

    /// Starts a cursor at `id` (inclusive) instead of at an end.
    pub(crate) fn cursor_at(
        &self,
        id: Option<EntryId>,
        direction: Direction,
    ) -> ChainCursor {
        ChainCursor { next: id, direction }
    }

    pub(crate) fn advance(&self, cursor: &mut ChainCursor) -> Option<EntryId> {
        let id = cursor.next?;
        let node = self.node(id);
        cursor.next = match cursor.direction {
            Direction::Forward => node.next,
            Direction::Backward => node.prev,
        };
        Some(id)
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: self,
            front: self.first,
            back: self.last,
            remaining: self.len,
        }
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            slot_count: self.slots.len(),
            slots: self.slots.as_mut_ptr(),
            front: self.first,
            back: self.last,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TableValidationError> {
        let mut count = 0;
        let mut prev = None;
        let mut current = self.first;
        while let Some(id) = current {
            let node = self.slots.get(id.0).and_then(Slot::node).ok_or_else(
                || TableValidationError::new(format!("{id:?} is not live")),
            )?;
            if node.prev != prev {
                return Err(TableValidationError::new(format!(
                    "{id:?} has prev {:?}, expected {prev:?}",
                    node.prev
                )));
            }
            count += 1;
            if count > self.len {
                return Err(TableValidationError::new(format!(
                    "chain is longer than len {}",
                    self.len
                )));
            }
            prev = Some(id);
            current = node.next;
        }
        if prev != self.last {
            return Err(TableValidationError::new(format!(
                "chain ends at {prev:?}, but last is {:?}",
                self.last
            )));
        }
        if count != self.len {
            return Err(TableValidationError::new(format!(
                "chain has {count} entries, but len is {}",
                self.len
            )));
        }

        let mut free = 0;
        let mut current = self.free;
        while let Some(id) = current {
            match self.slots.get(id.0) {
                Some(Slot::Vacant { next_free }) => current = *next_free,
                _ => {
                    return Err(TableValidationError::new(format!(
                        "free list contains {id:?}, which is not vacant"
                    )));
                }
            }
            free += 1;
            if free > self.slots.len() {
                return Err(TableValidationError::new("free list is cyclic"));
            }
        }
        if free + self.len != self.slots.len() {
            return Err(TableValidationError::new(format!(
                "{free} free slots and {} entries, but {} slots",
                self.len,
                self.slots.len()
            )));
        }
        Ok(())
    }

    fn allocate(&mut self, node: Node<T>) -> EntryId {
        match self.free {
            Some(id) => {
                let Slot::Vacant { next_free } = self.slots[id.0] else {
                    panic!("free list entry {id:?} is occupied");
                };
                self.free = next_free;
                self.slots[id.0] = Slot::Occupied(node);
                id
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                EntryId(self.slots.len() - 1)
            }
        }
    }

    #[inline]
    fn node(&self, id: EntryId) -> &Node<T> {
        self.slots
            .get(id.0)
            .and_then(Slot::node)
            .unwrap_or_else(|| panic!("Chain index not found: {id:?}"))
    }

    #[inline]
    fn node_mut(&mut self, id: EntryId) -> &mut Node<T> {
        self.slots
            .get_mut(id.0)
            .and_then(Slot::node_mut)
            .unwrap_or_else(|| panic!("Chain index not found: {id:?}"))
    }
}

impl<T> Index<EntryId> for Chain<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: EntryId) -> &T {
        &self.node(id).value
    }
}

impl<T> IndexMut<EntryId> for Chain<T> {
    #[inline]
    fn index_mut(&mut self, id: EntryId) -> &mut T {
        &mut self.node_mut(id).value
    }
}

#[derive_where(Clone)]
#[derive_where(Debug; T: fmt::Debug)]
pub(crate) struct Iter<'a, T> {
    chain: &'a Chain<T>,
    front: Option<EntryId>,
    back: Option<EntryId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (EntryId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let node = self.chain.node(id);
        self.front = node.next;
        self.remaining -= 1;
        Some((id, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let node = self.chain.node(id);
        self.back = node.prev;
        self.remaining -= 1;
        Some((id, &node.value))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

pub(crate) struct IterMut<'a, T> {
    slots: *mut Slot<T>,
    slot_count: usize,
    front: Option<EntryId>,
    back: Option<EntryId>,
    remaining: usize,
    _marker: PhantomData<&'a mut [Slot<T>]>,
}

// SAFETY: `IterMut` hands out the same borrows as `&'a mut [Slot<T>]`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
// SAFETY: as above.
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<'a, T> IterMut<'a, T> {
    // Walks the links from both ends. Each live node is reached exactly once
    // before `remaining` hits zero, so no node is handed out twice.
    fn take(&mut self, id: EntryId) -> &'a mut Node<T> {
        if id.0 >= self.slot_count {
            panic!("Chain index not found: {id:?}");
        }
        // SAFETY: `id` is in bounds, the slots outlive `'a`, and no other
        // borrow of this slot exists (see above).
        let slot = unsafe { &mut *self.slots.add(id.0) };
        match slot {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("Chain index not found: {id:?}"),
        }
    }
}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("front", &self.front)
            .field("back", &self.back)
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = (EntryId, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let node = self.take(id);
        self.front = node.next;
        self.remaining -= 1;
        Some((id, &mut node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let node = self.take(id);
        self.back = node.prev;
        self.remaining -= 1;
        Some((id, &mut node.value))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(chain: &Chain<char>) -> Vec<char> {
        chain.iter().map(|(_, c)| *c).collect()
    }

    #[test]
    fn link_and_unlink() {
        let mut chain = Chain::new();
        let a = chain.push_back('a');
        let b = chain.push_back('b');
        let c = chain.push_back('c');
        assert_eq!(values(&chain), ['a', 'b', 'c']);

        assert_eq!(chain.remove(b), 'b');
        assert_eq!(values(&chain), ['a', 'c']);
        chain.validate().expect("chain should be valid");

        // The freed slot is reused.
        let d = chain.insert_after(None, 'd');
        assert_eq!(d, b);
        assert_eq!(values(&chain), ['d', 'a', 'c']);
        let e = chain.insert_after(Some(a), 'e');
        assert_eq!(values(&chain), ['d', 'a', 'e', 'c']);
        assert_eq!(
            chain.iter().rev().map(|(_, c)| *c).collect::<Vec<_>>(),
            ['c', 'e', 'a', 'd']
        );

        chain.remove(d);
        chain.remove(c);
        assert_eq!(chain.first(), Some(a));
        assert_eq!(chain.last(), Some(e));
        chain.validate().expect("chain should be valid");
    }

    #[test]
    fn cursor_survives_removing_yielded_entry() {
        let mut chain = Chain::new();
        for c in ['a', 'b', 'c', 'd'] {
            chain.push_back(c);
        }
        let mut cursor = chain.cursor(Direction::Forward);
        let mut seen = Vec::new();
        while let Some(id) = chain.advance(&mut cursor) {
            let value = chain[id];
            seen.push(value);
            if value == 'b' || value == 'c' {
                chain.remove(id);
            }
        }
        assert_eq!(seen, ['a', 'b', 'c', 'd']);
        assert_eq!(values(&chain), ['a', 'd']);
        chain.validate().expect("chain should be valid");
    }

    #[test]
    fn iter_mut_follows_chain() {
        let mut chain = Chain::new();
        let a = chain.push_back(1);
        chain.push_back(2);
        chain.insert_after(Some(a), 3);
        for (_, value) in chain.iter_mut() {
            *value *= 10;
        }
        let order: Vec<_> = chain.iter_mut().rev().map(|(_, v)| *v).collect();
        assert_eq!(order, [20, 30, 10]);
    }

    #[test]
    fn iter_mut_skips_vacant_slots() {
        let mut chain = Chain::new();
        let ids: Vec<_> = (0..10).map(|n| chain.push_back(n)).collect();
        for id in ids.iter().step_by(2) {
            chain.remove(*id);
        }

        let mut iter = chain.iter_mut();
        assert_eq!(iter.len(), 5);
        let mut seen = Vec::new();
        while let Some((_, value)) = iter.next() {
            *value += 100;
            seen.push(*value);
            if let Some((_, value)) = iter.next_back() {
                *value += 100;
                seen.push(*value);
            }
        }
        assert_eq!(seen, [101, 109, 103, 107, 105]);
        let values: Vec<_> = chain.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, [101, 103, 105, 107, 109]);
        chain.validate().expect("chain should be valid");
    }

    #[test]
    #[should_panic(expected = "Chain index not found")]
    fn stale_handle_panics() {
        let mut chain = Chain::new();
        let a = chain.push_back(1);
        chain.remove(a);
        let _ = chain[a];
    }
}
