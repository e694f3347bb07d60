// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The capability contract shared by every collection, map and view.
//!
//! A [`Collection`] exposes its elements through positions: a cursor is
//! advanced to obtain the next position, and a position is resolved to an
//! element with [`Collection::get`]. Positions are stable handles, so a
//! [`CursorMut`] can remove the element it just yielded and keep going.
//!
//! Views (see [`crate::view`]) implement the same traits over a target, so
//! they can be layered without the caller knowing which layer does what.
//!
//! Maps expose the parallel [`MapService`] and [`MapServiceMut`] traits,
//! which the key, value and entry views build on.

use crate::{
    equality::{Equality, Equivalence},
    errors::CollectionError,
    reduce::Reducer,
    view::Unmodifiable,
};
use core::{borrow::Borrow, fmt};

/// A traversal direction.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Direction {
    /// First to last.
    #[default]
    Forward,
    /// Last to first.
    Backward,
}

impl Direction {
    /// Returns the opposite direction.
    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// The read side of the capability contract.
///
/// Implementations must keep [`Self::len`] equal to the number of positions a
/// full traversal yields. A cursor must never depend on the position it
/// yielded last, so that position can be removed mid-traversal.
pub trait Collection {
    /// The element type.
    type Item;

    /// What [`Self::get`] returns: a reference into storage, or an owned
    /// value for views that compute their elements.
    type Ref<'a>: Borrow<Self::Item>
    where
        Self: 'a;

    /// A stable handle to an element.
    type Pos: Copy + Eq + fmt::Debug;

    /// Traversal state.
    type Cursor;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns true if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the equality strategy elements are compared with.
    fn equality(&self) -> &dyn Equivalence<Self::Item>;

    /// Starts a traversal in `direction`.
    fn cursor(&self, direction: Direction) -> Self::Cursor;

    /// Returns the next position of a traversal.
    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos>;

    /// Resolves a position to its element.
    ///
    /// Panics if `pos` is stale.
    fn get(&self, pos: Self::Pos) -> Self::Ref<'_>;

    /// Returns the first position holding an element equal to `item`.
    fn position(&self, item: &Self::Item) -> Option<Self::Pos> {
        let equality = self.equality();
        let mut cursor = self.cursor(Direction::Forward);
        while let Some(pos) = self.advance(&mut cursor) {
            let element = self.get(pos);
            if equality.equal(Borrow::<Self::Item>::borrow(&element), item) {
                return Some(pos);
            }
        }
        None
    }

    /// Returns true if an element equal to `item` is present.
    fn contains(&self, item: &Self::Item) -> bool {
        self.position(item).is_some()
    }

    /// Iterates from first to last.
    fn iter(&self) -> Iter<'_, Self>
    where
        Self: Sized,
    {
        Iter::new(self, Direction::Forward)
    }

    /// Iterates from last to first.
    fn iter_rev(&self) -> Iter<'_, Self>
    where
        Self: Sized,
    {
        Iter::new(self, Direction::Backward)
    }

    /// Calls `f` on every element, first to last.
    fn for_each_item<F>(&self, mut f: F)
    where
        Self: Sized,
        F: FnMut(&Self::Item),
    {
        let mut cursor = self.cursor(Direction::Forward);
        while let Some(pos) = self.advance(&mut cursor) {
            f(Borrow::<Self::Item>::borrow(&self.get(pos)));
        }
    }

    /// Splits the collection into at most `n` disjoint, contiguous,
    /// read-only partitions that together cover every element in traversal
    /// order.
    ///
    /// At least one partition is always returned, even if it is empty. For
    /// partitions with write access, see [`CollectionMut::update_partitions`].
    fn split(&self, n: usize) -> Vec<Partition<'_, Self>>
    where
        Self: Sized,
    {
        partition_positions(self, n)
            .into_iter()
            .map(|positions| Partition::new(self, positions))
            .collect()
    }

    /// Folds the collection with `reducer`, stopping early if the reducer
    /// asks to.
    fn reduce<R>(&self, mut reducer: R) -> R::Output
    where
        Self: Sized,
        R: Reducer<Self::Item>,
    {
        reducer.accept(self);
        reducer.get()
    }

    /// Runs a read-only action. Mutators called by the action fail with
    /// [`CollectionError::PermissionDenied`].
    fn perform<F, T>(&self, action: F) -> T
    where
        Self: Sized,
        F: FnOnce(&mut Unmodifiable<&Self>) -> T,
    {
        action(&mut Unmodifiable::new(self))
    }
}

/// The write side of the capability contract.
pub trait CollectionMut: Collection {
    /// Adds `item`. Returns true if the collection changed.
    fn add(&mut self, item: Self::Item) -> Result<bool, CollectionError>;

    /// Removes the element at `pos`.
    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError>;

    /// Removes the first element equal to `item`. Returns true if one was
    /// found.
    fn remove(&mut self, item: &Self::Item) -> Result<bool, CollectionError> {
        match self.position(item) {
            Some(pos) => {
                self.remove_at(pos)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes every element.
    fn clear(&mut self) -> Result<(), CollectionError> {
        let mut cursor = self.cursor(Direction::Forward);
        while let Some(pos) = self.advance(&mut cursor) {
            self.remove_at(pos)?;
        }
        Ok(())
    }

    /// Removes every element matching `predicate`, returning how many were
    /// removed.
    fn remove_if<P>(
        &mut self,
        mut predicate: P,
    ) -> Result<usize, CollectionError>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> bool,
    {
        let mut cursor = self.cursor_mut(Direction::Forward);
        let mut removed = 0;
        loop {
            let matches = match cursor.next() {
                Some(item) => predicate(Borrow::<Self::Item>::borrow(&item)),
                None => break,
            };
            if matches {
                cursor.remove()?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Keeps only the elements matching `keep`, returning how many were
    /// removed.
    fn retain<P>(&mut self, mut keep: P) -> Result<usize, CollectionError>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> bool,
    {
        self.remove_if(|item| !keep(item))
    }

    /// Starts a traversal that can remove the elements it yields.
    fn cursor_mut(&mut self, direction: Direction) -> CursorMut<'_, Self>
    where
        Self: Sized,
    {
        CursorMut::new(self, direction)
    }

    /// Runs a mutating action against this collection.
    fn update<F, T>(&mut self, action: F) -> T
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> T,
    {
        action(self)
    }

    /// Splits the collection as [`Collection::split`] does and runs `action`
    /// on each partition in turn, returning the results in partition order.
    ///
    /// Each [`PartitionMut`] removes only its own elements. Writes fail with
    /// whatever error the collection itself reports, so the partitions of an
    /// [`Unmodifiable`] view stay read-only.
    fn update_partitions<F, T>(&mut self, n: usize, mut action: F) -> Vec<T>
    where
        Self: Sized,
        F: FnMut(&mut PartitionMut<'_, Self>) -> T,
    {
        let chunks = partition_positions(&*self, n);
        let mut results = Vec::with_capacity(chunks.len());
        for positions in chunks {
            results.push(action(&mut PartitionMut::new(self, positions)));
        }
        results
    }
}

// Traversal positions cut into at most `n` contiguous chunks, never fewer
// than one.
fn partition_positions<C: Collection + ?Sized>(
    collection: &C,
    n: usize,
) -> Vec<Vec<C::Pos>> {
    let mut positions = Vec::with_capacity(collection.len());
    let mut cursor = collection.cursor(Direction::Forward);
    while let Some(pos) = collection.advance(&mut cursor) {
        positions.push(pos);
    }
    if positions.is_empty() {
        return vec![positions];
    }
    let chunk = positions.len().div_ceil(n.max(1));
    positions.chunks(chunk).map(<[C::Pos]>::to_vec).collect()
}

/// Deep duplication of owned storage.
///
/// Owning structures clone themselves. Views clone their target and wrap the
/// clone in the same layers.
pub trait DeepClone {
    /// The owned result.
    type Owned;

    /// Duplicates the underlying storage.
    fn deep_clone(&self) -> Self::Owned;
}

/// An iterator over a [`Collection`].
///
/// Created by [`Collection::iter`] and [`Collection::iter_rev`].
pub struct Iter<'a, C: Collection + ?Sized + 'a> {
    target: &'a C,
    cursor: C::Cursor,
}

impl<'a, C: Collection + ?Sized + 'a> Iter<'a, C> {
    /// Starts iterating over `target` in `direction`.
    pub fn new(target: &'a C, direction: Direction) -> Self {
        Self { target, cursor: target.cursor(direction) }
    }
}

impl<'a, C: Collection + ?Sized + 'a> Iterator for Iter<'a, C> {
    type Item = C::Ref<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.target.advance(&mut self.cursor)?;
        Some(self.target.get(pos))
    }
}

impl<'a, C: Collection + ?Sized + 'a> fmt::Debug for Iter<'a, C>
where
    C::Cursor: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("cursor", &self.cursor).finish()
    }
}

/// A traversal that can remove the element it yielded last.
///
/// Created by [`CollectionMut::cursor_mut`].
pub struct CursorMut<'a, C: Collection + ?Sized> {
    target: &'a mut C,
    cursor: C::Cursor,
    current: Option<C::Pos>,
}

impl<'a, C: CollectionMut + ?Sized> CursorMut<'a, C> {
    /// Starts a traversal of `target` in `direction`.
    pub fn new(target: &'a mut C, direction: Direction) -> Self {
        let cursor = target.cursor(direction);
        Self { target, cursor, current: None }
    }

    /// Advances, returning the next element.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<C::Ref<'_>> {
        let pos = self.target.advance(&mut self.cursor)?;
        self.current = Some(pos);
        Some(self.target.get(pos))
    }

    /// Removes the element returned by the last call to [`Self::next`].
    ///
    /// Fails with [`CollectionError::IllegalState`] before the first call to
    /// `next`, or when called twice without an intervening `next`.
    pub fn remove(&mut self) -> Result<(), CollectionError> {
        let pos = self.current.take().ok_or(CollectionError::IllegalState(
            "cursor remove without a current element",
        ))?;
        self.target.remove_at(pos)
    }
}

/// A contiguous, read-only slice of a collection's traversal.
///
/// Created by [`Collection::split`]. The partition borrows the collection
/// shared, so mutators fail with [`CollectionError::PermissionDenied`].
pub struct Partition<'a, C: Collection + ?Sized> {
    target: &'a C,
    positions: Vec<C::Pos>,
}

impl<'a, C: Collection + ?Sized> Partition<'a, C> {
    pub(crate) fn new(target: &'a C, positions: Vec<C::Pos>) -> Self {
        Self { target, positions }
    }

    /// Returns the positions covered by this partition.
    pub fn positions(&self) -> &[C::Pos] {
        &self.positions
    }
}

impl<C: Collection + ?Sized> fmt::Debug for Partition<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partition")
            .field("positions", &self.positions)
            .finish_non_exhaustive()
    }
}

/// Traversal state over a [`Partition`].
#[derive(Clone, Debug)]
pub struct PartitionCursor {
    front: usize,
    back: usize,
    direction: Direction,
}

impl<'p, C: Collection + ?Sized> Collection for Partition<'p, C> {
    type Item = C::Item;
    type Ref<'a>
        = C::Ref<'a>
    where
        Self: 'a;
    type Pos = C::Pos;
    type Cursor = PartitionCursor;

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn equality(&self) -> &dyn Equivalence<Self::Item> {
        self.target.equality()
    }

    fn cursor(&self, direction: Direction) -> Self::Cursor {
        PartitionCursor { front: 0, back: self.positions.len(), direction }
    }

    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        if cursor.front >= cursor.back {
            return None;
        }
        match cursor.direction {
            Direction::Forward => {
                cursor.front += 1;
                Some(self.positions[cursor.front - 1])
            }
            Direction::Backward => {
                cursor.back -= 1;
                Some(self.positions[cursor.back])
            }
        }
    }

    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        self.target.get(pos)
    }
}

impl<C: Collection + ?Sized> CollectionMut for Partition<'_, C> {
    fn add(&mut self, _item: Self::Item) -> Result<bool, CollectionError> {
        Err(CollectionError::PermissionDenied("add to partition"))
    }

    fn remove_at(&mut self, _pos: Self::Pos) -> Result<(), CollectionError> {
        Err(CollectionError::PermissionDenied("remove from partition"))
    }

    fn remove(&mut self, _item: &Self::Item) -> Result<bool, CollectionError> {
        Err(CollectionError::PermissionDenied("remove from partition"))
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        Err(CollectionError::PermissionDenied("clear partition"))
    }
}

/// A contiguous slice of a collection's traversal with write access to the
/// elements in it.
///
/// Created by [`CollectionMut::update_partitions`]. Removing an element
/// outside the partition fails with [`CollectionError::InvalidArgument`].
/// Added elements join the whole collection and are not traversed by the
/// partition.
pub struct PartitionMut<'a, C: Collection + ?Sized> {
    target: &'a mut C,
    // Removed positions are tombstoned so that open cursors keep their
    // offsets.
    positions: Vec<Option<C::Pos>>,
    len: usize,
}

impl<'a, C: Collection + ?Sized> PartitionMut<'a, C> {
    fn new(target: &'a mut C, positions: Vec<C::Pos>) -> Self {
        let len = positions.len();
        let positions = positions.into_iter().map(Some).collect();
        Self { target, positions, len }
    }

    /// Returns the positions still covered by this partition.
    pub fn positions(&self) -> impl Iterator<Item = C::Pos> + '_ {
        self.positions.iter().flatten().copied()
    }
}

impl<C: Collection + ?Sized> fmt::Debug for PartitionMut<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionMut")
            .field("positions", &self.positions)
            .finish_non_exhaustive()
    }
}

impl<'p, C: Collection + ?Sized> Collection for PartitionMut<'p, C> {
    type Item = C::Item;
    type Ref<'a>
        = C::Ref<'a>
    where
        Self: 'a;
    type Pos = C::Pos;
    type Cursor = PartitionCursor;

    fn len(&self) -> usize {
        self.len
    }

    fn equality(&self) -> &dyn Equivalence<Self::Item> {
        self.target.equality()
    }

    fn cursor(&self, direction: Direction) -> Self::Cursor {
        PartitionCursor { front: 0, back: self.positions.len(), direction }
    }

    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        while cursor.front < cursor.back {
            let slot = match cursor.direction {
                Direction::Forward => {
                    cursor.front += 1;
                    self.positions[cursor.front - 1]
                }
                Direction::Backward => {
                    cursor.back -= 1;
                    self.positions[cursor.back]
                }
            };
            if slot.is_some() {
                return slot;
            }
        }
        None
    }

    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        self.target.get(pos)
    }
}

impl<C: CollectionMut + ?Sized> CollectionMut for PartitionMut<'_, C> {
    fn add(&mut self, item: Self::Item) -> Result<bool, CollectionError> {
        self.target.add(item)
    }

    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError> {
        let slot = self
            .positions
            .iter_mut()
            .find(|slot| **slot == Some(pos))
            .ok_or(CollectionError::InvalidArgument(
                "remove outside partition",
            ))?;
        self.target.remove_at(pos)?;
        *slot = None;
        self.len -= 1;
        Ok(())
    }
}

impl<'r, C: Collection + ?Sized> Collection for &'r C {
    type Item = C::Item;
    type Ref<'a>
        = C::Ref<'a>
    where
        Self: 'a;
    type Pos = C::Pos;
    type Cursor = C::Cursor;

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    #[inline]
    fn equality(&self) -> &dyn Equivalence<Self::Item> {
        (**self).equality()
    }

    #[inline]
    fn cursor(&self, direction: Direction) -> Self::Cursor {
        (**self).cursor(direction)
    }

    #[inline]
    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        (**self).advance(cursor)
    }

    #[inline]
    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        (**self).get(pos)
    }

    #[inline]
    fn position(&self, item: &Self::Item) -> Option<Self::Pos> {
        (**self).position(item)
    }

    #[inline]
    fn contains(&self, item: &Self::Item) -> bool {
        (**self).contains(item)
    }
}

impl<'r, C: Collection + ?Sized> Collection for &'r mut C {
    type Item = C::Item;
    type Ref<'a>
        = C::Ref<'a>
    where
        Self: 'a;
    type Pos = C::Pos;
    type Cursor = C::Cursor;

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    #[inline]
    fn equality(&self) -> &dyn Equivalence<Self::Item> {
        (**self).equality()
    }

    #[inline]
    fn cursor(&self, direction: Direction) -> Self::Cursor {
        (**self).cursor(direction)
    }

    #[inline]
    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        (**self).advance(cursor)
    }

    #[inline]
    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        (**self).get(pos)
    }

    #[inline]
    fn position(&self, item: &Self::Item) -> Option<Self::Pos> {
        (**self).position(item)
    }

    #[inline]
    fn contains(&self, item: &Self::Item) -> bool {
        (**self).contains(item)
    }
}

impl<'r, C: CollectionMut + ?Sized> CollectionMut for &'r mut C {
    #[inline]
    fn add(&mut self, item: Self::Item) -> Result<bool, CollectionError> {
        (**self).add(item)
    }

    #[inline]
    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError> {
        (**self).remove_at(pos)
    }

    #[inline]
    fn remove(&mut self, item: &Self::Item) -> Result<bool, CollectionError> {
        (**self).remove(item)
    }

    #[inline]
    fn clear(&mut self) -> Result<(), CollectionError> {
        (**self).clear()
    }
}

impl<C: DeepClone + ?Sized> DeepClone for &C {
    type Owned = C::Owned;

    fn deep_clone(&self) -> Self::Owned {
        (**self).deep_clone()
    }
}

impl<C: DeepClone + ?Sized> DeepClone for &mut C {
    type Owned = C::Owned;

    fn deep_clone(&self) -> Self::Owned {
        (**self).deep_clone()
    }
}

/// The read side of the map contract.
///
/// Maps are traversed by entry. Views over keys, values and entries (see
/// [`crate::view::Keys`] and friends) are built on this trait.
pub trait MapService {
    /// The key type.
    type Key;
    /// The value type.
    type Value;
    /// A stable handle to an entry.
    type Pos: Copy + Eq + fmt::Debug;
    /// Traversal state.
    type Cursor;

    /// Returns the number of entries.
    fn entry_count(&self) -> usize;

    /// Returns the key equality strategy.
    fn key_equality(&self) -> Equality<Self::Key>;

    /// Returns the value equality strategy.
    fn value_equality(&self) -> Equality<Self::Value>;

    /// Starts a traversal in `direction`.
    fn map_cursor(&self, direction: Direction) -> Self::Cursor;

    /// Returns the next entry of a traversal.
    fn advance_entry(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos>;

    /// Resolves a position to its entry.
    ///
    /// Panics if `pos` is stale.
    fn entry(&self, pos: Self::Pos) -> &(Self::Key, Self::Value);

    /// Finds the entry for `key`.
    fn find(&self, key: &Self::Key) -> Option<Self::Pos>;
}

/// The write side of the map contract.
pub trait MapServiceMut: MapService {
    /// Associates `value` with `key`, returning the previous value.
    fn put(
        &mut self,
        key: Self::Key,
        value: Self::Value,
    ) -> Result<Option<Self::Value>, CollectionError>;

    /// Associates `value` with `key` unless `key` is already present.
    /// Returns true if the entry was added.
    fn put_if_absent(
        &mut self,
        key: Self::Key,
        value: Self::Value,
    ) -> Result<bool, CollectionError>;

    /// Removes the entry at `pos`.
    fn remove_entry_at(
        &mut self,
        pos: Self::Pos,
    ) -> Result<(Self::Key, Self::Value), CollectionError>;

    /// Returns mutable access to the value at `pos`.
    fn value_at_mut(
        &mut self,
        pos: Self::Pos,
    ) -> Result<&mut Self::Value, CollectionError>;

    /// Removes every entry.
    fn clear_entries(&mut self) -> Result<(), CollectionError>;
}

impl<M: MapService + ?Sized> MapService for &M {
    type Key = M::Key;
    type Value = M::Value;
    type Pos = M::Pos;
    type Cursor = M::Cursor;

    fn entry_count(&self) -> usize {
        (**self).entry_count()
    }

    fn key_equality(&self) -> Equality<Self::Key> {
        (**self).key_equality()
    }

    fn value_equality(&self) -> Equality<Self::Value> {
        (**self).value_equality()
    }

    fn map_cursor(&self, direction: Direction) -> Self::Cursor {
        (**self).map_cursor(direction)
    }

    fn advance_entry(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        (**self).advance_entry(cursor)
    }

    fn entry(&self, pos: Self::Pos) -> &(Self::Key, Self::Value) {
        (**self).entry(pos)
    }

    fn find(&self, key: &Self::Key) -> Option<Self::Pos> {
        (**self).find(key)
    }
}

impl<M: MapService + ?Sized> MapService for &mut M {
    type Key = M::Key;
    type Value = M::Value;
    type Pos = M::Pos;
    type Cursor = M::Cursor;

    fn entry_count(&self) -> usize {
        (**self).entry_count()
    }

    fn key_equality(&self) -> Equality<Self::Key> {
        (**self).key_equality()
    }

    fn value_equality(&self) -> Equality<Self::Value> {
        (**self).value_equality()
    }

    fn map_cursor(&self, direction: Direction) -> Self::Cursor {
        (**self).map_cursor(direction)
    }

    fn advance_entry(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        (**self).advance_entry(cursor)
    }

    fn entry(&self, pos: Self::Pos) -> &(Self::Key, Self::Value) {
        (**self).entry(pos)
    }

    fn find(&self, key: &Self::Key) -> Option<Self::Pos> {
        (**self).find(key)
    }
}

impl<M: MapServiceMut + ?Sized> MapServiceMut for &mut M {
    fn put(
        &mut self,
        key: Self::Key,
        value: Self::Value,
    ) -> Result<Option<Self::Value>, CollectionError> {
        (**self).put(key, value)
    }

    fn put_if_absent(
        &mut self,
        key: Self::Key,
        value: Self::Value,
    ) -> Result<bool, CollectionError> {
        (**self).put_if_absent(key, value)
    }

    fn remove_entry_at(
        &mut self,
        pos: Self::Pos,
    ) -> Result<(Self::Key, Self::Value), CollectionError> {
        (**self).remove_entry_at(pos)
    }

    fn value_at_mut(
        &mut self,
        pos: Self::Pos,
    ) -> Result<&mut Self::Value, CollectionError> {
        (**self).value_at_mut(pos)
    }

    fn clear_entries(&mut self) -> Result<(), CollectionError> {
        (**self).clear_entries()
    }
}
