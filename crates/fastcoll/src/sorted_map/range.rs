// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::SortedMap;
use crate::{
    equality::Equality,
    errors::CollectionError,
    service::{DeepClone, Direction, MapService, MapServiceMut},
    support::chain::{Chain, ChainCursor, EntryId},
    view::{Entries, Keys, Unmodifiable, Values},
};
use core::{
    borrow::{Borrow, BorrowMut},
    cmp::Ordering,
    fmt,
    iter::FusedIterator,
    marker::PhantomData,
    ops::Bound,
};
use derive_where::derive_where;

/// A view of the entries of a [`SortedMap`] whose keys lie between two
/// bounds.
///
/// The view is a window over the map's entries: reads and removals go
/// straight to the map, and entries inserted into the map within the bounds
/// show up in the view. Inserting a key outside the bounds through the view
/// fails with [`CollectionError::InvalidArgument`].
///
/// `R` is `&SortedMap` for a read-only view, `&mut SortedMap` for a writable
/// one, or an owned `SortedMap`.
///
/// Created by [`SortedMap::range`], [`SortedMap::head_map`] and friends.
#[derive_where(Clone; K, R)]
#[derive_where(Debug; K: fmt::Debug, R: fmt::Debug)]
pub struct SortedRange<K, V, R> {
    map: R,
    lower: Bound<K>,
    upper: Bound<K>,
    _marker: PhantomData<fn() -> V>,
}

impl<K, V, R: Borrow<SortedMap<K, V>>> SortedRange<K, V, R> {
    pub(crate) fn new(
        map: R,
        lower: Bound<K>,
        upper: Bound<K>,
    ) -> Result<Self, CollectionError> {
        if let (
            Bound::Included(low) | Bound::Excluded(low),
            Bound::Included(high) | Bound::Excluded(high),
        ) = (&lower, &upper)
        {
            let target = Borrow::<SortedMap<K, V>>::borrow(&map);
            if target.compare_keys(low, high) == Ordering::Greater {
                return Err(CollectionError::InvalidArgument(
                    "range lower bound above upper bound",
                ));
            }
        }
        Ok(Self::unchecked(map, lower, upper))
    }

    pub(crate) fn unchecked(map: R, lower: Bound<K>, upper: Bound<K>) -> Self {
        Self { map, lower, upper, _marker: PhantomData }
    }

    #[inline]
    pub(crate) fn target(&self) -> &SortedMap<K, V> {
        Borrow::<SortedMap<K, V>>::borrow(&self.map)
    }

    /// Returns the lower bound.
    pub fn lower(&self) -> Bound<&K> {
        self.lower.as_ref()
    }

    /// Returns the upper bound.
    pub fn upper(&self) -> Bound<&K> {
        self.upper.as_ref()
    }

    /// Returns true if `key` lies within the bounds, whether or not the map
    /// has an entry for it.
    pub fn covers(&self, key: &K) -> bool {
        let target = self.target();
        let above = match &self.lower {
            Bound::Unbounded => true,
            Bound::Included(low) => {
                target.compare_keys(key, low) != Ordering::Less
            }
            Bound::Excluded(low) => {
                target.compare_keys(key, low) == Ordering::Greater
            }
        };
        above
            && match &self.upper {
                Bound::Unbounded => true,
                Bound::Included(high) => {
                    target.compare_keys(key, high) != Ordering::Greater
                }
                Bound::Excluded(high) => {
                    target.compare_keys(key, high) == Ordering::Less
                }
            }
    }

    /// Returns the number of entries within the bounds. This walks the
    /// range.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if no entry lies within the bounds.
    pub fn is_empty(&self) -> bool {
        self.ends().is_none()
    }

    /// Returns the value for `key`, if `key` is within the bounds.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.target().entries()[id].1)
    }

    /// Returns true if the map has an entry for `key` within the bounds.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the smallest key within the bounds.
    pub fn first_key(&self) -> Option<&K> {
        let (first, _) = self.ends()?;
        Some(&self.target().entries()[first].0)
    }

    /// Returns the largest key within the bounds.
    pub fn last_key(&self) -> Option<&K> {
        let (_, last) = self.ends()?;
        Some(&self.target().entries()[last].0)
    }

    /// Iterates over the entries within the bounds, in key order.
    pub fn iter(&self) -> RangeIter<'_, K, V> {
        RangeIter {
            entries: self.target().entries(),
            cursor: self.map_cursor(Direction::Forward),
        }
    }

    /// Returns a read-only view of the keys within the bounds.
    pub fn key_set(&self) -> Keys<&Self> {
        Keys::new(self)
    }

    /// Consumes the range, returning a view of its keys.
    pub fn into_key_set(self) -> Keys<Self> {
        Keys::new(self)
    }

    /// Returns a read-only view of the values within the bounds.
    pub fn values(&self) -> Values<&Self> {
        Values::new(self)
    }

    /// Returns a read-only view of the entries within the bounds.
    pub fn entry_set(&self) -> Entries<&Self> {
        Entries::new(self)
    }

    /// Returns a view of the range that rejects every mutation.
    pub fn unmodifiable(&self) -> Unmodifiable<&Self> {
        Unmodifiable::new(self)
    }

    /// The first and last entries within the bounds, in key order.
    fn ends(&self) -> Option<(EntryId, EntryId)> {
        let target = self.target();
        let first = target.lower_entry(&self.lower)?;
        let last = target.upper_entry(&self.upper)?;
        let entries = target.entries();
        let ordered = target.compare_keys(&entries[first].0, &entries[last].0)
            != Ordering::Greater;
        ordered.then_some((first, last))
    }
}

impl<K, V, R: BorrowMut<SortedMap<K, V>>> SortedRange<K, V, R> {
    #[inline]
    fn target_mut(&mut self) -> &mut SortedMap<K, V> {
        BorrowMut::<SortedMap<K, V>>::borrow_mut(&mut self.map)
    }

    /// Associates `value` with `key` in the map, returning the previous
    /// value.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `key` is outside
    /// the bounds.
    pub fn insert(
        &mut self,
        key: K,
        value: V,
    ) -> Result<Option<V>, CollectionError> {
        self.put(key, value)
    }

    /// Removes the entry for `key` if it lies within the bounds.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.find(key)?;
        Some(self.target_mut().remove_id(id).1)
    }

    /// Removes every entry within the bounds.
    pub fn clear(&mut self) {
        let mut cursor = self.map_cursor(Direction::Forward);
        while let Some(id) = self.advance_entry(&mut cursor) {
            self.target_mut().remove_id(id);
        }
    }

    /// Returns a view of the keys within the bounds that removes entries
    /// from the map.
    pub fn key_set_mut(&mut self) -> Keys<&mut Self> {
        Keys::new(self)
    }
}

impl<K, V, R> DeepClone for SortedRange<K, V, R>
where
    K: Clone,
    V: Clone,
    R: Borrow<SortedMap<K, V>>,
{
    type Owned = SortedRange<K, V, SortedMap<K, V>>;

    fn deep_clone(&self) -> Self::Owned {
        SortedRange::unchecked(
            self.target().clone(),
            self.lower.clone(),
            self.upper.clone(),
        )
    }
}

/// Traversal state over a [`SortedRange`].
#[derive(Clone, Debug)]
pub struct RangeCursor {
    inner: ChainCursor,
    // The last entry to yield; `None` once it has been yielded.
    end: Option<EntryId>,
}

impl RangeCursor {
    fn step<T>(&mut self, entries: &Chain<T>) -> Option<EntryId> {
        let end = self.end?;
        let id = entries.advance(&mut self.inner)?;
        if id == end {
            self.end = None;
        }
        Some(id)
    }
}

impl<K, V, R: Borrow<SortedMap<K, V>>> MapService for SortedRange<K, V, R> {
    type Key = K;
    type Value = V;
    type Pos = EntryId;
    type Cursor = RangeCursor;

    fn entry_count(&self) -> usize {
        self.len()
    }

    fn key_equality(&self) -> Equality<K> {
        self.target().key_equality()
    }

    fn value_equality(&self) -> Equality<V> {
        self.target().value_equality()
    }

    fn map_cursor(&self, direction: Direction) -> RangeCursor {
        let entries = self.target().entries();
        match self.ends() {
            Some((first, last)) => {
                let (start, end) = match direction {
                    Direction::Forward => (first, last),
                    Direction::Backward => (last, first),
                };
                RangeCursor {
                    inner: entries.cursor_at(Some(start), direction),
                    end: Some(end),
                }
            }
            None => RangeCursor {
                inner: entries.cursor_at(None, direction),
                end: None,
            },
        }
    }

    fn advance_entry(&self, cursor: &mut RangeCursor) -> Option<EntryId> {
        cursor.step(self.target().entries())
    }

    fn entry(&self, pos: EntryId) -> &(K, V) {
        &self.target().entries()[pos]
    }

    fn find(&self, key: &K) -> Option<EntryId> {
        if self.covers(key) {
            self.target().find(key)
        } else {
            None
        }
    }
}

impl<K, V, R: BorrowMut<SortedMap<K, V>>> MapServiceMut
    for SortedRange<K, V, R>
{
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, CollectionError> {
        if !self.covers(&key) {
            return Err(CollectionError::InvalidArgument("put outside range"));
        }
        Ok(self.target_mut().insert(key, value))
    }

    fn put_if_absent(
        &mut self,
        key: K,
        value: V,
    ) -> Result<bool, CollectionError> {
        if !self.covers(&key) {
            return Err(CollectionError::InvalidArgument("put outside range"));
        }
        Ok(self.target_mut().insert_if_absent(key, value).is_none())
    }

    fn remove_entry_at(
        &mut self,
        pos: EntryId,
    ) -> Result<(K, V), CollectionError> {
        self.target_mut().remove_entry_at(pos)
    }

    fn value_at_mut(
        &mut self,
        pos: EntryId,
    ) -> Result<&mut V, CollectionError> {
        self.target_mut().value_at_mut(pos)
    }

    fn clear_entries(&mut self) -> Result<(), CollectionError> {
        self.clear();
        Ok(())
    }
}

/// An iterator over the entries of a [`SortedRange`], in key order.
#[derive_where(Clone)]
#[derive_where(Debug; K: fmt::Debug, V: fmt::Debug)]
pub struct RangeIter<'a, K, V> {
    entries: &'a Chain<(K, V)>,
    cursor: RangeCursor,
}

impl<'a, K, V> Iterator for RangeIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor.step(self.entries)?;
        let (key, value) = &self.entries[id];
        Some((key, value))
    }
}

impl<K, V> FusedIterator for RangeIter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{Collection, CollectionMut};

    fn map() -> SortedMap<u32, char> {
        [(10, 'a'), (20, 'b'), (30, 'c'), (40, 'd'), (50, 'e')]
            .into_iter()
            .collect()
    }

    fn keys<R: Borrow<SortedMap<u32, char>>>(
        range: &SortedRange<u32, char, R>,
    ) -> Vec<u32> {
        range.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn bounds() {
        let map = map();
        assert_eq!(keys(&map.head_map(30)), [10, 20]);
        assert_eq!(keys(&map.tail_map(30)), [30, 40, 50]);
        let middle = map.sub_map(15, 45).expect("valid range");
        assert_eq!(keys(&middle), [20, 30, 40]);
        let gap = map.sub_map(21, 29).expect("valid range");
        assert!(gap.is_empty());
        assert_eq!(gap.first_key(), None);
        assert_eq!(
            map.sub_map(30, 10).err(),
            Some(CollectionError::InvalidArgument(
                "range lower bound above upper bound"
            ))
        );

        let range = map
            .range(Bound::Excluded(10), Bound::Included(40))
            .expect("valid range");
        assert_eq!(keys(&range), [20, 30, 40]);
        assert_eq!(range.first_key(), Some(&20));
        assert_eq!(range.last_key(), Some(&40));
        assert_eq!(range.len(), 3);
        assert!(range.contains_key(&30));
        assert!(!range.contains_key(&10));
        assert_eq!(
            range.key_set().iter_rev().copied().collect::<Vec<_>>(),
            [40, 30, 20]
        );
    }

    #[test]
    fn writes_go_to_the_map() {
        let mut map = map();
        {
            let mut head = map.head_map_mut(30);
            assert_eq!(head.insert(15, 'x'), Ok(None));
            assert_eq!(
                head.insert(35, 'y'),
                Err(CollectionError::InvalidArgument("put outside range"))
            );
            assert_eq!(head.remove(&40), None);
            assert_eq!(head.remove(&20), Some('b'));
        }
        assert_eq!(
            map.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            [10, 15, 30, 40, 50]
        );

        let mut tail = map.tail_map_mut(40);
        tail.key_set_mut()
            .clear()
            .expect("clearing through the key set succeeds");
        assert!(tail.is_empty());
        assert_eq!(map.len(), 3);
        map.validate().expect("map is valid");
    }

    #[test]
    fn unmodifiable_range() {
        let map = map();
        let range = map.tail_map(20);
        let mut view = range.unmodifiable();
        assert_eq!(
            view.put(60, 'f'),
            Err(CollectionError::PermissionDenied("put into unmodifiable map"))
        );
        assert_eq!(view.get_value(&30), Some(&'c'));
        assert_eq!(view.get_value(&10), None);
    }
}
