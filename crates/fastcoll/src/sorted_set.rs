// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A key-ordered set with range views.

use crate::{
    equality::{Equality, Equivalence},
    errors::CollectionError,
    internal::ValidationError,
    service::{
        Collection, CollectionMut, DeepClone, Direction, MapService,
        MapServiceMut,
    },
    sorted_map::{self, RangeCursor, SortedMap, SortedRange},
    support::chain::{ChainCursor, EntryId},
};
use core::{
    borrow::{Borrow, BorrowMut},
    fmt,
    iter::FusedIterator,
    ops::Bound,
};
use derive_where::derive_where;

/// A set whose iteration order is the order of its elements, backed by a
/// [`SortedMap`] with unit values.
///
/// ```
/// use fastcoll::SortedSet;
///
/// let mut set: SortedSet<u32> = [5, 1, 4].into_iter().collect();
/// assert_eq!(set.first(), Some(&1));
/// assert_eq!(set.last(), Some(&5));
///
/// let mut tail = set.tail_set_mut(4);
/// assert!(tail.insert(7).unwrap());
/// assert!(tail.insert(2).is_err());
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 4, 5, 7]);
/// ```
#[derive(Clone)]
pub struct SortedSet<T> {
    map: SortedMap<T, ()>,
}

impl<T: Ord> SortedSet<T> {
    /// Creates a new, empty `SortedSet` ordered by `T`'s `Ord`.
    #[inline]
    pub fn new() -> Self {
        Self { map: SortedMap::new() }
    }
}

impl<T: Ord> Default for SortedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SortedSet<T> {
    /// Creates a new, empty `SortedSet` ordered by `equality`.
    ///
    /// Fails with [`CollectionError::TypeMismatch`] if the strategy has no
    /// order.
    pub fn with_equality(
        equality: Equality<T>,
    ) -> Result<Self, CollectionError> {
        let map = SortedMap::with_equalities(equality, Equality::partial_eq())?;
        Ok(Self { map })
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Adds `value`. Returns false if an equal element was already present,
    /// in which case the set is unchanged.
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert_if_absent(value, ()).is_none()
    }

    /// Returns true if an element equal to `value` is present.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }

    /// Removes the element equal to `value`. Returns true if one was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the element equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.map.remove_entry(value).map(|(value, ())| value)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the smallest element.
    pub fn first(&self) -> Option<&T> {
        self.map.first_key()
    }

    /// Returns the largest element.
    pub fn last(&self) -> Option<&T> {
        self.map.last_key()
    }

    /// Iterates over the elements in order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.map.iter() }
    }

    /// Returns a view of the elements between `lower` and `upper`.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `lower` is above
    /// `upper`.
    pub fn range(
        &self,
        lower: Bound<T>,
        upper: Bound<T>,
    ) -> Result<SortedSubset<T, &SortedMap<T, ()>>, CollectionError> {
        self.map.range(lower, upper).map(SortedSubset::new)
    }

    /// Like [`Self::range`], but the view can add and remove elements.
    pub fn range_mut(
        &mut self,
        lower: Bound<T>,
        upper: Bound<T>,
    ) -> Result<SortedSubset<T, &mut SortedMap<T, ()>>, CollectionError> {
        self.map.range_mut(lower, upper).map(SortedSubset::new)
    }

    /// Returns a view of the elements strictly less than `to`.
    pub fn head_set(&self, to: T) -> SortedSubset<T, &SortedMap<T, ()>> {
        SortedSubset::new(self.map.head_map(to))
    }

    /// Like [`Self::head_set`], but the view can add and remove elements.
    pub fn head_set_mut(
        &mut self,
        to: T,
    ) -> SortedSubset<T, &mut SortedMap<T, ()>> {
        SortedSubset::new(self.map.head_map_mut(to))
    }

    /// Returns a view of the elements at least `from`.
    pub fn tail_set(&self, from: T) -> SortedSubset<T, &SortedMap<T, ()>> {
        SortedSubset::new(self.map.tail_map(from))
    }

    /// Like [`Self::tail_set`], but the view can add and remove elements.
    pub fn tail_set_mut(
        &mut self,
        from: T,
    ) -> SortedSubset<T, &mut SortedMap<T, ()>> {
        SortedSubset::new(self.map.tail_map_mut(from))
    }

    /// Returns a view of the elements at least `from` and strictly less
    /// than `to`.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `to < from`.
    pub fn sub_set(
        &self,
        from: T,
        to: T,
    ) -> Result<SortedSubset<T, &SortedMap<T, ()>>, CollectionError> {
        self.map.sub_map(from, to).map(SortedSubset::new)
    }

    /// Like [`Self::sub_set`], but the view can add and remove elements.
    pub fn sub_set_mut(
        &mut self,
        from: T,
        to: T,
    ) -> Result<SortedSubset<T, &mut SortedMap<T, ()>>, CollectionError> {
        self.map.sub_map_mut(from, to).map(SortedSubset::new)
    }

    /// Checks general invariants of the set.
    #[doc(hidden)]
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.map.validate()
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for SortedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T> Extend<T> for SortedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for SortedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = SortedSet::new();
        set.extend(iter);
        set
    }
}

impl<'a, T> IntoIterator for &'a SortedSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for SortedSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { inner: self.map.into_iter() }
    }
}

impl<T: Clone> DeepClone for SortedSet<T> {
    type Owned = Self;

    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

impl<T> Collection for SortedSet<T> {
    type Item = T;
    type Ref<'a>
        = &'a T
    where
        Self: 'a;
    type Pos = EntryId;
    type Cursor = ChainCursor;

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    fn equality(&self) -> &dyn Equivalence<T> {
        self.map.key_equality_ref()
    }

    #[inline]
    fn cursor(&self, direction: Direction) -> ChainCursor {
        self.map.map_cursor(direction)
    }

    #[inline]
    fn advance(&self, cursor: &mut ChainCursor) -> Option<EntryId> {
        self.map.advance_entry(cursor)
    }

    #[inline]
    fn get(&self, pos: EntryId) -> &T {
        &self.map.entry(pos).0
    }

    #[inline]
    fn position(&self, item: &T) -> Option<EntryId> {
        self.map.find(item)
    }
}

impl<T> CollectionMut for SortedSet<T> {
    fn add(&mut self, item: T) -> Result<bool, CollectionError> {
        Ok(self.insert(item))
    }

    fn remove_at(&mut self, pos: EntryId) -> Result<(), CollectionError> {
        self.map.remove_id(pos);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        SortedSet::clear(self);
        Ok(())
    }
}

/// A view of the elements of a [`SortedSet`] between two bounds.
///
/// Adding an element outside the bounds fails with
/// [`CollectionError::InvalidArgument`].
#[derive(Clone, Debug)]
pub struct SortedSubset<T, R> {
    range: SortedRange<T, (), R>,
}

impl<T, R: Borrow<SortedMap<T, ()>>> SortedSubset<T, R> {
    fn new(range: SortedRange<T, (), R>) -> Self {
        Self { range }
    }

    /// Returns the number of elements within the bounds. This walks the
    /// range.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Returns true if no element lies within the bounds.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Returns true if `value` is within the bounds and present.
    pub fn contains(&self, value: &T) -> bool {
        self.range.contains_key(value)
    }

    /// Returns the smallest element within the bounds.
    pub fn first(&self) -> Option<&T> {
        self.range.first_key()
    }

    /// Returns the largest element within the bounds.
    pub fn last(&self) -> Option<&T> {
        self.range.last_key()
    }

    /// Iterates over the elements within the bounds, in order.
    pub fn iter(&self) -> SubsetIter<'_, T> {
        SubsetIter { inner: self.range.iter() }
    }
}

impl<T, R: BorrowMut<SortedMap<T, ()>>> SortedSubset<T, R> {
    /// Adds `value` to the set. Returns false if it was already present.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `value` is outside
    /// the bounds.
    pub fn insert(&mut self, value: T) -> Result<bool, CollectionError> {
        self.range.put_if_absent(value, ())
    }

    /// Removes `value` if it lies within the bounds.
    pub fn remove(&mut self, value: &T) -> bool {
        self.range.remove(value).is_some()
    }

    /// Removes every element within the bounds.
    pub fn clear(&mut self) {
        self.range.clear();
    }
}

impl<T: Clone, R: Borrow<SortedMap<T, ()>>> DeepClone for SortedSubset<T, R> {
    type Owned = SortedSubset<T, SortedMap<T, ()>>;

    fn deep_clone(&self) -> Self::Owned {
        SortedSubset::new(self.range.deep_clone())
    }
}

impl<T, R: Borrow<SortedMap<T, ()>>> Collection for SortedSubset<T, R> {
    type Item = T;
    type Ref<'a>
        = &'a T
    where
        Self: 'a;
    type Pos = EntryId;
    type Cursor = RangeCursor;

    fn len(&self) -> usize {
        self.range.len()
    }

    fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    fn equality(&self) -> &dyn Equivalence<T> {
        self.range.target().key_equality_ref()
    }

    fn cursor(&self, direction: Direction) -> RangeCursor {
        self.range.map_cursor(direction)
    }

    fn advance(&self, cursor: &mut RangeCursor) -> Option<EntryId> {
        self.range.advance_entry(cursor)
    }

    fn get(&self, pos: EntryId) -> &T {
        &self.range.entry(pos).0
    }

    fn position(&self, item: &T) -> Option<EntryId> {
        self.range.find(item)
    }
}

impl<T, R: BorrowMut<SortedMap<T, ()>>> CollectionMut for SortedSubset<T, R> {
    fn add(&mut self, item: T) -> Result<bool, CollectionError> {
        self.insert(item)
    }

    fn remove_at(&mut self, pos: EntryId) -> Result<(), CollectionError> {
        self.range.remove_entry_at(pos).map(drop)
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        SortedSubset::clear(self);
        Ok(())
    }
}

/// An iterator over the elements of a [`SortedSet`] in order. Created by
/// [`SortedSet::iter`].
#[derive_where(Clone)]
#[derive_where(Debug; T: fmt::Debug)]
pub struct Iter<'a, T> {
    inner: sorted_map::Iter<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(value, ())| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(value, ())| value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// An iterator over the elements of a [`SortedSet`] by value, in order.
#[derive(Clone, Debug)]
pub struct IntoIter<T> {
    inner: sorted_map::IntoIter<T, ()>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|(value, ())| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back().map(|(value, ())| value)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// An iterator over the elements of a [`SortedSubset`], in order.
#[derive_where(Clone)]
#[derive_where(Debug; T: fmt::Debug)]
pub struct SubsetIter<'a, T> {
    inner: sorted_map::RangeIter<'a, T, ()>,
}

impl<'a, T> Iterator for SubsetIter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(value, ())| value)
    }
}

impl<T> FusedIterator for SubsetIter<'_, T> {}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::SortedSet;
    use crate::fast_map::serde_impls::entry_count;
    use core::{fmt, marker::PhantomData};
    use serde_core::{
        de::{SeqAccess, Visitor},
        ser::{Error as _, SerializeSeq},
        Deserialize, Deserializer, Serialize, Serializer,
    };

    /// A `SortedSet` serializes to the sequence of its elements in order.
    impl<T: Serialize> Serialize for SortedSet<T> {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let count = entry_count(self.len()).map_err(S::Error::custom)?;
            let mut seq = serializer.serialize_seq(Some(count))?;
            for value in self {
                seq.serialize_element(value)?;
            }
            seq.end()
        }
    }

    impl<'de, T: Ord + Deserialize<'de>> Deserialize<'de> for SortedSet<T> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_seq(SeqVisitor { _marker: PhantomData })
        }
    }

    struct SeqVisitor<T> {
        _marker: PhantomData<fn() -> T>,
    }

    impl<'de, T: Ord + Deserialize<'de>> Visitor<'de> for SeqVisitor<T> {
        type Value = SortedSet<T>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a sequence of set elements")
        }

        fn visit_seq<Access>(
            self,
            mut seq: Access,
        ) -> Result<Self::Value, Access::Error>
        where
            Access: SeqAccess<'de>,
        {
            let mut set = SortedSet::new();
            while let Some(value) = seq.next_element()? {
                set.insert(value);
            }
            Ok(set)
        }
    }
}
