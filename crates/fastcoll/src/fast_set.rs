// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! An insertion-ordered hash set.

use crate::{
    equality::{Equality, Equivalence},
    errors::CollectionError,
    fast_map::{self, FastMap},
    internal::ValidationError,
    service::{
        Collection, CollectionMut, DeepClone, Direction, MapService,
    },
    support::chain::{ChainCursor, EntryId},
};
use core::{fmt, hash::Hash, iter::FusedIterator};
use derive_where::derive_where;

/// An insertion-ordered hash set, backed by a [`FastMap`] with unit values.
///
/// ```
/// use fastcoll::FastSet;
///
/// let mut set = FastSet::new();
/// assert!(set.insert("b"));
/// assert!(set.insert("a"));
/// assert!(!set.insert("b"));
///
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["b", "a"]);
/// ```
#[derive(Clone)]
pub struct FastSet<T> {
    map: FastMap<T, ()>,
}

impl<T: Hash + Eq> FastSet<T> {
    /// Creates a new, empty `FastSet` with natural equality.
    #[inline]
    pub fn new() -> Self {
        Self { map: FastMap::new() }
    }

    /// Creates a new `FastSet` with room for `capacity` elements before the
    /// element storage reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { map: FastMap::with_capacity(capacity) }
    }
}

impl<T: Hash + Eq> Default for FastSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FastSet<T> {
    /// Creates a new, empty `FastSet` whose elements are compared with
    /// `equality`.
    pub fn with_equality(equality: Equality<T>) -> Self {
        Self { map: FastMap::with_key_equality(equality) }
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

    /// Returns the number of directory slots currently allocated.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
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

    /// Returns the first element in insertion order.
    pub fn first(&self) -> Option<&T> {
        self.map.first().map(|(value, ())| value)
    }

    /// Returns the last element in insertion order.
    pub fn last(&self) -> Option<&T> {
        self.map.last().map(|(value, ())| value)
    }

    /// Iterates over the elements in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.map.iter() }
    }

    /// Checks general invariants of the set.
    #[doc(hidden)]
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.map.validate()
    }
}

impl<T: fmt::Debug> fmt::Debug for FastSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Two sets are equal if their strategies agree and they hold the same
/// elements, in any order.
impl<T> PartialEq for FastSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T> Extend<T> for FastSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Hash + Eq> FromIterator<T> for FastSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = FastSet::new();
        set.extend(iter);
        set
    }
}

impl<'a, T> IntoIterator for &'a FastSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for FastSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { inner: self.map.into_iter() }
    }
}

impl<T: Clone> DeepClone for FastSet<T> {
    type Owned = Self;

    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

impl<T> Collection for FastSet<T> {
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

    #[inline]
    fn contains(&self, item: &T) -> bool {
        self.map.contains_key(item)
    }
}

impl<T> CollectionMut for FastSet<T> {
    fn add(&mut self, item: T) -> Result<bool, CollectionError> {
        Ok(self.insert(item))
    }

    fn remove_at(&mut self, pos: EntryId) -> Result<(), CollectionError> {
        self.map.remove_id(pos);
        Ok(())
    }

    fn remove(&mut self, item: &T) -> Result<bool, CollectionError> {
        Ok(FastSet::remove(self, item))
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        FastSet::clear(self);
        Ok(())
    }
}

/// An iterator over the elements of a [`FastSet`]. Created by
/// [`FastSet::iter`].
#[derive_where(Clone)]
#[derive_where(Debug; T: fmt::Debug)]
pub struct Iter<'a, T> {
    inner: fast_map::Iter<'a, T, ()>,
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

/// An iterator over the elements of a [`FastSet`] by value.
#[derive(Clone, Debug)]
pub struct IntoIter<T> {
    inner: fast_map::IntoIter<T, ()>,
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

#[cfg(feature = "serde")]
mod serde_impls {
    use super::FastSet;
    use crate::fast_map::serde_impls::entry_count;
    use core::{fmt, hash::Hash, marker::PhantomData};
    use serde_core::{
        de::{SeqAccess, Visitor},
        ser::{Error as _, SerializeSeq},
        Deserialize, Deserializer, Serialize, Serializer,
    };

    /// A `FastSet` serializes to the sequence of its elements in insertion
    /// order.
    impl<T: Serialize> Serialize for FastSet<T> {
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

    impl<'de, T: Hash + Eq + Deserialize<'de>> Deserialize<'de> for FastSet<T> {
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

    impl<'de, T: Hash + Eq + Deserialize<'de>> Visitor<'de> for SeqVisitor<T> {
        type Value = FastSet<T>;

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
            let mut set = match seq.size_hint() {
                Some(size) => FastSet::with_capacity(size),
                None => FastSet::new(),
            };
            while let Some(value) = seq.next_element()? {
                set.insert(value);
            }
            Ok(set)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_contract() {
        let mut set: FastSet<u32> = [3, 1, 4, 1, 5].into_iter().collect();
        assert_eq!(Collection::len(&set), 4);
        assert_eq!(set.iter_rev().copied().collect::<Vec<_>>(), [5, 4, 1, 3]);

        assert_eq!(set.remove_if(|n| n % 2 == 1), Ok(3));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [4]);
        set.validate().expect("set is valid");

        CollectionMut::clear(&mut set).expect("clear succeeds");
        assert!(set.is_empty());
        assert_eq!(set.capacity(), 0);
    }

    #[test]
    fn cursor_remove() {
        let mut set: FastSet<u32> = (0..10).collect();
        let mut cursor = set.cursor_mut(Direction::Forward);
        assert_eq!(
            cursor.remove(),
            Err(CollectionError::IllegalState(
                "cursor remove without a current element"
            ))
        );
        while let Some(&n) = cursor.next() {
            if n % 3 == 0 {
                cursor.remove().expect("remove after next succeeds");
                assert!(cursor.remove().is_err());
            }
        }
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 4, 5, 7, 8]);
        set.validate().expect("set is valid");
    }

    #[test]
    fn identity_equality() {
        use std::rc::Rc;

        let a = Rc::new(1);
        let b = Rc::new(1);
        let mut set = FastSet::with_equality(Equality::identity());
        assert!(set.insert(Rc::clone(&a)));
        assert!(set.insert(Rc::clone(&b)));
        assert!(!set.insert(Rc::clone(&a)));
        assert_eq!(set.len(), 2);
    }
}
