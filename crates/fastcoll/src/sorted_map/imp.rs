// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{IntoIter, Iter, IterMut, SortedRange};
use crate::{
    equality::Equality,
    errors::CollectionError,
    internal::ValidationError,
    service::{DeepClone, Direction, MapService, MapServiceMut},
    support::{
        btree_table::MapBTreeTable,
        chain::{Chain, ChainCursor, EntryId},
    },
    view::{Entries, Keys, Unmodifiable, Values},
};
use core::{cmp::Ordering, fmt, ops::Bound};

/// A map whose iteration order is the order of its keys.
///
/// The key strategy must carry an order; see [`Equality::ord`],
/// [`Equality::natural_ord`] and [`Equality::ordered`]. Keys that compare
/// equal are the same key.
#[derive(Clone)]
pub struct SortedMap<K, V> {
    entries: Chain<(K, V)>,
    // Invariant: holds exactly the ids of `entries`. The chain order matches
    // the index order.
    index: MapBTreeTable,
    key_equality: Equality<K>,
    compare: fn(&K, &K) -> Ordering,
    value_equality: Equality<V>,
}

impl<K: Ord, V: PartialEq> SortedMap<K, V> {
    /// Creates a new, empty `SortedMap` ordered by `K`'s `Ord`.
    pub fn new() -> Self {
        Self::from_parts(Equality::ord(), K::cmp, Equality::partial_eq())
    }
}

impl<K: Ord, V: PartialEq> Default for SortedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V: PartialEq> SortedMap<K, V> {
    /// Creates a new, empty `SortedMap` ordered by `key_equality`.
    ///
    /// Fails with [`CollectionError::TypeMismatch`] if the strategy has no
    /// order.
    pub fn with_key_equality(
        key_equality: Equality<K>,
    ) -> Result<Self, CollectionError> {
        Self::with_equalities(key_equality, Equality::partial_eq())
    }
}

impl<K, V> SortedMap<K, V> {
    /// Creates a new, empty `SortedMap` with the given strategies.
    ///
    /// Fails with [`CollectionError::TypeMismatch`] if the key strategy has
    /// no order.
    pub fn with_equalities(
        key_equality: Equality<K>,
        value_equality: Equality<V>,
    ) -> Result<Self, CollectionError> {
        let compare = key_equality.compare_fn().ok_or(
            CollectionError::TypeMismatch(
                "sorted map over an unordered key equality",
            ),
        )?;
        Ok(Self::from_parts(key_equality, compare, value_equality))
    }

    fn from_parts(
        key_equality: Equality<K>,
        compare: fn(&K, &K) -> Ordering,
        value_equality: Equality<V>,
    ) -> Self {
        Self {
            entries: Chain::new(),
            index: MapBTreeTable::new(),
            key_equality,
            compare,
            value_equality,
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Returns the key strategy.
    #[inline]
    pub fn key_equality(&self) -> Equality<K> {
        self.key_equality
    }

    /// Returns the value strategy.
    #[inline]
    pub fn value_equality(&self) -> Equality<V> {
        self.value_equality
    }

    /// Returns the handle of the entry for `key`.
    pub fn find(&self, key: &K) -> Option<EntryId> {
        let entries = &self.entries;
        self.index.find(key, |id| &entries[id].0, self.compare)
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.entries[id].1)
    }

    /// Returns mutable access to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        Some(&mut self.entries[id].1)
    }

    /// Returns the stored key and the value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|id| {
            let (k, v) = &self.entries[id];
            (k, v)
        })
    }

    /// Returns true if the map has an entry for `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns true if some entry's value equals `value`. This scans the
    /// entries.
    pub fn contains_value(&self, value: &V) -> bool {
        self.iter().any(|(_, v)| self.value_equality.equal(v, value))
    }

    /// Associates `value` with `key`, returning the previous value.
    ///
    /// A new entry is linked into the chain at its key's position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(id) = self.find(&key) {
            return Some(core::mem::replace(&mut self.entries[id].1, value));
        }
        self.link(key, value);
        None
    }

    /// Associates `value` with `key` unless `key` is already present.
    ///
    /// Returns the existing value if there was one, leaving it unchanged.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        if let Some(id) = self.find(&key) {
            return Some(&self.entries[id].1);
        }
        self.link(key, value);
        None
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes the entry for `key`, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let id = self.find(key)?;
        Some(self.remove_id(id))
    }

    /// Removes the entry for `key` only if its value equals `value`.
    pub fn remove_if_equal(&mut self, key: &K, value: &V) -> bool {
        match self.find(key) {
            Some(id)
                if self.value_equality.equal(&self.entries[id].1, value) =>
            {
                self.remove_id(id);
                true
            }
            _ => false,
        }
    }

    /// Replaces the value for `key` if it is present, returning the old
    /// value.
    pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
        let id = self.find(key)?;
        Some(core::mem::replace(&mut self.entries[id].1, value))
    }

    /// Replaces the value for `key` with `new` only if the current value
    /// equals `old`.
    pub fn replace_if_equal(&mut self, key: &K, old: &V, new: V) -> bool {
        match self.find(key) {
            Some(id) if self.value_equality.equal(&self.entries[id].1, old) => {
                self.entries[id].1 = new;
                true
            }
            _ => false,
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Returns the entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entries.first().map(|id| {
            let (k, v) = &self.entries[id];
            (k, v)
        })
    }

    /// Returns the entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.entries.last().map(|id| {
            let (k, v) = &self.entries[id];
            (k, v)
        })
    }

    /// Returns the smallest key.
    pub fn first_key(&self) -> Option<&K> {
        self.first().map(|(k, _)| k)
    }

    /// Returns the largest key.
    pub fn last_key(&self) -> Option<&K> {
        self.last().map(|(k, _)| k)
    }

    /// Iterates over the entries in key order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.entries)
    }

    /// Iterates over the entries in key order, with mutable access to the
    /// values.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.entries)
    }

    /// Returns a view of the entries whose keys lie within `lower` and
    /// `upper`.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `lower` is above
    /// `upper`.
    pub fn range(
        &self,
        lower: Bound<K>,
        upper: Bound<K>,
    ) -> Result<SortedRange<K, V, &Self>, CollectionError> {
        SortedRange::new(self, lower, upper)
    }

    /// Like [`Self::range`], but the view can insert and remove entries.
    pub fn range_mut(
        &mut self,
        lower: Bound<K>,
        upper: Bound<K>,
    ) -> Result<SortedRange<K, V, &mut Self>, CollectionError> {
        SortedRange::new(self, lower, upper)
    }

    /// Returns a view of the entries whose keys are strictly less than `to`.
    pub fn head_map(&self, to: K) -> SortedRange<K, V, &Self> {
        SortedRange::unchecked(self, Bound::Unbounded, Bound::Excluded(to))
    }

    /// Like [`Self::head_map`], but the view can insert and remove entries.
    pub fn head_map_mut(&mut self, to: K) -> SortedRange<K, V, &mut Self> {
        SortedRange::unchecked(self, Bound::Unbounded, Bound::Excluded(to))
    }

    /// Returns a view of the entries whose keys are at least `from`.
    pub fn tail_map(&self, from: K) -> SortedRange<K, V, &Self> {
        SortedRange::unchecked(self, Bound::Included(from), Bound::Unbounded)
    }

    /// Like [`Self::tail_map`], but the view can insert and remove entries.
    pub fn tail_map_mut(&mut self, from: K) -> SortedRange<K, V, &mut Self> {
        SortedRange::unchecked(self, Bound::Included(from), Bound::Unbounded)
    }

    /// Returns a view of the entries whose keys are at least `from` and
    /// strictly less than `to`.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `to < from`.
    pub fn sub_map(
        &self,
        from: K,
        to: K,
    ) -> Result<SortedRange<K, V, &Self>, CollectionError> {
        self.range(Bound::Included(from), Bound::Excluded(to))
    }

    /// Like [`Self::sub_map`], but the view can insert and remove entries.
    pub fn sub_map_mut(
        &mut self,
        from: K,
        to: K,
    ) -> Result<SortedRange<K, V, &mut Self>, CollectionError> {
        self.range_mut(Bound::Included(from), Bound::Excluded(to))
    }

    /// Returns a read-only view of the keys.
    pub fn key_set(&self) -> Keys<&Self> {
        Keys::new(self)
    }

    /// Returns a view of the keys that removes entries from the map.
    pub fn key_set_mut(&mut self) -> Keys<&mut Self> {
        Keys::new(self)
    }

    /// Returns a read-only view of the values.
    pub fn values(&self) -> Values<&Self> {
        Values::new(self)
    }

    /// Returns a view of the values that removes entries from the map.
    pub fn values_mut(&mut self) -> Values<&mut Self> {
        Values::new(self)
    }

    /// Returns a read-only view of the entries.
    pub fn entry_set(&self) -> Entries<&Self> {
        Entries::new(self)
    }

    /// Returns a view of the entries. Adding to it puts into the map.
    pub fn entry_set_mut(&mut self) -> Entries<&mut Self> {
        Entries::new(self)
    }

    /// Returns a view of the map that rejects every mutation.
    pub fn unmodifiable(&self) -> Unmodifiable<&Self> {
        Unmodifiable::new(self)
    }

    /// Checks general invariants of the map.
    #[doc(hidden)]
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.entries.validate().map_err(ValidationError::table("chain"))?;
        self.index
            .validate(self.entries.len())
            .map_err(ValidationError::table("index"))?;

        let mut chain = self.entries.iter();
        let mut prev: Option<&K> = None;
        for id in self.index.iter() {
            let Some((chain_id, (key, _))) = chain.next() else {
                return Err(ValidationError::general(format!(
                    "index has {id:?} past the end of the chain"
                )));
            };
            if chain_id != id {
                return Err(ValidationError::general(format!(
                    "index yields {id:?} where the chain has {chain_id:?}"
                )));
            }
            if let Some(prev) = prev {
                if (self.compare)(prev, key) != Ordering::Less {
                    return Err(ValidationError::general(format!(
                        "keys out of order at {id:?}"
                    )));
                }
            }
            prev = Some(key);
        }
        Ok(())
    }

    pub(crate) fn compare_keys(&self, a: &K, b: &K) -> Ordering {
        (self.compare)(a, b)
    }

    pub(crate) fn entries(&self) -> &Chain<(K, V)> {
        &self.entries
    }

    pub(crate) fn key_equality_ref(&self) -> &Equality<K> {
        &self.key_equality
    }

    /// Returns the first entry at or above `bound`.
    pub(crate) fn lower_entry(&self, bound: &Bound<K>) -> Option<EntryId> {
        let entries = &self.entries;
        let lookup = |id: EntryId| &entries[id].0;
        match bound {
            Bound::Unbounded => entries.first(),
            Bound::Included(key) => {
                self.index.lower_bound(key, true, lookup, self.compare)
            }
            Bound::Excluded(key) => {
                self.index.lower_bound(key, false, lookup, self.compare)
            }
        }
    }

    /// Returns the last entry at or below `bound`.
    pub(crate) fn upper_entry(&self, bound: &Bound<K>) -> Option<EntryId> {
        let entries = &self.entries;
        let lookup = |id: EntryId| &entries[id].0;
        match bound {
            Bound::Unbounded => entries.last(),
            Bound::Included(key) => {
                self.index.upper_bound(key, true, lookup, self.compare)
            }
            Bound::Excluded(key) => {
                self.index.upper_bound(key, false, lookup, self.compare)
            }
        }
    }

    pub(crate) fn remove_id(&mut self, id: EntryId) -> (K, V) {
        let entries = &self.entries;
        if !self.index.remove(id, |id| &entries[id].0, self.compare) {
            panic!("SortedMap index not found: {id:?}");
        }
        self.entries.remove(id)
    }

    fn link(&mut self, key: K, value: V) -> EntryId {
        let entries = &self.entries;
        let lookup = |id: EntryId| &entries[id].0;
        let before = self.index.upper_bound(&key, false, lookup, self.compare);
        let id = self.entries.insert_after(before, (key, value));
        let entries = &self.entries;
        self.index.insert(id, |id| &entries[id].0, self.compare);
        id
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SortedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal if their strategies agree and they hold the same
/// entries.
impl<K, V> PartialEq for SortedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key_equality.agrees_with(&other.key_equality)
            && self.value_equality.agrees_with(&other.value_equality)
            && self.len() == other.len()
            && self.iter().all(|(key, value)| {
                other.get(key).is_some_and(|theirs| {
                    self.value_equality.equal(value, theirs)
                })
            })
    }
}

impl<K, V> Extend<(K, V)> for SortedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V: PartialEq> FromIterator<(K, V)> for SortedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SortedMap::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a SortedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut SortedMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for SortedMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.entries)
    }
}

impl<K: Clone, V: Clone> DeepClone for SortedMap<K, V> {
    type Owned = Self;

    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

impl<K, V> MapService for SortedMap<K, V> {
    type Key = K;
    type Value = V;
    type Pos = EntryId;
    type Cursor = ChainCursor;

    #[inline]
    fn entry_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn key_equality(&self) -> Equality<K> {
        self.key_equality
    }

    #[inline]
    fn value_equality(&self) -> Equality<V> {
        self.value_equality
    }

    #[inline]
    fn map_cursor(&self, direction: Direction) -> ChainCursor {
        self.entries.cursor(direction)
    }

    #[inline]
    fn advance_entry(&self, cursor: &mut ChainCursor) -> Option<EntryId> {
        self.entries.advance(cursor)
    }

    #[inline]
    fn entry(&self, pos: EntryId) -> &(K, V) {
        &self.entries[pos]
    }

    #[inline]
    fn find(&self, key: &K) -> Option<EntryId> {
        SortedMap::find(self, key)
    }
}

impl<K, V> MapServiceMut for SortedMap<K, V> {
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, CollectionError> {
        Ok(self.insert(key, value))
    }

    fn put_if_absent(
        &mut self,
        key: K,
        value: V,
    ) -> Result<bool, CollectionError> {
        Ok(self.insert_if_absent(key, value).is_none())
    }

    fn remove_entry_at(
        &mut self,
        pos: EntryId,
    ) -> Result<(K, V), CollectionError> {
        Ok(self.remove_id(pos))
    }

    fn value_at_mut(
        &mut self,
        pos: EntryId,
    ) -> Result<&mut V, CollectionError> {
        Ok(&mut self.entries[pos].1)
    }

    fn clear_entries(&mut self) -> Result<(), CollectionError> {
        self.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Collection;

    #[test]
    fn chain_follows_key_order() {
        let mut map = SortedMap::new();
        for key in [5, 1, 9, 3, 7] {
            assert_eq!(map.insert(key, key * 10), None);
            map.validate().expect("map is valid");
        }
        let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, [1, 3, 5, 7, 9]);
        let keys: Vec<_> = map.iter().rev().map(|(k, _)| *k).collect();
        assert_eq!(keys, [9, 7, 5, 3, 1]);
        assert_eq!(map.first_key(), Some(&1));
        assert_eq!(map.last_key(), Some(&9));

        assert_eq!(map.remove(&5), Some(50));
        assert_eq!(map.insert(4, 40), None);
        let keys: Vec<_> = map.key_set().iter().copied().collect();
        assert_eq!(keys, [1, 3, 4, 7, 9]);
        map.validate().expect("map is valid");
    }

    #[test]
    fn unordered_equality_is_rejected() {
        let result =
            SortedMap::<u32, u32>::with_key_equality(Equality::natural());
        assert_eq!(
            result.err(),
            Some(CollectionError::TypeMismatch(
                "sorted map over an unordered key equality"
            ))
        );

        fn by_len(a: &String, b: &String) -> Ordering {
            a.len().cmp(&b.len())
        }
        let mut map =
            SortedMap::with_key_equality(Equality::ordered(by_len, None))
                .expect("ordered equality is accepted");
        map.insert("ccc".to_owned(), 3);
        map.insert("a".to_owned(), 1);
        // Same length, same key.
        assert_eq!(map.insert("b".to_owned(), 2), Some(1));
        assert_eq!(map.first_key().map(String::as_str), Some("a"));
        map.validate().expect("map is valid");
    }
}
