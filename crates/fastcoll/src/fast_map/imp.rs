// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{IntoIter, Iter, IterMut};
use crate::{
    equality::Equality,
    errors::CollectionError,
    internal::ValidationError,
    service::{DeepClone, Direction, MapService, MapServiceMut},
    support::{
        chain::{Chain, ChainCursor, EntryId},
        directory::{BucketLinks, Directory},
    },
    view::{Entries, Keys, Unmodifiable, Values},
};
use core::{fmt, hash::Hash};

#[derive(Clone, Debug)]
pub(crate) struct MapEntry<K, V> {
    pub(crate) kv: (K, V),
    hash: u64,
    bucket_next: Option<EntryId>,
}

impl<K, V> BucketLinks for Chain<MapEntry<K, V>> {
    #[inline]
    fn hash_of(&self, id: EntryId) -> u64 {
        self[id].hash
    }

    #[inline]
    fn bucket_next(&self, id: EntryId) -> Option<EntryId> {
        self[id].bucket_next
    }

    #[inline]
    fn set_bucket_next(&mut self, id: EntryId, next: Option<EntryId>) {
        self[id].bucket_next = next;
    }
}

/// An insertion-ordered hash map.
///
/// Keys are compared and hashed with the map's key [`Equality`], and values
/// with its value equality (used by conditional operations and by map
/// equality). Both are fixed at construction.
///
/// Every entry has a stable [`EntryId`] handle, which is also its position
/// for the [`MapService`] traits and the views built on them.
#[derive(Clone)]
pub struct FastMap<K, V> {
    entries: Chain<MapEntry<K, V>>,
    // Invariant: holds exactly the ids of `entries`, each in the bucket its
    // stored hash addresses.
    directory: Directory,
    key_equality: Equality<K>,
    value_equality: Equality<V>,
}

impl<K: Hash + Eq, V: PartialEq> FastMap<K, V> {
    /// Creates a new, empty `FastMap` with natural key equality.
    #[inline]
    pub fn new() -> Self {
        Self::with_equalities(Equality::natural(), Equality::partial_eq())
    }

    /// Creates a new `FastMap` with room for `capacity` entries before the
    /// entry storage reallocates.
    ///
    /// The directory is not preallocated, so that its capacity stays within
    /// four times the number of entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Chain::with_capacity(capacity),
            ..Self::new()
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> Default for FastMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V: PartialEq> FastMap<K, V> {
    /// Creates a new, empty `FastMap` whose keys are compared with
    /// `key_equality`.
    pub fn with_key_equality(key_equality: Equality<K>) -> Self {
        Self::with_equalities(key_equality, Equality::partial_eq())
    }
}

impl<K, V> FastMap<K, V> {
    /// Creates a new, empty `FastMap` with the given key and value
    /// strategies.
    pub fn with_equalities(
        key_equality: Equality<K>,
        value_equality: Equality<V>,
    ) -> Self {
        Self {
            entries: Chain::new(),
            directory: Directory::new(),
            key_equality,
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

    /// Returns the number of directory slots currently allocated.
    ///
    /// Always between `len()` and `4 * len()`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.directory.capacity()
    }

    /// Returns the key equality strategy.
    #[inline]
    pub fn key_equality(&self) -> Equality<K> {
        self.key_equality
    }

    /// Returns the value equality strategy.
    #[inline]
    pub fn value_equality(&self) -> Equality<V> {
        self.value_equality
    }

    #[inline]
    pub(crate) fn key_equality_ref(&self) -> &Equality<K> {
        &self.key_equality
    }

    /// Returns the handle of the entry for `key`.
    pub fn find(&self, key: &K) -> Option<EntryId> {
        self.find_hashed(key, self.key_equality.hash(key))
    }

    /// Returns the entry at `id`, or `None` if `id` is stale.
    pub fn get_at(&self, id: EntryId) -> Option<(&K, &V)> {
        self.entries.get(id).map(|entry| (&entry.kv.0, &entry.kv.1))
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.entries[id].kv.1)
    }

    /// Returns mutable access to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        Some(&mut self.entries[id].kv.1)
    }

    /// Returns the stored key and the value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|id| {
            let (k, v) = &self.entries[id].kv;
            (k, v)
        })
    }

    /// Returns true if the map has an entry for `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns true if some entry's value equals `value` under the value
    /// equality. This scans the entries.
    pub fn contains_value(&self, value: &V) -> bool {
        self.iter().any(|(_, v)| self.value_equality.equal(v, value))
    }

    /// Associates `value` with `key`.
    ///
    /// If the key was present, its value is replaced in place (the entry
    /// keeps its position) and the old value is returned. Otherwise a new
    /// entry is appended to the end of the iteration order.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.key_equality.hash(&key);
        if let Some(id) = self.find_hashed(&key, hash) {
            return Some(core::mem::replace(&mut self.entries[id].kv.1, value));
        }
        self.push_entry(key, value, hash);
        None
    }

    /// Associates `value` with `key` unless `key` is already present.
    ///
    /// Returns the existing value if there was one, leaving it unchanged.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        let hash = self.key_equality.hash(&key);
        if let Some(id) = self.find_hashed(&key, hash) {
            return Some(&self.entries[id].kv.1);
        }
        self.push_entry(key, value, hash);
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

    /// Removes the entry for `key` only if its value equals `value`. Returns
    /// true if the entry was removed.
    pub fn remove_if_equal(&mut self, key: &K, value: &V) -> bool {
        match self.find(key) {
            Some(id)
                if self.value_equality.equal(&self.entries[id].kv.1, value) =>
            {
                self.remove_id(id);
                true
            }
            _ => false,
        }
    }

    /// Replaces the value for `key` if it is present, returning the old
    /// value. Absent keys are left absent.
    pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
        let id = self.find(key)?;
        Some(core::mem::replace(&mut self.entries[id].kv.1, value))
    }

    /// Replaces the value for `key` with `new` only if the current value
    /// equals `old`. Returns true if the value was replaced.
    pub fn replace_if_equal(&mut self, key: &K, old: &V, new: V) -> bool {
        match self.find(key) {
            Some(id)
                if self.value_equality.equal(&self.entries[id].kv.1, old) =>
            {
                self.entries[id].kv.1 = new;
                true
            }
            _ => false,
        }
    }

    /// Removes every entry, releasing the directory.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.directory.clear();
    }

    /// Returns the first entry in iteration order.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entries.first().and_then(|id| self.get_at(id))
    }

    /// Returns the last entry in iteration order.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.entries.last().and_then(|id| self.get_at(id))
    }

    /// Iterates over the entries in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.entries)
    }

    /// Iterates over the entries in insertion order, with mutable access to
    /// the values.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.entries)
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
    ///
    /// The code below always upholds these invariants, but it's useful to
    /// have an explicit check for tests.
    #[doc(hidden)]
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.entries.validate().map_err(ValidationError::table("chain"))?;
        self.directory
            .validate(self.entries.len(), &self.entries)
            .map_err(ValidationError::table("directory"))?;

        for (id, entry) in self.entries.iter() {
            let hash = self.key_equality.hash(&entry.kv.0);
            if hash != entry.hash {
                return Err(ValidationError::general(format!(
                    "entry {id:?} stores hash {:#x}, but its key hashes to \
                     {hash:#x}",
                    entry.hash
                )));
            }
            match self.find(&entry.kv.0) {
                Some(found) if found == id => {}
                found => {
                    return Err(ValidationError::general(format!(
                        "key of entry {id:?} resolves to {found:?}"
                    )));
                }
            }
        }

        Ok(())
    }

    pub(crate) fn remove_id(&mut self, id: EntryId) -> (K, V) {
        let hash = self.entries[id].hash;
        let len = self.entries.len() - 1;
        self.directory.remove(id, hash, len, &mut self.entries);
        self.entries.remove(id).kv
    }

    fn find_hashed(&self, key: &K, hash: u64) -> Option<EntryId> {
        let entries = &self.entries;
        let equality = &self.key_equality;
        self.directory
            .find(hash, entries, |id| equality.equal(&entries[id].kv.0, key))
    }

    fn push_entry(&mut self, key: K, value: V, hash: u64) -> EntryId {
        let id = self.entries.push_back(MapEntry {
            kv: (key, value),
            hash,
            bucket_next: None,
        });
        let len = self.entries.len();
        self.directory.insert(id, hash, len, &mut self.entries);
        id
    }

    pub(crate) fn into_entries(self) -> Chain<MapEntry<K, V>> {
        self.entries
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for FastMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal if their strategies agree and they hold the same
/// entries, in any order.
impl<K, V> PartialEq for FastMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if !self.key_equality.agrees_with(&other.key_equality)
            || !self.value_equality.agrees_with(&other.value_equality)
            || self.len() != other.len()
        {
            return false;
        }
        self.iter().all(|(key, value)| {
            other
                .get(key)
                .is_some_and(|theirs| self.value_equality.equal(value, theirs))
        })
    }
}

impl<K, V> Extend<(K, V)> for FastMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> FromIterator<(K, V)> for FastMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FastMap::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a FastMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut FastMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for FastMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.into_entries())
    }
}

impl<K: Clone, V: Clone> DeepClone for FastMap<K, V> {
    type Owned = Self;

    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

impl<K, V> MapService for FastMap<K, V> {
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
        &self.entries[pos].kv
    }

    #[inline]
    fn find(&self, key: &K) -> Option<EntryId> {
        FastMap::find(self, key)
    }
}

impl<K, V> MapServiceMut for FastMap<K, V> {
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
        Ok(&mut self.entries[pos].kv.1)
    }

    fn clear_entries(&mut self) -> Result<(), CollectionError> {
        self.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{Collection, CollectionMut};

    #[test]
    fn insertion_order_survives_removal() {
        let mut map = FastMap::new();
        map.insert('a', 1);
        map.insert('b', 2);
        map.insert('c', 3);
        assert_eq!(map.remove(&'b'), Some(2));
        map.validate().expect("map is valid");

        let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ['a', 'c']);

        // Replacing a value keeps the entry in place.
        assert_eq!(map.insert('a', 10), Some(1));
        map.insert('b', 20);
        let entries: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries, [('a', 10), ('c', 3), ('b', 20)]);
        map.validate().expect("map is valid");
    }

    #[test]
    fn conditional_operations() {
        let mut map = FastMap::new();
        assert_eq!(map.insert_if_absent("k", 1), None);
        assert_eq!(map.insert_if_absent("k", 2), Some(&1));

        assert!(!map.replace_if_equal(&"k", &5, 6));
        assert!(map.replace_if_equal(&"k", &1, 6));
        assert_eq!(map.replace(&"missing", 0), None);
        assert!(!map.contains_key(&"missing"));

        assert!(!map.remove_if_equal(&"k", &1));
        assert!(map.remove_if_equal(&"k", &6));
        assert!(map.is_empty());
        map.validate().expect("map is valid");
    }

    #[test]
    fn custom_key_equality() {
        fn eq(a: &String, b: &String) -> bool {
            a.eq_ignore_ascii_case(b)
        }
        fn hash(s: &String) -> u64 {
            s.bytes().map(|b| u64::from(b.to_ascii_lowercase())).sum()
        }

        let mut map = FastMap::with_key_equality(Equality::custom(eq, hash));
        map.insert("Alpha".to_owned(), 1);
        assert_eq!(map.insert("ALPHA".to_owned(), 2), Some(1));
        assert_eq!(map.len(), 1);
        // The original key is kept.
        assert_eq!(map.first(), Some((&"Alpha".to_owned(), &2)));
        map.validate().expect("map is valid");
    }

    #[test]
    fn views_remove_from_the_map() {
        let mut map: FastMap<u32, &str> =
            [(1, "one"), (2, "two"), (3, "three")].into_iter().collect();

        assert!(map.key_set().contains(&2));
        assert!(map.values().contains(&"three"));
        assert!(map.entry_set().contains(&(3, "three")));
        assert!(!map.entry_set().contains(&(3, "drei")));

        assert!(map.key_set_mut().remove(&2).expect("remove succeeds"));
        assert!(map.values_mut().remove(&"three").expect("remove succeeds"));
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.key_set_mut().add(9),
            Err(CollectionError::PermissionDenied("add through key view"))
        );

        assert!(map.entry_set_mut().add((4, "four")).expect("add succeeds"));
        assert_eq!(map.get(&4), Some(&"four"));
        map.validate().expect("map is valid");
    }

    #[test]
    fn unmodifiable_map() {
        let mut map = FastMap::new();
        map.insert(1, 1);
        let view = map.unmodifiable();
        assert_eq!(view.get_value(&1), Some(&1));

        let mut view = view;
        assert_eq!(
            view.put(2, 2),
            Err(CollectionError::PermissionDenied("put into unmodifiable map"))
        );
        assert_eq!(map.len(), 1);
    }
}
