// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ops::RangeBounds;

/// A naive, inefficient map that acts as an oracle for property-based tests.
///
/// Entries are stored in a vector in insertion order, and every operation is
/// a linear scan.
#[derive(Clone, Debug)]
pub struct NaiveMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K: Eq, V> NaiveMap<K, V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replacing a value keeps the entry's position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn insert_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        match self.position(&key) {
            Some(index) => Some(&self.entries[index].1),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.position(key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl<K: Ord, V> NaiveMap<K, V> {
    /// Returns the entries in key order.
    pub fn sorted(&self) -> Vec<(&K, &V)> {
        let mut entries: Vec<_> =
            self.entries.iter().map(|(k, v)| (k, v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Returns the entries whose keys lie in `range`, in key order.
    pub fn sorted_range<R: RangeBounds<K>>(&self, range: R) -> Vec<(&K, &V)> {
        self.sorted().into_iter().filter(|(k, _)| range.contains(*k)).collect()
    }

    pub fn first_key(&self) -> Option<&K> {
        self.entries.iter().map(|(k, _)| k).min()
    }

    pub fn last_key(&self) -> Option<&K> {
        self.entries.iter().map(|(k, _)| k).max()
    }
}
