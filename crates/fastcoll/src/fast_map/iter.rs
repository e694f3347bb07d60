// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::imp::MapEntry;
use crate::support::chain::{self, Chain};
use core::{fmt, iter::FusedIterator};
use derive_where::derive_where;

/// An iterator over the entries of a [`FastMap`] by shared reference.
/// Created by [`FastMap::iter`].
///
/// Entries are yielded in insertion order, or in reverse from the back.
///
/// [`FastMap`]: crate::FastMap
/// [`FastMap::iter`]: crate::FastMap::iter
#[derive_where(Clone)]
#[derive_where(Debug; K: fmt::Debug, V: fmt::Debug)]
pub struct Iter<'a, K, V> {
    inner: chain::Iter<'a, MapEntry<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(entries: &'a Chain<MapEntry<K, V>>) -> Self {
        Self { inner: entries.iter() }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, entry)| (&entry.kv.0, &entry.kv.1))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, entry)| (&entry.kv.0, &entry.kv.1))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

// chain::Iter is a FusedIterator, so Iter is as well.
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the entries of a [`FastMap`], with mutable access to the
/// values. Created by [`FastMap::iter_mut`].
///
/// [`FastMap`]: crate::FastMap
/// [`FastMap::iter_mut`]: crate::FastMap::iter_mut
#[derive(Debug)]
pub struct IterMut<'a, K, V> {
    inner: chain::IterMut<'a, MapEntry<K, V>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(entries: &'a mut Chain<MapEntry<K, V>>) -> Self {
        Self { inner: entries.iter_mut() }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, entry)| {
            let (key, value) = &mut entry.kv;
            (&*key, value)
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, entry)| {
            let (key, value) = &mut entry.kv;
            (&*key, value)
        })
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the entries of a [`FastMap`] by value. Created by
/// [`FastMap::into_iter`].
///
/// [`FastMap`]: crate::FastMap
/// [`FastMap::into_iter`]: crate::FastMap::into_iter
#[derive(Clone, Debug)]
pub struct IntoIter<K, V> {
    entries: Chain<MapEntry<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(entries: Chain<MapEntry<K, V>>) -> Self {
        Self { entries }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let id = self.entries.first()?;
        Some(self.entries.remove(id).kv)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.entries.len(), Some(self.entries.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.entries.last()?;
        Some(self.entries.remove(id).kv)
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
