// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::support::chain::{self, Chain};
use core::{fmt, iter::FusedIterator};
use derive_where::derive_where;

/// An iterator over the entries of a [`SortedMap`] in key order. Created by
/// [`SortedMap::iter`].
///
/// [`SortedMap`]: crate::SortedMap
/// [`SortedMap::iter`]: crate::SortedMap::iter
#[derive_where(Clone)]
#[derive_where(Debug; K: fmt::Debug, V: fmt::Debug)]
pub struct Iter<'a, K, V> {
    inner: chain::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(entries: &'a Chain<(K, V)>) -> Self {
        Self { inner: entries.iter() }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, (k, v))| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, (k, v))| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the entries of a [`SortedMap`] in key order, with
/// mutable access to the values. Created by [`SortedMap::iter_mut`].
///
/// [`SortedMap`]: crate::SortedMap
/// [`SortedMap::iter_mut`]: crate::SortedMap::iter_mut
#[derive(Debug)]
pub struct IterMut<'a, K, V> {
    inner: chain::IterMut<'a, (K, V)>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(entries: &'a mut Chain<(K, V)>) -> Self {
        Self { inner: entries.iter_mut() }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, (k, v))| (&*k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, (k, v))| (&*k, v))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the entries of a [`SortedMap`] by value, in key order.
///
/// [`SortedMap`]: crate::SortedMap
#[derive(Clone, Debug)]
pub struct IntoIter<K, V> {
    entries: Chain<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(entries: Chain<(K, V)>) -> Self {
        Self { entries }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let id = self.entries.first()?;
        Some(self.entries.remove(id))
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
        Some(self.entries.remove(id))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
