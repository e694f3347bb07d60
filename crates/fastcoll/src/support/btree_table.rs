// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A B-tree of entry handles ordered by an external comparator.
//!
//! The tree stores [`EntryId`]s only. Comparisons look the keys up in the
//! owning map through a comparator installed in a thread-local for the
//! duration of each operation. Lookups by a key that is not stored use a
//! sentinel handle which compares as that key.

use super::chain::EntryId;
use crate::internal::TableValidationError;
use std::{
    cell::Cell,
    cmp::Ordering,
    collections::{btree_set, BTreeSet},
    marker::PhantomData,
    ops::Bound,
};

thread_local! {
    static CMP: Cell<Option<&'static dyn Fn(Handle, Handle) -> Ordering>>
        = const { Cell::new(None) };
}

#[derive(Clone, Debug, Default)]
pub(crate) struct MapBTreeTable {
    entries: BTreeSet<Handle>,
}

impl MapBTreeTable {
    pub(crate) const fn new() -> Self {
        Self { entries: BTreeSet::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Finds the entry whose key compares equal to `key`.
    pub(crate) fn find<'k, K, F, C>(
        &self,
        key: &K,
        lookup: F,
        compare: C,
    ) -> Option<EntryId>
    where
        F: Fn(EntryId) -> &'k K,
        C: Fn(&K, &K) -> Ordering,
        K: 'k,
    {
        let f = find_cmp(key, &lookup, &compare);
        let guard = CmpDropGuard::new(&f);

        let ret = match self.entries.get(&Handle::SENTINEL) {
            Some(Handle(v)) if *v == Handle::SENTINEL_VALUE => {
                panic!("internal map shouldn't store sentinel value")
            }
            Some(Handle(v)) => Some(EntryId::new(*v)),
            None => None,
        };

        drop(guard);
        ret
    }

    /// Returns the first entry at or after (`inclusive`) or strictly after
    /// `key`.
    pub(crate) fn lower_bound<'k, K, F, C>(
        &self,
        key: &K,
        inclusive: bool,
        lookup: F,
        compare: C,
    ) -> Option<EntryId>
    where
        F: Fn(EntryId) -> &'k K,
        C: Fn(&K, &K) -> Ordering,
        K: 'k,
    {
        let bound =
            if inclusive { Bound::Included(()) } else { Bound::Excluded(()) };
        self.bound_entry(key, BoundSide::Lower(bound), lookup, compare)
    }

    /// Returns the last entry at or before (`inclusive`) or strictly before
    /// `key`.
    pub(crate) fn upper_bound<'k, K, F, C>(
        &self,
        key: &K,
        inclusive: bool,
        lookup: F,
        compare: C,
    ) -> Option<EntryId>
    where
        F: Fn(EntryId) -> &'k K,
        C: Fn(&K, &K) -> Ordering,
        K: 'k,
    {
        let bound =
            if inclusive { Bound::Included(()) } else { Bound::Excluded(()) };
        self.bound_entry(key, BoundSide::Upper(bound), lookup, compare)
    }

    /// Adds `id`, whose key must already be reachable through `lookup`.
    pub(crate) fn insert<'k, K, F, C>(
        &mut self,
        id: EntryId,
        lookup: F,
        compare: C,
    ) where
        F: Fn(EntryId) -> &'k K,
        C: Fn(&K, &K) -> Ordering,
        K: 'k,
    {
        let f = entry_cmp(&lookup, &compare);
        let guard = CmpDropGuard::new(&f);
        self.entries.insert(Handle::new(id));
        drop(guard);
    }

    /// Removes `id`, whose key must still be reachable through `lookup`.
    pub(crate) fn remove<'k, K, F, C>(
        &mut self,
        id: EntryId,
        lookup: F,
        compare: C,
    ) -> bool
    where
        F: Fn(EntryId) -> &'k K,
        C: Fn(&K, &K) -> Ordering,
        K: 'k,
    {
        let f = entry_cmp(&lookup, &compare);
        let guard = CmpDropGuard::new(&f);
        let removed = self.entries.remove(&Handle::new(id));
        drop(guard);
        removed
    }

    pub(crate) fn iter(&self) -> Iter<'_> {
        Iter { inner: self.entries.iter() }
    }

    pub(crate) fn validate(
        &self,
        expected_len: usize,
    ) -> Result<(), TableValidationError> {
        if self.len() != expected_len {
            return Err(TableValidationError::new(format!(
                "expected length {expected_len}, was {}",
                self.len()
            )));
        }
        if self.entries.iter().any(|h| h.0 == Handle::SENTINEL_VALUE) {
            return Err(TableValidationError::new(
                "sentinel value should not be stored",
            ));
        }
        Ok(())
    }

    fn bound_entry<'k, K, F, C>(
        &self,
        key: &K,
        side: BoundSide,
        lookup: F,
        compare: C,
    ) -> Option<EntryId>
    where
        F: Fn(EntryId) -> &'k K,
        C: Fn(&K, &K) -> Ordering,
        K: 'k,
    {
        let f = find_cmp(key, &lookup, &compare);
        let guard = CmpDropGuard::new(&f);

        let sentinel = |bound: Bound<()>| match bound {
            Bound::Included(()) => Bound::Included(Handle::SENTINEL),
            Bound::Excluded(()) => Bound::Excluded(Handle::SENTINEL),
            Bound::Unbounded => Bound::Unbounded,
        };
        let found = match side {
            BoundSide::Lower(bound) => self
                .entries
                .range((sentinel(bound), Bound::Unbounded))
                .next()
                .copied(),
            BoundSide::Upper(bound) => self
                .entries
                .range((Bound::Unbounded, sentinel(bound)))
                .next_back()
                .copied(),
        };

        drop(guard);
        found.map(|handle| EntryId::new(handle.0))
    }
}

#[derive(Clone, Copy, Debug)]
enum BoundSide {
    Lower(Bound<()>),
    Upper(Bound<()>),
}

#[derive(Clone, Debug)]
pub(crate) struct Iter<'a> {
    inner: btree_set::Iter<'a, Handle>,
}

impl Iterator for Iter<'_> {
    type Item = EntryId;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|handle| EntryId::new(handle.0))
    }
}

fn find_cmp<'a, 'k, K, F, C>(
    key: &'a K,
    lookup: &'a F,
    compare: &'a C,
) -> impl Fn(Handle, Handle) -> Ordering + 'a
where
    F: Fn(EntryId) -> &'k K,
    C: Fn(&K, &K) -> Ordering,
    K: 'k,
    'k: 'a,
{
    move |a: Handle, b: Handle| match (a.0, b.0) {
        (Handle::SENTINEL_VALUE, Handle::SENTINEL_VALUE) => Ordering::Equal,
        (Handle::SENTINEL_VALUE, v) => compare(key, lookup(EntryId::new(v))),
        (v, Handle::SENTINEL_VALUE) => compare(lookup(EntryId::new(v)), key),
        (a, b) => compare(lookup(EntryId::new(a)), lookup(EntryId::new(b))),
    }
}

fn entry_cmp<'a, 'k, K, F, C>(
    lookup: &'a F,
    compare: &'a C,
) -> impl Fn(Handle, Handle) -> Ordering + 'a
where
    F: Fn(EntryId) -> &'k K,
    C: Fn(&K, &K) -> Ordering,
    K: 'k,
    'k: 'a,
{
    move |a: Handle, b: Handle| match (a.0, b.0) {
        // The sentinel is never passed in on the insert and remove paths,
        // and never stored.
        (Handle::SENTINEL_VALUE, _) | (_, Handle::SENTINEL_VALUE) => {
            panic!("sentinel value should not be invoked in insert path")
        }
        (a, b) if a == b => Ordering::Equal,
        (a, b) => compare(lookup(EntryId::new(a)), lookup(EntryId::new(b))),
    }
}

struct CmpDropGuard<'a> {
    _marker: PhantomData<&'a ()>,
}

impl<'a> CmpDropGuard<'a> {
    fn new(f: &'a dyn Fn(Handle, Handle) -> Ordering) -> Self {
        // CMP lasts only as long as this guard and is reset to None when the
        // guard is dropped.
        let ret = Self { _marker: PhantomData };

        // SAFETY: the reference is only reachable through CMP, which is
        // cleared when this guard (which borrows `f` for 'a) is dropped.
        let as_static = unsafe {
            std::mem::transmute::<
                &'a dyn Fn(Handle, Handle) -> Ordering,
                &'static dyn Fn(Handle, Handle) -> Ordering,
            >(f)
        };
        CMP.set(Some(as_static));

        ret
    }
}

impl Drop for CmpDropGuard<'_> {
    fn drop(&mut self) {
        CMP.set(None);
    }
}

#[derive(Clone, Copy, Debug)]
struct Handle(usize);

impl Handle {
    const SENTINEL_VALUE: usize = usize::MAX;
    const SENTINEL: Self = Self(Self::SENTINEL_VALUE);

    #[inline]
    fn new(id: EntryId) -> Self {
        let value = id.index();
        if value == Self::SENTINEL_VALUE {
            panic!("btree map overflow, index with value {value:?} was added")
        }
        Self(value)
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        if self.0 != Self::SENTINEL_VALUE && other.0 != Self::SENTINEL_VALUE {
            return self.0 == other.0;
        }

        CMP.with(|cmp| {
            let cmp = cmp.get().expect("cmp should be set");
            cmp(*self, *other) == Ordering::Equal
        })
    }
}

impl Eq for Handle {}

impl Ord for Handle {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        // Only called from within table operations, which install CMP.
        CMP.with(|cmp| {
            let cmp = cmp.get().expect("cmp should be set");
            cmp(*self, *other)
        })
    }
}

impl PartialOrd for Handle {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
