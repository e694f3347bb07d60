// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    equality::Equivalence,
    errors::CollectionError,
    service::{Collection, CollectionMut, DeepClone, Direction},
};
use core::{borrow::Borrow, fmt};
use hashbrown::HashTable;

/// A view that skips elements equal to one already yielded.
///
/// Equality is the target's strategy. Each traversal keeps a table of the
/// elements seen so far, so a traversal costs O(n) extra memory.
///
/// Adding forwards to the target only if no equal element is present.
/// Removing through a cursor removes just the yielded element; removing by
/// value removes every equal element from the target.
///
/// Created by [`ViewExt::distinct`](super::ViewExt::distinct).
#[derive(Clone, Debug)]
pub struct Distinct<C> {
    target: C,
}

impl<C> Distinct<C> {
    pub(crate) fn new(target: C) -> Self {
        Self { target }
    }

    /// Returns the wrapped target.
    pub fn into_inner(self) -> C {
        self.target
    }
}

/// Traversal state over a [`Distinct`] view.
pub struct DistinctCursor<Cur, T> {
    inner: Cur,
    seen: HashTable<T>,
}

impl<Cur: fmt::Debug, T> fmt::Debug for DistinctCursor<Cur, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistinctCursor")
            .field("inner", &self.inner)
            .field("seen", &self.seen.len())
            .finish()
    }
}

impl<C> Collection for Distinct<C>
where
    C: Collection,
    C::Item: Clone,
{
    type Item = C::Item;
    type Ref<'a>
        = C::Ref<'a>
    where
        Self: 'a;
    type Pos = C::Pos;
    type Cursor = DistinctCursor<C::Cursor, C::Item>;

    fn len(&self) -> usize {
        let mut cursor = self.cursor(Direction::Forward);
        let mut len = 0;
        while self.advance(&mut cursor).is_some() {
            len += 1;
        }
        len
    }

    fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    fn equality(&self) -> &dyn Equivalence<Self::Item> {
        self.target.equality()
    }

    fn cursor(&self, direction: Direction) -> Self::Cursor {
        DistinctCursor {
            inner: self.target.cursor(direction),
            seen: HashTable::new(),
        }
    }

    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        let equality = self.target.equality();
        loop {
            let pos = self.target.advance(&mut cursor.inner)?;
            let element = self.target.get(pos);
            let item = Borrow::<C::Item>::borrow(&element);
            let hash = equality.hash(item);
            let repeat =
                cursor.seen.find(hash, |seen| equality.equal(seen, item));
            if repeat.is_none() {
                cursor.seen.insert_unique(hash, item.clone(), |seen| {
                    equality.hash(seen)
                });
                return Some(pos);
            }
        }
    }

    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        self.target.get(pos)
    }

    fn position(&self, item: &Self::Item) -> Option<Self::Pos> {
        self.target.position(item)
    }

    fn contains(&self, item: &Self::Item) -> bool {
        self.target.contains(item)
    }
}

impl<C> CollectionMut for Distinct<C>
where
    C: CollectionMut,
    C::Item: Clone,
{
    fn add(&mut self, item: Self::Item) -> Result<bool, CollectionError> {
        if self.target.contains(&item) {
            Ok(false)
        } else {
            self.target.add(item)
        }
    }

    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError> {
        self.target.remove_at(pos)
    }

    fn remove(&mut self, item: &Self::Item) -> Result<bool, CollectionError> {
        let mut removed = false;
        while self.target.remove(item)? {
            removed = true;
        }
        Ok(removed)
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        self.target.clear()
    }
}

impl<C: DeepClone> DeepClone for Distinct<C> {
    type Owned = Distinct<C::Owned>;

    fn deep_clone(&self) -> Self::Owned {
        Distinct::new(self.target.deep_clone())
    }
}
