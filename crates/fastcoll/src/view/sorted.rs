// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    equality::Equivalence,
    errors::CollectionError,
    service::{Collection, CollectionMut, DeepClone, Direction},
    sort::quick_sort_by,
};
use core::{borrow::Borrow, cmp::Ordering};
use debug_ignore::DebugIgnore;

/// An order used by [`Sorted`].
pub trait SortOrder<T> {
    /// Compares `a` and `b`. `equality` is the target's strategy.
    fn order(&self, equality: &dyn Equivalence<T>, a: &T, b: &T) -> Ordering;
}

impl<T, F> SortOrder<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn order(&self, _equality: &dyn Equivalence<T>, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// The elements' `Ord` implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<T: Ord> SortOrder<T> for NaturalOrder {
    #[inline]
    fn order(&self, _equality: &dyn Equivalence<T>, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// The order of the target's equality strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqualityOrder;

impl<T> SortOrder<T> for EqualityOrder {
    #[inline]
    fn order(&self, equality: &dyn Equivalence<T>, a: &T, b: &T) -> Ordering {
        equality.compare(a, b).unwrap_or(Ordering::Equal)
    }
}

/// A view whose traversal follows an order.
///
/// The order is materialized when a traversal starts, by sorting the
/// target's positions; the target itself is untouched. Starting a traversal
/// costs O(n log n).
///
/// Created by [`ViewExt::sorted`](super::ViewExt::sorted) and friends.
#[derive(Clone, Debug)]
pub struct Sorted<C, O> {
    target: C,
    order: DebugIgnore<O>,
}

impl<C, O> Sorted<C, O> {
    pub(crate) fn new(target: C, order: O) -> Self {
        Self { target, order: DebugIgnore(order) }
    }

    /// Returns the wrapped target.
    pub fn into_inner(self) -> C {
        self.target
    }
}

/// Traversal state over a [`Sorted`] view.
#[derive(Clone, Debug)]
pub struct SortedCursor<P> {
    positions: Vec<P>,
    front: usize,
    back: usize,
    direction: Direction,
}

impl<C, O> Collection for Sorted<C, O>
where
    C: Collection,
    O: SortOrder<C::Item>,
{
    type Item = C::Item;
    type Ref<'a>
        = C::Ref<'a>
    where
        Self: 'a;
    type Pos = C::Pos;
    type Cursor = SortedCursor<C::Pos>;

    fn len(&self) -> usize {
        self.target.len()
    }

    fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    fn equality(&self) -> &dyn Equivalence<Self::Item> {
        self.target.equality()
    }

    fn cursor(&self, direction: Direction) -> Self::Cursor {
        let mut positions = Vec::with_capacity(self.target.len());
        let mut inner = self.target.cursor(Direction::Forward);
        while let Some(pos) = self.target.advance(&mut inner) {
            positions.push(pos);
        }
        let equality = self.target.equality();
        quick_sort_by(&mut positions, |&a, &b| {
            self.order.0.order(
                equality,
                Borrow::<C::Item>::borrow(&self.target.get(a)),
                Borrow::<C::Item>::borrow(&self.target.get(b)),
            )
        });
        let back = positions.len();
        SortedCursor { positions, front: 0, back, direction }
    }

    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        if cursor.front >= cursor.back {
            return None;
        }
        match cursor.direction {
            Direction::Forward => {
                cursor.front += 1;
                Some(cursor.positions[cursor.front - 1])
            }
            Direction::Backward => {
                cursor.back -= 1;
                Some(cursor.positions[cursor.back])
            }
        }
    }

    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        self.target.get(pos)
    }

    fn position(&self, item: &Self::Item) -> Option<Self::Pos> {
        self.target.position(item)
    }
}

impl<C, O> CollectionMut for Sorted<C, O>
where
    C: CollectionMut,
    O: SortOrder<C::Item>,
{
    fn add(&mut self, item: Self::Item) -> Result<bool, CollectionError> {
        self.target.add(item)
    }

    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError> {
        self.target.remove_at(pos)
    }

    fn remove(&mut self, item: &Self::Item) -> Result<bool, CollectionError> {
        self.target.remove(item)
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        self.target.clear()
    }
}

impl<C: DeepClone, O: Clone> DeepClone for Sorted<C, O> {
    type Owned = Sorted<C::Owned, O>;

    fn deep_clone(&self) -> Self::Owned {
        Sorted::new(self.target.deep_clone(), self.order.0.clone())
    }
}
