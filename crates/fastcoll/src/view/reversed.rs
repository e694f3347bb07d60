// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    equality::Equivalence,
    errors::CollectionError,
    service::{Collection, CollectionMut, DeepClone, Direction},
};

/// A view traversing its target backwards, without materializing anything.
///
/// Created by [`ViewExt::reversed`](super::ViewExt::reversed).
#[derive(Clone, Debug)]
pub struct Reversed<C> {
    target: C,
}

impl<C> Reversed<C> {
    pub(crate) fn new(target: C) -> Self {
        Self { target }
    }

    /// Returns the wrapped target.
    pub fn into_inner(self) -> C {
        self.target
    }
}

impl<C: Collection> Collection for Reversed<C> {
    type Item = C::Item;
    type Ref<'a>
        = C::Ref<'a>
    where
        Self: 'a;
    type Pos = C::Pos;
    type Cursor = C::Cursor;

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
        self.target.cursor(direction.reverse())
    }

    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        self.target.advance(cursor)
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

impl<C: CollectionMut> CollectionMut for Reversed<C> {
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

impl<C: DeepClone> DeepClone for Reversed<C> {
    type Owned = Reversed<C::Owned>;

    fn deep_clone(&self) -> Self::Owned {
        Reversed::new(self.target.deep_clone())
    }
}
