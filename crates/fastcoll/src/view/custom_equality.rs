// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    equality::{Equality, Equivalence},
    errors::CollectionError,
    service::{Collection, CollectionMut, DeepClone, Direction},
};

/// A view that compares elements with its own equality strategy.
///
/// Membership tests and removal by value scan the target with the view's
/// strategy. Additions are forwarded unchanged, so the target still decides
/// what counts as a duplicate on insertion.
///
/// Created by [`ViewExt::with_equality`](super::ViewExt::with_equality).
#[derive(Debug)]
pub struct CustomEquality<C: Collection> {
    target: C,
    equality: Equality<C::Item>,
}

impl<C: Collection + Clone> Clone for CustomEquality<C> {
    fn clone(&self) -> Self {
        Self { target: self.target.clone(), equality: self.equality }
    }
}

impl<C: Collection> CustomEquality<C> {
    pub(crate) fn new(target: C, equality: Equality<C::Item>) -> Self {
        Self { target, equality }
    }

    /// Returns the wrapped target.
    pub fn into_inner(self) -> C {
        self.target
    }
}

impl<C: Collection> Collection for CustomEquality<C> {
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
        &self.equality
    }

    fn cursor(&self, direction: Direction) -> Self::Cursor {
        self.target.cursor(direction)
    }

    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        self.target.advance(cursor)
    }

    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        self.target.get(pos)
    }
}

impl<C: CollectionMut> CollectionMut for CustomEquality<C> {
    fn add(&mut self, item: Self::Item) -> Result<bool, CollectionError> {
        self.target.add(item)
    }

    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError> {
        self.target.remove_at(pos)
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        self.target.clear()
    }
}

impl<C> DeepClone for CustomEquality<C>
where
    C: Collection + DeepClone,
    C::Owned: Collection<Item = C::Item>,
{
    type Owned = CustomEquality<C::Owned>;

    fn deep_clone(&self) -> Self::Owned {
        CustomEquality::new(self.target.deep_clone(), self.equality)
    }
}
