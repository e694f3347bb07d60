// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    equality::{Equality, Equivalence},
    errors::CollectionError,
    service::{Collection, CollectionMut, DeepClone, Direction},
};
use core::borrow::Borrow;
use debug_ignore::DebugIgnore;

/// A view of the target's elements transformed by a function.
///
/// Elements are computed on access, so [`Collection::get`] returns owned
/// values. Adding through a mapped view fails with
/// [`CollectionError::PermissionDenied`], since a mapping cannot be inverted
/// in general; removal is forwarded to the target.
///
/// Created by [`ViewExt::mapped`](super::ViewExt::mapped).
#[derive(Clone, Debug)]
pub struct Mapped<C, F, R> {
    target: C,
    mapping: DebugIgnore<F>,
    equality: Equality<R>,
}

impl<C, F, R> Mapped<C, F, R> {
    pub(crate) fn new(target: C, mapping: F, equality: Equality<R>) -> Self {
        Self { target, mapping: DebugIgnore(mapping), equality }
    }

    /// Returns the wrapped target.
    pub fn into_inner(self) -> C {
        self.target
    }
}

impl<C, F, R> Collection for Mapped<C, F, R>
where
    C: Collection,
    F: Fn(&C::Item) -> R,
{
    type Item = R;
    type Ref<'a>
        = R
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
        (self.mapping.0)(Borrow::<C::Item>::borrow(&self.target.get(pos)))
    }
}

impl<C, F, R> CollectionMut for Mapped<C, F, R>
where
    C: CollectionMut,
    F: Fn(&C::Item) -> R,
{
    fn add(&mut self, _item: Self::Item) -> Result<bool, CollectionError> {
        Err(CollectionError::PermissionDenied("add through mapped view"))
    }

    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError> {
        self.target.remove_at(pos)
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        self.target.clear()
    }
}

impl<C: DeepClone, F: Clone, R> DeepClone for Mapped<C, F, R> {
    type Owned = Mapped<C::Owned, F, R>;

    fn deep_clone(&self) -> Self::Owned {
        Mapped::new(
            self.target.deep_clone(),
            self.mapping.0.clone(),
            self.equality,
        )
    }
}
