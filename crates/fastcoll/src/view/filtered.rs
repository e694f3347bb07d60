// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    equality::Equivalence,
    errors::CollectionError,
    service::{Collection, CollectionMut, DeepClone, Direction},
};
use core::borrow::Borrow;
use debug_ignore::DebugIgnore;

/// A view of the elements matching a predicate.
///
/// Created by [`ViewExt::filtered`](super::ViewExt::filtered).
#[derive(Clone, Debug)]
pub struct Filtered<C, P> {
    target: C,
    predicate: DebugIgnore<P>,
}

impl<C, P> Filtered<C, P> {
    pub(crate) fn new(target: C, predicate: P) -> Self {
        Self { target, predicate: DebugIgnore(predicate) }
    }

    /// Returns the wrapped target.
    pub fn into_inner(self) -> C {
        self.target
    }
}

impl<C, P> Filtered<C, P>
where
    C: Collection,
    P: Fn(&C::Item) -> bool,
{
    #[inline]
    fn matches(&self, pos: C::Pos) -> bool {
        (self.predicate.0)(Borrow::<C::Item>::borrow(&self.target.get(pos)))
    }
}

impl<C, P> Collection for Filtered<C, P>
where
    C: Collection,
    P: Fn(&C::Item) -> bool,
{
    type Item = C::Item;
    type Ref<'a>
        = C::Ref<'a>
    where
        Self: 'a;
    type Pos = C::Pos;
    type Cursor = C::Cursor;

    fn len(&self) -> usize {
        let mut cursor = self.cursor(Direction::Forward);
        let mut len = 0;
        while self.advance(&mut cursor).is_some() {
            len += 1;
        }
        len
    }

    fn is_empty(&self) -> bool {
        let mut cursor = self.cursor(Direction::Forward);
        self.advance(&mut cursor).is_none()
    }

    fn equality(&self) -> &dyn Equivalence<Self::Item> {
        self.target.equality()
    }

    fn cursor(&self, direction: Direction) -> Self::Cursor {
        self.target.cursor(direction)
    }

    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        loop {
            let pos = self.target.advance(cursor)?;
            if self.matches(pos) {
                return Some(pos);
            }
        }
    }

    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        self.target.get(pos)
    }

    fn position(&self, item: &Self::Item) -> Option<Self::Pos> {
        if !(self.predicate.0)(item) {
            return None;
        }
        self.target.position(item).filter(|&pos| self.matches(pos))
    }
}

impl<C, P> CollectionMut for Filtered<C, P>
where
    C: CollectionMut,
    P: Fn(&C::Item) -> bool,
{
    fn add(&mut self, item: Self::Item) -> Result<bool, CollectionError> {
        if (self.predicate.0)(&item) {
            self.target.add(item)
        } else {
            Ok(false)
        }
    }

    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError> {
        self.target.remove_at(pos)
    }
}

impl<C: DeepClone, P: Clone> DeepClone for Filtered<C, P> {
    type Owned = Filtered<C::Owned, P>;

    fn deep_clone(&self) -> Self::Owned {
        Filtered::new(self.target.deep_clone(), self.predicate.0.clone())
    }
}
