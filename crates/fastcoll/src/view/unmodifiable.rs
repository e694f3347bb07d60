// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    equality::{Equality, Equivalence},
    errors::CollectionError,
    service::{
        Collection, CollectionMut, DeepClone, Direction, MapService,
        MapServiceMut,
    },
};

/// A read-only view.
///
/// Reads are forwarded to the target. Every mutator, including removal
/// through a cursor, fails with [`CollectionError::PermissionDenied`]. The
/// target itself stays writable, and its changes are visible through the
/// view.
///
/// Wraps both collections and maps. Created by
/// [`ViewExt::unmodifiable`](super::ViewExt::unmodifiable),
/// [`FastMap::unmodifiable`](crate::FastMap::unmodifiable) and
/// [`Collection::perform`].
#[derive(Clone, Debug)]
pub struct Unmodifiable<C> {
    target: C,
}

impl<C> Unmodifiable<C> {
    /// Wraps `target`.
    pub fn new(target: C) -> Self {
        Self { target }
    }

    /// Returns the wrapped target.
    pub fn into_inner(self) -> C {
        self.target
    }
}

impl<C: Collection> Collection for Unmodifiable<C> {
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
        self.target.cursor(direction)
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

impl<C: Collection> CollectionMut for Unmodifiable<C> {
    fn add(&mut self, _item: Self::Item) -> Result<bool, CollectionError> {
        Err(CollectionError::PermissionDenied("add to unmodifiable view"))
    }

    fn remove_at(&mut self, _pos: Self::Pos) -> Result<(), CollectionError> {
        Err(CollectionError::PermissionDenied("remove from unmodifiable view"))
    }

    fn remove(&mut self, _item: &Self::Item) -> Result<bool, CollectionError> {
        Err(CollectionError::PermissionDenied("remove from unmodifiable view"))
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        Err(CollectionError::PermissionDenied("clear unmodifiable view"))
    }

    fn remove_if<P>(&mut self, _predicate: P) -> Result<usize, CollectionError>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Err(CollectionError::PermissionDenied("remove_if on unmodifiable view"))
    }

    fn retain<P>(&mut self, _keep: P) -> Result<usize, CollectionError>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Err(CollectionError::PermissionDenied("retain on unmodifiable view"))
    }
}

impl<C: DeepClone> DeepClone for Unmodifiable<C> {
    type Owned = Unmodifiable<C::Owned>;

    fn deep_clone(&self) -> Self::Owned {
        Unmodifiable::new(self.target.deep_clone())
    }
}

impl<M: MapService> MapService for Unmodifiable<M> {
    type Key = M::Key;
    type Value = M::Value;
    type Pos = M::Pos;
    type Cursor = M::Cursor;

    fn entry_count(&self) -> usize {
        self.target.entry_count()
    }

    fn key_equality(&self) -> Equality<Self::Key> {
        self.target.key_equality()
    }

    fn value_equality(&self) -> Equality<Self::Value> {
        self.target.value_equality()
    }

    fn map_cursor(&self, direction: Direction) -> Self::Cursor {
        self.target.map_cursor(direction)
    }

    fn advance_entry(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        self.target.advance_entry(cursor)
    }

    fn entry(&self, pos: Self::Pos) -> &(Self::Key, Self::Value) {
        self.target.entry(pos)
    }

    fn find(&self, key: &Self::Key) -> Option<Self::Pos> {
        self.target.find(key)
    }
}

impl<M: MapService> MapServiceMut for Unmodifiable<M> {
    fn put(
        &mut self,
        _key: Self::Key,
        _value: Self::Value,
    ) -> Result<Option<Self::Value>, CollectionError> {
        Err(CollectionError::PermissionDenied("put into unmodifiable map"))
    }

    fn put_if_absent(
        &mut self,
        _key: Self::Key,
        _value: Self::Value,
    ) -> Result<bool, CollectionError> {
        Err(CollectionError::PermissionDenied("put into unmodifiable map"))
    }

    fn remove_entry_at(
        &mut self,
        _pos: Self::Pos,
    ) -> Result<(Self::Key, Self::Value), CollectionError> {
        Err(CollectionError::PermissionDenied("remove from unmodifiable map"))
    }

    fn value_at_mut(
        &mut self,
        _pos: Self::Pos,
    ) -> Result<&mut Self::Value, CollectionError> {
        Err(CollectionError::PermissionDenied("modify unmodifiable map"))
    }

    fn clear_entries(&mut self) -> Result<(), CollectionError> {
        Err(CollectionError::PermissionDenied("clear unmodifiable map"))
    }
}

impl<M: MapService> Unmodifiable<M> {
    /// Returns the value for `key`.
    pub fn get_value(&self, key: &M::Key) -> Option<&M::Value> {
        self.target.find(key).map(|pos| &self.target.entry(pos).1)
    }
}
