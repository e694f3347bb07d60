// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key, value and entry windows over a map.
//!
//! None of these views copy anything: they traverse the map's entries, and
//! removing through them detaches the entry from the map.

use crate::{
    equality::{Equality, Equivalence, PairEquality},
    errors::CollectionError,
    service::{
        Collection, CollectionMut, DeepClone, Direction, MapService,
        MapServiceMut,
    },
};

/// The keys of a map, as a collection.
///
/// Membership tests use the map's directory, so `contains` is as fast as a
/// key lookup. Adding through a key view fails with
/// [`CollectionError::PermissionDenied`], since there is no value to pair the
/// key with.
#[derive(Clone, Debug)]
pub struct Keys<M: MapService> {
    map: M,
    equality: Equality<M::Key>,
}

impl<M: MapService> Keys<M> {
    /// Creates a key view over `map`.
    pub fn new(map: M) -> Self {
        let equality = map.key_equality();
        Self { map, equality }
    }

    /// Returns the wrapped map.
    pub fn into_inner(self) -> M {
        self.map
    }
}

impl<M: MapService> Collection for Keys<M> {
    type Item = M::Key;
    type Ref<'a>
        = &'a M::Key
    where
        Self: 'a;
    type Pos = M::Pos;
    type Cursor = M::Cursor;

    fn len(&self) -> usize {
        self.map.entry_count()
    }

    fn equality(&self) -> &dyn Equivalence<Self::Item> {
        &self.equality
    }

    fn cursor(&self, direction: Direction) -> Self::Cursor {
        self.map.map_cursor(direction)
    }

    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        self.map.advance_entry(cursor)
    }

    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        &self.map.entry(pos).0
    }

    fn position(&self, item: &Self::Item) -> Option<Self::Pos> {
        self.map.find(item)
    }
}

impl<M: MapServiceMut> CollectionMut for Keys<M> {
    fn add(&mut self, _item: Self::Item) -> Result<bool, CollectionError> {
        Err(CollectionError::PermissionDenied("add through key view"))
    }

    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError> {
        self.map.remove_entry_at(pos).map(drop)
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        self.map.clear_entries()
    }
}

impl<M> DeepClone for Keys<M>
where
    M: MapService + DeepClone,
    M::Owned: MapService<Key = M::Key>,
{
    type Owned = Keys<M::Owned>;

    fn deep_clone(&self) -> Self::Owned {
        Keys::new(self.map.deep_clone())
    }
}

/// The values of a map, as a collection.
///
/// Values are compared with the map's value equality. Membership tests scan
/// the entries.
#[derive(Clone, Debug)]
pub struct Values<M: MapService> {
    map: M,
    equality: Equality<M::Value>,
}

impl<M: MapService> Values<M> {
    /// Creates a value view over `map`.
    pub fn new(map: M) -> Self {
        let equality = map.value_equality();
        Self { map, equality }
    }

    /// Returns the wrapped map.
    pub fn into_inner(self) -> M {
        self.map
    }
}

impl<M: MapServiceMut> Values<M> {
    /// Calls `f` with mutable access to every value, first to last.
    pub fn for_each_mut<F>(&mut self, mut f: F) -> Result<(), CollectionError>
    where
        F: FnMut(&mut M::Value),
    {
        let mut cursor = self.map.map_cursor(Direction::Forward);
        while let Some(pos) = self.map.advance_entry(&mut cursor) {
            f(self.map.value_at_mut(pos)?);
        }
        Ok(())
    }
}

impl<M: MapService> Collection for Values<M> {
    type Item = M::Value;
    type Ref<'a>
        = &'a M::Value
    where
        Self: 'a;
    type Pos = M::Pos;
    type Cursor = M::Cursor;

    fn len(&self) -> usize {
        self.map.entry_count()
    }

    fn equality(&self) -> &dyn Equivalence<Self::Item> {
        &self.equality
    }

    fn cursor(&self, direction: Direction) -> Self::Cursor {
        self.map.map_cursor(direction)
    }

    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        self.map.advance_entry(cursor)
    }

    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        &self.map.entry(pos).1
    }
}

impl<M: MapServiceMut> CollectionMut for Values<M> {
    fn add(&mut self, _item: Self::Item) -> Result<bool, CollectionError> {
        Err(CollectionError::PermissionDenied("add through value view"))
    }

    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError> {
        self.map.remove_entry_at(pos).map(drop)
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        self.map.clear_entries()
    }
}

impl<M> DeepClone for Values<M>
where
    M: MapService + DeepClone,
    M::Owned: MapService<Value = M::Value>,
{
    type Owned = Values<M::Owned>;

    fn deep_clone(&self) -> Self::Owned {
        Values::new(self.map.deep_clone())
    }
}

/// The entries of a map, as a collection of `(key, value)` pairs.
///
/// Two entries are equal when both their keys and their values are equal
/// under the map's strategies. Adding an entry puts it into the map.
#[derive(Clone, Debug)]
pub struct Entries<M: MapService> {
    map: M,
    equality: PairEquality<M::Key, M::Value>,
}

impl<M: MapService> Entries<M> {
    /// Creates an entry view over `map`.
    pub fn new(map: M) -> Self {
        let equality =
            PairEquality::new(map.key_equality(), map.value_equality());
        Self { map, equality }
    }

    /// Returns the wrapped map.
    pub fn into_inner(self) -> M {
        self.map
    }
}

impl<M: MapService> Collection for Entries<M> {
    type Item = (M::Key, M::Value);
    type Ref<'a>
        = &'a (M::Key, M::Value)
    where
        Self: 'a;
    type Pos = M::Pos;
    type Cursor = M::Cursor;

    fn len(&self) -> usize {
        self.map.entry_count()
    }

    fn equality(&self) -> &dyn Equivalence<Self::Item> {
        &self.equality
    }

    fn cursor(&self, direction: Direction) -> Self::Cursor {
        self.map.map_cursor(direction)
    }

    fn advance(&self, cursor: &mut Self::Cursor) -> Option<Self::Pos> {
        self.map.advance_entry(cursor)
    }

    fn get(&self, pos: Self::Pos) -> Self::Ref<'_> {
        self.map.entry(pos)
    }

    fn position(&self, item: &Self::Item) -> Option<Self::Pos> {
        let pos = self.map.find(&item.0)?;
        self.equality
            .value
            .equal(&self.map.entry(pos).1, &item.1)
            .then_some(pos)
    }
}

impl<M: MapServiceMut> CollectionMut for Entries<M> {
    fn add(&mut self, item: Self::Item) -> Result<bool, CollectionError> {
        if self.position(&item).is_some() {
            return Ok(false);
        }
        let (key, value) = item;
        self.map.put(key, value)?;
        Ok(true)
    }

    fn remove_at(&mut self, pos: Self::Pos) -> Result<(), CollectionError> {
        self.map.remove_entry_at(pos).map(drop)
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        self.map.clear_entries()
    }
}

impl<M> DeepClone for Entries<M>
where
    M: MapService + DeepClone,
    M::Owned: MapService<Key = M::Key, Value = M::Value>,
{
    type Owned = Entries<M::Owned>;

    fn deep_clone(&self) -> Self::Owned {
        Entries::new(self.map.deep_clone())
    }
}
