// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::FastMap;
use crate::equality::Equality;
use core::{fmt, hash::Hash, marker::PhantomData};
use serde_core::{
    de::{SeqAccess, Visitor},
    ser::{Error as _, SerializeSeq},
    Deserialize, Deserializer, Serialize, Serializer,
};

/// A `FastMap` serializes to an entry stream: a sequence of `(key, value)`
/// pairs in iteration order, whose length is the entry count.
///
/// The count must fit in an `i32`; larger maps fail to serialize.
///
/// # Examples
///
/// ```
/// use fastcoll::FastMap;
///
/// let mut map = FastMap::new();
/// map.insert(2, "two".to_owned());
/// map.insert(1, "one".to_owned());
///
/// let serialized = serde_json::to_string(&map).unwrap();
/// assert_eq!(serialized, r#"[[2,"two"],[1,"one"]]"#);
///
/// let deserialized: FastMap<u32, String> =
///     serde_json::from_str(&serialized).unwrap();
/// assert_eq!(deserialized, map);
/// ```
impl<K: Serialize, V: Serialize> Serialize for FastMap<K, V> {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let count = entry_count(self.len()).map_err(S::Error::custom)?;
        let mut seq = serializer.serialize_seq(Some(count))?;
        for entry in self {
            seq.serialize_element(&entry)?;
        }
        seq.end()
    }
}

/// The `Deserialize` impl replays [`FastMap::insert`] for every pair, in
/// stream order, so the iteration order round-trips exactly.
///
/// A key that appears twice keeps its first position and its last value.
impl<'de, K, V> Deserialize<'de> for FastMap<K, V>
where
    K: Hash + Eq + Deserialize<'de>,
    V: PartialEq + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SeqVisitor {
            _marker: PhantomData,
            key_equality: Equality::natural(),
            value_equality: Equality::partial_eq(),
        })
    }
}

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> FastMap<K, V> {
    /// Deserializes from an entry stream, building the map with the given
    /// strategies.
    pub fn deserialize_with_equalities<D: Deserializer<'de>>(
        deserializer: D,
        key_equality: Equality<K>,
        value_equality: Equality<V>,
    ) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SeqVisitor {
            _marker: PhantomData,
            key_equality,
            value_equality,
        })
    }
}

pub(crate) fn entry_count(len: usize) -> Result<usize, String> {
    match i32::try_from(len) {
        Ok(_) => Ok(len),
        Err(_) => Err(format!(
            "{len} entries exceed the entry stream limit of {}",
            i32::MAX
        )),
    }
}

struct SeqVisitor<K, V> {
    _marker: PhantomData<fn() -> (K, V)>,
    key_equality: Equality<K>,
    value_equality: Equality<V>,
}

impl<'de, K, V> Visitor<'de> for SeqVisitor<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = FastMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence of (key, value) pairs")
    }

    fn visit_seq<Access>(
        self,
        mut seq: Access,
    ) -> Result<Self::Value, Access::Error>
    where
        Access: SeqAccess<'de>,
    {
        let mut map =
            FastMap::with_equalities(self.key_equality, self.value_equality);
        while let Some((key, value)) = seq.next_element()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}
