// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::SortedMap;
use crate::{equality::Equality, fast_map::serde_impls::entry_count};
use core::{fmt, marker::PhantomData};
use serde_core::{
    de::{Error as _, SeqAccess, Visitor},
    ser::{Error as _, SerializeSeq},
    Deserialize, Deserializer, Serialize, Serializer,
};

/// A `SortedMap` serializes to a sequence of `(key, value)` pairs in key
/// order.
///
/// # Examples
///
/// ```
/// use fastcoll::SortedMap;
///
/// let mut map = SortedMap::new();
/// map.insert(2, "two".to_owned());
/// map.insert(1, "one".to_owned());
///
/// let serialized = serde_json::to_string(&map).unwrap();
/// assert_eq!(serialized, r#"[[1,"one"],[2,"two"]]"#);
///
/// let deserialized: SortedMap<u32, String> =
///     serde_json::from_str(&serialized).unwrap();
/// assert_eq!(deserialized, map);
/// ```
impl<K: Serialize, V: Serialize> Serialize for SortedMap<K, V> {
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

/// Pairs may arrive in any order. A key that appears twice keeps its last
/// value.
impl<'de, K, V> Deserialize<'de> for SortedMap<K, V>
where
    K: Ord + Deserialize<'de>,
    V: PartialEq + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SeqVisitor {
            _marker: PhantomData,
            key_equality: Equality::ord(),
            value_equality: Equality::partial_eq(),
        })
    }
}

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> SortedMap<K, V> {
    /// Deserializes from a sequence of pairs, building the map with the
    /// given strategies.
    ///
    /// Fails if `key_equality` has no order.
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
    type Value = SortedMap<K, V>;

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
            SortedMap::with_equalities(self.key_equality, self.value_equality)
                .map_err(Access::Error::custom)?;
        while let Some((key, value)) = seq.next_element()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}
