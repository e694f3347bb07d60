// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::BitSet;
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

/// A `BitSet` serializes to its minimal word array.
///
/// ```
/// use fastcoll::BitSet;
///
/// let bits: BitSet = [0_usize, 65].into_iter().collect();
/// let serialized = serde_json::to_string(&bits).unwrap();
/// assert_eq!(serialized, "[1,2]");
///
/// let deserialized: BitSet = serde_json::from_str(&serialized).unwrap();
/// assert_eq!(deserialized, bits);
/// ```
impl Serialize for BitSet {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        self.words().serialize(serializer)
    }
}

/// Trailing zero words in the input are dropped.
impl<'de> Deserialize<'de> for BitSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<u64>::deserialize(deserializer).map(BitSet::from_words)
    }
}
