// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serde-related test utilities.

use crate::test_entry::TestEntry;
use fastcoll::{FastMap, SortedMap};

/// Serializes a `FastMap` built from `entries` and checks that deserializing
/// it restores the same entries in the same order.
pub fn assert_fast_map_roundtrip(entries: Vec<TestEntry>) {
    let map: FastMap<u8, u32> =
        entries.into_iter().map(TestEntry::into_pair).collect();

    let serialized = serde_json::to_string(&map).unwrap();
    let deserialized: FastMap<u8, u32> =
        serde_json::from_str(&serialized).unwrap();
    deserialized.validate().expect("deserialized map is valid");

    let map_entries: Vec<_> = map.iter().collect();
    let deserialized_entries: Vec<_> = deserialized.iter().collect();
    assert_eq!(map_entries, deserialized_entries, "entries match in order");

    // The stream is a sequence of pairs, so it can also be read back as a
    // plain vector.
    let pairs: Vec<(u8, u32)> = serde_json::from_str(&serialized).unwrap();
    assert_eq!(pairs.len(), map.len(), "one pair per entry");
}

/// Like [`assert_fast_map_roundtrip`], for a `SortedMap`.
pub fn assert_sorted_map_roundtrip(entries: Vec<TestEntry>) {
    let map: SortedMap<u8, u32> =
        entries.into_iter().map(TestEntry::into_pair).collect();

    let serialized = serde_json::to_string(&map).unwrap();
    let deserialized: SortedMap<u8, u32> =
        serde_json::from_str(&serialized).unwrap();
    deserialized.validate().expect("deserialized map is valid");

    let map_entries: Vec<_> = map.iter().collect();
    let deserialized_entries: Vec<_> = deserialized.iter().collect();
    assert_eq!(map_entries, deserialized_entries, "entries match in order");

    let pairs: Vec<(u8, u32)> = serde_json::from_str(&serialized).unwrap();
    let mut sorted = pairs.clone();
    sorted.sort();
    assert_eq!(pairs, sorted, "stream is in key order");
}
