// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fastcoll::{equality::Equality, service::Collection};
use proptest::prelude::*;
use std::{borrow::Borrow, fmt};
use test_strategy::Arbitrary;

/// Keys are drawn from a small range so that operations collide often.
pub const KEY_RANGE: u8 = 48;

/// A key/value pair for property-based tests.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Arbitrary)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestEntry {
    #[strategy(0..KEY_RANGE)]
    pub key: u8,
    pub value: u32,
}

impl TestEntry {
    pub fn new(key: u8, value: u32) -> Self {
        Self { key, value }
    }

    pub fn into_pair(self) -> (u8, u32) {
        (self.key, self.value)
    }
}

/// A strategy for keys in the test key range.
pub fn test_key() -> impl Strategy<Value = u8> {
    0..KEY_RANGE
}

/// Equality that only looks at the last decimal digit.
///
/// Used to check that structures honor the strategy they were built with
/// instead of the element's own `Eq`.
pub fn last_digit_equality() -> Equality<u32> {
    Equality::custom(|a, b| a % 10 == b % 10, |v| u64::from(v % 10))
}

/// Assert that a collection's forward traversal yields exactly `expected`,
/// and its backward traversal yields it reversed.
pub fn assert_traversal<C, T>(collection: &C, expected: &[T])
where
    C: Collection<Item = T>,
    T: Clone + PartialEq + fmt::Debug,
{
    let forward: Vec<T> = collection
        .iter()
        .map(|item| Borrow::<T>::borrow(&item).clone())
        .collect();
    assert_eq!(forward, expected, "forward traversal matches");

    let mut backward: Vec<T> = collection
        .iter_rev()
        .map(|item| Borrow::<T>::borrow(&item).clone())
        .collect();
    backward.reverse();
    assert_eq!(backward, expected, "backward traversal matches");

    assert_eq!(collection.len(), expected.len(), "len matches traversal");
}
