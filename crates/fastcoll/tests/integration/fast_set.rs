// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fastcoll::{
    CollectionError, FastSet,
    service::{Collection, CollectionMut, Direction},
};
use fastcoll_test_utils::{
    eq_props::{assert_eq_props, assert_strategy_consistent},
    naive_map::NaiveMap,
    test_entry::{assert_traversal, last_digit_equality, test_key},
};
use proptest::prelude::*;
use test_strategy::{Arbitrary, proptest};

#[test]
fn insertion_order() {
    let mut set = FastSet::new();
    for value in [5, 3, 9, 1] {
        assert!(set.insert(value));
    }
    assert!(!set.insert(3));
    assert_traversal(&set, &[5, 3, 9, 1]);

    assert_eq!(set.take(&9), Some(9));
    set.insert(9);
    assert_traversal(&set, &[5, 3, 1, 9]);
    assert_eq!(set.first(), Some(&5));
    assert_eq!(set.last(), Some(&9));
}

#[test]
fn custom_equality() {
    let mut set = FastSet::with_equality(last_digit_equality());
    set.extend([13, 23, 4, 14, 5]);
    assert_traversal(&set, &[13, 4, 5]);
    assert!(set.contains(&33));
    assert!(set.remove(&43));
    assert_traversal(&set, &[4, 5]);

    for (a, b) in [(13, 23), (13, 14)] {
        assert_strategy_consistent(set.equality(), &a, &b);
    }
}

#[test]
fn cursor_remove() {
    let mut set: FastSet<u32> = (0..10).collect();
    let mut cursor = set.cursor_mut(Direction::Backward);
    assert_eq!(
        cursor.remove(),
        Err(CollectionError::IllegalState(
            "cursor remove without a current element"
        ))
    );
    while let Some(&value) = cursor.next() {
        if value % 3 == 0 {
            cursor.remove().expect("current element is removable");
            assert!(cursor.remove().is_err(), "second remove is rejected");
        }
    }
    assert_traversal(&set, &[1, 2, 4, 5, 7, 8]);
    set.validate().expect("set is valid");
}

#[test]
fn equality_ignores_order() {
    let forward: FastSet<u8> = (0..32).collect();
    let backward: FastSet<u8> = (0..32).rev().collect();
    assert_eq_props(forward, backward);
}

#[derive(Debug, Arbitrary)]
enum Operation {
    #[weight(3)]
    Insert(#[strategy(test_key())] u8),
    Remove(#[strategy(test_key())] u8),
    Contains(#[strategy(test_key())] u8),
    RetainEven,
}

#[proptest(cases = 64)]
fn proptest_ops(
    #[strategy(prop::collection::vec(any::<Operation>(), 0..512))] ops: Vec<
        Operation,
    >,
) {
    let mut set = FastSet::<u8>::new();
    let mut naive_map = NaiveMap::new();

    for op in ops {
        match op {
            Operation::Insert(value) => {
                let inserted = set.insert(value);
                let naive_inserted =
                    naive_map.insert_if_absent(value, ()).is_none();
                prop_assert_eq!(inserted, naive_inserted);
            }
            Operation::Remove(value) => {
                let removed = set.remove(&value);
                prop_assert_eq!(removed, naive_map.remove(&value).is_some());
            }
            Operation::Contains(value) => {
                prop_assert_eq!(
                    set.contains(&value),
                    naive_map.contains_key(&value)
                );
            }
            Operation::RetainEven => {
                let odd: Vec<u8> =
                    naive_map.keys().copied().filter(|v| v % 2 == 1).collect();
                for value in &odd {
                    naive_map.remove(value);
                }
                let removed = set.retain(|v| v % 2 == 0).unwrap();
                prop_assert_eq!(removed, odd.len());
            }
        }

        set.validate().expect("set is valid");
        let values: Vec<u8> = set.iter().copied().collect();
        let naive_values: Vec<u8> = naive_map.keys().copied().collect();
        prop_assert_eq!(values, naive_values);
    }
}
