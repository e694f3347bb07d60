// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fastcoll::{
    CollectionError, SortedMap, SortedSet,
    equality::Equality,
    service::{Collection, CollectionMut},
};
use fastcoll_test_utils::{
    naive_map::NaiveMap,
    test_entry::{TestEntry, assert_traversal, test_key},
};
use proptest::prelude::*;
use std::{cmp::Ordering, ops::Bound};
use test_strategy::{Arbitrary, proptest};

#[test]
fn debug_impls() {
    let mut map = SortedMap::new();
    map.insert(20, "twenty");
    map.insert(1, "one");
    map.insert(10, "ten");

    assert_eq!(format!("{map:?}"), r#"{1: "one", 10: "ten", 20: "twenty"}"#);
}

#[test]
fn reverse_order() {
    let reverse: fn(&u32, &u32) -> Ordering = |a, b| b.cmp(a);
    let mut map =
        SortedMap::with_key_equality(Equality::ordered(reverse, None))
            .expect("ordered equality is accepted");
    map.extend([(1, 'a'), (3, 'c'), (2, 'b')]);

    let keys: Vec<u32> = map.key_set().iter().copied().collect();
    assert_eq!(keys, [3, 2, 1]);
    assert_eq!(map.first_key(), Some(&3));

    // Bounds follow the map's order, so a descending range runs from high
    // to low.
    let range = map.sub_map(3, 1).expect("3 precedes 1");
    let keys: Vec<u32> = range.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, [3, 2]);
    assert_eq!(
        map.sub_map(1, 3).unwrap_err(),
        CollectionError::InvalidArgument("range lower bound above upper bound")
    );
}

#[test]
fn unordered_key_equality() {
    let result = SortedMap::<u32, u32>::with_key_equality(Equality::natural());
    assert!(matches!(result, Err(CollectionError::TypeMismatch(_))));
}

#[test]
fn range_views_track_the_map() {
    let mut map: SortedMap<u8, u32> =
        (0..20).map(|k| (k * 2, u32::from(k))).collect();

    let tail = map.tail_map(30);
    assert_eq!(tail.len(), 5);
    assert_eq!(tail.first_key(), Some(&30));
    assert_eq!(tail.last_key(), Some(&38));
    assert!(!tail.contains_key(&28));

    {
        let mut head = map.head_map_mut(10);
        assert_eq!(head.len(), 5);
        assert_eq!(head.insert(5, 100), Ok(None));
        assert_eq!(
            head.insert(10, 100),
            Err(CollectionError::InvalidArgument("put outside range"))
        );
        assert_eq!(head.remove(&12), None, "outside the view");
        assert_eq!(head.remove(&4), Some(2));
        head.key_set_mut().remove_if(|k| k % 2 == 1).unwrap();
    }
    assert_eq!(map.get(&5), None);
    assert_eq!(map.get(&12), Some(&6));
    map.validate().expect("map is valid");

    // Entries inserted into the map show up in an existing window.
    map.insert(31, 0);
    let window = map.sub_map(29, 34).unwrap();
    let keys: Vec<u8> = window.key_set().iter().copied().collect();
    assert_eq!(keys, [30, 31, 32]);
    assert_traversal(&window.key_set(), &[30, 31, 32]);

    map.sub_map_mut(0, 30).unwrap().clear();
    assert_eq!(map.first_key(), Some(&30));
    map.validate().expect("map is valid");
}

#[test]
fn sorted_set_subsets() {
    let mut set: SortedSet<u32> = [8, 3, 5, 1, 13, 2].into_iter().collect();
    assert_traversal(&set, &[1, 2, 3, 5, 8, 13]);

    let head = set.head_set(5);
    assert_traversal(&head, &[1, 2, 3]);

    {
        let mut tail = set.tail_set_mut(5);
        assert_eq!(tail.insert(21), Ok(true));
        assert!(matches!(
            tail.insert(4),
            Err(CollectionError::InvalidArgument(_))
        ));
        assert_eq!(CollectionMut::remove(&mut tail, &13), Ok(true));
    }
    assert_traversal(&set, &[1, 2, 3, 5, 8, 21]);
    set.validate().expect("set is valid");
}

#[derive(Clone, Debug, Arbitrary)]
enum TestBound {
    Included(#[strategy(test_key())] u8),
    Excluded(#[strategy(test_key())] u8),
    Unbounded,
}

impl TestBound {
    fn to_bound(&self) -> Bound<u8> {
        match *self {
            TestBound::Included(key) => Bound::Included(key),
            TestBound::Excluded(key) => Bound::Excluded(key),
            TestBound::Unbounded => Bound::Unbounded,
        }
    }

    fn key(&self) -> Option<u8> {
        match *self {
            TestBound::Included(key) | TestBound::Excluded(key) => Some(key),
            TestBound::Unbounded => None,
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Operation {
    #[weight(3)]
    Insert(TestEntry),
    Get(#[strategy(test_key())] u8),
    Remove(#[strategy(test_key())] u8),
    Range(TestBound, TestBound),
    #[weight(2)]
    InsertInRange(TestBound, TestBound, TestEntry),
    ClearRange(TestBound, TestBound),
}

#[proptest(cases = 64)]
fn proptest_ops(
    #[strategy(prop::collection::vec(any::<Operation>(), 0..512))] ops: Vec<
        Operation,
    >,
) {
    let mut map = SortedMap::<u8, u32>::new();
    let mut naive_map = NaiveMap::new();

    for op in ops {
        match op {
            Operation::Insert(entry) => {
                let map_res = map.insert(entry.key, entry.value);
                let naive_res = naive_map.insert(entry.key, entry.value);
                prop_assert_eq!(map_res, naive_res);
            }
            Operation::Get(key) => {
                prop_assert_eq!(map.get(&key), naive_map.get(&key));
            }
            Operation::Remove(key) => {
                prop_assert_eq!(map.remove(&key), naive_map.remove(&key));
            }
            Operation::Range(lower, upper) => {
                let bounds = (lower.to_bound(), upper.to_bound());
                match map.range(bounds.0, bounds.1) {
                    Ok(range) => {
                        let entries: Vec<_> = range.iter().collect();
                        prop_assert_eq!(
                            entries,
                            naive_map.sorted_range(bounds)
                        );
                        prop_assert_eq!(
                            range.first_key(),
                            naive_map.sorted_range(bounds).first().map(|e| e.0)
                        );
                    }
                    Err(error) => {
                        prop_assert!(lower.key() > upper.key());
                        prop_assert!(upper.key().is_some());
                        prop_assert!(matches!(
                            error,
                            CollectionError::InvalidArgument(_)
                        ));
                    }
                }
            }
            Operation::InsertInRange(lower, upper, entry) => {
                let bounds = (lower.to_bound(), upper.to_bound());
                let Ok(mut range) = map.range_mut(bounds.0, bounds.1) else {
                    continue;
                };
                match range.insert(entry.key, entry.value) {
                    Ok(previous) => {
                        prop_assert!(
                            std::ops::RangeBounds::contains(
                                &bounds,
                                &entry.key
                            )
                        );
                        prop_assert_eq!(
                            previous,
                            naive_map.insert(entry.key, entry.value)
                        );
                    }
                    Err(error) => {
                        prop_assert!(
                            !std::ops::RangeBounds::contains(
                                &bounds,
                                &entry.key
                            )
                        );
                        prop_assert_eq!(
                            error,
                            CollectionError::InvalidArgument(
                                "put outside range"
                            )
                        );
                    }
                }
            }
            Operation::ClearRange(lower, upper) => {
                let bounds = (lower.to_bound(), upper.to_bound());
                let Ok(mut range) = map.range_mut(bounds.0, bounds.1) else {
                    continue;
                };
                range.clear();
                let doomed: Vec<u8> = naive_map
                    .sorted_range(bounds)
                    .into_iter()
                    .map(|(k, _)| *k)
                    .collect();
                for key in doomed {
                    naive_map.remove(&key);
                }
            }
        }

        map.validate().expect("map is valid");
        let entries: Vec<_> = map.iter().collect();
        prop_assert_eq!(entries, naive_map.sorted());
        prop_assert_eq!(map.first_key(), naive_map.first_key());
        prop_assert_eq!(map.last_key(), naive_map.last_key());
    }
}

#[cfg(feature = "serde")]
#[proptest]
fn proptest_serialize_roundtrip(values: Vec<TestEntry>) {
    fastcoll_test_utils::serde_utils::assert_sorted_map_roundtrip(values);
}
