// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fastcoll::{
    CollectionError, FastMap,
    equality::Equality,
    service::{Collection, CollectionMut, DeepClone, MapService},
};
use fastcoll_test_utils::{
    eq_props::{assert_eq_props, assert_ne_props},
    naive_map::NaiveMap,
    test_entry::{TestEntry, last_digit_equality, test_key},
};
use proptest::prelude::*;
use std::rc::Rc;
use test_strategy::{Arbitrary, proptest};

#[test]
fn with_capacity() {
    let map = FastMap::<u32, u32>::with_capacity(1024);
    assert!(map.is_empty());
    // Only the entry storage is reserved: the directory stays within four
    // times the entry count.
    assert_eq!(map.capacity(), 0);
}

#[test]
fn test_extend() {
    let mut map = FastMap::new();
    let entries = vec![
        (1, "x"),
        (2, "y"),
        (1, "overwritten"), // duplicate key, replaces the value in place
    ];
    map.extend(entries);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&1), Some(&"overwritten"));
    assert_eq!(map.first(), Some((&1, &"overwritten")));
    assert_eq!(map.last(), Some((&2, &"y")));
}

#[test]
fn debug_impls() {
    let mut map = FastMap::new();
    map.insert(20, "twenty");
    map.insert(1, "one");
    map.insert(10, "ten");

    assert_eq!(format!("{map:?}"), r#"{20: "twenty", 1: "one", 10: "ten"}"#);
}

#[test]
fn identity_keys() {
    let a: Rc<str> = Rc::from("key");
    let b: Rc<str> = Rc::from("key");

    let mut map = FastMap::with_key_equality(Equality::identity());
    map.insert(a.clone(), 1);
    map.insert(b.clone(), 2);
    assert_eq!(map.len(), 2, "equal contents, distinct allocations");
    assert_eq!(map.get(&a), Some(&1));
    assert_eq!(map.get(&b), Some(&2));
    assert_eq!(map.get(&Rc::from("key")), None);
    map.validate().expect("map is valid");
}

#[test]
fn values_compared_with_value_equality() {
    let mut map =
        FastMap::with_equalities(Equality::natural(), last_digit_equality());
    map.insert("a", 13);
    assert!(map.contains_value(&3));
    assert!(map.remove_if_equal(&"a", &23));
    assert!(map.is_empty());

    map.insert("b", 7);
    assert!(map.replace_if_equal(&"b", &17, 8));
    assert_eq!(map.get(&"b"), Some(&8));
    assert!(!map.replace_if_equal(&"b", &7, 9));
}

#[test]
fn equality_ignores_order() {
    let forward: FastMap<u8, u32> = (0..16).map(|k| (k, 0)).collect();
    let backward: FastMap<u8, u32> = (0..16).rev().map(|k| (k, 0)).collect();
    assert_eq_props(forward.clone(), backward);

    let mut changed = forward.clone();
    changed.insert(3, 1);
    assert_ne_props(forward.clone(), changed);

    // Different strategies never compare equal.
    let custom: FastMap<u8, u32> = {
        let mut map = FastMap::with_equalities(
            Equality::natural(),
            last_digit_equality(),
        );
        map.extend((0..16).map(|k| (k, 0)));
        map
    };
    assert_ne!(forward, custom);
}

#[test]
fn entry_views() {
    let mut map: FastMap<u8, u32> = (0..8).map(|k| (k, u32::from(k))).collect();

    assert_eq!(
        map.key_set_mut().add(100),
        Err(CollectionError::PermissionDenied("add through key view"))
    );
    assert_eq!(
        map.values_mut().add(100),
        Err(CollectionError::PermissionDenied("add through value view"))
    );

    // Removing through the key view removes the entry.
    assert_eq!(map.key_set_mut().remove(&3), Ok(true));
    assert!(!map.contains_key(&3));

    // Removing a value removes its first entry.
    map.insert(20, 5);
    assert_eq!(map.values_mut().remove(&5), Ok(true));
    assert!(!map.contains_key(&5));
    assert!(map.contains_key(&20));

    // Adding an entry puts it, replacing an existing value.
    assert_eq!(map.entry_set_mut().add((0, 50)), Ok(true));
    assert_eq!(map.entry_set_mut().add((0, 50)), Ok(false));
    assert_eq!(map.get(&0), Some(&50));
    assert!(map.entry_set().contains(&(0, 50)));
    assert!(!map.entry_set().contains(&(0, 0)));

    map.values_mut()
        .for_each_mut(|v| *v += 1)
        .expect("map values are writable");
    assert_eq!(map.get(&0), Some(&51));

    // Removing odd keys through a cursor keeps the traversal going. Keys 3
    // and 5 are already gone.
    let removed = map.key_set_mut().remove_if(|k| k % 2 == 1).unwrap();
    assert_eq!(removed, 2);
    let keys: Vec<u8> = map.key_set().iter().copied().collect();
    assert_eq!(keys, [0, 2, 4, 6, 20]);
    map.validate().expect("map is valid");

    map.entry_set_mut().clear().unwrap();
    assert!(map.is_empty());
}

#[test]
fn deep_clone_is_independent() {
    let mut map: FastMap<u8, String> =
        (0..4).map(|k| (k, k.to_string())).collect();
    let values = map.values();
    let copy = values.deep_clone();
    drop(values);

    map.clear();
    assert_eq!(copy.len(), 4);
    assert_eq!(copy.into_inner().get(&2).map(String::as_str), Some("2"));
}

#[test]
fn unmodifiable() {
    let mut map: FastMap<u8, u32> = (0..4).map(|k| (k, 0)).collect();
    let mut view = map.unmodifiable();
    assert_eq!(view.get_value(&1), Some(&0));
    assert_eq!(view.entry_count(), 4);
    assert!(matches!(
        fastcoll::service::MapServiceMut::put(&mut view, 9, 9),
        Err(CollectionError::PermissionDenied(_))
    ));
    assert_eq!(map.insert(9, 9), None);
}

#[derive(Debug, Arbitrary)]
enum Operation {
    // Make inserts a bit more common to try and fill up the map.
    #[weight(3)]
    Insert(TestEntry),
    #[weight(2)]
    InsertIfAbsent(TestEntry),
    Get(#[strategy(test_key())] u8),
    Remove(#[strategy(test_key())] u8),
    RemoveViaKeys(#[strategy(test_key())] u8),
    Clear,
}

#[proptest(cases = 64)]
fn proptest_ops(
    #[strategy(prop::collection::vec(any::<Operation>(), 0..1024))] ops: Vec<
        Operation,
    >,
) {
    let mut map = FastMap::<u8, u32>::new();
    let mut naive_map = NaiveMap::new();

    // Now perform the operations on both maps.
    for op in ops {
        match op {
            Operation::Insert(entry) => {
                let map_res = map.insert(entry.key, entry.value);
                let naive_res = naive_map.insert(entry.key, entry.value);
                assert_eq!(map_res, naive_res);
            }
            Operation::InsertIfAbsent(entry) => {
                let map_res =
                    map.insert_if_absent(entry.key, entry.value).copied();
                let naive_res = naive_map
                    .insert_if_absent(entry.key, entry.value)
                    .copied();
                assert_eq!(map_res, naive_res);
            }
            Operation::Get(key) => {
                assert_eq!(map.get(&key), naive_map.get(&key));
                assert_eq!(
                    map.contains_key(&key),
                    naive_map.contains_key(&key)
                );
            }
            Operation::Remove(key) => {
                assert_eq!(map.remove(&key), naive_map.remove(&key));
            }
            Operation::RemoveViaKeys(key) => {
                let removed = map.key_set_mut().remove(&key).unwrap();
                assert_eq!(removed, naive_map.remove(&key).is_some());
            }
            Operation::Clear => {
                map.clear();
                naive_map.clear();
            }
        }

        map.validate().expect("map is valid");
        prop_assert!(
            map.len() <= map.capacity() && map.capacity() <= 4 * map.len(),
            "capacity {} out of bounds for {} entries",
            map.capacity(),
            map.len(),
        );

        // Iteration order is insertion order, in both directions.
        let entries: Vec<_> = map.iter().collect();
        let naive_entries: Vec<_> = naive_map.iter().collect();
        prop_assert_eq!(&entries, &naive_entries);
        let mut backward: Vec<_> = map.iter().rev().collect();
        backward.reverse();
        prop_assert_eq!(backward, naive_entries);
    }
}

#[proptest]
fn proptest_custom_equality(
    #[strategy(prop::collection::vec(any::<u32>(), 0..256))] keys: Vec<u32>,
) {
    let mut map = FastMap::with_key_equality(last_digit_equality());
    let mut naive_map = NaiveMap::new();
    for key in keys {
        // Keys collide on their last digit, and the first key inserted for a
        // digit stays.
        map.insert_if_absent(key, key);
        naive_map.insert_if_absent(key % 10, key);
    }
    map.validate().expect("map is valid");

    let keys: Vec<u32> = map.iter().map(|(k, _)| k % 10).collect();
    let naive_keys: Vec<u32> = naive_map.keys().copied().collect();
    prop_assert_eq!(keys, naive_keys);
    for (digit, value) in naive_map.iter() {
        prop_assert_eq!(map.get(digit), Some(value));
    }
}

#[cfg(feature = "serde")]
#[proptest]
fn proptest_serialize_roundtrip(values: Vec<TestEntry>) {
    fastcoll_test_utils::serde_utils::assert_fast_map_roundtrip(values);
}
