// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fastcoll::{
    CollectionError, FastMap, FastSet, SortedSet,
    service::{Collection, CollectionMut, DeepClone, Direction},
    view::ViewExt,
};
use fastcoll_test_utils::{
    naive_map::NaiveMap,
    test_entry::{assert_traversal, last_digit_equality},
    unwind::catch_panic,
};
use proptest::prelude::*;
use std::borrow::Borrow;
use test_strategy::{Arbitrary, proptest};

#[test]
fn filtered_add_is_gated() {
    let mut set: FastSet<u32> = (1..=5).collect();
    {
        let mut evens = (&mut set).filtered(|n| n % 2 == 0);
        assert_eq!(evens.add(7), Ok(false), "odd values are ignored");
        assert_eq!(evens.add(8), Ok(true));
        assert_eq!(evens.remove(&3), Ok(false), "3 is not visible");
        assert_eq!(evens.len(), 3);
        evens.clear().unwrap();
    }
    assert_traversal(&set, &[1, 3, 5]);
}

#[test]
fn sorted_leaves_the_target_alone() {
    let mut set: FastSet<u32> = [5, 1, 4, 2, 3].into_iter().collect();
    {
        let sorted = (&set).sorted();
        assert_traversal(&sorted, &[1, 2, 3, 4, 5]);
        let descending = (&set).sorted_by(|a, b| b.cmp(a));
        assert_traversal(&descending, &[5, 4, 3, 2, 1]);
    }
    assert_traversal(&set, &[5, 1, 4, 2, 3]);

    // Removing through a sorted cursor removes from the target.
    (&mut set).sorted().remove_if(|n| *n < 3).unwrap();
    assert_traversal(&set, &[5, 4, 3]);
}

#[test]
fn try_sorted_needs_an_order() {
    let set: FastSet<u32> = (0..3).collect();
    assert!(matches!(
        (&set).try_sorted(),
        Err(CollectionError::TypeMismatch(_))
    ));

    let sorted: SortedSet<u32> = (0..3).collect();
    let view = (&sorted).try_sorted().expect("sorted sets are ordered");
    assert_traversal(&view, &[0, 1, 2]);
}

#[test]
fn distinct_skips_repeats() {
    let mut map = FastMap::new();
    for (k, v) in [(1, 'a'), (2, 'b'), (3, 'a'), (4, 'c'), (5, 'b')] {
        map.insert(k, v);
    }
    let values = map.values().distinct();
    let forward: Vec<char> = values.iter().copied().collect();
    assert_eq!(forward, ['a', 'b', 'c']);
    // Backward, the first copy seen is the last one in the map.
    let backward: Vec<char> = values.iter_rev().copied().collect();
    assert_eq!(backward, ['b', 'c', 'a']);
    assert_eq!(values.len(), 3);
    assert!(values.contains(&'c'));

    // Removing from a distinct view removes every copy.
    assert_eq!(map.values_mut().distinct().remove(&'a'), Ok(true));
    let keys: Vec<u32> = map.key_set().iter().copied().collect();
    assert_eq!(keys, [2, 4, 5]);
}

#[test]
fn mapped_rejects_add() {
    let mut set: FastSet<u32> = (1..=4).collect();
    let mut doubled = (&mut set).mapped(|n| n * 2);
    assert_traversal(&doubled, &[2, 4, 6, 8]);
    assert!(doubled.contains(&6));
    assert!(!doubled.contains(&3));
    assert_eq!(
        doubled.add(10),
        Err(CollectionError::PermissionDenied("add through mapped view"))
    );
    // Removing a mapped value removes its source.
    assert_eq!(doubled.remove(&4), Ok(true));
    assert_traversal(&set, &[1, 3, 4]);
}

#[test]
fn custom_equality_view() {
    let mut set: FastSet<u32> = [13, 25, 31].into_iter().collect();
    let mut by_digit = (&mut set).with_equality(last_digit_equality());
    assert!(by_digit.contains(&3));
    assert!(!by_digit.contains(&4));
    assert_eq!(by_digit.remove(&5), Ok(true));
    assert_traversal(&set, &[13, 31]);
}

#[test]
fn unmodifiable_and_perform() {
    let mut set: FastSet<u32> = (0..4).collect();
    let mut view = (&set).unmodifiable();
    assert!(matches!(
        view.add(9),
        Err(CollectionError::PermissionDenied(_))
    ));
    assert!(matches!(view.clear(), Err(CollectionError::PermissionDenied(_))));

    let mut cursor = view.cursor_mut(Direction::Forward);
    assert!(cursor.next().is_some());
    assert!(matches!(
        cursor.remove(),
        Err(CollectionError::PermissionDenied(_))
    ));

    let sum = set.perform(|view| {
        assert!(view.remove(&0).is_err());
        view.iter().sum::<u32>()
    });
    assert_eq!(sum, 6);

    let removed = set.update(|set| set.retain(|n| *n > 1)).unwrap();
    assert_eq!(removed, 2);
}

#[test]
fn partitions_cover_in_order() {
    let set: FastSet<u32> = (0..10).collect();
    let partitions = set.split(3);
    assert_eq!(partitions.len(), 3);

    let mut seen = Vec::new();
    for partition in &partitions {
        seen.extend(partition.iter().copied());
    }
    assert_eq!(seen, (0..10).collect::<Vec<_>>());

    let mut first = set.split(3).into_iter().next().unwrap();
    assert!(matches!(
        first.add(99),
        Err(CollectionError::PermissionDenied(_))
    ));

    let empty = FastSet::<u32>::new();
    assert_eq!(empty.split(4).len(), 1);
}

#[test]
fn partitions_update_their_own_elements() {
    let mut set: FastSet<u32> = (0..10).collect();
    let removed =
        set.update_partitions(3, |part| part.retain(|n| n % 2 == 1).unwrap());
    assert_eq!(removed, [2, 2, 1], "each partition sees only its slice");
    assert_traversal(&set, &[1, 3, 5, 7, 9]);
    set.validate().expect("set is valid");

    // Partitions are [1, 3, 5] and [7, 9]: 9 is only reachable from the
    // second.
    let found = set.update_partitions(2, |part| part.remove(&9));
    assert_eq!(found, [Ok(false), Ok(true)]);

    // Adding goes to the whole set.
    let added = set.update_partitions(1, |part| {
        part.add(11).unwrap();
        part.len()
    });
    assert_eq!(added, [4]);
    assert_traversal(&set, &[1, 3, 5, 7, 11]);

    let mut frozen = (&mut set).unmodifiable();
    let denied = frozen.update_partitions(2, |part| part.remove_if(|_| true));
    for result in denied {
        assert!(matches!(result, Err(CollectionError::PermissionDenied(_))));
    }
    assert_traversal(&set, &[1, 3, 5, 7, 11]);
}

#[test]
fn partition_rejects_foreign_positions() {
    let mut set: FastSet<u32> = (0..4).collect();
    let last = set.split(2)[1].positions()[1];
    let results = set.update_partitions(2, |part| part.remove_at(last));
    assert_eq!(
        results,
        [
            Err(CollectionError::InvalidArgument("remove outside partition")),
            Ok(()),
        ]
    );
    assert_traversal(&set, &[0, 1, 2]);
}

#[test]
fn removal_reaches_through_stacked_views() {
    let mut set: FastSet<u32> = (0..10).collect();
    let removed = (&mut set)
        .filtered(|n| n % 2 == 0)
        .reversed()
        .sorted()
        .remove_if(|n| *n < 5)
        .unwrap();
    assert_eq!(removed, 3);
    assert_traversal(&set, &[1, 3, 5, 6, 7, 8, 9]);
    set.validate().expect("set is valid");
}

#[test]
fn deep_clone_keeps_layers() {
    let set: FastSet<u32> = (0..6).collect();
    let view = (&set).filtered(|n| n % 2 == 1).reversed();
    let copy = view.deep_clone();
    drop(view);
    drop(set);
    assert_traversal(&copy, &[5, 3, 1]);
}

#[test]
fn stale_position_panics() {
    let mut set: FastSet<u32> = (0..3).collect();
    let pos = set.position(&1).expect("1 is present");
    set.remove(&1);
    assert!(catch_panic(|| *set.get(pos)).is_none());
}

/// A layer to stack over a set.
#[derive(Clone, Copy, Debug, Arbitrary)]
enum Layer {
    Filtered(#[strategy(2..5_u8)] u8),
    Reversed,
    Sorted,
    Distinct,
}

/// Builds the expected traversal of `layers` over `values`.
fn model(values: &[u8], layers: &[Layer]) -> Vec<u8> {
    let mut out = values.to_vec();
    for layer in layers {
        match *layer {
            Layer::Filtered(m) => out.retain(|v| v % m == 0),
            Layer::Reversed => out.reverse(),
            Layer::Sorted => out.sort(),
            Layer::Distinct => {
                let mut seen = Vec::new();
                out.retain(|v| {
                    if seen.contains(v) {
                        false
                    } else {
                        seen.push(*v);
                        true
                    }
                });
            }
        }
    }
    out
}

/// Applies `layers` one at a time. Each layer's output is copied into a
/// fresh map, so every step wraps the same view type.
fn traverse<C>(target: C, layers: &[Layer]) -> Vec<u8>
where
    C: Collection<Item = u8>,
{
    let values: Vec<u8> = match layers.first() {
        None => return collect(&target),
        Some(Layer::Filtered(m)) => {
            let m = *m;
            collect(&target.filtered(move |v| v % m == 0))
        }
        Some(Layer::Reversed) => collect(&target.reversed()),
        Some(Layer::Sorted) => collect(&target.sorted()),
        Some(Layer::Distinct) => collect(&target.distinct()),
    };
    let map: FastMap<usize, u8> = values.into_iter().enumerate().collect();
    traverse(map.values(), &layers[1..])
}

fn collect<C: Collection<Item = u8>>(view: &C) -> Vec<u8> {
    view.iter().map(|item| *Borrow::<u8>::borrow(&item)).collect()
}

#[proptest(cases = 128)]
fn proptest_composition(
    #[strategy(prop::collection::vec(0..20_u8, 0..48))] values: Vec<u8>,
    #[strategy(prop::collection::vec(any::<Layer>(), 0..4))] layers: Vec<
        Layer,
    >,
) {
    // A map allows repeated values, so distinct views have work to do.
    let mut naive = NaiveMap::new();
    let mut map = FastMap::new();
    for (i, value) in values.iter().enumerate() {
        map.insert(i, *value);
        naive.insert(i, *value);
    }
    let ordered: Vec<u8> = naive.iter().map(|(_, v)| *v).collect();

    prop_assert_eq!(
        traverse(map.values(), &layers),
        model(&ordered, &layers)
    );
    // Filtering commutes with reversal.
    let even = |v: &u8| v % 2 == 0;
    prop_assert_eq!(
        collect(&map.values().filtered(even).reversed()),
        collect(&map.values().reversed().filtered(even))
    );
    // Sorting and deduplicating commute.
    prop_assert_eq!(
        collect(&map.values().distinct().sorted()),
        collect(&map.values().sorted().distinct())
    );
}
