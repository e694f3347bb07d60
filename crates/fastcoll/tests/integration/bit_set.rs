// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fastcoll::{
    BitSet, CollectionError, Index,
    service::{Collection, CollectionMut, Direction},
};
use proptest::prelude::*;
use std::collections::BTreeSet;
use test_strategy::{Arbitrary, proptest};

// Wide enough to span several words, narrow enough to collide.
const BIT_RANGE: usize = 300;

fn bit() -> impl Strategy<Value = usize> {
    0..BIT_RANGE
}

fn bits() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(bit(), 0..64)
}

#[test]
fn word_round_trip() {
    let mut bits = BitSet::new();
    bits.set(0);
    bits.set(65);
    assert_eq!(bits.words(), [1, 2]);

    let rebuilt = BitSet::from_words(vec![1, 2, 0, 0]);
    assert_eq!(rebuilt, bits);
    assert_eq!(rebuilt.words().len(), 2, "trailing zero words are dropped");

    bits.clear_bit(65);
    assert_eq!(bits.words(), [1]);
    assert_eq!(bits.length(), 1);
}

#[test]
fn backward_scans() {
    let bits: BitSet = [3_usize, 64, 130].into_iter().collect();
    assert_eq!(bits.previous_set_bit(129), Ok(Some(64)));
    assert_eq!(bits.previous_set_bit(2), Ok(None));
    assert_eq!(bits.previous_clear_bit(64), Ok(Some(63)));
    assert_eq!(bits.previous_clear_bit(191), Ok(Some(191)));
    assert!(matches!(
        bits.previous_set_bit(192),
        Err(CollectionError::OutOfRange(_))
    ));
    assert!(matches!(
        BitSet::new().previous_clear_bit(0),
        Err(CollectionError::OutOfRange(_))
    ));
}

#[test]
fn invalid_ranges() {
    let mut bits = BitSet::new();
    for result in [
        bits.set_range(5, 4),
        bits.clear_range(5, 4),
        bits.flip_range(5, 4),
        bits.get_range(5, 4).map(drop),
    ] {
        assert_eq!(
            result,
            Err(CollectionError::InvalidArgument(
                "bit range end precedes start"
            ))
        );
    }
    assert!(bits.is_empty());
}

#[test]
fn collection_contract() {
    let mut bits: BitSet = [1_usize, 2, 3, 100].into_iter().collect();
    assert!(bits.contains(&Index::new(100)));
    assert_eq!(bits.add(Index::new(100)), Ok(false));
    assert_eq!(bits.add(Index::new(7)), Ok(true));

    let backward: Vec<usize> = bits.iter_rev().map(Index::get).collect();
    assert_eq!(backward, [100, 7, 3, 2, 1]);

    let mut cursor = bits.cursor_mut(Direction::Forward);
    while let Some(index) = cursor.next() {
        if index.get() % 2 == 1 {
            cursor.remove().expect("yielded bit is removable");
        }
    }
    let remaining: Vec<usize> = bits.iter().map(Index::get).collect();
    assert_eq!(remaining, [2, 100]);
    bits.validate().expect("bit set is valid");
}

#[derive(Debug, Arbitrary)]
enum Operation {
    #[weight(3)]
    Set(#[strategy(bit())] usize),
    Clear(#[strategy(bit())] usize),
    Flip(#[strategy(bit())] usize),
    SetRange(#[strategy(bit())] usize, #[strategy(bit())] usize),
    ClearRange(#[strategy(bit())] usize, #[strategy(bit())] usize),
    FlipRange(#[strategy(bit())] usize, #[strategy(bit())] usize),
    And(#[strategy(bits())] Vec<usize>),
    Or(#[strategy(bits())] Vec<usize>),
    Xor(#[strategy(bits())] Vec<usize>),
    AndNot(#[strategy(bits())] Vec<usize>),
}

fn apply_range(
    naive: &mut BTreeSet<usize>,
    from: usize,
    to: usize,
    f: impl Fn(&mut BTreeSet<usize>, usize),
) {
    for bit in from..to {
        f(naive, bit);
    }
}

fn flip(naive: &mut BTreeSet<usize>, bit: usize) {
    if !naive.remove(&bit) {
        naive.insert(bit);
    }
}

#[proptest(cases = 64)]
fn proptest_ops(
    #[strategy(prop::collection::vec(any::<Operation>(), 0..256))] ops: Vec<
        Operation,
    >,
    #[strategy(bit())] probe: usize,
) {
    let mut bits = BitSet::new();
    let mut naive = BTreeSet::new();

    for op in ops {
        match op {
            Operation::Set(bit) => {
                let was_set = bits.get_and_set(bit, true);
                prop_assert_eq!(was_set, !naive.insert(bit));
            }
            Operation::Clear(bit) => {
                bits.clear_bit(bit);
                naive.remove(&bit);
            }
            Operation::Flip(bit) => {
                bits.flip(bit);
                flip(&mut naive, bit);
            }
            Operation::SetRange(a, b) => {
                let (from, to) = (a.min(b), a.max(b));
                bits.set_range(from, to).unwrap();
                apply_range(&mut naive, from, to, |n, bit| {
                    n.insert(bit);
                });
            }
            Operation::ClearRange(a, b) => {
                let (from, to) = (a.min(b), a.max(b));
                bits.clear_range(from, to).unwrap();
                apply_range(&mut naive, from, to, |n, bit| {
                    n.remove(&bit);
                });
            }
            Operation::FlipRange(a, b) => {
                let (from, to) = (a.min(b), a.max(b));
                let before = bits.get_range(from, to).unwrap();
                bits.flip_range(from, to).unwrap();
                apply_range(&mut naive, from, to, flip);
                // Flipping twice restores the range.
                let mut twice = bits.clone();
                twice.flip_range(from, to).unwrap();
                prop_assert_eq!(twice.get_range(from, to).unwrap(), before);
            }
            Operation::And(other) => {
                let other_set: BTreeSet<usize> =
                    other.iter().copied().collect();
                bits.and(&other.into_iter().collect());
                naive.retain(|bit| other_set.contains(bit));
            }
            Operation::Or(other) => {
                let other: BitSet = other.into_iter().collect();
                prop_assert_eq!(
                    bits.intersects(&other),
                    other.iter().any(|i| naive.contains(&i.get()))
                );
                bits.or(&other);
                naive.extend(other.iter().map(Index::get));
            }
            Operation::Xor(other) => {
                let other_set: BTreeSet<usize> =
                    other.iter().copied().collect();
                bits.xor(&other.into_iter().collect());
                naive =
                    naive.symmetric_difference(&other_set).copied().collect();
            }
            Operation::AndNot(other) => {
                let other_set: BTreeSet<usize> =
                    other.iter().copied().collect();
                bits.and_not(&other.into_iter().collect());
                naive.retain(|bit| !other_set.contains(bit));
            }
        }

        bits.validate().expect("bit set is valid");
        let set: Vec<usize> = bits.iter().map(Index::get).collect();
        let naive_set: Vec<usize> = naive.iter().copied().collect();
        prop_assert_eq!(&set, &naive_set);
        prop_assert_eq!(bits.cardinality(), naive.len());
        prop_assert_eq!(
            bits.length(),
            naive.last().map_or(0, |last| last + 1)
        );
        prop_assert!(bits.words().last() != Some(&0), "words are trimmed");

        // Scans agree with the oracle.
        prop_assert_eq!(bits.get(probe), naive.contains(&probe));
        prop_assert_eq!(
            bits.next_set_bit(probe),
            naive.range(probe..).next().copied()
        );
        let next_clear = (probe..).find(|bit| !naive.contains(bit));
        prop_assert_eq!(Some(bits.next_clear_bit(probe)), next_clear);
        if probe < bits.words().len() * 64 {
            prop_assert_eq!(
                bits.previous_set_bit(probe),
                Ok(naive.range(..=probe).next_back().copied())
            );
            let previous_clear =
                (0..=probe).rev().find(|bit| !naive.contains(bit));
            prop_assert_eq!(
                bits.previous_clear_bit(probe),
                Ok(previous_clear)
            );
        }
    }
}

#[cfg(feature = "serde")]
#[proptest]
fn proptest_serialize_roundtrip(#[strategy(bits())] values: Vec<usize>) {
    let bits: BitSet = values.into_iter().collect();
    let serialized = serde_json::to_string(&bits).unwrap();
    let deserialized: BitSet = serde_json::from_str(&serialized).unwrap();
    deserialized.validate().expect("deserialized bit set is valid");
    prop_assert_eq!(deserialized, bits);
}
