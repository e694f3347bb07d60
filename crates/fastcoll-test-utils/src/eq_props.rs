// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fastcoll::equality::Equivalence;
use std::fmt;

/// Assert equality properties.
///
/// Map and set equality compare entries through per-structure strategies,
/// which is not obviously symmetric or reflexive, so tests must check that
/// it is.
#[allow(clippy::eq_op)]
pub fn assert_eq_props<T: PartialEq + fmt::Debug>(a: T, b: T) {
    assert_eq!(a, a, "a == a");
    assert_eq!(b, b, "b == b");
    assert_eq!(a, b, "a == b");
    assert_eq!(b, a, "b == a");
}

/// Assert inequality properties.
#[allow(clippy::eq_op)]
pub fn assert_ne_props<T: PartialEq + fmt::Debug>(a: T, b: T) {
    // Also check reflexivity while we're here.
    assert_eq!(a, a, "a == a");
    assert_eq!(b, b, "b == b");
    assert_ne!(a, b, "a != b");
    assert_ne!(b, a, "b != a");
}

/// Assert that `equality` hashes equal values identically, and that its
/// order (if any) agrees with its equality.
pub fn assert_strategy_consistent<T, E>(equality: &E, a: &T, b: &T)
where
    T: fmt::Debug + ?Sized,
    E: Equivalence<T> + ?Sized,
{
    let equal = equality.equal(a, b);
    assert_eq!(equal, equality.equal(b, a), "equality is symmetric");
    assert!(equality.equal(a, a), "{a:?} equals itself");
    if equal {
        assert_eq!(
            equality.hash(a),
            equality.hash(b),
            "{a:?} and {b:?} are equal but hash differently"
        );
    }
    if equality.is_ordered() {
        let ordering = equality.compare(a, b);
        assert_eq!(
            ordering == Some(std::cmp::Ordering::Equal),
            equal,
            "order of {a:?} and {b:?} disagrees with equality"
        );
    }
}
