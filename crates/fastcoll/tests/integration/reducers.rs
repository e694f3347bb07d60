// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fastcoll::{
    FastMap,
    reduce::{self, Reducer},
    service::Collection,
    view::ViewExt,
};
use proptest::prelude::*;
use std::{cell::Cell, ops::ControlFlow};
use test_strategy::proptest;

fn map_of<T: PartialEq>(values: Vec<T>) -> FastMap<usize, T> {
    values.into_iter().enumerate().collect()
}

/// Counts the elements it visits, and stops after `limit`.
struct Take {
    limit: usize,
    seen: usize,
}

impl Reducer<u32> for Take {
    type Output = usize;

    fn visit(&mut self, _element: &u32) -> ControlFlow<()> {
        self.seen += 1;
        if self.seen == self.limit {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn merge(&mut self, later: Self) {
        self.seen += later.seen;
    }

    fn get(self) -> usize {
        self.seen
    }
}

#[test]
fn custom_reducer_stops_on_break() {
    let map = map_of((0..10_u32).collect());
    assert_eq!(map.values().reduce(Take { limit: 4, seen: 0 }), 4);
    assert_eq!(map.values().reduce(Take { limit: 40, seen: 0 }), 10);
}

#[proptest]
fn proptest_short_circuit(
    #[strategy(prop::collection::vec(any::<bool>(), 0..64))] values: Vec<
        bool,
    >,
) {
    let map = map_of(values.clone());
    let visited = Cell::new(0);
    let counting = map.values().filtered(|_| {
        visited.set(visited.get() + 1);
        true
    });

    // `and` stops at the first false element.
    let expected_visits =
        values.iter().position(|v| !v).map_or(values.len(), |i| i + 1);
    prop_assert_eq!(counting.reduce(reduce::and()), values.iter().all(|v| *v));
    prop_assert_eq!(visited.get(), expected_visits);

    // `or` stops at the first true element.
    visited.set(0);
    let expected_visits =
        values.iter().position(|v| *v).map_or(values.len(), |i| i + 1);
    prop_assert_eq!(counting.reduce(reduce::or()), values.iter().any(|v| *v));
    prop_assert_eq!(visited.get(), expected_visits);
}

#[proptest]
fn proptest_extremes(
    #[strategy(prop::collection::vec(any::<i32>(), 0..64))] values: Vec<i32>,
) {
    let map = map_of(values.clone());
    let view = map.values();
    prop_assert_eq!(view.reduce(reduce::min()), values.iter().min().copied());
    prop_assert_eq!(view.reduce(reduce::max()), values.iter().max().copied());

    let wide = map.values().mapped(|v| i64::from(*v));
    prop_assert_eq!(
        wide.reduce(reduce::sum::<i64>()),
        values.iter().map(|v| i64::from(*v)).sum::<i64>()
    );

    // The earliest of equal elements wins.
    let by_magnitude =
        |a: &i32, b: &i32| a.unsigned_abs().cmp(&b.unsigned_abs());
    let expected = values
        .iter()
        .copied()
        .reduce(|best, v| {
            if by_magnitude(&v, &best).is_lt() { v } else { best }
        });
    prop_assert_eq!(view.reduce(reduce::min_by(by_magnitude)), expected);
}

#[cfg(feature = "parallel")]
#[proptest]
fn proptest_parallel_matches_sequential(
    #[strategy(prop::collection::vec(0..100_u64, 0..256))] values: Vec<u64>,
    #[strategy(1..16_usize)] n: usize,
) {
    use fastcoll::reduce::par_reduce;

    let map = map_of(values.clone());
    let view = map.values();

    prop_assert_eq!(
        par_reduce(&view, n, reduce::sum::<u64>),
        view.reduce(reduce::sum::<u64>())
    );
    prop_assert_eq!(
        par_reduce(&view, n, reduce::max::<u64>),
        values.iter().max().copied()
    );

    // Partial results merge in partition order, so the first match in
    // traversal order wins.
    let first_even = || reduce::any_matching(|v: &u64| v % 2 == 0);
    prop_assert_eq!(
        par_reduce(&view, n, first_even),
        values.iter().find(|v| *v % 2 == 0).copied()
    );
}
