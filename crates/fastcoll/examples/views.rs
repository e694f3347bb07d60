// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! An example layering views over an insertion-ordered map.

use fastcoll::{
    equality::Equality,
    reduce,
    service::{Collection, CollectionMut},
    view::ViewExt,
    FastMap, SortedMap,
};

/// Orders are recorded as they arrive.
#[derive(Clone, Debug, PartialEq)]
struct Order {
    customer: &'static str,
    total: u32,
}

fn main() {
    let mut orders = FastMap::new();
    for (id, customer, total) in [
        (1001, "ada", 40),
        (1002, "bob", 15),
        (1003, "ada", 95),
        (1004, "cy", 15),
        (1005, "bob", 60),
    ] {
        orders.insert(id, Order { customer, total });
    }

    // Iteration follows arrival order.
    let ids: Vec<u32> = orders.key_set().iter().copied().collect();
    assert_eq!(ids, [1001, 1002, 1003, 1004, 1005]);

    // Customers with a large order, each once, alphabetically.
    let big_spenders: Vec<&str> = orders
        .values()
        .filtered(|order| order.total >= 40)
        .mapped(|order| order.customer)
        .distinct()
        .sorted()
        .iter()
        .collect();
    assert_eq!(big_spenders, ["ada", "bob"]);

    // Reducers fold any view and stop as soon as the result is known.
    let revenue =
        orders.values().mapped(|order| order.total).reduce(reduce::sum());
    assert_eq!(revenue, 225);
    let any_small = orders
        .values()
        .mapped(|order| order.total < 20)
        .reduce(reduce::or());
    assert!(any_small);

    // Writable views remove from the map they wrap.
    let removed = orders
        .values_mut()
        .retain(|order| order.total > 15)
        .expect("value views can remove");
    assert_eq!(removed, 2);
    println!("orders after dropping small ones: {orders:?}");

    // Read-only views refuse writes.
    let mut frozen = orders.key_set().unmodifiable();
    assert!(frozen.remove(&1001).is_err());

    // A sorted map keyed by total, largest first, with a window over it.
    let descending: fn(&u32, &u32) -> std::cmp::Ordering = |a, b| b.cmp(a);
    let mut by_total =
        SortedMap::with_key_equality(Equality::ordered(descending, None))
            .expect("an ordered strategy is accepted");
    for (id, order) in &orders {
        by_total.insert(order.total, *id);
    }
    let top: Vec<u32> = by_total
        .head_map(50)
        .iter()
        .map(|(total, _)| *total)
        .collect();
    assert_eq!(top, [95, 60]);
    println!("orders by total: {by_total:?}");
}
