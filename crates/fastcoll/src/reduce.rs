// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Short-circuiting folds over collections and their partitions.
//!
//! A [`Reducer`] visits elements one at a time and may stop the traversal
//! early. Reducers built for different partitions of the same collection
//! combine with [`Reducer::merge`], which is what [`par_reduce`] does after
//! reducing each partition on the rayon pool.
//!
//! ```
//! use fastcoll::{reduce, service::Collection, FastSet};
//!
//! let set: FastSet<u32> = (1..=4).collect();
//! assert_eq!(set.reduce(reduce::sum()), 10);
//! assert_eq!(set.reduce(reduce::max()), Some(4));
//! ```

use crate::service::{Collection, Direction};
use core::{
    any::Any,
    borrow::Borrow,
    cmp::Ordering,
    fmt,
    ops::{Add, ControlFlow},
};
use std::{rc::Rc, sync::Arc};

/// A fold over elements of type `E` that can stop early.
pub trait Reducer<E> {
    /// The accumulated result.
    type Output;

    /// Folds one element. Returns [`ControlFlow::Break`] once the result is
    /// settled and no further element can change it.
    fn visit(&mut self, element: &E) -> ControlFlow<()>;

    /// Returns true once the result is settled.
    fn is_done(&self) -> bool {
        false
    }

    /// Folds every element of `partition` in traversal order, stopping as
    /// soon as the reducer is done.
    fn accept<C>(&mut self, partition: &C)
    where
        C: Collection<Item = E> + ?Sized,
    {
        let mut cursor = partition.cursor(Direction::Forward);
        while !self.is_done() {
            let Some(pos) = partition.advance(&mut cursor) else { break };
            let element = partition.get(pos);
            if self.visit(Borrow::<E>::borrow(&element)).is_break() {
                break;
            }
        }
    }

    /// Combines the result of a reducer that ran over a later partition.
    fn merge(&mut self, later: Self)
    where
        Self: Sized;

    /// Returns the accumulated result.
    fn get(self) -> Self::Output
    where
        Self: Sized;
}

/// Elements that expose a runtime type, for [`any`].
///
/// Implemented for `dyn Any` and the pointers that hold one, so a
/// collection of `Box<dyn Any>` can be searched by type.
pub trait AsDynAny {
    /// Returns the element as a `dyn Any`.
    fn as_dyn_any(&self) -> &dyn Any;
}

impl AsDynAny for dyn Any {
    fn as_dyn_any(&self) -> &dyn Any {
        self
    }
}

impl AsDynAny for dyn Any + Send {
    fn as_dyn_any(&self) -> &dyn Any {
        self
    }
}

impl AsDynAny for dyn Any + Send + Sync {
    fn as_dyn_any(&self) -> &dyn Any {
        self
    }
}

impl<T: AsDynAny + ?Sized> AsDynAny for &T {
    fn as_dyn_any(&self) -> &dyn Any {
        (**self).as_dyn_any()
    }
}

impl<T: AsDynAny + ?Sized> AsDynAny for Box<T> {
    fn as_dyn_any(&self) -> &dyn Any {
        (**self).as_dyn_any()
    }
}

impl<T: AsDynAny + ?Sized> AsDynAny for Rc<T> {
    fn as_dyn_any(&self) -> &dyn Any {
        (**self).as_dyn_any()
    }
}

impl<T: AsDynAny + ?Sized> AsDynAny for Arc<T> {
    fn as_dyn_any(&self) -> &dyn Any {
        (**self).as_dyn_any()
    }
}

/// Finds the first element whose runtime type is `T`.
///
/// Across partitions, the first match in partition order wins.
pub fn any<T: Any + Clone>() -> AnyOf<T> {
    AnyOf { found: None }
}

/// The reducer returned by [`any`].
#[derive(Clone, Debug)]
pub struct AnyOf<T> {
    found: Option<T>,
}

impl<E: AsDynAny, T: Any + Clone> Reducer<E> for AnyOf<T> {
    type Output = Option<T>;

    fn visit(&mut self, element: &E) -> ControlFlow<()> {
        match element.as_dyn_any().downcast_ref::<T>() {
            Some(value) => {
                self.found = Some(value.clone());
                ControlFlow::Break(())
            }
            None => ControlFlow::Continue(()),
        }
    }

    fn is_done(&self) -> bool {
        self.found.is_some()
    }

    fn merge(&mut self, later: Self) {
        if self.found.is_none() {
            self.found = later.found;
        }
    }

    fn get(self) -> Option<T> {
        self.found
    }
}

/// Finds the first element matching `predicate`.
pub fn any_matching<E, P>(predicate: P) -> AnyMatching<E, P>
where
    E: Clone,
    P: Fn(&E) -> bool,
{
    AnyMatching { predicate, found: None }
}

/// The reducer returned by [`any_matching`].
#[derive(Clone)]
pub struct AnyMatching<E, P> {
    predicate: P,
    found: Option<E>,
}

impl<E: fmt::Debug, P> fmt::Debug for AnyMatching<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyMatching")
            .field("found", &self.found)
            .finish_non_exhaustive()
    }
}

impl<E: Clone, P: Fn(&E) -> bool> Reducer<E> for AnyMatching<E, P> {
    type Output = Option<E>;

    fn visit(&mut self, element: &E) -> ControlFlow<()> {
        if (self.predicate)(element) {
            self.found = Some(element.clone());
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn is_done(&self) -> bool {
        self.found.is_some()
    }

    fn merge(&mut self, later: Self) {
        if self.found.is_none() {
            self.found = later.found;
        }
    }

    fn get(self) -> Option<E> {
        self.found
    }
}

/// True unless some element is false. Stops at the first false element.
pub fn and() -> And {
    And { result: true }
}

/// The reducer returned by [`and`].
#[derive(Clone, Copy, Debug)]
pub struct And {
    result: bool,
}

impl Reducer<bool> for And {
    type Output = bool;

    fn visit(&mut self, element: &bool) -> ControlFlow<()> {
        if *element {
            ControlFlow::Continue(())
        } else {
            self.result = false;
            ControlFlow::Break(())
        }
    }

    fn is_done(&self) -> bool {
        !self.result
    }

    fn merge(&mut self, later: Self) {
        self.result &= later.result;
    }

    fn get(self) -> bool {
        self.result
    }
}

/// False unless some element is true. Stops at the first true element.
pub fn or() -> Or {
    Or { result: false }
}

/// The reducer returned by [`or`].
#[derive(Clone, Copy, Debug)]
pub struct Or {
    result: bool,
}

impl Reducer<bool> for Or {
    type Output = bool;

    fn visit(&mut self, element: &bool) -> ControlFlow<()> {
        if *element {
            self.result = true;
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn is_done(&self) -> bool {
        self.result
    }

    fn merge(&mut self, later: Self) {
        self.result |= later.result;
    }

    fn get(self) -> bool {
        self.result
    }
}

/// The smallest element under `compare`. The earliest of equal elements
/// wins.
pub fn min_by<E, F>(compare: F) -> Extreme<E, F>
where
    E: Clone,
    F: Fn(&E, &E) -> Ordering,
{
    Extreme { compare, keep: Ordering::Less, best: None }
}

/// The largest element under `compare`. The earliest of equal elements
/// wins.
pub fn max_by<E, F>(compare: F) -> Extreme<E, F>
where
    E: Clone,
    F: Fn(&E, &E) -> Ordering,
{
    Extreme { compare, keep: Ordering::Greater, best: None }
}

/// The smallest element by `Ord`.
pub fn min<E: Ord + Clone>() -> Extreme<E, fn(&E, &E) -> Ordering> {
    min_by(E::cmp as fn(&E, &E) -> Ordering)
}

/// The largest element by `Ord`.
pub fn max<E: Ord + Clone>() -> Extreme<E, fn(&E, &E) -> Ordering> {
    max_by(E::cmp as fn(&E, &E) -> Ordering)
}

/// The reducer returned by [`min_by`], [`max_by`], [`min`] and [`max`].
#[derive(Clone)]
pub struct Extreme<E, F> {
    compare: F,
    // A candidate replaces the best element when it compares this way.
    keep: Ordering,
    best: Option<E>,
}

impl<E: fmt::Debug, F> fmt::Debug for Extreme<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extreme")
            .field("keep", &self.keep)
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}

impl<E, F> Extreme<E, F>
where
    F: Fn(&E, &E) -> Ordering,
{
    fn offer(&mut self, candidate: &E) -> bool {
        match &self.best {
            Some(best) => (self.compare)(candidate, best) == self.keep,
            None => true,
        }
    }
}

impl<E, F> Reducer<E> for Extreme<E, F>
where
    E: Clone,
    F: Fn(&E, &E) -> Ordering,
{
    type Output = Option<E>;

    fn visit(&mut self, element: &E) -> ControlFlow<()> {
        if self.offer(element) {
            self.best = Some(element.clone());
        }
        ControlFlow::Continue(())
    }

    fn merge(&mut self, later: Self) {
        if let Some(candidate) = later.best {
            if self.offer(&candidate) {
                self.best = Some(candidate);
            }
        }
    }

    fn get(self) -> Option<E> {
        self.best
    }
}

/// The sum of every element, starting from `E::default()`.
pub fn sum<E>() -> Sum<E>
where
    E: Clone + Default + Add<Output = E>,
{
    Sum { total: E::default() }
}

/// The reducer returned by [`sum`].
#[derive(Clone, Debug)]
pub struct Sum<E> {
    total: E,
}

impl<E> Reducer<E> for Sum<E>
where
    E: Clone + Default + Add<Output = E>,
{
    type Output = E;

    fn visit(&mut self, element: &E) -> ControlFlow<()> {
        let total = core::mem::take(&mut self.total);
        self.total = total + element.clone();
        ControlFlow::Continue(())
    }

    fn merge(&mut self, later: Self) {
        let total = core::mem::take(&mut self.total);
        self.total = total + later.total;
    }

    fn get(self) -> E {
        self.total
    }
}

/// Reduces `collection` in parallel.
///
/// The collection is split into at most `n` partitions. Each partition is
/// folded by its own reducer from `factory` on the rayon pool, and the
/// partial results are merged in partition order.
#[cfg(feature = "parallel")]
pub fn par_reduce<C, R, F>(collection: &C, n: usize, factory: F) -> R::Output
where
    C: Collection + Sync,
    C::Pos: Send + Sync,
    R: Reducer<C::Item> + Send,
    F: Fn() -> R + Sync,
{
    use rayon::prelude::*;

    let partitions = collection.split(n);
    log::debug!(
        "reducing {} elements over {} partitions",
        collection.len(),
        partitions.len()
    );
    let reducers: Vec<R> = partitions
        .par_iter()
        .map(|partition| {
            let mut reducer = factory();
            reducer.accept(partition);
            reducer
        })
        .collect();
    reducers
        .into_iter()
        .reduce(|mut earlier, later| {
            earlier.merge(later);
            earlier
        })
        .unwrap_or_else(factory)
        .get()
}
