// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Equality, hashing and ordering strategies.
//!
//! Every collection and map in this crate is built with an [`Equality`] for
//! its elements (or keys and values). The strategy is chosen at construction
//! time and never changes afterwards. It decides which elements are
//! considered equal, how they are hashed into the directory, and, for ordered
//! structures, how they compare.
//!
//! ```
//! use fastcoll::equality::{Equality, EqualityKind};
//!
//! let natural = Equality::<String>::natural();
//! assert_eq!(natural.kind(), EqualityKind::Natural);
//!
//! fn eq_ignore_case(a: &String, b: &String) -> bool {
//!     a.eq_ignore_ascii_case(b)
//! }
//! fn hash_ignore_case(s: &String) -> u64 {
//!     s.bytes().map(|b| b.to_ascii_lowercase() as u64).sum()
//! }
//! let custom = Equality::<String>::custom(eq_ignore_case, hash_ignore_case);
//! assert!(custom.equal(&"Foo".to_owned(), &"fOO".to_owned()));
//! assert!(!custom.agrees_with(&natural));
//! ```

use core::{
    cmp::Ordering,
    fmt,
    hash::{BuildHasher, Hash},
};
use foldhash::fast::FixedState;
use rustc_hash::FxBuildHasher;
use std::{rc::Rc, sync::Arc};

/// An equality strategy usable through a trait object.
///
/// [`Equality`] is the common implementation. Views over map entries use
/// [`PairEquality`].
pub trait Equivalence<T: ?Sized> {
    /// Returns true if `a` and `b` are equal under this strategy.
    fn equal(&self, a: &T, b: &T) -> bool;

    /// Returns the hash of `value`, consistent with [`Self::equal`].
    fn hash(&self, value: &T) -> u64;

    /// Compares `a` and `b`, or returns `None` if the strategy has no order.
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        let _ = (a, b);
        None
    }

    /// Returns true if [`Self::compare`] returns an order.
    fn is_ordered(&self) -> bool {
        false
    }
}

/// The strategy selected at construction time.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EqualityKind {
    /// The element's own `Eq`/`Hash` (and optionally `Ord`).
    Natural,

    /// Pointer identity: two elements are equal if they refer to the same
    /// allocation.
    Identity,

    /// A caller-provided equality and hash function.
    Custom,

    /// A caller-provided total order; equality means comparing equal.
    Ordered,
}

/// An equality, hash and optional order for `T`, built from function
/// pointers.
///
/// `Equality` is `Copy`, so structures store it by value and views can copy
/// it from their target.
pub struct Equality<T: ?Sized> {
    kind: EqualityKind,
    // `None` means equality is derived from `compare`.
    equal: Option<fn(&T, &T) -> bool>,
    hash: fn(&T) -> u64,
    compare: Option<fn(&T, &T) -> Ordering>,
}

impl<T: ?Sized> Clone for Equality<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Equality<T> {}

impl<T: ?Sized> fmt::Debug for Equality<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equality")
            .field("kind", &self.kind)
            .field("ordered", &self.compare.is_some())
            .finish()
    }
}

impl<T: ?Sized + Hash + Eq> Equality<T> {
    /// The element's own `Eq` and `Hash`.
    ///
    /// Hashes use a fixed seed, so iteration-independent properties such as
    /// directory layout are reproducible across runs.
    pub fn natural() -> Self {
        Self {
            kind: EqualityKind::Natural,
            equal: Some(|a, b| a == b),
            hash: hash_natural::<T>,
            compare: None,
        }
    }
}

impl<T: ?Sized + Hash + Ord> Equality<T> {
    /// Like [`Self::natural`], but also ordering elements with their `Ord`
    /// implementation.
    pub fn natural_ord() -> Self {
        Self {
            kind: EqualityKind::Natural,
            equal: Some(|a, b| a == b),
            hash: hash_natural::<T>,
            compare: Some(T::cmp),
        }
    }
}

impl<T: ?Sized + Ord> Equality<T> {
    /// The element's own `Ord`, for types without a `Hash` implementation.
    ///
    /// All elements hash to the same value. This is the default key
    /// equality of [`SortedMap`](crate::SortedMap), which never hashes.
    pub fn ord() -> Self {
        Self {
            kind: EqualityKind::Natural,
            equal: Some(|a, b| a == b),
            hash: hash_constant::<T>,
            compare: Some(T::cmp),
        }
    }
}

impl<T: ?Sized + PartialEq> Equality<T> {
    /// The element's own `PartialEq`, for types without a `Hash`
    /// implementation.
    ///
    /// All elements hash to the same value, so lookups degrade to a linear
    /// scan. This is the default value equality of maps.
    pub fn partial_eq() -> Self {
        Self {
            kind: EqualityKind::Natural,
            equal: Some(|a, b| a == b),
            hash: hash_constant::<T>,
            compare: None,
        }
    }
}

impl<T: ?Sized + Address> Equality<T> {
    /// Pointer identity for reference-like elements.
    pub fn identity() -> Self {
        Self {
            kind: EqualityKind::Identity,
            equal: Some(|a, b| a.address() == b.address()),
            hash: |value| FxBuildHasher.hash_one(value.address()),
            compare: None,
        }
    }
}

impl<T: ?Sized> Equality<T> {
    /// A caller-provided equality and hash.
    ///
    /// `hash` must return equal values for elements that `equal` considers
    /// equal.
    pub fn custom(equal: fn(&T, &T) -> bool, hash: fn(&T) -> u64) -> Self {
        Self {
            kind: EqualityKind::Custom,
            equal: Some(equal),
            hash,
            compare: None,
        }
    }

    /// A caller-provided total order.
    ///
    /// Elements are equal when they compare equal. Without a hash function,
    /// all elements hash to the same value.
    pub fn ordered(
        compare: fn(&T, &T) -> Ordering,
        hash: Option<fn(&T) -> u64>,
    ) -> Self {
        Self {
            kind: EqualityKind::Ordered,
            equal: None,
            hash: hash.unwrap_or(hash_constant::<T>),
            compare: Some(compare),
        }
    }

    /// Returns the strategy selected at construction.
    #[inline]
    pub fn kind(&self) -> EqualityKind {
        self.kind
    }

    /// Returns true if this strategy can order elements.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.compare.is_some()
    }

    /// Returns true if `a` and `b` are equal under this strategy.
    #[inline]
    pub fn equal(&self, a: &T, b: &T) -> bool {
        match (self.equal, self.compare) {
            (Some(equal), _) => equal(a, b),
            (None, Some(compare)) => compare(a, b) == Ordering::Equal,
            (None, None) => unreachable!("equality without equal or compare"),
        }
    }

    /// Returns the hash of `value`.
    #[inline]
    pub fn hash(&self, value: &T) -> u64 {
        (self.hash)(value)
    }

    /// Compares `a` and `b` with the strategy's order, if any.
    #[inline]
    pub fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        self.compare.map(|compare| compare(a, b))
    }

    pub(crate) fn compare_fn(&self) -> Option<fn(&T, &T) -> Ordering> {
        self.compare
    }

    /// Returns true if two structures built with `self` and `other` can be
    /// compared for equality.
    ///
    /// Natural and identity strategies agree with any strategy of the same
    /// kind. Custom and ordered strategies agree only when built from the
    /// same functions.
    pub fn agrees_with(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match self.kind {
            EqualityKind::Natural | EqualityKind::Identity => true,
            EqualityKind::Custom | EqualityKind::Ordered => {
                self.equal.map(|f| f as usize)
                    == other.equal.map(|f| f as usize)
                    && self.hash as usize == other.hash as usize
                    && self.compare.map(|f| f as usize)
                        == other.compare.map(|f| f as usize)
            }
        }
    }
}

impl<T: ?Sized> Equivalence<T> for Equality<T> {
    #[inline]
    fn equal(&self, a: &T, b: &T) -> bool {
        Equality::equal(self, a, b)
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        Equality::hash(self, value)
    }

    #[inline]
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        Equality::compare(self, a, b)
    }

    #[inline]
    fn is_ordered(&self) -> bool {
        Equality::is_ordered(self)
    }
}

/// Key and value strategies combined, for views over map entries.
pub struct PairEquality<K, V> {
    /// The key strategy.
    pub key: Equality<K>,
    /// The value strategy.
    pub value: Equality<V>,
}

impl<K, V> PairEquality<K, V> {
    /// Combines a key and a value strategy.
    pub fn new(key: Equality<K>, value: Equality<V>) -> Self {
        Self { key, value }
    }
}

impl<K, V> Clone for PairEquality<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for PairEquality<K, V> {}

impl<K, V> fmt::Debug for PairEquality<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairEquality")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

impl<K, V> Equivalence<(K, V)> for PairEquality<K, V> {
    fn equal(&self, a: &(K, V), b: &(K, V)) -> bool {
        self.key.equal(&a.0, &b.0) && self.value.equal(&a.1, &b.1)
    }

    fn hash(&self, value: &(K, V)) -> u64 {
        self.key.hash(&value.0).rotate_left(5) ^ self.value.hash(&value.1)
    }
}

/// Elements that can be compared by identity.
pub trait Address {
    /// Returns the address this element refers to.
    fn address(&self) -> usize;
}

impl<U: ?Sized> Address for &U {
    fn address(&self) -> usize {
        *self as *const U as *const () as usize
    }
}

impl<U: ?Sized> Address for Box<U> {
    fn address(&self) -> usize {
        &**self as *const U as *const () as usize
    }
}

impl<U: ?Sized> Address for Rc<U> {
    fn address(&self) -> usize {
        Rc::as_ptr(self) as *const () as usize
    }
}

impl<U: ?Sized> Address for Arc<U> {
    fn address(&self) -> usize {
        Arc::as_ptr(self) as *const () as usize
    }
}

fn hash_natural<T: ?Sized + Hash>(value: &T) -> u64 {
    FixedState::default().hash_one(value)
}

fn hash_constant<T: ?Sized>(_: &T) -> u64 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn len_eq(a: &str, b: &str) -> bool {
        a.len() == b.len()
    }

    fn len_hash(s: &str) -> u64 {
        s.len() as u64
    }

    fn by_len(a: &str, b: &str) -> Ordering {
        a.len().cmp(&b.len())
    }

    #[test]
    fn natural_is_deterministic() {
        let eq = Equality::<str>::natural();
        assert!(eq.equal("a", "a"));
        assert!(!eq.equal("a", "b"));
        assert_eq!(eq.hash("hello"), Equality::<str>::natural().hash("hello"));
        assert_eq!(eq.compare("a", "b"), None);
        assert_eq!(
            Equality::<str>::natural_ord().compare("a", "b"),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn identity_ignores_contents() {
        let a = Box::new(5);
        let b = Box::new(5);
        let eq = Equality::<Box<i32>>::identity();
        assert!(eq.equal(&a, &a));
        assert!(!eq.equal(&a, &b));
        assert_eq!(eq.kind(), EqualityKind::Identity);

        let shared = Arc::new("x");
        let cloned = Arc::clone(&shared);
        assert!(Equality::<Arc<&str>>::identity().equal(&shared, &cloned));
    }

    #[test]
    fn ordered_derives_equality() {
        let eq = Equality::<str>::ordered(by_len, None);
        assert!(eq.equal("ab", "cd"));
        assert!(!eq.equal("ab", "c"));
        assert_eq!(eq.hash("ab"), eq.hash("xyz"));
        assert!(eq.is_ordered());
    }

    #[test]
    fn agreement() {
        let natural = Equality::<str>::natural();
        let natural_ord = Equality::<str>::natural_ord();
        let custom = Equality::<str>::custom(len_eq, len_hash);
        let ordered = Equality::<str>::ordered(by_len, Some(len_hash));

        assert!(natural.agrees_with(&natural_ord));
        assert!(custom.agrees_with(&Equality::custom(len_eq, len_hash)));
        assert!(!custom.agrees_with(&natural));
        assert!(!custom.agrees_with(&ordered));
        assert!(ordered.agrees_with(&ordered));
    }

    #[test]
    fn pair_equality() {
        let pair = PairEquality::new(
            Equality::<u32>::natural(),
            Equality::<String>::natural(),
        );
        let a = (1, "x".to_owned());
        let b = (1, "x".to_owned());
        let c = (1, "y".to_owned());
        assert!(Equivalence::equal(&pair, &a, &b));
        assert!(!Equivalence::equal(&pair, &a, &c));
        assert_eq!(Equivalence::hash(&pair, &a), Equivalence::hash(&pair, &b));
    }
}
