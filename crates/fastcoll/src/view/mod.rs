// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Composable views over collections and maps.
//!
//! A view wraps exactly one target and implements the same
//! [`Collection`]/[`CollectionMut`](crate::service::CollectionMut) contract,
//! forwarding every read and write with one composition rule applied. Views
//! never copy elements. They can wrap an owned collection, a shared
//! reference (read-only) or a mutable reference (read-write):
//!
//! ```
//! use fastcoll::{
//!     service::{Collection, CollectionMut},
//!     view::ViewExt,
//!     FastSet,
//! };
//!
//! let mut set: FastSet<u32> = (1..=6).collect();
//!
//! let evens: Vec<u32> =
//!     (&set).filtered(|n| n % 2 == 0).reversed().iter().copied().collect();
//! assert_eq!(evens, [6, 4, 2]);
//!
//! // Writes go through to the target.
//! (&mut set).filtered(|n| n % 2 == 0).add(8).unwrap();
//! assert!(set.contains(&8));
//! ```

mod custom_equality;
mod distinct;
mod filtered;
mod map;
mod mapped;
mod reversed;
mod sorted;
mod unmodifiable;

pub use custom_equality::CustomEquality;
pub use distinct::{Distinct, DistinctCursor};
pub use filtered::Filtered;
pub use map::{Entries, Keys, Values};
pub use mapped::Mapped;
pub use reversed::Reversed;
pub use sorted::{EqualityOrder, NaturalOrder, SortOrder, Sorted, SortedCursor};
pub use unmodifiable::Unmodifiable;

use crate::{
    equality::Equality, errors::CollectionError, service::Collection,
};
use core::{cmp::Ordering, hash::Hash};

/// Adapters that layer views over a collection.
///
/// Every method consumes `self`. To keep using a collection after building a
/// view over it, build the view over a reference: `(&set).reversed()`, or
/// `(&mut set).filtered(..)` for a writable view.
pub trait ViewExt: Collection + Sized {
    /// Only elements matching `predicate` are visible. Adding an element
    /// that does not match is a no-op.
    fn filtered<P>(self, predicate: P) -> Filtered<Self, P>
    where
        P: Fn(&Self::Item) -> bool,
    {
        Filtered::new(self, predicate)
    }

    /// Elements are transformed by `mapping`, and compared with `R`'s
    /// natural equality. Adding through a mapped view is rejected.
    fn mapped<F, R>(self, mapping: F) -> Mapped<Self, F, R>
    where
        F: Fn(&Self::Item) -> R,
        R: Hash + Eq,
    {
        Mapped::new(self, mapping, Equality::natural())
    }

    /// Like [`Self::mapped`], with an explicit equality for the results.
    fn mapped_with<F, R>(
        self,
        mapping: F,
        equality: Equality<R>,
    ) -> Mapped<Self, F, R>
    where
        F: Fn(&Self::Item) -> R,
    {
        Mapped::new(self, mapping, equality)
    }

    /// Traversal follows `compare`. The order is computed each time a
    /// traversal starts; the target is never reordered.
    fn sorted_by<F>(self, compare: F) -> Sorted<Self, F>
    where
        F: Fn(&Self::Item, &Self::Item) -> Ordering,
    {
        Sorted::new(self, compare)
    }

    /// Traversal follows the elements' `Ord` implementation.
    fn sorted(self) -> Sorted<Self, NaturalOrder>
    where
        Self::Item: Ord,
    {
        Sorted::new(self, NaturalOrder)
    }

    /// Traversal follows the order of the collection's equality strategy.
    ///
    /// Fails with [`CollectionError::TypeMismatch`] if the strategy has no
    /// order.
    fn try_sorted(
        self,
    ) -> Result<Sorted<Self, EqualityOrder>, CollectionError> {
        if !self.equality().is_ordered() {
            return Err(CollectionError::TypeMismatch(
                "sorted view over an unordered equality",
            ));
        }
        Ok(Sorted::new(self, EqualityOrder))
    }

    /// Traversal runs backwards.
    fn reversed(self) -> Reversed<Self> {
        Reversed::new(self)
    }

    /// Elements equal to one already yielded are skipped.
    fn distinct(self) -> Distinct<Self>
    where
        Self::Item: Clone,
    {
        Distinct::new(self)
    }

    /// Every mutator fails with [`CollectionError::PermissionDenied`].
    fn unmodifiable(self) -> Unmodifiable<Self> {
        Unmodifiable::new(self)
    }

    /// Membership and removal use `equality` instead of the target's
    /// strategy.
    fn with_equality(
        self,
        equality: Equality<Self::Item>,
    ) -> CustomEquality<Self> {
        CustomEquality::new(self, equality)
    }
}

impl<C: Collection> ViewExt for C {}
