// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Non-negative integer elements.

use crate::errors::CollectionError;
use core::fmt;

/// A non-negative integer, the element type of [`BitSet`](crate::BitSet).
///
/// Stepping past either end of the `usize` domain fails with
/// [`CollectionError::OutOfRange`] rather than wrapping.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Index(usize);

impl Index {
    /// The smallest index.
    pub const ZERO: Self = Self(0);

    /// The largest index.
    pub const MAX: Self = Self(usize::MAX);

    /// Creates a new index.
    #[inline]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Returns the integer value of this index.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns the index following this one.
    pub fn next(self) -> Result<Self, CollectionError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(CollectionError::OutOfRange("next index after maximum"))
    }

    /// Returns the index preceding this one.
    pub fn previous(self) -> Result<Self, CollectionError> {
        self.0
            .checked_sub(1)
            .map(Self)
            .ok_or(CollectionError::OutOfRange("previous index before zero"))
    }
}

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<Index> for usize {
    fn from(index: Index) -> Self {
        index.0
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert_eq!(Index::new(4).next(), Ok(Index::new(5)));
        assert_eq!(Index::new(4).previous(), Ok(Index::new(3)));
        assert!(matches!(
            Index::ZERO.previous(),
            Err(CollectionError::OutOfRange(_))
        ));
        assert!(matches!(
            Index::MAX.next(),
            Err(CollectionError::OutOfRange(_))
        ));
    }
}
