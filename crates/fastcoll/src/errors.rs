// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for this crate.
//!
//! Every collection, map and view in this crate reports failures through
//! [`CollectionError`].

use core::fmt;

/// A failed operation on a collection, map or view.
///
/// Each variant carries a short description of the operation that failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CollectionError {
    /// A mutation was attempted through an unmodifiable view, a read-only
    /// partition, or a read-only action.
    PermissionDenied(&'static str),

    /// An argument was outside the accepted domain, for example a range whose
    /// end precedes its start, or a key outside a range view.
    InvalidArgument(&'static str),

    /// An index or position was required but none was available.
    OutOfRange(&'static str),

    /// An operation was called in the wrong state, for example removing
    /// through a cursor before advancing it.
    IllegalState(&'static str),

    /// The structure does not have the shape the operation expects, for
    /// example ordering a collection whose equality has no order.
    TypeMismatch(&'static str),
}

impl CollectionError {
    /// Returns the description of the operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::PermissionDenied(op)
            | Self::InvalidArgument(op)
            | Self::OutOfRange(op)
            | Self::IllegalState(op)
            | Self::TypeMismatch(op) => op,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "permission denied",
            Self::InvalidArgument(_) => "invalid argument",
            Self::OutOfRange(_) => "out of range",
            Self::IllegalState(_) => "illegal state",
            Self::TypeMismatch(_) => "type mismatch",
        }
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.operation())
    }
}

impl core::error::Error for CollectionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let error =
            CollectionError::PermissionDenied("add to unmodifiable view");
        assert_eq!(
            error.to_string(),
            "permission denied: add to unmodifiable view"
        );
        assert_eq!(error.operation(), "add to unmodifiable view");
        assert_eq!(
            CollectionError::InvalidArgument("range end before start")
                .to_string(),
            "invalid argument: range end before start"
        );
    }
}
