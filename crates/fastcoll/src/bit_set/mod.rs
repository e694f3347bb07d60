// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A set of non-negative integers packed into 64-bit words.
//!
//! Bit `i` of the word array records whether `i` is in the set. The array
//! never ends in a zero word, so [`BitSet::length`] and the word slice are
//! always minimal.
//!
//! ```
//! use fastcoll::BitSet;
//!
//! let mut bits = BitSet::new();
//! bits.set(3);
//! bits.set(5);
//! bits.set(1000);
//! assert_eq!(bits.cardinality(), 3);
//!
//! bits.clear_bit(5);
//! assert_eq!(bits.next_set_bit(0), Some(3));
//! assert_eq!(bits.previous_set_bit(1000), Ok(Some(1000)));
//! assert_eq!(bits.length(), 1001);
//! ```

mod imp;
mod iter;
#[cfg(feature = "serde")]
mod serde_impls;

pub use imp::{BitCursor, BitSet, IndexEquality};
pub use iter::Iter;
