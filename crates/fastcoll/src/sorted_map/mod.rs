// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A key-ordered map with range views.
//!
//! The entry chain is kept in key order, so iteration, [`SortedMap::first`]
//! and [`SortedMap::last`] follow the keys. Lookups go through a B-tree of
//! entry handles ordered by the key strategy's comparator.
//!
//! ```
//! use fastcoll::SortedMap;
//!
//! let mut map = SortedMap::new();
//! for (key, value) in [(30, "c"), (10, "a"), (20, "b"), (40, "d")] {
//!     map.insert(key, value);
//! }
//! assert_eq!(map.first_key(), Some(&10));
//!
//! let head = map.head_map(30);
//! assert_eq!(head.iter().map(|(k, _)| *k).collect::<Vec<_>>(), [10, 20]);
//!
//! let mut tail = map.tail_map_mut(30);
//! assert!(tail.insert(5, "x").is_err());
//! tail.remove(&40);
//! assert_eq!(map.last_key(), Some(&30));
//! ```

pub(crate) mod imp;
mod iter;
mod range;
#[cfg(feature = "serde")]
mod serde_impls;

pub use imp::SortedMap;
pub use iter::{IntoIter, Iter, IterMut};
pub use range::{RangeCursor, RangeIter, SortedRange};
