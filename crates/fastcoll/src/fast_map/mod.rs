// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! An insertion-ordered hash map with pluggable equality.
//!
//! Entries live in an arena and are linked into a chain in insertion order;
//! iteration follows the chain, so it never depends on hash values. Lookups go
//! through a linear-hashing directory whose allocated capacity stays within
//! `[len, 4 * len]`.
//!
//! ```
//! use fastcoll::FastMap;
//!
//! let mut map = FastMap::new();
//! map.insert("a", 1);
//! map.insert("b", 2);
//! map.insert("c", 3);
//! map.remove(&"b");
//!
//! let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
//! assert_eq!(keys, ["a", "c"]);
//! ```

pub(crate) mod imp;
mod iter;
#[cfg(feature = "serde")]
pub(crate) mod serde_impls;

pub use imp::FastMap;
pub use iter::{IntoIter, Iter, IterMut};
