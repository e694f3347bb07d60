// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered hash maps, sorted maps, bit sets, and composable views over them.
//!
//! # Overview
//!
//! Every structure in this crate implements one capability contract, the
//! [`Collection`](service::Collection) and
//! [`CollectionMut`](service::CollectionMut) traits (or, for maps,
//! [`MapService`](service::MapService) and
//! [`MapServiceMut`](service::MapServiceMut)). Views in [`view`] implement the
//! same contract over a target, so they stack:
//!
//! ```
//! use fastcoll::{service::Collection, view::ViewExt, FastMap};
//!
//! let mut map = FastMap::new();
//! for (name, score) in [("ada", 7_u32), ("bob", 3), ("cy", 9), ("dee", 3)] {
//!     map.insert(name, score);
//! }
//!
//! // Distinct scores above 2, largest first.
//! let scores: Vec<u32> = map
//!     .values()
//!     .filtered(|s| *s > 2)
//!     .distinct()
//!     .sorted()
//!     .reversed()
//!     .iter()
//!     .copied()
//!     .collect();
//! assert_eq!(scores, [9, 7, 3]);
//! ```
//!
//! # Structures
//!
//! * [`FastMap`] and [`FastSet`] iterate in insertion order. Lookups go
//!   through a linear-hashing directory whose capacity stays between the
//!   entry count and four times the entry count.
//! * [`SortedMap`] and [`SortedSet`] iterate in key order and expose range
//!   views.
//! * [`BitSet`] is a set of [`Index`] values packed into 64-bit words.
//!
//! Equality, hashing and order are chosen per structure at construction, with
//! an [`Equality`](equality::Equality) strategy.
//!
//! # Features
//!
//! * `parallel` (default): [`reduce::par_reduce`], backed by rayon.
//! * `shared` (default): [`shared::Shared`], a lock-serialized handle.
//! * `serde`: `Serialize` and `Deserialize` for maps, sets and bit sets.

#![warn(missing_docs)]
#![cfg_attr(doc_cfg, feature(doc_auto_cfg))]

pub mod bit_set;
pub mod equality;
pub mod errors;
pub mod fast_map;
pub mod fast_set;
pub mod index;
#[doc(hidden)]
pub mod internal;
pub mod reduce;
pub mod service;
#[cfg(feature = "shared")]
pub mod shared;
pub mod sort;
pub mod sorted_map;
pub mod sorted_set;
mod support;
pub mod view;

pub use bit_set::BitSet;
pub use errors::CollectionError;
pub use fast_map::FastMap;
pub use fast_set::FastSet;
pub use index::Index;
pub use sorted_map::SortedMap;
pub use sorted_set::SortedSet;
pub use support::chain::{ChainCursor, EntryId};
