// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Benchmarks for fastcoll.
//!
//! This is very elementary at the moment. In the future, more benchmarks will
//! live here.

use fastcoll::{BitSet, FastMap, SortedMap};

#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub index: u32,
    pub data: String,
}

impl Record {
    pub fn new(index: u32) -> Self {
        Self { index, data: format!("data{}", index) }
    }
}

pub fn fast_map_of(size: usize) -> FastMap<u32, Record> {
    (0..size as u32).map(|i| (i, Record::new(i))).collect()
}

pub fn sorted_map_of(size: usize) -> SortedMap<u32, Record> {
    (0..size as u32).map(|i| (i, Record::new(i))).collect()
}

/// Every third bit is set.
pub fn sparse_bits(size: usize) -> BitSet {
    (0..size).step_by(3).collect()
}
