// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::BitSet;
use crate::index::Index;
use core::iter::FusedIterator;

/// An iterator over the set bits of a [`BitSet`], as [`Index`] values in
/// increasing order.
///
/// Created by [`BitSet::iter`] and [`BitSet::iter_from`]; reversed by
/// [`BitSet::rev_iter_from`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    set: &'a BitSet,
    // Bits in `front..back` have not been yielded yet.
    front: usize,
    back: usize,
}

impl<'a> Iter<'a> {
    pub(super) fn new(set: &'a BitSet, from: usize) -> Self {
        Self { set, front: from, back: set.length() }
    }

    /// Covers the bits below `end`.
    pub(super) fn until(set: &'a BitSet, end: usize) -> Self {
        Self { set, front: 0, back: end.min(set.length()) }
    }
}

impl Iterator for Iter<'_> {
    type Item = Index;

    fn next(&mut self) -> Option<Index> {
        if self.front >= self.back {
            return None;
        }
        match self.set.next_set_bit(self.front) {
            Some(pos) if pos < self.back => {
                self.front = pos + 1;
                Some(Index::new(pos))
            }
            _ => {
                self.front = self.back;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.back.saturating_sub(self.front)))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Index> {
        if self.front >= self.back {
            return None;
        }
        match self.set.last_set_at_or_below(self.back - 1) {
            Some(pos) if pos >= self.front => {
                self.back = pos;
                Some(Index::new(pos))
            }
            _ => {
                self.back = self.front;
                None
            }
        }
    }
}

impl FusedIterator for Iter<'_> {}
