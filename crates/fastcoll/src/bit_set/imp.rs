// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::Iter;
use crate::{
    equality::Equivalence,
    errors::CollectionError,
    index::Index,
    internal::ValidationError,
    service::{Collection, CollectionMut, DeepClone, Direction},
};
use core::{cmp::Ordering, fmt, iter::Rev};

const WORD_BITS: usize = u64::BITS as usize;

#[inline]
fn word_of(index: usize) -> usize {
    index / WORD_BITS
}

#[inline]
fn mask_of(index: usize) -> u64 {
    1 << (index % WORD_BITS)
}

/// Yields `(word, mask)` for every word overlapping `from..to`, where `mask`
/// selects the bits of the word that fall in the range. Requires
/// `from < to`.
fn range_masks(from: usize, to: usize) -> impl Iterator<Item = (usize, u64)> {
    let first = word_of(from);
    let last = word_of(to - 1);
    (first..=last).map(move |word| {
        let low = if word == first { from % WORD_BITS } else { 0 };
        let high =
            if word == last { (to - 1) % WORD_BITS + 1 } else { WORD_BITS };
        (word, (u64::MAX << low) & (u64::MAX >> (WORD_BITS - high)))
    })
}

fn check_range(from: usize, to: usize) -> Result<(), CollectionError> {
    if to < from {
        return Err(CollectionError::InvalidArgument(
            "bit range end precedes start",
        ));
    }
    Ok(())
}

/// A set of non-negative integers, one bit per integer.
///
/// Single-bit operations take `usize` positions; as a [`Collection`], the
/// elements are [`Index`] values in increasing order.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct BitSet {
    // Invariant: the last word, if any, is nonzero.
    words: Vec<u64>,
}

impl BitSet {
    /// Creates a new, empty `BitSet`.
    #[inline]
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Creates a `BitSet` from its word representation. Bit `i` of the set is
    /// bit `i % 64` of `words[i / 64]`.
    pub fn from_words(words: Vec<u64>) -> Self {
        let mut set = Self { words };
        set.trim();
        set
    }

    /// Returns the minimal word representation of the set.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Consumes the set, returning its word representation.
    #[inline]
    pub fn into_words(self) -> Vec<u64> {
        self.words
    }

    /// Returns true if bit `index` is set.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        self.words
            .get(word_of(index))
            .is_some_and(|word| word & mask_of(index) != 0)
    }

    /// Sets bit `index`.
    ///
    /// The word array grows to cover `index`. As with `Vec`, failing to
    /// allocate it aborts; [`CollectionMut::add`] and the range forms report
    /// that as [`CollectionError::OutOfRange`] instead.
    pub fn set(&mut self, index: usize) {
        let word = word_of(index);
        self.ensure_words(word + 1);
        self.words[word] |= mask_of(index);
    }

    /// Sets bit `index` to `value`.
    pub fn set_value(&mut self, index: usize, value: bool) {
        if value {
            self.set(index);
        } else {
            self.clear_bit(index);
        }
    }

    /// Clears bit `index`.
    pub fn clear_bit(&mut self, index: usize) {
        if let Some(word) = self.words.get_mut(word_of(index)) {
            *word &= !mask_of(index);
            self.trim();
        }
    }

    /// Flips bit `index`, growing the word array like [`Self::set`].
    pub fn flip(&mut self, index: usize) {
        let word = word_of(index);
        self.ensure_words(word + 1);
        self.words[word] ^= mask_of(index);
        self.trim();
    }

    /// Sets bit `index` to `value`, returning its previous value.
    pub fn get_and_set(&mut self, index: usize, value: bool) -> bool {
        let previous = BitSet::get(self, index);
        if previous != value {
            self.set_value(index, value);
        }
        previous
    }

    /// Sets the bits in `from..to`.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `to < from`, and
    /// with [`CollectionError::OutOfRange`] if the word array cannot grow to
    /// cover `to`.
    pub fn set_range(
        &mut self,
        from: usize,
        to: usize,
    ) -> Result<(), CollectionError> {
        check_range(from, to)?;
        if from == to {
            return Ok(());
        }
        self.reserve_words(word_of(to - 1) + 1)?;
        for (word, mask) in range_masks(from, to) {
            self.words[word] |= mask;
        }
        Ok(())
    }

    /// Clears the bits in `from..to`.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `to < from`.
    pub fn clear_range(
        &mut self,
        from: usize,
        to: usize,
    ) -> Result<(), CollectionError> {
        check_range(from, to)?;
        if from == to {
            return Ok(());
        }
        for (word, mask) in range_masks(from, to) {
            let Some(bits) = self.words.get_mut(word) else { break };
            *bits &= !mask;
        }
        self.trim();
        Ok(())
    }

    /// Flips the bits in `from..to`.
    ///
    /// Fails like [`Self::set_range`].
    pub fn flip_range(
        &mut self,
        from: usize,
        to: usize,
    ) -> Result<(), CollectionError> {
        check_range(from, to)?;
        if from == to {
            return Ok(());
        }
        self.reserve_words(word_of(to - 1) + 1)?;
        for (word, mask) in range_masks(from, to) {
            self.words[word] ^= mask;
        }
        self.trim();
        Ok(())
    }

    /// Sets the bits in `from..to` to `value`.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `to < from`.
    pub fn set_range_value(
        &mut self,
        from: usize,
        to: usize,
        value: bool,
    ) -> Result<(), CollectionError> {
        if value {
            self.set_range(from, to)
        } else {
            self.clear_range(from, to)
        }
    }

    /// Returns a new set holding the bits of `from..to`, at the same
    /// positions.
    ///
    /// Fails with [`CollectionError::InvalidArgument`] if `to < from`.
    pub fn get_range(
        &self,
        from: usize,
        to: usize,
    ) -> Result<BitSet, CollectionError> {
        check_range(from, to)?;
        let mut out = BitSet::new();
        if from == to {
            return Ok(out);
        }
        for (word, mask) in range_masks(from, to) {
            let Some(bits) = self.words.get(word) else { break };
            let bits = bits & mask;
            if bits != 0 {
                out.ensure_words(word + 1);
                out.words[word] = bits;
            }
        }
        Ok(out)
    }

    /// Keeps only the bits also set in `other`.
    pub fn and(&mut self, other: &BitSet) {
        self.words.truncate(other.words.len());
        for (word, theirs) in self.words.iter_mut().zip(&other.words) {
            *word &= theirs;
        }
        self.trim();
    }

    /// Sets every bit set in `other`.
    pub fn or(&mut self, other: &BitSet) {
        self.ensure_words(other.words.len());
        for (word, theirs) in self.words.iter_mut().zip(&other.words) {
            *word |= theirs;
        }
    }

    /// Flips every bit set in `other`.
    pub fn xor(&mut self, other: &BitSet) {
        self.ensure_words(other.words.len());
        for (word, theirs) in self.words.iter_mut().zip(&other.words) {
            *word ^= theirs;
        }
        self.trim();
    }

    /// Clears every bit set in `other`.
    pub fn and_not(&mut self, other: &BitSet) {
        for (word, theirs) in self.words.iter_mut().zip(&other.words) {
            *word &= !theirs;
        }
        self.trim();
    }

    /// Returns true if some bit is set in both sets.
    pub fn intersects(&self, other: &BitSet) -> bool {
        self.words.iter().zip(&other.words).any(|(a, b)| a & b != 0)
    }

    /// Returns the number of set bits.
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Returns the index of the highest set bit plus one, or zero if the set
    /// is empty.
    pub fn length(&self) -> usize {
        match self.words.last() {
            Some(last) => {
                self.words.len() * WORD_BITS - last.leading_zeros() as usize
            }
            None => 0,
        }
    }

    /// Returns true if no bit is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Returns the first set bit at or after `from`.
    pub fn next_set_bit(&self, from: usize) -> Option<usize> {
        let mut word = word_of(from);
        let mut bits =
            self.words.get(word)? & (u64::MAX << (from % WORD_BITS));
        loop {
            if bits != 0 {
                return Some(word * WORD_BITS + bits.trailing_zeros() as usize);
            }
            word += 1;
            bits = *self.words.get(word)?;
        }
    }

    /// Returns the first clear bit at or after `from`. Every bit past
    /// [`Self::length`] is clear.
    pub fn next_clear_bit(&self, from: usize) -> usize {
        let mut word = word_of(from);
        let Some(first) = self.words.get(word) else { return from };
        let mut bits = !first & (u64::MAX << (from % WORD_BITS));
        loop {
            if bits != 0 {
                return word * WORD_BITS + bits.trailing_zeros() as usize;
            }
            word += 1;
            match self.words.get(word) {
                Some(next) => bits = !next,
                None => return word * WORD_BITS,
            }
        }
    }

    /// Returns the last set bit at or before `from`.
    ///
    /// Fails with [`CollectionError::OutOfRange`] if `from` is beyond the
    /// word array.
    pub fn previous_set_bit(
        &self,
        from: usize,
    ) -> Result<Option<usize>, CollectionError> {
        self.check_backward(from)?;
        Ok(self.last_set_at_or_below(from))
    }

    /// Returns the last clear bit at or before `from`.
    ///
    /// Fails with [`CollectionError::OutOfRange`] if `from` is beyond the
    /// word array.
    pub fn previous_clear_bit(
        &self,
        from: usize,
    ) -> Result<Option<usize>, CollectionError> {
        self.check_backward(from)?;
        let mut word = word_of(from);
        let mask = u64::MAX >> (WORD_BITS - 1 - from % WORD_BITS);
        let mut bits = !self.words[word] & mask;
        loop {
            if bits != 0 {
                return Ok(Some(Self::highest(word, bits)));
            }
            if word == 0 {
                return Ok(None);
            }
            word -= 1;
            bits = !self.words[word];
        }
    }

    /// Iterates over the set bits in increasing order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self, 0)
    }

    /// Iterates over the set bits at or after `from`, in increasing order.
    #[inline]
    pub fn iter_from(&self, from: Index) -> Iter<'_> {
        Iter::new(self, from.get())
    }

    /// Iterates over the set bits at or before `from`, in decreasing order.
    #[inline]
    pub fn rev_iter_from(&self, from: Index) -> Rev<Iter<'_>> {
        Iter::until(self, from.get().saturating_add(1)).rev()
    }

    /// Checks general invariants of the set.
    #[doc(hidden)]
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.words.last() == Some(&0) {
            return Err(ValidationError::general(format!(
                "trailing zero word at {}",
                self.words.len() - 1
            )));
        }
        Ok(())
    }

    /// Returns the last set bit at or before `index`, clamping `index` to
    /// the word array.
    pub(crate) fn last_set_at_or_below(&self, index: usize) -> Option<usize> {
        let len = self.words.len();
        let (mut word, mut bits) = if word_of(index) >= len {
            let last = len.checked_sub(1)?;
            (last, self.words[last])
        } else {
            let word = word_of(index);
            let mask = u64::MAX >> (WORD_BITS - 1 - index % WORD_BITS);
            (word, self.words[word] & mask)
        };
        loop {
            if bits != 0 {
                return Some(Self::highest(word, bits));
            }
            if word == 0 {
                return None;
            }
            word -= 1;
            bits = self.words[word];
        }
    }

    #[inline]
    fn highest(word: usize, bits: u64) -> usize {
        word * WORD_BITS + (WORD_BITS - 1 - bits.leading_zeros() as usize)
    }

    fn check_backward(&self, from: usize) -> Result<(), CollectionError> {
        if word_of(from) >= self.words.len() {
            return Err(CollectionError::OutOfRange(
                "backward bit scan beyond the word array",
            ));
        }
        Ok(())
    }

    fn ensure_words(&mut self, len: usize) {
        if self.words.len() < len {
            self.words.resize(len, 0);
        }
    }

    fn reserve_words(&mut self, len: usize) -> Result<(), CollectionError> {
        let additional = len.saturating_sub(self.words.len());
        self.words.try_reserve_exact(additional).map_err(|_| {
            CollectionError::OutOfRange("bit index beyond allocatable words")
        })?;
        self.ensure_words(len);
        Ok(())
    }

    fn trim(&mut self) {
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Index::get)).finish()
    }
}

impl Extend<Index> for BitSet {
    fn extend<I: IntoIterator<Item = Index>>(&mut self, iter: I) {
        for index in iter {
            self.set(index.get());
        }
    }
}

impl Extend<usize> for BitSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for index in iter {
            self.set(index);
        }
    }
}

impl FromIterator<Index> for BitSet {
    fn from_iter<I: IntoIterator<Item = Index>>(iter: I) -> Self {
        let mut set = BitSet::new();
        set.extend(iter);
        set
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = BitSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = Index;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl DeepClone for BitSet {
    type Owned = Self;

    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

/// The equality of [`Index`] elements: natural, hashed by value and ordered.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexEquality;

impl Equivalence<Index> for IndexEquality {
    #[inline]
    fn equal(&self, a: &Index, b: &Index) -> bool {
        a == b
    }

    #[inline]
    fn hash(&self, value: &Index) -> u64 {
        value.get() as u64
    }

    #[inline]
    fn compare(&self, a: &Index, b: &Index) -> Option<Ordering> {
        Some(a.cmp(b))
    }

    #[inline]
    fn is_ordered(&self) -> bool {
        true
    }
}

/// Traversal state over a [`BitSet`].
///
/// The cursor stores where the next scan starts, so bits cleared or set
/// ahead of it are observed.
#[derive(Clone, Debug)]
pub struct BitCursor {
    // `None` once the scan has passed either end of the index domain.
    from: Option<usize>,
    direction: Direction,
}

impl Collection for BitSet {
    type Item = Index;
    type Ref<'a>
        = Index
    where
        Self: 'a;
    type Pos = usize;
    type Cursor = BitCursor;

    #[inline]
    fn len(&self) -> usize {
        self.cardinality()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn equality(&self) -> &dyn Equivalence<Index> {
        &IndexEquality
    }

    fn cursor(&self, direction: Direction) -> BitCursor {
        let from = match direction {
            Direction::Forward => 0,
            Direction::Backward => usize::MAX,
        };
        BitCursor { from: Some(from), direction }
    }

    fn advance(&self, cursor: &mut BitCursor) -> Option<usize> {
        let from = cursor.from?;
        match cursor.direction {
            Direction::Forward => {
                let pos = self.next_set_bit(from);
                cursor.from = pos.and_then(|pos| pos.checked_add(1));
                pos
            }
            Direction::Backward => {
                let pos = self.last_set_at_or_below(from);
                cursor.from = pos.and_then(|pos| pos.checked_sub(1));
                pos
            }
        }
    }

    #[inline]
    fn get(&self, pos: usize) -> Index {
        Index::new(pos)
    }

    #[inline]
    fn position(&self, item: &Index) -> Option<usize> {
        BitSet::get(self, item.get()).then_some(item.get())
    }

    #[inline]
    fn contains(&self, item: &Index) -> bool {
        BitSet::get(self, item.get())
    }
}

impl CollectionMut for BitSet {
    fn add(&mut self, item: Index) -> Result<bool, CollectionError> {
        self.reserve_words(word_of(item.get()) + 1)?;
        Ok(!self.get_and_set(item.get(), true))
    }

    fn remove_at(&mut self, pos: usize) -> Result<(), CollectionError> {
        self.clear_bit(pos);
        Ok(())
    }

    fn remove(&mut self, item: &Index) -> Result<bool, CollectionError> {
        Ok(self.get_and_set(item.get(), false))
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        BitSet::clear(self);
        Ok(())
    }
}
