// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A linear-hashing directory over segmented bucket storage.
//!
//! The directory maps a hash to a bucket, and each bucket heads an intrusive
//! list of entries threaded through the entries themselves (see
//! [`BucketLinks`]). Buckets are split and merged one at a time, so the
//! directory never rehashes more than one bucket per operation.
//!
//! Bucket storage is a list of segments with sizes 1, 1, 2, 4, 8, and so on.
//! Segment `s > 0` holds buckets `2^(s-1)..2^s`, so the committed capacity is
//! always zero or a power of two, and a newly allocated segment is never
//! larger than the capacity already committed.
//!
//! Occupancy policy, with `n` live entries and `B` active buckets:
//!
//! * after an insertion, split until `B >= n`;
//! * after a removal, merge while `B > 2n`.
//!
//! The last segment is released as soon as no active bucket lives in it.
//! Together these keep `n <= capacity <= 4n` at every committed state.

use super::chain::EntryId;
use crate::internal::TableValidationError;
use log::trace;

/// Access to the per-entry state the directory threads its buckets through.
pub(crate) trait BucketLinks {
    /// The stored hash of an entry.
    fn hash_of(&self, id: EntryId) -> u64;

    /// The entry after `id` in its bucket.
    fn bucket_next(&self, id: EntryId) -> Option<EntryId>;

    fn set_bucket_next(&mut self, id: EntryId, next: Option<EntryId>);
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Directory {
    segments: Vec<Box<[Option<EntryId>]>>,
    buckets: usize,
}

impl Directory {
    pub(crate) const fn new() -> Self {
        Self { segments: Vec::new(), buckets: 0 }
    }

    /// The number of bucket slots currently allocated.
    pub(crate) fn capacity(&self) -> usize {
        match self.segments.len() {
            0 => 0,
            n => 1 << (n - 1),
        }
    }

    #[cfg(test)]
    pub(crate) fn buckets(&self) -> usize {
        self.buckets
    }

    /// Walks the bucket for `hash`, returning the first entry with a matching
    /// stored hash for which `eq` returns true.
    pub(crate) fn find<L, F>(
        &self,
        hash: u64,
        links: &L,
        mut eq: F,
    ) -> Option<EntryId>
    where
        L: BucketLinks + ?Sized,
        F: FnMut(EntryId) -> bool,
    {
        if self.buckets == 0 {
            return None;
        }
        let mut current = *self.slot(self.address(hash));
        while let Some(id) = current {
            if links.hash_of(id) == hash && eq(id) {
                return Some(id);
            }
            current = links.bucket_next(id);
        }
        None
    }

    /// Adds `id` to the directory. `len` is the number of live entries,
    /// including `id`.
    pub(crate) fn insert<L>(
        &mut self,
        id: EntryId,
        hash: u64,
        len: usize,
        links: &mut L,
    ) where
        L: BucketLinks + ?Sized,
    {
        while self.buckets < len {
            self.split(links);
        }
        let slot = self.slot_mut(self.address(hash));
        let head = slot.replace(id);
        links.set_bucket_next(id, head);
    }

    /// Removes `id` from the directory. `len` is the number of live entries
    /// once `id` is gone.
    ///
    /// Panics if `id` is not in its bucket.
    pub(crate) fn remove<L>(
        &mut self,
        id: EntryId,
        hash: u64,
        len: usize,
        links: &mut L,
    ) where
        L: BucketLinks + ?Sized,
    {
        let bucket = self.address(hash);
        let next = links.bucket_next(id);
        let head = *self.slot(bucket);
        if head == Some(id) {
            *self.slot_mut(bucket) = next;
        } else {
            let mut current = head;
            loop {
                let Some(prev) = current else {
                    panic!("{id:?} not found in bucket {bucket}");
                };
                let after = links.bucket_next(prev);
                if after == Some(id) {
                    links.set_bucket_next(prev, next);
                    break;
                }
                current = after;
            }
        }
        links.set_bucket_next(id, None);

        while self.buckets > 2 * len {
            self.merge(links);
        }
    }

    pub(crate) fn clear(&mut self) {
        if !self.segments.is_empty() {
            trace!(
                "directory: releasing {} segments ({} buckets)",
                self.segments.len(),
                self.capacity()
            );
        }
        self.segments = Vec::new();
        self.buckets = 0;
    }

    /// Checks that every entry is reachable from exactly the bucket its hash
    /// addresses, and that the occupancy bounds hold.
    pub(crate) fn validate<L>(
        &self,
        len: usize,
        links: &L,
    ) -> Result<(), TableValidationError>
    where
        L: BucketLinks + ?Sized,
    {
        let capacity = self.capacity();
        if capacity < len || capacity > 4 * len {
            return Err(TableValidationError::new(format!(
                "capacity {capacity} outside [{len}, {}]",
                4 * len
            )));
        }
        if self.buckets > capacity || self.buckets < len {
            return Err(TableValidationError::new(format!(
                "{} active buckets for {len} entries and capacity {capacity}",
                self.buckets
            )));
        }
        if self.buckets > 2 * len {
            return Err(TableValidationError::new(format!(
                "{} active buckets exceeds twice the {len} entries",
                self.buckets
            )));
        }

        let mut count = 0;
        for bucket in 0..self.buckets {
            let mut current = *self.slot(bucket);
            while let Some(id) = current {
                let expected = self.address(links.hash_of(id));
                if expected != bucket {
                    return Err(TableValidationError::new(format!(
                        "{id:?} is in bucket {bucket}, but hashes to \
                         bucket {expected}"
                    )));
                }
                count += 1;
                if count > len {
                    return Err(TableValidationError::new(format!(
                        "buckets hold more than {len} entries"
                    )));
                }
                current = links.bucket_next(id);
            }
        }
        if count != len {
            return Err(TableValidationError::new(format!(
                "buckets hold {count} entries, expected {len}"
            )));
        }
        for bucket in self.buckets..capacity {
            if self.slot(bucket).is_some() {
                return Err(TableValidationError::new(format!(
                    "inactive bucket {bucket} is not empty"
                )));
            }
        }
        Ok(())
    }

    fn address(&self, hash: u64) -> usize {
        debug_assert!(self.buckets > 0, "address with no buckets");
        let level = usize::BITS - 1 - self.buckets.leading_zeros();
        let low = 1usize << level;
        let split_point = self.buckets - low;
        // Truncation is fine: only the low bits of the hash are used.
        let hash = hash as usize;
        let bucket = hash & (low - 1);
        if bucket < split_point {
            hash & ((low << 1) - 1)
        } else {
            bucket
        }
    }

    fn split<L>(&mut self, links: &mut L)
    where
        L: BucketLinks + ?Sized,
    {
        let new_bucket = self.buckets;
        if new_bucket == self.capacity() {
            let size = new_bucket.max(1);
            trace!(
                "directory: allocating segment {} ({size} buckets)",
                self.segments.len()
            );
            self.segments.push(vec![None; size].into_boxed_slice());
        }
        self.buckets += 1;
        if new_bucket == 0 {
            return;
        }

        let low = 1usize << (usize::BITS - 1 - new_bucket.leading_zeros());
        let source = new_bucket - low;
        let mask = (low << 1) - 1;

        let mut current = self.slot_mut(source).take();
        let mut stay = None;
        let mut moved = None;
        while let Some(id) = current {
            current = links.bucket_next(id);
            let target = if (links.hash_of(id) as usize) & mask == new_bucket {
                &mut moved
            } else {
                &mut stay
            };
            links.set_bucket_next(id, *target);
            *target = Some(id);
        }
        *self.slot_mut(source) = stay;
        *self.slot_mut(new_bucket) = moved;
    }

    fn merge<L>(&mut self, links: &mut L)
    where
        L: BucketLinks + ?Sized,
    {
        let last = self.buckets - 1;
        let moved = self.slot_mut(last).take();
        self.buckets -= 1;

        if last > 0 {
            let low = 1usize << (usize::BITS - 1 - last.leading_zeros());
            let partner = last - low;
            let mut current = moved;
            while let Some(id) = current {
                current = links.bucket_next(id);
                let head = self.slot_mut(partner).replace(id);
                links.set_bucket_next(id, head);
            }
        }

        while let Some(start) = self.last_segment_start() {
            if start < self.buckets {
                break;
            }
            let released = self.segments.len() - 1;
            trace!("directory: releasing segment {released}");
            self.segments.pop();
        }
    }

    fn last_segment_start(&self) -> Option<usize> {
        match self.segments.len() {
            0 => None,
            1 => Some(0),
            n => Some(1 << (n - 2)),
        }
    }

    #[inline]
    fn locate(bucket: usize) -> (usize, usize) {
        if bucket == 0 {
            (0, 0)
        } else {
            let segment = (usize::BITS - bucket.leading_zeros()) as usize;
            (segment, bucket - (1 << (segment - 1)))
        }
    }

    #[inline]
    fn slot(&self, bucket: usize) -> &Option<EntryId> {
        let (segment, offset) = Self::locate(bucket);
        &self.segments[segment][offset]
    }

    #[inline]
    fn slot_mut(&mut self, bucket: usize) -> &mut Option<EntryId> {
        let (segment, offset) = Self::locate(bucket);
        &mut self.segments[segment][offset]
    }
}
