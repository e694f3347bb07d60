// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Explicitly locked collections for multi-threaded use.

use crate::{
    errors::CollectionError,
    service::{Collection, CollectionMut, DeepClone},
};
use parking_lot::Mutex;
use std::{fmt, sync::Arc};

/// A cloneable handle to a collection that serializes every access under one
/// lock.
///
/// Clones share the same collection. Each call takes the lock for its whole
/// duration; iteration happens inside [`Self::read`] or [`Self::write`], so
/// no iterator outlives the lock.
///
/// ```
/// use fastcoll::{shared::Shared, FastSet};
/// use std::thread;
///
/// let shared = Shared::new(FastSet::new());
/// let handles: Vec<_> = (0..4_u32)
///     .map(|n| {
///         let shared = shared.clone();
///         thread::spawn(move || shared.add(n).unwrap())
///     })
///     .collect();
/// for handle in handles {
///     assert!(handle.join().unwrap());
/// }
/// assert_eq!(shared.len(), 4);
/// ```
pub struct Shared<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Shared<C> {
    /// Wraps `collection`.
    pub fn new(collection: C) -> Self {
        Self { inner: Arc::new(Mutex::new(collection)) }
    }

    /// Runs `f` with shared access to the collection.
    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&C) -> T,
    {
        f(&self.inner.lock())
    }

    /// Runs `f` with exclusive access to the collection.
    pub fn write<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut C) -> T,
    {
        f(&mut self.inner.lock())
    }
}

impl<C: Collection> Shared<C> {
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.read(|c| c.len())
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.read(|c| c.is_empty())
    }

    /// Returns true if an element equal to `item` is present.
    pub fn contains(&self, item: &C::Item) -> bool {
        self.read(|c| c.contains(item))
    }
}

impl<C: CollectionMut> Shared<C> {
    /// Adds `item`. Returns true if the collection changed.
    pub fn add(&self, item: C::Item) -> Result<bool, CollectionError> {
        self.write(|c| c.add(item))
    }

    /// Removes the first element equal to `item`.
    pub fn remove(&self, item: &C::Item) -> Result<bool, CollectionError> {
        self.write(|c| c.remove(item))
    }
}

impl<C: DeepClone> Shared<C> {
    /// Returns a deep copy of the collection taken under the lock.
    pub fn snapshot(&self) -> C::Owned {
        self.read(|c| c.deep_clone())
    }
}

impl<C> Clone for Shared<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: fmt::Debug> fmt::Debug for Shared<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(collection) => {
                f.debug_tuple("Shared").field(&*collection).finish()
            }
            None => f.write_str("Shared(<locked>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitSet, FastMap, Index};
    use std::thread;

    #[test]
    fn concurrent_adds() {
        let shared = Shared::new(BitSet::new());
        thread::scope(|scope| {
            for worker in 0..4 {
                let shared = shared.clone();
                scope.spawn(move || {
                    for n in 0..100 {
                        let index = Index::new(worker * 100 + n);
                        shared.add(index).expect("bit set add succeeds");
                    }
                });
            }
        });
        assert_eq!(shared.len(), 400);
        assert!(shared.contains(&Index::new(399)));
        assert_eq!(shared.remove(&Index::new(399)), Ok(true));

        let snapshot = shared.snapshot();
        shared.write(|bits| bits.clear());
        assert_eq!(snapshot.cardinality(), 399);
        assert!(shared.is_empty());
    }

    #[test]
    fn maps_through_closures() {
        let shared = Shared::new(FastMap::new());
        shared.write(|map| map.insert("a", 1));
        assert_eq!(shared.read(|map| map.get(&"a").copied()), Some(1));
        assert_eq!(format!("{shared:?}"), r#"Shared({"a": 1})"#);
    }
}
