//! An ordered symbol table stored as one [`DynamicArray`] of entries kept
//! sorted by key.
//!
//! Every mutation computes the rank of the key with a binary search and then
//! issues a single insert or remove on the backing array at that position.
//! Ordered queries (`floor`, `ceiling`, `select`, range counts and range key
//! listings) are all expressed through the same rank primitive.

mod entry;

#[cfg(feature = "serde")]
mod serde;

use core::borrow::Borrow;
use core::fmt::Debug;
use core::ops::Range;

pub use dynamic_array::Error;
pub use entry::Entry;

use dynamic_array::DynamicArray;
use rank_search::*;

/// Result type for the fallible map operations
pub type Result<T> = dynamic_array::Result<T>;

/// `OrderedMap` maps unique keys to values, keeping the keys in strictly
/// ascending order.
#[derive(Clone, PartialEq, Eq)]
pub struct OrderedMap<K, V> {
    entries: DynamicArray<Entry<K, V>>,
}

impl<K, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: DynamicArray::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DynamicArray::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entry slots in the backing array
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Borrow a slice view of the entries in ascending key order
    pub fn entries(&self) -> &[Entry<K, V>] {
        self.entries.as_slice()
    }

    /// Smallest key. Fails with [`Error::EmptyCollection`] on an empty map.
    pub fn min(&self) -> Result<&K> {
        self.entries
            .first()
            .map(Entry::key)
            .ok_or(Error::EmptyCollection)
    }

    /// Largest key. Fails with [`Error::EmptyCollection`] on an empty map.
    pub fn max(&self) -> Result<&K> {
        self.entries
            .last()
            .map(Entry::key)
            .ok_or(Error::EmptyCollection)
    }

    /// Key at ascending position `k`. Fails with [`Error::IndexOutOfRange`]
    /// unless `k < len`.
    pub fn select(&self, k: usize) -> Result<&K> {
        self.entries.get(k).map(Entry::key)
    }

    /// Removes the entry with the smallest key
    pub fn delete_min(&mut self) -> Result<(K, V)> {
        if self.is_empty() {
            return Err(Error::EmptyCollection);
        }

        self.entries.remove(0).map(Entry::into_pair)
    }

    /// Removes the entry with the largest key
    pub fn delete_max(&mut self) -> Result<(K, V)> {
        if self.is_empty() {
            return Err(Error::EmptyCollection);
        }

        self.entries
            .remove(self.entries.len() - 1)
            .map(Entry::into_pair)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over `(key, value)` pairs in ascending key order.
    ///
    /// The iterator borrows the map, so the map cannot be mutated until the
    /// iterator is dropped.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterates over the keys in ascending order
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.entries.iter(),
        }
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.entries.iter().map(Entry::value)
    }

    /// Owned copies of every key in ascending order, built as the key range
    /// `[min, max]`. An empty map yields an empty vector.
    pub fn all_keys(&self) -> Vec<K>
    where
        K: Ord + Clone,
    {
        match (self.min(), self.max()) {
            (Ok(lo), Ok(hi)) => self.range_keys(lo, hi),
            _ => Vec::new(),
        }
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    fn search<Q>(&self, key: &Q) -> core::result::Result<usize, usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        BinarySearch::search_by(self.entries(), |entry| {
            <K as Borrow<Q>>::borrow(entry.key()).cmp(key)
        })
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// already present. Re-putting a key leaves the length unchanged.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            Ok(index) => Some(self.entries.as_mut_slice()[index].replace_value(value)),
            Err(index) => {
                if let Err(err) = self.entries.insert(index, Entry::new(key, value)) {
                    unreachable!("rank escaped the entry array: {err}");
                }
                self.debug_assert_ordered_at(index);
                None
            }
        }
    }

    /// Nullable form of [`OrderedMap::put`]: an absent key fails with
    /// [`Error::InvalidArgument`], and an absent value deletes the key.
    pub fn put_optional(&mut self, key: Option<K>, value: Option<V>) -> Result<Option<V>> {
        let key = key.ok_or(Error::InvalidArgument("key must be present"))?;

        Ok(match value {
            Some(value) => self.put(key, value),
            None => self.delete(&key),
        })
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.search(key).ok()?;
        Some(self.entries()[index].value())
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.search(key).ok()?;
        Some(self.entries.as_mut_slice()[index].value_mut())
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_ok()
    }

    /// Removes a key, returning its value. Absent keys are a no-op.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.search(key).ok()?;

        let entry = match self.entries.remove(index) {
            Ok(entry) => entry,
            Err(err) => unreachable!("found key outside the entry array: {err}"),
        };
        self.debug_assert_ordered_at(index.saturating_sub(1));

        Some(entry.into_pair().1)
    }

    /// Number of stored keys strictly less than `key`. If `key` is present
    /// this is its index.
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        rank(self.search(key))
    }

    /// Largest stored key less than or equal to `key`
    pub fn floor<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        floor_index(self.search(key)).map(|index| self.entries()[index].key())
    }

    /// Smallest stored key greater than or equal to `key`
    pub fn ceiling<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        ceiling_index(self.search(key), self.len()).map(|index| self.entries()[index].key())
    }

    /// Number of keys in the closed range `[lo, hi]`; zero when `lo > hi`.
    pub fn range_len<Q>(&self, lo: &Q, hi: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.range_indices(lo, hi).len()
    }

    /// Owned copies of the keys in `[lo, hi]`, ascending
    pub fn range_keys<Q>(&self, lo: &Q, hi: &Q) -> Vec<K>
    where
        K: Borrow<Q> + Clone,
        Q: Ord + ?Sized,
    {
        self.entries()[self.range_indices(lo, hi)]
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Borrowing iterator over the entries with keys in `[lo, hi]`
    pub fn range<Q>(&self, lo: &Q, hi: &Q) -> Iter<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Iter {
            inner: self.entries()[self.range_indices(lo, hi)].iter(),
        }
    }

    fn range_indices<Q>(&self, lo: &Q, hi: &Q) -> Range<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if lo > hi {
            return 0..0;
        }

        let start = self.rank(lo);
        let end = match self.search(hi) {
            Ok(index) => index + 1,
            Err(index) => index,
        };

        start..end
    }

    fn debug_assert_ordered_at(&self, index: usize) {
        let entries = self.entries();

        for pair in index.saturating_sub(1)..=index {
            if pair + 1 < entries.len() {
                debug_assert!(
                    entries[pair].key() < entries[pair + 1].key(),
                    "entries out of order at index {pair}"
                );
            }
        }
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug, V: Debug> Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of an [`OrderedMap`] in ascending key order
pub struct Iter<'a, K, V> {
    inner: core::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (entry.key(), entry.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|entry| (entry.key(), entry.value()))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over the keys of an [`OrderedMap`] in ascending order
pub struct Keys<'a, K, V> {
    inner: core::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Entry::key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Entry::key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
