//! A contiguous, index-addressable array that grows and shrinks with an
//! amortized policy and supports insertion and removal at arbitrary positions.
//!
//! Capacity doubles when a push or insert finds the buffer full (an empty
//! buffer grows to a single slot), and halves after a removal leaves the
//! array at or below a quarter of its capacity. Capacity never drops below
//! the number of live items.

mod error;

#[cfg(feature = "serde")]
mod serde;

use core::fmt::Debug;
use core::mem::MaybeUninit;
use core::ptr;

pub use error::{Error, Result};

/// `DynamicArray` owns a heap buffer of `capacity` slots, the first `len` of
/// which hold live items.
pub struct DynamicArray<T> {
    inner: Box<[MaybeUninit<T>]>,
    len: usize,
}

fn allocate<T>(capacity: usize) -> Box<[MaybeUninit<T>]> {
    (0..capacity).map(|_| MaybeUninit::uninit()).collect()
}

impl<T> DynamicArray<T> {
    /// Create an empty array without allocating any slots
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty array with room for `capacity` items
    pub fn with_capacity(capacity: usize) -> Self {
        DynamicArray {
            inner: allocate(capacity),
            len: 0,
        }
    }

    /// Appends an item after the last live slot.
    pub fn push(&mut self, item: T) {
        self.insert_unchecked(self.len, item);
    }

    /// Inserts an item before the first live slot, shifting everything one
    /// slot to the right.
    pub fn prepend(&mut self, item: T) {
        self.insert_unchecked(0, item);
    }

    /// Inserts an item at `index`, shifting the items at and after `index`
    /// one slot to the right.
    ///
    /// Fails with [`Error::IndexOutOfRange`] unless `index <= len`.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        if index > self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }

        self.insert_unchecked(index, item);
        Ok(())
    }

    /// Removes and returns the item at `index`, shifting the items after it
    /// one slot to the left. May shrink the buffer.
    ///
    /// Fails with [`Error::IndexOutOfRange`] unless `index < len`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;

        // SAFETY: `index < len`, so the slot is initialized. After reading it
        // the tail `[index + 1, len)` is moved down over the vacated slot.
        let item = unsafe {
            let base = self.inner.as_mut_ptr();
            let item = ptr::read(base.add(index)).assume_init();
            ptr::copy(base.add(index + 1), base.add(index), self.len - index - 1);
            item
        };

        self.len -= 1;
        self.shrink_if_sparse();

        Ok(item)
    }

    /// Removes the last item, if any
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            self.remove(self.len - 1).ok()
        }
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Overwrites the item at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        let slot = self.get_mut(index)?;
        Ok(core::mem::replace(slot, item))
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Drops every live item. The capacity is kept.
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;

        // SAFETY: the first `len` slots were initialized and `self.len` is
        // already zero, so nothing can observe them after they are dropped.
        unsafe {
            let live = ptr::slice_from_raw_parts_mut(self.inner.as_mut_ptr() as *mut T, len);
            ptr::drop_in_place(live);
        }
    }

    /// Reallocates the buffer so that `capacity == len`.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() != self.len {
            self.resize(self.len);
        }
    }

    /// Borrow a slice view into the live items
    pub fn as_slice(&self) -> &[T] {
        debug_assert!(self.len <= self.capacity());

        // SAFETY: the first `len` slots are initialized
        unsafe { &*(self.inner.get_unchecked(..self.len) as *const [MaybeUninit<T>] as *const [T]) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        debug_assert!(self.len <= self.capacity());

        // SAFETY: the first `len` slots are initialized
        unsafe {
            &mut *(self.inner.get_unchecked_mut(..self.len) as *mut [MaybeUninit<T>] as *mut [T])
        }
    }

    /// Iterates over the live items in index order. The array cannot be
    /// mutated while the iterator is alive.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn capacity(&self) -> usize {
        self.inner.len()
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }
}

impl<T> DynamicArray<T> {
    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Caller must ensure `index <= len`.
    fn insert_unchecked(&mut self, index: usize, item: T) {
        debug_assert!(index <= self.len);

        if self.is_full() {
            let capacity = match self.capacity() {
                0 => 1,
                capacity => capacity * 2,
            };
            self.resize(capacity);
        }

        // SAFETY: after growing, `len < capacity`, so shifting `[index, len)`
        // one slot to the right stays within the buffer.
        unsafe {
            let base = self.inner.as_mut_ptr();
            ptr::copy(base.add(index), base.add(index + 1), self.len - index);
            (*base.add(index)).write(item);
        }

        self.len += 1;
    }

    fn shrink_if_sparse(&mut self) {
        let capacity = self.capacity();
        if self.len > 0 && self.len <= capacity / 4 {
            self.resize(capacity / 2);
        }
    }

    fn resize(&mut self, capacity: usize) {
        assert!(
            capacity >= self.len,
            "resize to {capacity} would drop live items (len {})",
            self.len
        );

        log::trace!(
            "resizing dynamic array from {} to {} slots ({} live)",
            self.capacity(),
            capacity,
            self.len
        );

        let mut inner = allocate(capacity);

        // SAFETY: both buffers hold at least `len` slots. The old buffer is
        // dropped as plain `MaybeUninit` storage, so the moved items are not
        // dropped twice.
        unsafe {
            ptr::copy_nonoverlapping(self.inner.as_ptr(), inner.as_mut_ptr(), self.len);
        }

        self.inner = inner;
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        let mut array = Self::with_capacity(self.capacity());
        for item in self.iter() {
            array.push(item.clone());
        }
        array
    }
}

impl<T: Debug> Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
