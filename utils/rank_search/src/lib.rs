#![no_std]

//! Rank queries over sorted slices.
//!
//! A search returns `Ok(index)` when an element equal to the target exists and
//! `Err(index)` with the insertion point otherwise. Either way the index is the
//! *rank* of the target: the number of elements strictly less than it. The
//! helpers in this crate turn that result into rank, floor and ceiling
//! positions.
#![deny(missing_docs)]

use core::borrow::Borrow;
use core::cmp::Ordering;

/// Returns the number of elements strictly less than the search target.
///
/// # Example
/// ```
/// use rank_search::*;
///
/// let array = [1, 3, 5, 7];
///
/// assert_eq!(rank(BinarySearch::search(&array[..], &5)), 2);
/// assert_eq!(rank(BinarySearch::search(&array[..], &6)), 3);
/// assert_eq!(rank(BinarySearch::search(&array[..], &9)), 4);
/// ```
#[inline(always)]
pub fn rank(search: Result<usize, usize>) -> usize {
    match search {
        Ok(index) | Err(index) => index,
    }
}

/// Returns the index of the largest element less than or equal to the search
/// target.
///
/// # Example
/// ```
/// use rank_search::*;
///
/// let array = [0, 1, 2, 3, 4, 6];
///
/// assert_eq!(floor_index(BinarySearch::search(&array[..], &5)), Some(4));
/// assert_eq!(floor_index(BinarySearch::search(&array[..], &-1)), None);
/// ```
#[inline(always)]
pub fn floor_index(search: Result<usize, usize>) -> Option<usize> {
    match search {
        Ok(index) => Some(index),
        Err(0) => None,
        Err(index) => Some(index - 1),
    }
}

/// Returns the index of the smallest element greater than or equal to the
/// search target, given the length `len` of the searched slice.
///
/// # Example
/// ```
/// use rank_search::*;
///
/// let array = [0, 1, 2, 3, 4, 6];
///
/// assert_eq!(ceiling_index(BinarySearch::search(&array[..], &5), 6), Some(5));
/// assert_eq!(ceiling_index(BinarySearch::search(&array[..], &10), 6), None);
/// ```
#[inline(always)]
pub fn ceiling_index(search: Result<usize, usize>, len: usize) -> Option<usize> {
    let index = rank(search);
    if index < len {
        Some(index)
    } else {
        None
    }
}

/// An algorithm for searching a sorted slice, e.g. Binary or Linear
pub trait Search {
    /// Search a sorted slice of `T` for a value of `T`.
    ///
    /// ```
    /// use rank_search::*;
    ///
    /// let slice = [1, 2, 3, 5, 8];
    /// assert_eq!(BinarySearch::search(&slice, &3), Ok(2));
    /// assert_eq!(BinarySearch::search(&slice, &6), Err(4));
    /// ```
    fn search<T: Ord>(slice: &[T], x: &T) -> Result<usize, usize> {
        Self::search_by_key(slice, x)
    }

    /// Search a sorted slice of `T`, where `T: Borrow<K>`, comparing the
    /// borrowed keys against `x`.
    fn search_by_key<K: Ord + ?Sized, T: Borrow<K>>(slice: &[T], x: &K) -> Result<usize, usize> {
        Self::search_by(slice, |y| <T as Borrow<K>>::borrow(y).cmp(x))
    }

    /// Search a sorted slice with a comparator that orders each element
    /// relative to the target: `Less` if the element sorts before it.
    ///
    /// The slice must be sorted consistently with `f`, and must not contain
    /// two elements comparing `Equal`.
    fn search_by<T, F>(slice: &[T], f: F) -> Result<usize, usize>
    where
        F: FnMut(&T) -> Ordering;
}

/// Classic halving search over `[lo, hi)`, with computational complexity
/// `O(log n)`
pub struct BinarySearch;

impl Search for BinarySearch {
    fn search_by<T, F>(slice: &[T], mut f: F) -> Result<usize, usize>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut lo = 0;
        let mut hi = slice.len();

        while lo < hi {
            let mid = lo + (hi - lo) / 2;

            match f(&slice[mid]) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(mid),
            }
        }

        Err(lo)
    }
}

/// Performs a simple linear search on a slice, with computational complexity `O(n)`
pub struct LinearSearch;

impl Search for LinearSearch {
    fn search_by<T, F>(slice: &[T], mut f: F) -> Result<usize, usize>
    where
        F: FnMut(&T) -> Ordering,
    {
        for (index, y) in slice.iter().enumerate() {
            match f(y) {
                Ordering::Less => continue,
                Ordering::Equal => return Ok(index),
                Ordering::Greater => return Err(index),
            }
        }

        Err(slice.len())
    }
}
