// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-place partition sort.

use core::cmp::Ordering;

/// Sorts `slice` in place with a two-pointer partition sort.
///
/// The pivot is the middle element. Recursion always descends into the
/// smaller side and loops on the larger one, so stack depth stays
/// logarithmic. Average cost is O(n log n); adversarial inputs can reach
/// O(n²). The sort is not stable.
///
/// ```
/// use fastcoll::sort::quick_sort_by;
///
/// let mut values = [5, 3, 9, 1, 3];
/// quick_sort_by(&mut values, |a, b| a.cmp(b));
/// assert_eq!(values, [1, 3, 3, 5, 9]);
/// ```
pub fn quick_sort_by<T, F>(slice: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_range(slice, &mut compare);
}

fn sort_range<T, F>(mut slice: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    while slice.len() > 1 {
        let split = partition(slice, compare);
        let (left, right) = slice.split_at_mut(split);
        if left.len() < right.len() {
            sort_range(left, compare);
            slice = right;
        } else {
            sort_range(right, compare);
            slice = left;
        }
    }
}

// Hoare partition around the middle element. Returns `split` such that every
// element of `slice[..split]` is <= every element of `slice[split..]`, with
// both halves non-empty.
fn partition<T, F>(slice: &mut [T], compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let last = slice.len() - 1;
    // Keep the pivot in the last slot so it has a stable position while
    // elements move around it.
    slice.swap(slice.len() / 2, last);
    let mut i = 0;
    let mut j = last;
    loop {
        while i < last && compare(&slice[i], &slice[last]) == Ordering::Less {
            i += 1;
        }
        while j > 0 && compare(&slice[j - 1], &slice[last]) == Ordering::Greater
        {
            j -= 1;
        }
        if i + 1 >= j {
            break;
        }
        slice.swap(i, j - 1);
        i += 1;
        j -= 1;
    }
    slice.swap(i, last);
    if i == 0 {
        1
    } else {
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[test]
    fn small_inputs() {
        let mut empty: [u8; 0] = [];
        quick_sort_by(&mut empty, |a, b| a.cmp(b));

        let mut one = [1];
        quick_sort_by(&mut one, |a, b| a.cmp(b));
        assert_eq!(one, [1]);

        let mut two = [2, 1];
        quick_sort_by(&mut two, |a, b| a.cmp(b));
        assert_eq!(two, [1, 2]);

        let mut same = [7; 9];
        quick_sort_by(&mut same, |a, b| a.cmp(b));
        assert_eq!(same, [7; 9]);
    }

    #[test]
    fn descending_comparator() {
        let mut values = vec![3, 1, 4, 1, 5, 9, 2, 6];
        quick_sort_by(&mut values, |a, b| b.cmp(a));
        assert_eq!(values, vec![9, 6, 5, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn inconsistent_comparator_stays_in_bounds() {
        let mut values: Vec<u32> = (0..40).rev().collect();
        quick_sort_by(&mut values, |_, _| Ordering::Less);
        values.sort();
        assert_eq!(values, (0..40).collect::<Vec<_>>(), "a permutation");

        let mut values: Vec<u32> = (0..40).collect();
        quick_sort_by(&mut values, |_, _| Ordering::Greater);
        assert_eq!(values.len(), 40);
    }

    #[proptest]
    fn proptest_matches_std_sort(values: Vec<i16>) {
        let mut values = values;
        let mut expected = values.clone();
        expected.sort();
        quick_sort_by(&mut values, |a, b| a.cmp(b));
        assert_eq!(values, expected);
    }
}
