use rand::Rng;

use crate::metrics::Metrics;

/// Exchanges two slots, counting one swap. Swapping a slot with itself is free.
#[inline]
pub fn swap<T>(data: &mut [T], i: usize, j: usize, metrics: &mut Metrics) {
    if i != j {
        metrics.inc_swaps();
        data.swap(i, j);
    }
}

/// Fisher-Yates, from the last slot down to slot 1. Not counted.
pub fn shuffle<T, R: Rng + ?Sized>(data: &mut [T], rng: &mut R) {
    for i in (1..data.len()).rev() {
        let j = rng.random_range(0..=i);
        data.swap(i, j);
    }
}

/// Lomuto partition of the whole slice around `data[pivot_index]`.
///
/// Returns the final position of the pivot: everything before it is strictly
/// smaller, everything after it is greater or equal.
pub fn partition(data: &mut [i64], pivot_index: usize, metrics: &mut Metrics) -> usize {
    debug_assert!(pivot_index < data.len());

    let high = data.len() - 1;
    let pivot = data[pivot_index];
    swap(data, pivot_index, high, metrics);

    let mut store = 0usize;
    for i in 0..high {
        metrics.inc_comparisons();
        if data[i] < pivot {
            swap(data, i, store, metrics);
            store += 1;
        }
    }

    swap(data, store, high, metrics);
    store
}

/// Moves every value equal to the pivot at `split` (as left by [`partition`])
/// right behind it and returns the inclusive end of that band.
pub fn gather_equal(data: &mut [i64], split: usize, metrics: &mut Metrics) -> usize {
    let pivot = data[split];
    let mut end = split;
    for i in split + 1..data.len() {
        metrics.inc_comparisons();
        if data[i] == pivot {
            end += 1;
            swap(data, i, end, metrics);
        }
    }
    end
}

/// Dutch national flag partition around `data[0]`.
///
/// Returns the inclusive bounds `(lt, gt)` of the band equal to the pivot.
pub fn partition_3way(data: &mut [i64], metrics: &mut Metrics) -> (usize, usize) {
    debug_assert!(!data.is_empty());

    let pivot = data[0];
    let mut lt = 0usize;
    let mut i = 0usize;
    let mut gt = data.len() - 1;

    // `data[lt]` always holds the pivot value, so `i > lt` once a swap to the
    // right happens and `gt` never underflows.
    while i <= gt {
        metrics.inc_comparisons();
        let v = data[i];
        if v < pivot {
            swap(data, i, lt, metrics);
            i += 1;
            lt += 1;
        } else if v > pivot {
            swap(data, i, gt, metrics);
            gt -= 1;
        } else {
            i += 1;
        }
    }

    (lt, gt)
}

/// Insertion sort counting every comparison, including the one that stops
/// the shift loop. Shifts are not swaps and are not counted.
pub fn insertion_sort<T: Copy + PartialOrd>(data: &mut [T], metrics: &mut Metrics) {
    for i in 1..data.len() {
        let key = data[i];
        let mut j = i;
        while j > 0 {
            metrics.inc_comparisons();
            let prev = data[j - 1];
            if prev <= key {
                break;
            }
            data[j] = prev;
            j -= 1;
        }
        data[j] = key;
    }
}

#[inline]
pub fn is_sorted_non_decreasing<T: PartialOrd>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

#[inline]
pub fn floor_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        usize::BITS as usize - 1 - n.leading_zeros() as usize
    }
}

#[inline]
pub fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        floor_log2(n - 1) + 1
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn swap_counts_only_real_exchanges() {
        let mut metrics = Metrics::new("test");
        let mut data = [1, 2, 3];
        swap(&mut data, 1, 1, &mut metrics);
        assert_eq!(metrics.swaps(), 0);
        swap(&mut data, 0, 2, &mut metrics);
        assert_eq!(data, [3, 2, 1]);
        assert_eq!(metrics.swaps(), 1);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        let mut data = (0..200).collect::<Vec<i64>>();
        shuffle(&mut data, &mut rng);
        assert_ne!(data, (0..200).collect::<Vec<i64>>());
        data.sort_unstable();
        assert_eq!(data, (0..200).collect::<Vec<i64>>());

        let mut single = [7];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, [7]);
    }

    #[test]
    fn partition_places_pivot() {
        let mut metrics = Metrics::new("test");
        let mut data = [9, 3, 7, 1, 5, 8, 2, 5];
        let p = partition(&mut data, 4, &mut metrics);
        assert_eq!(data[p], 5);
        assert!(data[..p].iter().all(|&v| v < 5));
        assert!(data[p + 1..].iter().all(|&v| v >= 5));
        assert_eq!(metrics.comparisons(), 7);
    }

    #[test]
    fn gather_equal_builds_band_after_pivot() {
        let mut metrics = Metrics::new("test");
        let mut data = [5, 2, 5, 9, 1, 5, 7];
        let split = partition(&mut data, 0, &mut metrics);
        assert_eq!(split, 2);

        metrics.reset();
        let end = gather_equal(&mut data, split, &mut metrics);
        assert_eq!(end, 4);
        assert!(data[..split].iter().all(|&v| v < 5));
        assert!(data[split..=end].iter().all(|&v| v == 5));
        assert!(data[end + 1..].iter().all(|&v| v > 5));
        assert_eq!(metrics.comparisons(), 4);

        let mut distinct = [1, 2, 3];
        assert_eq!(gather_equal(&mut distinct, 2, &mut metrics), 2);
    }

    #[test]
    fn partition_3way_bands() {
        let mut metrics = Metrics::new("test");
        let mut data = [4, 9, 4, 1, 4, 7, 0, 4, 3];
        let (lt, gt) = partition_3way(&mut data, &mut metrics);
        assert!(data[..lt].iter().all(|&v| v < 4));
        assert!(data[lt..=gt].iter().all(|&v| v == 4));
        assert!(data[gt + 1..].iter().all(|&v| v > 4));
        assert_eq!(gt - lt + 1, 4);

        let mut single = [5];
        assert_eq!(partition_3way(&mut single, &mut metrics), (0, 0));

        let mut all_greater = [1, 3, 2];
        assert_eq!(partition_3way(&mut all_greater, &mut metrics), (0, 0));
        assert_eq!(all_greater[0], 1);
    }

    #[test]
    fn insertion_sort_counts_terminating_comparison() {
        let mut metrics = Metrics::new("test");
        let mut sorted = [1, 2, 3, 4];
        insertion_sort(&mut sorted, &mut metrics);
        assert_eq!(metrics.comparisons(), 3);

        metrics.reset();
        let mut reversed = [4, 3, 2, 1];
        insertion_sort(&mut reversed, &mut metrics);
        assert_eq!(reversed, [1, 2, 3, 4]);
        assert_eq!(metrics.comparisons(), 6);
        assert_eq!(metrics.swaps(), 0);
    }

    #[test]
    fn log2_helpers() {
        assert_eq!(floor_log2(0), 0);
        assert_eq!(floor_log2(1), 0);
        assert_eq!(floor_log2(1024), 10);
        assert_eq!(floor_log2(1025), 10);
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(1024), 10);
        assert_eq!(ceil_log2(1025), 11);
    }

    #[test]
    fn sortedness_check() {
        assert!(is_sorted_non_decreasing::<i64>(&[]));
        assert!(is_sorted_non_decreasing(&[1, 1, 2]));
        assert!(!is_sorted_non_decreasing(&[2, 1]));
    }
}
