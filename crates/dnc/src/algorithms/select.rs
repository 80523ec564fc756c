use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::metrics::{DepthTracker, Instrumented, Metrics};
use crate::{Error, Result, TUNED_PARAMS};

use super::common;

const GROUP_SIZE: usize = TUNED_PARAMS.select_group_size;

/// Order statistics by median-of-medians (worst-case linear) and by a
/// shuffled quickselect baseline.
///
/// Both entry points work on a private copy; the caller's slice is never
/// reordered. `k` is zero based.
#[derive(Debug)]
pub struct DeterministicSelect {
    metrics: Metrics,
    depth: DepthTracker,
    rng: StdRng,
}

impl Default for DeterministicSelect {
    fn default() -> Self {
        Self::new()
    }
}

impl DeterministicSelect {
    pub const NAME: &'static str = "DeterministicSelect";

    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            metrics: Metrics::new(Self::NAME),
            depth: DepthTracker::new(),
            rng,
        }
    }

    pub fn select(&mut self, data: &[i64], k: usize) -> Result<i64> {
        check_rank(data, k)?;

        self.metrics.begin_run(data.len(), &self.depth);
        let mut work = data.to_vec();
        self.metrics.add_allocations(work.len());
        let value = select_recursive(&mut work, k, &mut self.metrics, &self.depth);
        self.metrics.end_run(&self.depth);
        Ok(value)
    }

    pub fn quick_select(&mut self, data: &[i64], k: usize) -> Result<i64> {
        check_rank(data, k)?;

        self.metrics.begin_run(data.len(), &self.depth);
        let mut work = data.to_vec();
        self.metrics.add_allocations(work.len());
        common::shuffle(&mut work, &mut self.rng);
        let value = quick_select_recursive(&mut work, k, &mut self.metrics, &self.depth);
        self.metrics.end_run(&self.depth);
        Ok(value)
    }

    /// Upper median: `select(data, len / 2)`.
    pub fn find_median(&mut self, data: &[i64]) -> Result<i64> {
        self.select(data, data.len() / 2)
    }
}

impl Instrumented for DeterministicSelect {
    fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn depth(&self) -> &DepthTracker {
        &self.depth
    }
}

fn check_rank(data: &[i64], k: usize) -> Result<()> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if k >= data.len() {
        return Err(Error::IndexOutOfRange { k, len: data.len() });
    }
    Ok(())
}

/// k-th smallest of `data`, `k` relative to the slice.
fn select_recursive(data: &mut [i64], k: usize, metrics: &mut Metrics, depth: &DepthTracker) -> i64 {
    let _frame = depth.enter();

    if data.len() == 1 {
        return data[0];
    }

    let pivot_index = median_of_medians(data, metrics, depth);
    let split = common::partition(data, pivot_index, metrics);
    let band_end = common::gather_equal(data, split, metrics);

    if k < split {
        select_recursive(&mut data[..split], k, metrics, depth)
    } else if k <= band_end {
        data[split]
    } else {
        select_recursive(&mut data[band_end + 1..], k - band_end - 1, metrics, depth)
    }
}

/// Index of a pivot guaranteed to have at least ~30% of the slice on
/// each side.
///
/// Group medians are gathered into the prefix of `data`; the median of that
/// prefix is found by a nested `select_recursive` on a copy, which shares the
/// caller's depth tracker.
fn median_of_medians(data: &mut [i64], metrics: &mut Metrics, depth: &DepthTracker) -> usize {
    let n = data.len();
    if n <= GROUP_SIZE {
        return group_median_index(data, metrics);
    }

    let groups = n.div_ceil(GROUP_SIZE);
    let mut medians = Vec::with_capacity(groups);
    metrics.add_allocations(groups);

    for g in 0..groups {
        let start = g * GROUP_SIZE;
        let end = (start + GROUP_SIZE).min(n);
        let median = start + group_median_index(&data[start..end], metrics);
        medians.push(data[median]);
        common::swap(data, g, median, metrics);
    }

    if groups == 1 {
        return 0;
    }

    let pivot = select_recursive(&mut medians, groups / 2, metrics, depth);
    data[..groups].iter().position(|&v| v == pivot).unwrap_or(0)
}

/// Median position of at most `GROUP_SIZE` values, ties kept in slot order.
fn group_median_index(group: &[i64], metrics: &mut Metrics) -> usize {
    debug_assert!(!group.is_empty() && group.len() <= GROUP_SIZE);

    let mut order = [0usize; GROUP_SIZE];
    let order = &mut order[..group.len()];
    for (i, slot) in order.iter_mut().enumerate() {
        *slot = i;
    }

    for i in 1..order.len() {
        let mut j = i;
        while j > 0 {
            metrics.inc_comparisons();
            if group[order[j]] < group[order[j - 1]] {
                order.swap(j, j - 1);
                j -= 1;
            } else {
                break;
            }
        }
    }

    order[order.len() / 2]
}

/// Shuffled input makes the leftmost slot a uniformly random pivot.
fn quick_select_recursive(
    data: &mut [i64],
    k: usize,
    metrics: &mut Metrics,
    depth: &DepthTracker,
) -> i64 {
    let _frame = depth.enter();

    if data.len() == 1 {
        return data[0];
    }

    let split = common::partition(data, 0, metrics);
    let band_end = common::gather_equal(data, split, metrics);

    if k < split {
        quick_select_recursive(&mut data[..split], k, metrics, depth)
    } else if k <= band_end {
        data[split]
    } else {
        quick_select_recursive(&mut data[band_end + 1..], k - band_end - 1, metrics, depth)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::algorithms::common::floor_log2;

    #[test]
    fn scenarios() {
        let mut select = DeterministicSelect::with_seed(3);
        let data = [3_i64, 1, 4, 1, 5, 9, 2, 6];
        assert_eq!(select.select(&data, 0).unwrap(), 1);
        assert_eq!(select.select(&data, 7).unwrap(), 9);
        assert_eq!(select.quick_select(&data, 7).unwrap(), 9);
        assert_eq!(select.find_median(&data).unwrap(), 4);
        assert_eq!(data, [3, 1, 4, 1, 5, 9, 2, 6]);
    }

    #[test]
    fn rejects_invalid_rank_before_counting() {
        let mut select = DeterministicSelect::with_seed(3);
        select.select(&[5, 4, 3], 1).unwrap();
        let before = select.metrics().comparisons();

        assert!(matches!(select.select(&[], 0), Err(Error::EmptyInput)));
        assert!(matches!(select.quick_select(&[], 0), Err(Error::EmptyInput)));
        assert!(matches!(select.find_median(&[]), Err(Error::EmptyInput)));
        assert!(matches!(
            select.select(&[1, 2, 3], 3),
            Err(Error::IndexOutOfRange { k: 3, len: 3 })
        ));
        assert_eq!(select.metrics().comparisons(), before);
        assert_eq!(select.metrics().input_size(), 3);
    }

    #[test]
    fn matches_sorted_copy_for_every_rank() {
        let mut select = DeterministicSelect::with_seed(0x5E1E_C700);
        let mut rng = StdRng::seed_from_u64(0x5E1E_C701);
        for &n in &[1_usize, 2, 5, 6, 13, 25, 26, 127, 300] {
            let data = (0..n).map(|_| rng.random_range(0..(n as i64) * 2)).collect::<Vec<_>>();
            let mut sorted = data.clone();
            sorted.sort_unstable();
            for k in 0..n {
                assert_eq!(select.select(&data, k).unwrap(), sorted[k], "n={n} k={k}");
                assert_eq!(select.quick_select(&data, k).unwrap(), sorted[k], "n={n} k={k}");
            }
        }
    }

    #[test]
    fn random_trials_agree_with_quick_select() {
        let mut select = DeterministicSelect::with_seed(0xA9EE);
        let mut rng = StdRng::seed_from_u64(0xA9EF);
        for _ in 0..100 {
            let n = rng.random_range(10..1000);
            let data = (0..n).map(|_| rng.random_range(0..10 * n as i64)).collect::<Vec<_>>();
            let k = rng.random_range(0..n);
            let deterministic = select.select(&data, k).unwrap();
            let randomized = select.quick_select(&data, k).unwrap();
            let mut sorted = data.clone();
            sorted.sort_unstable();
            assert_eq!(deterministic, sorted[k]);
            assert_eq!(randomized, deterministic);
        }
    }

    #[test]
    fn duplicates_and_sorted_inputs() {
        let mut select = DeterministicSelect::with_seed(9);
        let constant = vec![7_i64; 1000];
        for k in [0, 499, 999] {
            assert_eq!(select.select(&constant, k).unwrap(), 7);
        }

        let ascending = (0..5000_i64).collect::<Vec<_>>();
        let descending = ascending.iter().rev().copied().collect::<Vec<_>>();
        for k in [0, 1, 2500, 4999] {
            assert_eq!(select.select(&ascending, k).unwrap(), k as i64);
            assert_eq!(select.select(&descending, k).unwrap(), k as i64);
        }
    }

    #[test]
    fn equal_keys_end_the_recursion() {
        let mut select = DeterministicSelect::with_seed(21);
        let n = 100_000;
        let bound = floor_log2(n) + 2;

        let constant = vec![7_i64; n];
        for k in [0, n / 2, n - 1] {
            assert_eq!(select.select(&constant, k).unwrap(), 7);
            assert!(select.metrics().max_depth() <= bound, "k={k}");
            assert!(select.metrics().comparisons() <= 10 * n as u64, "k={k}");

            assert_eq!(select.quick_select(&constant, k).unwrap(), 7);
            assert_eq!(select.metrics().max_depth(), 1);
            assert!(select.metrics().comparisons() <= 2 * n as u64, "k={k}");
        }

        let alternating = (0..n as i64).map(|i| i % 2).collect::<Vec<_>>();
        for k in [0, n / 2 - 1, n / 2, n - 1] {
            let expected = (k >= n / 2) as i64;
            assert_eq!(select.select(&alternating, k).unwrap(), expected, "k={k}");
            assert!(select.metrics().max_depth() <= bound, "k={k}");
            assert!(select.metrics().comparisons() <= 10 * n as u64, "k={k}");

            assert_eq!(select.quick_select(&alternating, k).unwrap(), expected, "k={k}");
            assert!(select.metrics().max_depth() <= 2, "k={k}");
            assert!(select.metrics().comparisons() <= 4 * n as u64, "k={k}");
        }
    }

    #[test]
    fn median_of_medians_depth_stays_small() {
        let mut select = DeterministicSelect::with_seed(11);
        let mut rng = StdRng::seed_from_u64(12);
        let n = 1 << 16;
        let data = (0..n).map(|_| rng.random::<i64>()).collect::<Vec<_>>();
        select.select(&data, n / 2).unwrap();
        let depth = select.metrics().max_depth();
        assert!(depth > 1);
        assert!(depth <= 4 * 16, "depth={depth}");
        assert_eq!(select.depth().current(), 0);
        // The working copy plus one medians array per level.
        assert!(select.metrics().allocations() > n as u64);
    }

    #[test]
    fn group_median_breaks_ties_by_position() {
        let mut metrics = Metrics::new("test");
        assert_eq!(group_median_index(&[4, 2, 4, 2, 4], &mut metrics), 0);
        assert_eq!(group_median_index(&[9], &mut metrics), 0);
        assert_eq!(group_median_index(&[3, 1], &mut metrics), 0);
        assert_eq!(group_median_index(&[5, 1, 3], &mut metrics), 2);
    }
}
