use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::TUNED_PARAMS;
use crate::metrics::{DepthTracker, Instrumented, Metrics};

use super::common;

/// Quicksort with three pivoting strategies and a plain baseline.
///
/// - [`QuickSort::sort`]: shuffle once, random pivot, recurse into the
///   smaller side and loop on the larger one (stack depth `O(log n)`).
/// - [`QuickSort::sort_3way`]: Dutch-flag partition, both sides recursed.
/// - [`QuickSort::sort_median_of_three`]: like `sort`, pivot is the median of
///   the first, middle and last slot, no shuffle.
/// - [`QuickSort::sort_basic`]: random pivot, both sides recursed, no cutoff.
#[derive(Debug)]
pub struct QuickSort {
    metrics: Metrics,
    depth: DepthTracker,
    rng: StdRng,
}

impl Default for QuickSort {
    fn default() -> Self {
        Self::new()
    }
}

impl QuickSort {
    pub const NAME: &'static str = "QuickSort";

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

    pub fn sort(&mut self, data: &mut [i64]) {
        self.metrics.begin_run(data.len(), &self.depth);
        if data.len() > 1 {
            common::shuffle(data, &mut self.rng);
            quick_sort_random(data, &mut self.rng, &mut self.metrics, &self.depth);
        }
        self.metrics.end_run(&self.depth);
    }

    pub fn sort_3way(&mut self, data: &mut [i64]) {
        self.metrics.begin_run(data.len(), &self.depth);
        quick_sort_3way(data, &mut self.metrics, &self.depth);
        self.metrics.end_run(&self.depth);
    }

    pub fn sort_median_of_three(&mut self, data: &mut [i64]) {
        self.metrics.begin_run(data.len(), &self.depth);
        quick_sort_median3(data, &mut self.metrics, &self.depth);
        self.metrics.end_run(&self.depth);
    }

    pub fn sort_basic(&mut self, data: &mut [i64]) {
        self.metrics.begin_run(data.len(), &self.depth);
        quick_sort_basic(data, &mut self.rng, &mut self.metrics, &self.depth);
        self.metrics.end_run(&self.depth);
    }
}

impl Instrumented for QuickSort {
    fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn depth(&self) -> &DepthTracker {
        &self.depth
    }
}

fn quick_sort_random(
    mut data: &mut [i64],
    rng: &mut StdRng,
    metrics: &mut Metrics,
    depth: &DepthTracker,
) {
    while data.len() > 1 {
        let _frame = depth.enter();

        if data.len() <= TUNED_PARAMS.insertion_threshold {
            common::insertion_sort(data, metrics);
            return;
        }

        let pivot_index = rng.random_range(0..data.len());
        let split = common::partition(data, pivot_index, metrics);

        let (left, rest) = data.split_at_mut(split);
        let right = &mut rest[1..];
        if left.len() < right.len() {
            quick_sort_random(left, rng, metrics, depth);
            data = right;
        } else {
            quick_sort_random(right, rng, metrics, depth);
            data = left;
        }
    }
}

fn quick_sort_3way(data: &mut [i64], metrics: &mut Metrics, depth: &DepthTracker) {
    if data.len() < 2 {
        return;
    }
    let _frame = depth.enter();

    if data.len() <= TUNED_PARAMS.insertion_threshold {
        common::insertion_sort(data, metrics);
        return;
    }

    let (lt, gt) = common::partition_3way(data, metrics);
    let (left, rest) = data.split_at_mut(lt);
    let right = &mut rest[gt - lt + 1..];
    quick_sort_3way(left, metrics, depth);
    quick_sort_3way(right, metrics, depth);
}

fn quick_sort_median3(mut data: &mut [i64], metrics: &mut Metrics, depth: &DepthTracker) {
    while data.len() > 1 {
        let _frame = depth.enter();

        if data.len() <= TUNED_PARAMS.insertion_threshold {
            common::insertion_sort(data, metrics);
            return;
        }

        let pivot_index = median_of_three(data, metrics);
        let split = common::partition(data, pivot_index, metrics);

        let (left, rest) = data.split_at_mut(split);
        let right = &mut rest[1..];
        if left.len() < right.len() {
            quick_sort_median3(left, metrics, depth);
            data = right;
        } else {
            quick_sort_median3(right, metrics, depth);
            data = left;
        }
    }
}

fn quick_sort_basic(data: &mut [i64], rng: &mut StdRng, metrics: &mut Metrics, depth: &DepthTracker) {
    if data.len() < 2 {
        return;
    }
    let _frame = depth.enter();

    let pivot_index = rng.random_range(0..data.len());
    let split = common::partition(data, pivot_index, metrics);
    let (left, rest) = data.split_at_mut(split);
    quick_sort_basic(left, rng, metrics, depth);
    quick_sort_basic(&mut rest[1..], rng, metrics, depth);
}

/// Orders the first, middle and last slots in place and returns the middle
/// index, which now holds their median.
fn median_of_three(data: &mut [i64], metrics: &mut Metrics) -> usize {
    let high = data.len() - 1;
    let mid = high / 2;

    metrics.inc_comparisons();
    if data[0] > data[mid] {
        common::swap(data, 0, mid, metrics);
    }
    metrics.inc_comparisons();
    if data[0] > data[high] {
        common::swap(data, 0, high, metrics);
    }
    metrics.inc_comparisons();
    if data[mid] > data[high] {
        common::swap(data, mid, high, metrics);
    }

    mid
}
