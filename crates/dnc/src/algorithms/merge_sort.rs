use log::trace;

use crate::TUNED_PARAMS;
use crate::metrics::{DepthTracker, Instrumented, Metrics};

use super::common;

/// Top-down stable merge sort with one scratch buffer per run.
#[derive(Debug)]
pub struct MergeSort {
    metrics: Metrics,
    depth: DepthTracker,
}

impl Default for MergeSort {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeSort {
    pub const NAME: &'static str = "MergeSort";

    pub fn new() -> Self {
        Self {
            metrics: Metrics::new(Self::NAME),
            depth: DepthTracker::new(),
        }
    }

    pub fn sort<T: Copy + PartialOrd>(&mut self, data: &mut [T]) {
        let len = data.len();
        self.metrics.begin_run(len, &self.depth);
        if len > 1 {
            // The scratch buffer lives for this call only and is lent to every
            // level of the recursion.
            let mut aux = data.to_vec();
            self.metrics.add_allocations(len);
            trace!("merge sort scratch buffer: {len} slots");
            merge_sort_recursive(data, &mut aux, &mut self.metrics, &self.depth);
        }
        self.metrics.end_run(&self.depth);
    }

    /// Same recursion without the shared buffer: every merge allocates its
    /// own halves and there is no insertion-sort cutoff.
    pub fn sort_without_buffer_reuse<T: Copy + PartialOrd>(&mut self, data: &mut [T]) {
        self.metrics.begin_run(data.len(), &self.depth);
        if data.len() > 1 {
            merge_sort_no_reuse(data, &mut self.metrics, &self.depth);
        }
        self.metrics.end_run(&self.depth);
    }
}

impl Instrumented for MergeSort {
    fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn depth(&self) -> &DepthTracker {
        &self.depth
    }
}

fn merge_sort_recursive<T: Copy + PartialOrd>(
    data: &mut [T],
    aux: &mut [T],
    metrics: &mut Metrics,
    depth: &DepthTracker,
) {
    let _frame = depth.enter();

    let len = data.len();
    if len <= TUNED_PARAMS.insertion_threshold {
        common::insertion_sort(data, metrics);
        return;
    }

    // The left run takes the extra element of an odd range.
    let mid = len.div_ceil(2);
    {
        let (left, right) = data.split_at_mut(mid);
        let (aux_left, aux_right) = aux.split_at_mut(mid);
        merge_sort_recursive(left, aux_left, metrics, depth);
        merge_sort_recursive(right, aux_right, metrics, depth);
    }

    aux.copy_from_slice(data);
    let (left, right) = aux.split_at(mid);
    merge_into(data, left, right, metrics);
}

/// Merges two sorted runs into `dst`. Ties take the left run first.
fn merge_into<T: Copy + PartialOrd>(dst: &mut [T], left: &[T], right: &[T], metrics: &mut Metrics) {
    debug_assert_eq!(dst.len(), left.len() + right.len());

    let mut i = 0usize;
    let mut j = 0usize;
    let mut k = 0usize;

    while i < left.len() && j < right.len() {
        metrics.inc_comparisons();
        if left[i] <= right[j] {
            dst[k] = left[i];
            i += 1;
        } else {
            dst[k] = right[j];
            j += 1;
        }
        k += 1;
    }

    let rest = left.len() - i;
    dst[k..k + rest].copy_from_slice(&left[i..]);
    dst[k + rest..].copy_from_slice(&right[j..]);
}

fn merge_sort_no_reuse<T: Copy + PartialOrd>(
    data: &mut [T],
    metrics: &mut Metrics,
    depth: &DepthTracker,
) {
    let _frame = depth.enter();

    if data.len() < 2 {
        return;
    }

    let mid = data.len().div_ceil(2);
    {
        let (left, right) = data.split_at_mut(mid);
        merge_sort_no_reuse(left, metrics, depth);
        merge_sort_no_reuse(right, metrics, depth);
    }

    let left = data[..mid].to_vec();
    let right = data[mid..].to_vec();
    metrics.add_allocations(left.len() + right.len());
    merge_into(data, &left, &right, metrics);
}
