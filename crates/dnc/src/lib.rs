mod algorithms;
mod error;
pub mod metrics;

pub use algorithms::closest_pair::{ClosestPair, Point, PointPair};
pub use algorithms::common::{ceil_log2, floor_log2, is_sorted_non_decreasing};
pub use algorithms::merge_sort::MergeSort;
pub use algorithms::quick_sort::QuickSort;
pub use algorithms::select::DeterministicSelect;
pub use error::{Error, Result};
pub use metrics::{DepthGuard, DepthTracker, Instrumented, Metrics, RunHistory, RunRecord};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SortAlgorithm {
    MergeSort,
    MergeSortNoReuse,
    QuickSort,
    QuickSortBasic,
    QuickSort3Way,
    QuickSortMedian3,
}

pub const ALL_SORT_ALGORITHMS: [SortAlgorithm; 6] = [
    SortAlgorithm::MergeSort,
    SortAlgorithm::MergeSortNoReuse,
    SortAlgorithm::QuickSort,
    SortAlgorithm::QuickSortBasic,
    SortAlgorithm::QuickSort3Way,
    SortAlgorithm::QuickSortMedian3,
];

pub fn all_sort_algorithms() -> &'static [SortAlgorithm] {
    &ALL_SORT_ALGORITHMS
}

pub fn algorithm_name(algo: SortAlgorithm) -> &'static str {
    match algo {
        SortAlgorithm::MergeSort => "merge_sort",
        SortAlgorithm::MergeSortNoReuse => "merge_sort_no_reuse",
        SortAlgorithm::QuickSort => "quick_sort",
        SortAlgorithm::QuickSortBasic => "quick_sort_basic",
        SortAlgorithm::QuickSort3Way => "quick_sort_3way",
        SortAlgorithm::QuickSortMedian3 => "quick_sort_median3",
    }
}

/// Whether the variant promises `O(log n)` stack depth on every input.
pub fn has_depth_bound(algo: SortAlgorithm) -> bool {
    !matches!(
        algo,
        SortAlgorithm::QuickSortBasic | SortAlgorithm::QuickSort3Way
    )
}

#[derive(Clone, Copy, Debug)]
pub struct TunedParams {
    pub insertion_threshold: usize,
    pub select_group_size: usize,
    pub brute_force_cutoff: usize,
    pub strip_window: usize,
}

pub const TUNED_PARAMS: TunedParams = TunedParams {
    insertion_threshold: 10,
    select_group_size: 5,
    brute_force_cutoff: 3,
    strip_window: 7,
};

/// Sorts `data` with a fresh instance and returns its metrics.
pub fn sort_i64(algo: SortAlgorithm, data: &mut [i64]) -> Metrics {
    sort_i64_with(algo, data, &mut MergeSort::new(), &mut QuickSort::new())
}

/// Like [`sort_i64`], reusing caller-owned instances.
pub fn sort_i64_with(
    algo: SortAlgorithm,
    data: &mut [i64],
    merge: &mut MergeSort,
    quick: &mut QuickSort,
) -> Metrics {
    match algo {
        SortAlgorithm::MergeSort => {
            merge.sort(data);
            merge.metrics().clone()
        }
        SortAlgorithm::MergeSortNoReuse => {
            merge.sort_without_buffer_reuse(data);
            merge.metrics().clone()
        }
        SortAlgorithm::QuickSort => {
            quick.sort(data);
            quick.metrics().clone()
        }
        SortAlgorithm::QuickSortBasic => {
            quick.sort_basic(data);
            quick.metrics().clone()
        }
        SortAlgorithm::QuickSort3Way => {
            quick.sort_3way(data);
            quick.metrics().clone()
        }
        SortAlgorithm::QuickSortMedian3 => {
            quick.sort_median_of_three(data);
            quick.metrics().clone()
        }
    }
}
