pub mod closest_pair;
pub mod common;
pub mod merge_sort;
pub mod quick_sort;
pub mod select;
