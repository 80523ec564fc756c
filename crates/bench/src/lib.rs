use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "criterion")]
mod runtime;

#[cfg(feature = "criterion")]
pub use runtime::{
    apply_large_runtime_config, apply_medium_runtime_config, apply_runtime_for_size,
    apply_small_runtime_config,
};

const RNG_SEED: u64 = 0x5EED_2026;

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// Input shapes used by the benches and the `lab` driver.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Workload {
    Random,
    Sorted,
    ReverseSorted,
    ManyDuplicates,
}

pub const ALL_WORKLOADS: [Workload; 4] = [
    Workload::Random,
    Workload::Sorted,
    Workload::ReverseSorted,
    Workload::ManyDuplicates,
];

impl Workload {
    pub fn label(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Sorted => "sorted",
            Self::ReverseSorted => "reverse_sorted",
            Self::ManyDuplicates => "many_duplicates",
        }
    }

    pub fn generate<R: Rng + ?Sized>(self, size: usize, rng: &mut R) -> Vec<i64> {
        match self {
            Self::Random => random_array(size, rng),
            Self::Sorted => sorted_array(size),
            Self::ReverseSorted => reverse_sorted_array(size),
            Self::ManyDuplicates => array_with_duplicates(size, rng),
        }
    }
}

/// Values drawn from `[0, 10 * size)`.
pub fn random_array<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<i64> {
    let max = (size as i64).saturating_mul(10).max(1);
    (0..size).map(|_| rng.random_range(0..max)).collect()
}

pub fn sorted_array(size: usize) -> Vec<i64> {
    (0..size as i64).collect()
}

/// `size, size - 1, ..., 1`.
pub fn reverse_sorted_array(size: usize) -> Vec<i64> {
    (1..=size as i64).rev().collect()
}

/// About one distinct value per ten elements.
pub fn array_with_duplicates<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<i64> {
    let distinct = (size / 10).max(1) as i64;
    (0..size).map(|_| rng.random_range(0..distinct)).collect()
}

/// Uniform points in `[0, max_coord)^2`.
pub fn random_points<R: Rng + ?Sized>(size: usize, max_coord: f64, rng: &mut R) -> Vec<(f64, f64)> {
    (0..size)
        .map(|_| {
            (
                rng.random::<f64>() * max_coord,
                rng.random::<f64>() * max_coord,
            )
        })
        .collect()
}

/// Integer lattice `side x side`, row by row.
pub fn grid_points(side: usize) -> Vec<(f64, f64)> {
    (0..side)
        .flat_map(|i| (0..side).map(move |j| (i as f64, j as f64)))
        .collect()
}

/// Zero-based rank of the given percentile, clamped into the slice.
pub fn percentile_rank(size: usize, percentile: usize) -> usize {
    ((size * percentile) / 100).min(size.saturating_sub(1))
}
