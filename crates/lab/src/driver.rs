use std::path::PathBuf;

use dnc::{
    ClosestPair, DeterministicSelect, Instrumented, MergeSort, Point, QuickSort, RunHistory,
    floor_log2, is_sorted_non_decreasing,
};
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cli::Target;

const FIRST_SIZE: usize = 10;
const MAX_COORD: f64 = 1_000.0;
/// Closest pair results are checked against brute force up to this size.
const BRUTE_FORCE_CHECK_LIMIT: usize = 100;
const DISTANCE_TOLERANCE: f64 = 1e-4;

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub max_size: usize,
    pub trials: usize,
    pub seed: Option<u64>,
    pub closest_limit: usize,
    pub output: PathBuf,
}

/// Runs every trial for every size, archives each run in `history` and
/// exports the history to `config.output`.
pub fn run_benchmarks(target: Target, config: &RunConfig, history: &RunHistory) -> dnc::Result<()> {
    history.clear();
    info!(
        "running {target:?}: max size {}, {} trials, output {}",
        config.max_size,
        config.trials,
        config.output.display(),
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut n = FIRST_SIZE;
    while n <= config.max_size {
        info!("n={n}");
        for _ in 0..config.trials {
            if matches!(target, Target::MergeSort | Target::All) {
                run_merge_sort(n, &mut rng, history);
            }
            if matches!(target, Target::QuickSort | Target::All) {
                run_quick_sort(n, &mut rng, history);
            }
            if matches!(target, Target::Select | Target::All) {
                run_select(n, &mut rng, history)?;
            }
            if matches!(target, Target::Closest | Target::All) && n <= config.closest_limit {
                run_closest_pair(n, &mut rng, history)?;
            }
        }
        let Some(next) = n.checked_mul(2) else {
            break;
        };
        n = next;
    }

    history.export_csv(&config.output)?;
    info!("exported {} runs to {}", history.len(), config.output.display());
    Ok(())
}

fn run_merge_sort(n: usize, rng: &mut StdRng, history: &RunHistory) {
    let mut data = bench::random_array(n, rng);
    let mut sorter = MergeSort::new();
    sorter.sort(&mut data);

    if !is_sorted_non_decreasing(&data) {
        error!("MergeSort failed to sort {n} elements");
    }

    info!("  {}", sorter.metrics());
    history.record(sorter.metrics());
}

fn run_quick_sort(n: usize, rng: &mut StdRng, history: &RunHistory) {
    let mut data = bench::random_array(n, rng);
    let mut sorter = QuickSort::with_seed(rng.random());
    sorter.sort(&mut data);

    if !is_sorted_non_decreasing(&data) {
        error!("QuickSort failed to sort {n} elements");
    }

    let depth = sorter.metrics().max_depth();
    let bound = quick_sort_depth_bound(n);
    if depth > bound {
        warn!("QuickSort depth {depth} exceeds expected {bound} for n={n}");
    }

    info!("  {}", sorter.metrics());
    history.record(sorter.metrics());
}

fn run_select(n: usize, rng: &mut StdRng, history: &RunHistory) -> dnc::Result<()> {
    let data = bench::random_array(n, rng);
    let k = n / 2;
    let mut select = DeterministicSelect::with_seed(rng.random());
    let value = select.select(&data, k)?;

    let mut sorted = data;
    sorted.sort_unstable();
    if value != sorted[k] {
        error!("Select failed for n={n} k={k}: expected {}, got {value}", sorted[k]);
    }

    info!("  k={k} value={value} {}", select.metrics());
    history.record(select.metrics());
    Ok(())
}

fn run_closest_pair(n: usize, rng: &mut StdRng, history: &RunHistory) -> dnc::Result<()> {
    let points = bench::random_points(n, MAX_COORD, rng)
        .into_iter()
        .map(Point::from)
        .collect::<Vec<_>>();
    let mut solver = ClosestPair::new();
    let pair = solver.find_closest_pair(&points)?;

    if n <= BRUTE_FORCE_CHECK_LIMIT {
        let oracle = ClosestPair::new().find_closest_pair_brute_force(&points)?;
        if (pair.distance() - oracle.distance()).abs() > DISTANCE_TOLERANCE {
            error!(
                "ClosestPair mismatch for n={n}: divide and conquer {:.4}, brute force {:.4}",
                pair.distance(),
                oracle.distance(),
            );
        }
    }

    info!("  distance={:.4} {}", pair.distance(), solver.metrics());
    history.record(solver.metrics());
    Ok(())
}

pub fn quick_sort_depth_bound(n: usize) -> usize {
    2 * floor_log2(n) + 10
}
