//! Per-run instrumentation.
//!
//! Each algorithm instance owns a [`Metrics`] record and a [`DepthTracker`].
//! Both are reset at the start of every public entry point, bumped by the
//! recursive helpers and the shared primitives, and read by the caller once the
//! run returns. Finished runs can be archived into a [`RunHistory`], which is
//! the only state shared between instances.

use std::cell::Cell;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::debug;

use crate::Result;

pub const CSV_HEADER: &str = "Algorithm,InputSize,TimeMillis,Comparisons,Swaps,Allocations,MaxDepth";

/// Live counters of one algorithm instance.
#[derive(Clone, Debug)]
pub struct Metrics {
    algorithm: &'static str,
    comparisons: u64,
    swaps: u64,
    allocations: u64,
    input_size: usize,
    start: Option<Instant>,
    end: Option<Instant>,
    max_depth: usize,
}

impl Metrics {
    pub fn new(algorithm: &'static str) -> Self {
        Self {
            algorithm,
            comparisons: 0,
            swaps: 0,
            allocations: 0,
            input_size: 0,
            start: None,
            end: None,
            max_depth: 0,
        }
    }

    /// Zeroes every counter and timestamp. The algorithm name survives.
    pub fn reset(&mut self) {
        *self = Self::new(self.algorithm);
    }

    #[inline]
    pub fn inc_comparisons(&mut self) {
        self.comparisons += 1;
    }

    #[inline]
    pub fn add_comparisons(&mut self, count: u64) {
        self.comparisons += count;
    }

    #[inline]
    pub fn inc_swaps(&mut self) {
        self.swaps += 1;
    }

    #[inline]
    pub fn add_allocations(&mut self, count: usize) {
        self.allocations += count as u64;
    }

    pub fn start_timer(&mut self) {
        self.start = Some(Instant::now());
        self.end = None;
    }

    pub fn stop_timer(&mut self) {
        self.end = Some(Instant::now());
    }

    /// Time between `start_timer` and `stop_timer`; zero until both happened.
    pub fn elapsed(&self) -> Duration {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    pub fn elapsed_nanos(&self) -> u128 {
        self.elapsed().as_nanos()
    }

    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1_000.0
    }

    pub fn set_input_size(&mut self, size: usize) {
        self.input_size = size;
    }

    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth;
    }

    pub fn algorithm(&self) -> &'static str {
        self.algorithm
    }

    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Point-in-time copy suitable for archiving.
    pub fn snapshot(&self) -> RunRecord {
        RunRecord {
            algorithm: self.algorithm,
            input_size: self.input_size,
            elapsed: self.elapsed(),
            comparisons: self.comparisons,
            swaps: self.swaps,
            allocations: self.allocations,
            max_depth: self.max_depth,
        }
    }

    /// Archives a snapshot into the process-wide history.
    pub fn record_run(&self) {
        RunHistory::global().record(self);
    }

    pub(crate) fn begin_run(&mut self, input_size: usize, depth: &DepthTracker) {
        self.reset();
        depth.reset();
        self.input_size = input_size;
        self.start_timer();
    }

    pub(crate) fn end_run(&mut self, depth: &DepthTracker) {
        self.stop_timer();
        self.max_depth = depth.max_depth();
        debug!(
            "{}: n={} comparisons={} swaps={} allocations={} depth={}",
            self.algorithm,
            self.input_size,
            self.comparisons,
            self.swaps,
            self.allocations,
            self.max_depth,
        );
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: n={}, time={:.3}ms, comparisons={}, swaps={}, allocations={}, maxDepth={}",
            self.algorithm,
            self.input_size,
            self.elapsed_millis(),
            self.comparisons,
            self.swaps,
            self.allocations,
            self.max_depth,
        )
    }
}

/// Current and maximum recursion depth of one run.
///
/// Frames are opened with [`DepthTracker::enter`]; the returned guard closes
/// the frame when dropped, so early returns never leave the count unbalanced.
#[derive(Debug, Default)]
pub struct DepthTracker {
    current: Cell<usize>,
    max: Cell<usize>,
}

impl DepthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn enter(&self) -> DepthGuard<'_> {
        let depth = self.current.get() + 1;
        self.current.set(depth);
        if depth > self.max.get() {
            self.max.set(depth);
        }
        DepthGuard { tracker: self }
    }

    pub fn current(&self) -> usize {
        self.current.get()
    }

    pub fn max_depth(&self) -> usize {
        self.max.get()
    }

    pub fn reset(&self) {
        self.current.set(0);
        self.max.set(0);
    }
}

#[must_use = "the frame closes as soon as the guard is dropped"]
#[derive(Debug)]
pub struct DepthGuard<'a> {
    tracker: &'a DepthTracker,
}

impl Drop for DepthGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        let current = &self.tracker.current;
        current.set(current.get() - 1);
    }
}

/// Read access shared by every algorithm instance.
pub trait Instrumented {
    fn metrics(&self) -> &Metrics;
    fn depth(&self) -> &DepthTracker;

    /// Clears the high-water mark between runs. Every entry point already
    /// starts from a reset tracker; the recorded `Metrics::max_depth` is kept.
    fn reset_depth(&self) {
        self.depth().reset();
    }

    fn max_depth(&self) -> usize {
        self.depth().max_depth()
    }
}

/// Archived, immutable copy of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRecord {
    pub algorithm: &'static str,
    pub input_size: usize,
    pub elapsed: Duration,
    pub comparisons: u64,
    pub swaps: u64,
    pub allocations: u64,
    pub max_depth: usize,
}

impl RunRecord {
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }

    pub fn write_csv_row<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // `{:.3}` is locale independent: always '.' as decimal separator.
        writeln!(
            out,
            "{},{},{:.3},{},{},{},{}",
            self.algorithm,
            self.input_size,
            self.elapsed_millis(),
            self.comparisons,
            self.swaps,
            self.allocations,
            self.max_depth,
        )
    }
}

/// Append-only list of archived runs.
#[derive(Debug, Default)]
pub struct RunHistory {
    runs: Mutex<Vec<RunRecord>>,
}

static GLOBAL_HISTORY: RunHistory = RunHistory::new();

impl RunHistory {
    pub const fn new() -> Self {
        Self {
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn global() -> &'static RunHistory {
        &GLOBAL_HISTORY
    }

    pub fn record(&self, metrics: &Metrics) {
        self.lock().push(metrics.snapshot());
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn records(&self) -> Vec<RunRecord> {
        self.lock().clone()
    }

    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        let runs = self.lock();
        writeln!(out, "{CSV_HEADER}")?;
        for run in runs.iter() {
            run.write_csv_row(&mut out)?;
        }
        out.flush()
    }

    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RunRecord>> {
        // A panic while holding the lock cannot leave a half-pushed record.
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn clear_all_metrics() {
    RunHistory::global().clear();
}
