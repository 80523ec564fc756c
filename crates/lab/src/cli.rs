use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "lab", about = "Instrumented divide-and-conquer algorithms", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sweep input sizes 10, 20, 40, ... up to MAX_SIZE, verify every run and
    /// export the recorded metrics as CSV.
    Run {
        #[arg(value_enum)]
        algorithm: Target,
        max_size: usize,
        #[arg(long, short, default_value = "metrics.csv")]
        output: PathBuf,
        #[arg(long, default_value_t = 3)]
        trials: usize,
        /// Seed for inputs and pivots; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Largest input handed to closest pair.
        #[arg(long = "closest-limit", default_value_t = 10_000)]
        closest_limit: usize,
    },
    /// Print a small worked example of every algorithm.
    Demo,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Target {
    MergeSort,
    QuickSort,
    Select,
    Closest,
    All,
}
