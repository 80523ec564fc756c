mod cli;
mod demo;
mod driver;

use std::error::Error;

use clap::Parser;
use dnc::RunHistory;
use env_logger::Env;

use crate::cli::{Cli, Command};
use crate::driver::RunConfig;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Run {
            algorithm,
            max_size,
            output,
            trials,
            seed,
            closest_limit,
        } => {
            let config = RunConfig {
                max_size,
                trials,
                seed,
                closest_limit,
                output,
            };
            driver::run_benchmarks(algorithm, &config, RunHistory::global())?;
        }
        Command::Demo => demo::run()?,
    }

    Ok(())
}
