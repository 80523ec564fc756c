use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Validation failures reported by the entry points.
///
/// Inputs are checked before any counter is touched, so a failed call leaves
/// both the caller's data and the instance metrics as they were.
#[derive(Debug, Error)]
pub enum Error {
    #[error("input is empty")]
    EmptyInput,
    #[error("order statistic {k} is out of range for {len} elements")]
    IndexOutOfRange { k: usize, len: usize },
    #[error("closest pair needs at least 2 points, got {found}")]
    InsufficientPoints { found: usize },
    #[error("failed to export run history: {0}")]
    Export(#[from] io::Error),
}
