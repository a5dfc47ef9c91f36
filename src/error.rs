//! Errors raised while building or replaying a workload.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::{JobId, Ticks};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read trace {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("trace line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("job {job} has a zero run length")]
    ZeroRunLength { job: JobId },

    #[error("jobs {first} and {second} both arrive at t={time}")]
    DuplicateArrival {
        time: Ticks,
        first: JobId,
        second: JobId,
    },

    #[error("job {job} would finish past the end of the clock")]
    TimeOverflow { job: JobId },

    #[error("invalid workload parameter {name}: {message}")]
    InvalidParam { name: &'static str, message: String },

    #[error("job id {0} used more than once")]
    DuplicateJobId(JobId),

    #[error("simulation requires at least one core")]
    NoCores,

    #[error("round robin requires a positive quantum")]
    MissingQuantum,

    #[error("workload contains no jobs")]
    EmptyWorkload,
}
