//! Job errors

use std::io;
use std::path::PathBuf;
use sweetbench_stats::StatsError;
use thiserror::Error;

/// Errors from loading, running or reporting a job
#[derive(Debug, Error)]
pub enum SweetError {
    /// Bad samples or an unknown metric
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Sample file could not be read or written
    #[error("Sample file {path}: {source}")]
    File {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Sample file is not valid JSON of the expected shape
    #[error("Invalid sample file {path}: {source}")]
    Format {
        /// File being parsed
        path: PathBuf,
        /// Underlying parse failure
        #[source]
        source: serde_json::Error,
    },

    /// A harness could not produce measurements
    #[error("Harness '{harness}' failed: {message}")]
    Harness {
        /// Harness name
        harness: String,
        /// What went wrong
        message: String,
    },

    /// Report output failed
    #[error("Failed to write report: {0}")]
    Output(#[from] io::Error),
}

/// Result type for job operations
pub type Result<T> = std::result::Result<T, SweetError>;
