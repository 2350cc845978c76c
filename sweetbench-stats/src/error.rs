//! Statistics errors

use thiserror::Error;

/// Errors from building statistics or resolving metrics
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// Statistics were requested for a series with no samples
    #[error("Cannot compute statistics of an empty sample series")]
    InvalidInput,

    /// A metric name is not part of the metric table
    #[error("Unknown metric: {invalid}. Choose from: {valid}")]
    InvalidMetric {
        /// Names that did not match a known metric
        invalid: String,
        /// Comma separated list of every known metric
        valid: String,
    },
}
