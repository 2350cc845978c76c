#![warn(missing_docs)]
//! SweetBench Statistics
//!
//! Reduces raw sample series to the numbers the comparison engine works with:
//! - Mean and sample standard deviation of a series
//! - Interval overlap, the single significance rule used for classification
//! - Direction-agnostic slowdown ratio between two series
//! - The fixed metric table (units, better-direction, producing suite)

mod error;
mod metric;
mod statistics;

pub use error::StatsError;
pub use metric::{Direction, Metric, Suite};
pub use statistics::{SampleStatistics, Slowdown};
