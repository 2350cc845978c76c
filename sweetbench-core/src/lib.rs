#![warn(missing_docs)]
//! SweetBench Core - Reporting Jobs
//!
//! The thin owner of one comparison run:
//! - `ResultsStore` holding statistics per metric and label, persisted as JSON
//! - `Job` with a metadata scope for labels, items and the `Harness` seam
//! - The line-per-result compare report

mod display;
mod error;
mod job;
mod store;

pub use display::{compare_report, format_compare_report};
pub use error::{Result, SweetError};
pub use job::{
    Action, DEFAULT_METRICS, Harness, Item, ItemLabel, Job, JobOptions, Measurement,
    ReportHandler, Reporting,
};
pub use store::{ResultsStore, SampleRecord};
