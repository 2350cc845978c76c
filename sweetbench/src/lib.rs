#![warn(missing_docs)]
//! # SweetBench
//!
//! Side-by-side comparison reports for repeated benchmark measurements.
//!
//! SweetBench takes sample series for labeled variants of the same operation
//! and tells you which variant wins, by how much, and whether the difference
//! is real:
//! - **Sample Statistics**: mean and standard deviation per series, interval overlap
//! - **Comparison Groups**: rank only variants that share label attributes
//! - **Classification**: best, same, slower-ish or slower against the group's best
//! - **Pivot Tables**: any label attribute as rows, columns or separate tables
//! - **Sample Files**: JSON persistence so measurements survive between runs
//!
//! ## Quick Start
//!
//! ```ignore
//! use sweetbench::prelude::*;
//!
//! let mut job = Job::new(JobOptions::default())?;
//! job.save_file("results.json");
//! job.with_metadata(Label::new().with("data", "nil"), |job| {
//!     job.item("split", || { "a b".split(' ').count(); });
//!     job.item("split_whitespace", || { "a b".split_whitespace().count(); });
//! });
//! job.compare_by(KeySpec::field("data"));
//! job.report_with(Reporting::table(PivotOptions::default().row(KeySpec::field("method"))));
//! job.execute(&mut harnesses, &mut std::io::stdout())?;
//! ```

// Re-export statistics
pub use sweetbench_stats::{Direction, Metric, SampleStatistics, Slowdown, StatsError, Suite};

// Re-export reporting engine
pub use sweetbench_report::{
    Cell, Color, Comparison, Entry, Key, KeySpec, Label, LabelValue, Mode, Partition, PivotOptions,
    PivotTable, Record, TableRenderer, TableRow, ValueSpec, build_comparisons, build_pivot_tables,
    format_table, group, pivot_each, print_pivot_tables, strip_ansi, visible_width,
};

// Re-export jobs
pub use sweetbench_core::{
    Harness, Item, ItemLabel, Job, JobOptions, Measurement, Reporting, ResultsStore,
    SampleRecord, SweetError, compare_report, format_compare_report,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Comparison, Harness, Item, Job, JobOptions, KeySpec, Label, Measurement, Metric,
        PivotOptions, Reporting, ValueSpec,
    };
}
