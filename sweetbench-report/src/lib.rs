#![warn(missing_docs)]
//! SweetBench Report - Comparison and Pivot Tables
//!
//! Classifies labeled results against the best result of their group and
//! renders them as tables:
//! - Structural labels and grouping keys
//! - One generic partitioner for baseline groups and display groups
//! - Ranked comparisons with a cached classification
//! - Pivot tables with arbitrary row, column and value keys
//! - Fixed-width, ANSI-aware text rendering

mod builder;
mod comparison;
mod key;
mod label;
mod partition;
mod pivot;
mod table;

pub use builder::{Entry, build_comparisons, rank_partition};
pub use comparison::{Comparison, Mode};
pub use key::Key;
pub use label::{Label, LabelValue};
pub use partition::{DEFAULT_JOIN, KeyFn, KeySpec, Partition, Record, group};
pub use pivot::{
    CellFn, PivotOptions, PivotTable, ValueSpec, build_pivot_tables, pivot_each, print_pivot_tables,
};
pub use table::{
    Cell, Color, TableRenderer, TableRow, format_table, strip_ansi, visible_width,
};
