//! Job
//!
//! Owner of one reporting run: the items under test, the metadata scope their
//! labels are built from, the results store and the report configuration.
//!
//! ```text
//! load_entries ──► run (harnesses) ──► save_entries ──► run_report
//!      │                  │                                   │
//!  sample file      fills missing                  comparisons → report
//!                   metric data
//! ```

use crate::display::compare_report;
use crate::error::{Result, SweetError};
use crate::store::ResultsStore;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use sweetbench_report::{
    Comparison, Entry, KeySpec, Label, PivotOptions, TableRenderer, build_comparisons,
    print_pivot_tables,
};
use sweetbench_stats::{Metric, SampleStatistics, Suite};

/// Default metric list
pub const DEFAULT_METRICS: &[&str] = &["ips"];

/// Run configuration handed to harnesses
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Metric names to compare
    pub metrics: Vec<String>,
    /// Suppress interim harness output
    pub quiet: bool,
    /// Re-run harnesses even when stored data exists
    pub force: bool,
    /// Warmup time for throughput harnesses
    pub warmup: Duration,
    /// Measurement time for throughput harnesses
    pub time: Duration,
    /// Repetitions for memory harnesses
    pub memory_iterations: u32,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            metrics: DEFAULT_METRICS.iter().map(|m| m.to_string()).collect(),
            quiet: false,
            force: false,
            warmup: Duration::from_secs(2),
            time: Duration::from_secs(5),
            memory_iterations: 1,
        }
    }
}

/// Code under test
pub type Action = Box<dyn FnMut() + Send>;

/// One labeled piece of code to measure
pub struct Item {
    label: Label,
    action: Action,
}

impl Item {
    /// Label of this item
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Execute the code under test once
    pub fn call(&mut self) {
        (self.action)()
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item").field("label", &self.label).finish()
    }
}

/// Label argument of [`Job::item`]: a bare method name or full attributes
#[derive(Debug, Clone)]
pub enum ItemLabel {
    /// Becomes `{method: name}`
    Method(String),
    /// Used as given
    Attributes(Label),
}

impl From<&str> for ItemLabel {
    fn from(s: &str) -> Self {
        ItemLabel::Method(s.to_string())
    }
}

impl From<String> for ItemLabel {
    fn from(s: String) -> Self {
        ItemLabel::Method(s)
    }
}

impl From<Label> for ItemLabel {
    fn from(label: Label) -> Self {
        ItemLabel::Attributes(label)
    }
}

/// Sample series produced by a harness
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Item label
    pub label: Label,
    /// Measured metric
    pub metric: Metric,
    /// Raw observations
    pub samples: Vec<f64>,
}

/// External producer of sample series (timing, memory profiling, query counting)
pub trait Harness {
    /// Display name
    fn name(&self) -> &str;

    /// Metrics this harness produces; the first one marks whether it already ran
    fn metrics(&self) -> &[Metric];

    /// Measure every item
    fn run(&mut self, items: &mut [Item], options: &JobOptions) -> Result<Vec<Measurement>>;
}

/// Custom report callback
pub type ReportHandler = Box<dyn FnMut(&[Comparison], &mut dyn Write) -> Result<()>>;

/// How [`Job::run_report`] presents comparisons
#[derive(Default)]
pub enum Reporting {
    /// One line per comparison, sectioned by metric and comparison group
    #[default]
    Compare,
    /// Pivot tables
    Table {
        /// Table layout
        options: PivotOptions,
        /// Split tables like the comparisons when `options` leaves the grouping unset
        inherit_grouping: bool,
    },
    /// Caller-defined report
    Custom(ReportHandler),
}

impl Reporting {
    /// Pivot tables laid out exactly as `options` says
    pub fn table(options: PivotOptions) -> Self {
        Reporting::Table {
            options,
            inherit_grouping: false,
        }
    }

    /// Pivot tables split by the comparison grouping, unless `options` sets
    /// a grouping of its own
    pub fn table_with_grouping(options: PivotOptions) -> Self {
        Reporting::Table {
            options,
            inherit_grouping: true,
        }
    }

    /// Caller-defined report
    pub fn custom<F>(handler: F) -> Self
    where
        F: FnMut(&[Comparison], &mut dyn Write) -> Result<()> + 'static,
    {
        Reporting::Custom(Box::new(handler))
    }
}

impl fmt::Debug for Reporting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reporting::Compare => f.write_str("Compare"),
            Reporting::Table {
                options,
                inherit_grouping,
            } => f
                .debug_struct("Table")
                .field("options", options)
                .field("inherit_grouping", inherit_grouping)
                .finish(),
            Reporting::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One reporting run
#[derive(Debug)]
pub struct Job {
    options: JobOptions,
    metrics: Vec<Metric>,
    items: Vec<Item>,
    store: ResultsStore,
    meta: Label,
    save_file: Option<PathBuf>,
    compare_by: Option<KeySpec<Entry>>,
    reporting: Reporting,
    renderer: TableRenderer,
}

impl Job {
    /// Create a job, rejecting unknown metric names
    pub fn new(options: JobOptions) -> Result<Self> {
        let metrics = Metric::parse_list(&options.metrics)?;
        Ok(Self {
            options,
            metrics,
            items: Vec::new(),
            store: ResultsStore::new(),
            meta: Label::new(),
            save_file: None,
            compare_by: None,
            reporting: Reporting::default(),
            renderer: TableRenderer::default(),
        })
    }

    /// Run configuration
    pub fn options(&self) -> &JobOptions {
        &self.options
    }

    /// Requested metrics, in order
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    fn runs_suite(&self, suite: Suite) -> bool {
        self.metrics.iter().any(|m| m.suite() == suite)
    }

    /// Whether a throughput metric was requested
    pub fn runs_ips(&self) -> bool {
        self.runs_suite(Suite::Ips)
    }

    /// Whether a memory metric was requested
    pub fn runs_memory(&self) -> bool {
        self.runs_suite(Suite::Memory)
    }

    /// Whether a database metric was requested
    pub fn runs_database(&self) -> bool {
        self.runs_suite(Suite::Database)
    }

    /// Whether interim harness output is suppressed
    pub fn is_quiet(&self) -> bool {
        self.options.quiet
    }

    /// Whether stored data is ignored when deciding to run
    pub fn is_force(&self) -> bool {
        self.options.force
    }

    /// Current metadata scope
    pub fn current_metadata(&self) -> &Label {
        &self.meta
    }

    /// Merge attributes into the metadata scope for every later item
    pub fn metadata(&mut self, attrs: Label) -> &mut Self {
        self.meta = self.meta.merged(&attrs);
        self
    }

    /// Merge attributes into the metadata scope for the duration of `f` only
    pub fn with_metadata<F, R>(&mut self, attrs: Label, f: F) -> R
    where
        F: FnOnce(&mut Job) -> R,
    {
        let outer = self.meta.clone();
        self.meta = self.meta.merged(&attrs);
        let result = f(self);
        self.meta = outer;
        result
    }

    /// Register code under test, labeled with the current metadata scope
    pub fn item<L, F>(&mut self, label: L, action: F) -> &mut Self
    where
        L: Into<ItemLabel>,
        F: FnMut() + Send + 'static,
    {
        let attrs = match label.into() {
            ItemLabel::Method(name) => Label::method(name),
            ItemLabel::Attributes(label) => label,
        };
        let label = self.meta.merged(&attrs).normalized();
        tracing::debug!(label = %label, "registered item");
        self.items.push(Item {
            label,
            action: Box::new(action),
        });
        self
    }

    /// Registered items
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Group entries before ranking; only entries sharing a key are compared
    pub fn compare_by(&mut self, spec: KeySpec<Entry>) -> &mut Self {
        self.compare_by = Some(spec);
        self
    }

    /// Comparison grouping, if any
    pub fn comparison_grouping(&self) -> Option<&KeySpec<Entry>> {
        self.compare_by.as_ref()
    }

    /// Choose how [`Job::run_report`] presents results
    pub fn report_with(&mut self, reporting: Reporting) -> &mut Self {
        self.reporting = reporting;
        self
    }

    /// Enable or disable colored table output
    pub fn color(&mut self, color: bool) -> &mut Self {
        self.renderer = TableRenderer::new(color);
        self
    }

    /// Persist samples to (and reuse samples from) `path`
    pub fn save_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.save_file = Some(path.into());
        self
    }

    /// Configured sample file
    pub fn sample_file(&self) -> Option<&Path> {
        self.save_file.as_deref()
    }

    /// Results gathered so far
    pub fn store(&self) -> &ResultsStore {
        &self.store
    }

    /// Record a sample series directly
    pub fn add_entry(
        &mut self,
        label: Label,
        metric: Metric,
        samples: impl Into<Vec<f64>>,
    ) -> Result<()> {
        self.store.add_entry(label, metric, samples)
    }

    /// Statistics for one label and metric
    pub fn entry(&self, label: &Label, metric: Metric) -> Option<&Arc<SampleStatistics>> {
        self.store.entry(label, metric)
    }

    /// Load the sample file, if one is configured and exists
    pub fn load_entries(&mut self) -> Result<usize> {
        match &self.save_file {
            Some(path) => self.store.load(path),
            None => Ok(0),
        }
    }

    /// Write the sample file, if one is configured
    pub fn save_entries(&self) -> Result<()> {
        match &self.save_file {
            Some(path) => self.store.save(path),
            None => Ok(()),
        }
    }

    fn already_measured(&self, harness: &dyn Harness) -> bool {
        let (Some(item), Some(&metric)) = (self.items.first(), harness.metrics().first()) else {
            return false;
        };
        self.store.entry(&item.label, metric).is_some()
    }

    /// Run every harness producing a requested metric that has not run yet
    pub fn run(&mut self, harnesses: &mut [Box<dyn Harness>]) -> Result<()> {
        for harness in harnesses.iter_mut() {
            let wanted = harness
                .metrics()
                .iter()
                .any(|m| self.metrics.contains(m));
            if !wanted {
                continue;
            }
            if !self.options.force && self.already_measured(harness.as_ref()) {
                tracing::info!(harness = harness.name(), "using stored samples");
                continue;
            }
            if self.items.is_empty() {
                tracing::debug!(harness = harness.name(), "no items to measure");
                continue;
            }

            tracing::info!(harness = harness.name(), items = self.items.len(), "measuring");
            let measurements = harness.run(&mut self.items, &self.options)?;
            for m in measurements {
                self.store
                    .add_entry(m.label, m.metric, m.samples)
                    .map_err(|e| SweetError::Harness {
                        harness: harness.name().to_string(),
                        message: e.to_string(),
                    })?;
            }
        }
        Ok(())
    }

    /// Comparisons for every requested metric
    pub fn comparisons(&self) -> Vec<Comparison> {
        let entries = self.store.metric_entries(&self.metrics);
        build_comparisons(&entries, self.compare_by.as_ref())
    }

    /// Build comparisons and report them to `out`
    pub fn run_report(&mut self, out: &mut dyn Write) -> Result<Vec<Comparison>> {
        let comparisons = self.comparisons();
        match &mut self.reporting {
            Reporting::Compare => compare_report(&comparisons, self.compare_by.as_ref(), out)?,
            Reporting::Table {
                options,
                inherit_grouping,
            } => {
                let mut options = options.clone();
                if let (true, Some(spec)) = (*inherit_grouping, &self.compare_by) {
                    options = options.or_grouping(spec.for_comparisons());
                }
                print_pivot_tables(&comparisons, &options, &self.renderer, out)?;
            }
            Reporting::Custom(handler) => handler(&comparisons, out)?,
        }
        Ok(comparisons)
    }

    /// Load, measure, save and report
    pub fn execute(
        &mut self,
        harnesses: &mut [Box<dyn Harness>],
        out: &mut dyn Write,
    ) -> Result<Vec<Comparison>> {
        self.load_entries()?;
        self.run(harnesses)?;
        self.save_entries()?;
        self.run_report(out)
    }
}
