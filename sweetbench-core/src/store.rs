//! Results Store
//!
//! Per-run results, `metric → label → statistics`, and the sample file they
//! are persisted to.
//!
//! ## File format
//!
//! ```json
//! [
//!   {
//!     "name": { "method": "split", "data": "nil" },
//!     "metric": "ips",
//!     "samples": [51825798.8, 51532177.1]
//!   }
//! ]
//! ```
//!
//! Only raw samples are stored; statistics are recomputed on load.

use crate::error::{Result, SweetError};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use sweetbench_report::{Entry, Label};
use sweetbench_stats::{Metric, SampleStatistics};

/// One persisted sample series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Label of the measured variant
    pub name: Label,
    /// Measured metric, stored by name
    pub metric: Metric,
    /// Raw observations
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
struct MetricEntries {
    entries: Vec<(Label, Arc<SampleStatistics>)>,
    index: FxHashMap<Label, usize>,
}

impl MetricEntries {
    fn insert(&mut self, label: Label, stats: Arc<SampleStatistics>) {
        match self.index.get(&label) {
            Some(&idx) => self.entries[idx].1 = stats,
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push((label, stats));
            }
        }
    }

    fn get(&self, label: &Label) -> Option<&Arc<SampleStatistics>> {
        self.index.get(label).map(|&idx| &self.entries[idx].1)
    }
}

/// Statistics per metric and label, both in insertion order
#[derive(Debug, Clone, Default)]
pub struct ResultsStore {
    metrics: Vec<(Metric, MetricEntries)>,
}

impl ResultsStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn metric_mut(&mut self, metric: Metric) -> &mut MetricEntries {
        let idx = match self.metrics.iter().position(|(m, _)| *m == metric) {
            Some(idx) => idx,
            None => {
                self.metrics.push((metric, MetricEntries::default()));
                self.metrics.len() - 1
            }
        };
        &mut self.metrics[idx].1
    }

    fn metric(&self, metric: Metric) -> Option<&MetricEntries> {
        self.metrics
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, e)| e)
    }

    /// Record a sample series, replacing any previous one for the same label
    pub fn add_entry(
        &mut self,
        label: Label,
        metric: Metric,
        samples: impl Into<Vec<f64>>,
    ) -> Result<()> {
        let stats = SampleStatistics::new(samples)?;
        self.add_statistics(label, metric, Arc::new(stats));
        Ok(())
    }

    /// Record already computed statistics
    pub fn add_statistics(&mut self, label: Label, metric: Metric, stats: Arc<SampleStatistics>) {
        self.metric_mut(metric).insert(label, stats);
    }

    /// Statistics for one label and metric
    pub fn entry(&self, label: &Label, metric: Metric) -> Option<&Arc<SampleStatistics>> {
        self.metric(metric)?.get(label)
    }

    /// Entries of one metric, in insertion order
    pub fn entries(&self, metric: Metric) -> Vec<Entry> {
        self.metric(metric)
            .map(|m| {
                m.entries
                    .iter()
                    .map(|(label, stats)| Entry::new(label.clone(), Arc::clone(stats)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Entries grouped by metric, for the given metrics in the given order
    pub fn metric_entries(&self, metrics: &[Metric]) -> Vec<(Metric, Vec<Entry>)> {
        metrics.iter().map(|&m| (m, self.entries(m))).collect()
    }

    /// Metrics holding at least one entry, in insertion order
    pub fn metrics(&self) -> Vec<Metric> {
        self.metrics
            .iter()
            .filter(|(_, e)| !e.entries.is_empty())
            .map(|(m, _)| *m)
            .collect()
    }

    /// Whether no statistics are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored (metric, label) entries
    pub fn len(&self) -> usize {
        self.metrics.iter().map(|(_, e)| e.entries.len()).sum()
    }

    /// Labels carrying null values, once per label. They save as JSON `null`
    /// and reload as different labels.
    pub fn null_labels(&self) -> Vec<&Label> {
        let mut labels: Vec<&Label> = Vec::new();
        for (_, entries) in &self.metrics {
            for (label, _) in &entries.entries {
                if label.has_null() && !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    /// Add persisted records
    pub fn extend_records(&mut self, records: Vec<SampleRecord>) -> Result<()> {
        for record in records {
            self.add_entry(record.name, record.metric, record.samples)?;
        }
        Ok(())
    }

    /// Every entry as a persistable record
    pub fn records(&self) -> Vec<SampleRecord> {
        self.metrics
            .iter()
            .flat_map(|(metric, entries)| {
                entries.entries.iter().map(move |(label, stats)| SampleRecord {
                    name: label.clone(),
                    metric: *metric,
                    samples: stats.samples().to_vec(),
                })
            })
            .collect()
    }

    /// Load a sample file; a missing file loads nothing. Returns the number of
    /// records read.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no sample file yet");
                return Ok(0);
            }
            Err(source) => {
                return Err(SweetError::File {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let records: Vec<SampleRecord> =
            serde_json::from_str(&content).map_err(|source| SweetError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        let count = records.len();
        self.extend_records(records)?;

        tracing::debug!(path = %path.display(), records = count, "loaded samples");
        Ok(count)
    }

    /// Write every entry to a sample file, pretty printed with a trailing newline
    pub fn save(&self, path: &Path) -> Result<()> {
        let records = self.records();

        let null_labels = self.null_labels();
        if !null_labels.is_empty() {
            tracing::warn!(
                path = %path.display(),
                labels = null_labels.len(),
                "labels contain null values; use strings or numbers so they survive a reload"
            );
        }

        let mut json = serde_json::to_string_pretty(&records).map_err(|source| {
            SweetError::Format {
                path: path.to_path_buf(),
                source,
            }
        })?;
        json.push('\n');

        fs::write(path, json).map_err(|source| SweetError::File {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), records = records.len(), "saved samples");
        Ok(())
    }
}
