//! Comparison Builder
//!
//! Ranks the entries of every (metric, partition) pair and classifies each
//! against the partition's best entry.
//!
//! ```text
//! metric ──► partition by compare_by ──► rank by central tendency
//!                                              │
//!                                  offset 0 is the baseline
//!                                              │
//!                                              ▼
//!                                   Comparison per entry
//! ```
//!
//! Metrics are independent, so they are built in parallel. Output order is
//! metric order, then partition order, then rank.

use crate::comparison::Comparison;
use crate::key::Key;
use crate::label::Label;
use crate::partition::{KeySpec, Record, group};
use rayon::prelude::*;
use std::sync::Arc;
use sweetbench_stats::{Metric, SampleStatistics};

/// Label/statistics pair of one stored result
#[derive(Debug, Clone)]
pub struct Entry {
    /// Variant the samples were measured for
    pub label: Label,
    /// Reduced sample series
    pub stats: Arc<SampleStatistics>,
}

impl Entry {
    /// Pair a label with its statistics
    pub fn new(label: Label, stats: Arc<SampleStatistics>) -> Self {
        Self { label, stats }
    }
}

impl Record for Entry {
    fn field(&self, name: &str) -> Option<Key> {
        match name {
            "label" => Some(Key::Label(self.label.clone())),
            other => self.label.get(other).cloned().map(Key::Value),
        }
    }
}

impl KeySpec<Entry> {
    /// The same grouping, applied to comparisons built from these entries
    pub fn for_comparisons(&self) -> KeySpec<Comparison> {
        match self {
            KeySpec::Field(name) => KeySpec::Field(name.clone()),
            KeySpec::Fields { names, join } => KeySpec::Fields {
                names: names.clone(),
                join: join.clone(),
            },
            KeySpec::Function(f) => {
                let f = Arc::clone(f);
                KeySpec::function(move |c: &Comparison| {
                    f(&Entry::new(c.label().clone(), Arc::clone(c.stats())))
                })
            }
        }
    }
}

/// Rank one partition and classify every member against its best entry
pub fn rank_partition(metric: Metric, entries: &[&Entry]) -> Vec<Comparison> {
    let mut ranked: Vec<&Entry> = entries.to_vec();
    ranked.sort_by(|a, b| {
        a.stats
            .central_tendency()
            .total_cmp(&b.stats.central_tendency())
    });
    if metric.higher_is_better() {
        ranked.reverse();
    }

    let total = ranked.len();
    let baseline = match ranked.first() {
        Some(best) if total > 1 => Some(Arc::clone(&best.stats)),
        _ => None,
    };

    ranked
        .into_iter()
        .enumerate()
        .map(|(offset, entry)| {
            Comparison::new(
                metric,
                entry.label.clone(),
                Arc::clone(&entry.stats),
                offset,
                total,
                baseline.clone(),
            )
        })
        .collect()
}

/// Build comparisons for every metric's entries.
///
/// `compare_by` partitions each metric's entries before ranking; `None`
/// ranks all entries of a metric together.
pub fn build_comparisons(
    metric_entries: &[(Metric, Vec<Entry>)],
    compare_by: Option<&KeySpec<Entry>>,
) -> Vec<Comparison> {
    let per_metric: Vec<Vec<Comparison>> = metric_entries
        .par_iter()
        .map(|(metric, entries)| {
            let partitions = group(entries, compare_by, false);
            tracing::debug!(
                metric = %metric,
                entries = entries.len(),
                partitions = partitions.len(),
                "ranking entries"
            );
            partitions
                .iter()
                .flat_map(|p| rank_partition(*metric, &p.items))
                .collect()
        })
        .collect();

    per_metric.into_iter().flatten().collect()
}
