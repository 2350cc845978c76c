//! Metric Definitions
//!
//! Every metric a harness can produce, with its display unit and the
//! direction in which values improve. This is a fixed table, not inferred
//! from the data.

use crate::error::StatsError;
use serde::{Deserialize, Serialize};

/// A named measured quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Metric {
    /// Iterations per second
    Ips,
    /// Bytes allocated
    Memsize,
    /// Bytes retained after the run
    MemsizeRetained,
    /// Objects allocated
    Objects,
    /// Objects retained after the run
    ObjectsRetained,
    /// Strings allocated
    Strings,
    /// Strings retained after the run
    StringsRetained,
    /// Records instantiated from query results
    Rows,
    /// Database queries issued
    Queries,
    /// Transaction and schema statements
    Ignored,
    /// Queries answered from the query cache
    Cached,
}

/// Which harness produces a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    /// Timing harness
    Ips,
    /// Memory-profiling harness
    Memory,
    /// Query-instrumentation harness
    Database,
}

/// Direction in which a metric improves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Bigger values are better (throughput)
    HigherIsBetter,
    /// Smaller values are better (allocations, queries)
    LowerIsBetter,
}

impl Metric {
    /// All metrics, in suite order
    pub const ALL: [Metric; 11] = [
        Metric::Ips,
        Metric::Memsize,
        Metric::MemsizeRetained,
        Metric::Objects,
        Metric::ObjectsRetained,
        Metric::Strings,
        Metric::StringsRetained,
        Metric::Rows,
        Metric::Queries,
        Metric::Ignored,
        Metric::Cached,
    ];

    /// Metrics produced by the timing harness
    pub const IPS: [Metric; 1] = [Metric::Ips];

    /// Metrics produced by the memory-profiling harness
    pub const MEMORY: [Metric; 6] = [
        Metric::Memsize,
        Metric::MemsizeRetained,
        Metric::Objects,
        Metric::ObjectsRetained,
        Metric::Strings,
        Metric::StringsRetained,
    ];

    /// Metrics produced by the query-instrumentation harness
    pub const DATABASE: [Metric; 4] = [
        Metric::Rows,
        Metric::Queries,
        Metric::Ignored,
        Metric::Cached,
    ];

    /// Canonical name, as used in configuration and sample files
    pub fn name(self) -> &'static str {
        match self {
            Metric::Ips => "ips",
            Metric::Memsize => "memsize",
            Metric::MemsizeRetained => "memsize_retained",
            Metric::Objects => "objects",
            Metric::ObjectsRetained => "objects_retained",
            Metric::Strings => "strings",
            Metric::StringsRetained => "strings_retained",
            Metric::Rows => "rows",
            Metric::Queries => "queries",
            Metric::Ignored => "ignored",
            Metric::Cached => "cached",
        }
    }

    /// Unit shown next to values
    pub fn unit(self) -> &'static str {
        match self {
            Metric::Ips => "i/s",
            Metric::Memsize | Metric::MemsizeRetained => "bytes",
            _ => "objs",
        }
    }

    /// Direction in which this metric improves
    pub fn direction(self) -> Direction {
        match self {
            Metric::Ips => Direction::HigherIsBetter,
            _ => Direction::LowerIsBetter,
        }
    }

    /// Whether bigger values are better
    pub fn higher_is_better(self) -> bool {
        self.direction() == Direction::HigherIsBetter
    }

    /// Harness suite producing this metric
    pub fn suite(self) -> Suite {
        match self {
            Metric::Ips => Suite::Ips,
            Metric::Memsize
            | Metric::MemsizeRetained
            | Metric::Objects
            | Metric::ObjectsRetained
            | Metric::Strings
            | Metric::StringsRetained => Suite::Memory,
            Metric::Rows | Metric::Queries | Metric::Ignored | Metric::Cached => Suite::Database,
        }
    }

    /// Comma separated list of every metric name
    pub fn valid_names() -> String {
        Metric::ALL
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve a list of metric names, reporting every unknown name at once.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Metric>, StatsError> {
        let mut metrics = Vec::with_capacity(names.len());
        let mut invalid = Vec::new();

        for name in names {
            match name.as_ref().parse::<Metric>() {
                Ok(metric) => {
                    if !metrics.contains(&metric) {
                        metrics.push(metric);
                    }
                }
                Err(_) => invalid.push(name.as_ref().to_string()),
            }
        }

        if invalid.is_empty() {
            Ok(metrics)
        } else {
            Err(StatsError::InvalidMetric {
                invalid: invalid.join(", "),
                valid: Metric::valid_names(),
            })
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Metric {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| StatsError::InvalidMetric {
                invalid: s.to_string(),
                valid: Metric::valid_names(),
            })
    }
}

impl TryFrom<String> for Metric {
    type Error = StatsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
