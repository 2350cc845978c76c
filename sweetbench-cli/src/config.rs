//! Configuration loading from sweet.toml
//!
//! SweetBench configuration can be specified in a `sweet.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sweetbench_core::JobOptions;
use sweetbench_report::{Entry, KeySpec, PivotOptions, ValueSpec};

/// SweetBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SweetConfig {
    /// Job configuration
    #[serde(default)]
    pub job: JobConfig,
    /// Report layout
    #[serde(default)]
    pub report: ReportConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Measurement options handed to harnesses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Metrics to compare
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
    /// Suppress interim harness output
    #[serde(default)]
    pub quiet: bool,
    /// Re-run harnesses even when the sample file has data
    #[serde(default)]
    pub force: bool,
    /// Warmup duration (e.g., "2s")
    #[serde(default = "default_warmup")]
    pub warmup: String,
    /// Measurement duration (e.g., "5s")
    #[serde(default = "default_time")]
    pub time: String,
    /// Repetitions for memory harnesses
    #[serde(default = "default_memory_iterations")]
    pub memory_iterations: u32,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
            quiet: false,
            force: false,
            warmup: default_warmup(),
            time: default_time(),
            memory_iterations: default_memory_iterations(),
        }
    }
}

fn default_metrics() -> Vec<String> {
    vec!["ips".to_string()]
}
fn default_warmup() -> String {
    "2s".to_string()
}
fn default_time() -> String {
    "5s".to_string()
}
fn default_memory_iterations() -> u32 {
    1
}

impl JobConfig {
    /// Resolve durations into job options
    pub fn job_options(&self) -> anyhow::Result<JobOptions> {
        Ok(JobOptions {
            metrics: self.metrics.clone(),
            quiet: self.quiet,
            force: self.force,
            warmup: SweetConfig::parse_duration(&self.warmup)?,
            time: SweetConfig::parse_duration(&self.time)?,
            memory_iterations: self.memory_iterations,
        })
    }
}

/// Report style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Pivot tables (default)
    #[default]
    Table,
    /// One line per result
    Compare,
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(ReportFormat::Table),
            "compare" => Ok(ReportFormat::Compare),
            _ => Err(anyhow::anyhow!(
                "Unknown report format: {s}. Choose from: table, compare"
            )),
        }
    }
}

/// Report layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Table or compare style
    #[serde(default)]
    pub format: ReportFormat,
    /// Fields splitting results into separate tables (defaults to metric)
    #[serde(default)]
    pub grouping: Option<Vec<String>>,
    /// Label fields; only results sharing these values are compared
    #[serde(default)]
    pub compare_by: Option<Vec<String>>,
    /// Fields naming each row
    #[serde(default = "default_row")]
    pub row: Vec<String>,
    /// Fields naming each column
    #[serde(default = "default_column")]
    pub column: Vec<String>,
    /// Cell contents: a field name, or `colored:<field>`
    #[serde(default = "default_value")]
    pub value: String,
    /// Sort rows by key
    #[serde(default)]
    pub sort: bool,
    /// Colored output
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            grouping: None,
            compare_by: None,
            row: default_row(),
            column: default_column(),
            value: default_value(),
            sort: false,
            color: default_color(),
        }
    }
}

fn default_row() -> Vec<String> {
    vec!["label".to_string()]
}
fn default_column() -> Vec<String> {
    vec!["metric".to_string()]
}
fn default_value() -> String {
    "comp_short".to_string()
}
fn default_color() -> bool {
    true
}

impl ReportConfig {
    /// Comparison grouping over stored entries
    pub fn compare_spec(&self) -> Option<KeySpec<Entry>> {
        self.compare_by
            .as_deref()
            .and_then(KeySpec::from_names)
    }

    /// Pivot layout. Without an explicit grouping, tables follow the comparison
    /// grouping when there is one, and the metric otherwise.
    pub fn pivot_options(&self) -> PivotOptions {
        let mut options = PivotOptions::default()
            .value(ValueSpec::parse(&self.value))
            .sort(self.sort);
        if let Some(row) = KeySpec::from_names(self.row.as_slice()) {
            options = options.row(row);
        }
        if let Some(column) = KeySpec::from_names(self.column.as_slice()) {
            options = options.column(column);
        }

        match (&self.grouping, self.compare_spec()) {
            (Some(names), _) => options.grouping(KeySpec::from_names(names.as_slice())),
            (None, Some(compare)) => options.or_grouping(compare.for_comparisons()),
            (None, None) => options,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Sample file to load and save
    #[serde(default)]
    pub save_file: Option<PathBuf>,
}

impl SweetConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("sweet.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), "ignoring config: {e}");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# SweetBench Configuration

[job]
# Metrics to compare: ips, memsize, memsize_retained, objects,
# objects_retained, strings, strings_retained, rows, queries, ignored, cached
metrics = ["ips"]
# Suppress interim harness output
quiet = false
# Re-run harnesses even when the sample file already has data
force = false
# Warmup duration for throughput harnesses
warmup = "2s"
# Measurement duration for throughput harnesses
time = "5s"
# Repetitions for memory harnesses
memory_iterations = 1

[report]
# Report style: table or compare
format = "table"
# Fields splitting results into separate tables (uncomment to enable)
# grouping = ["metric"]
# Only compare results sharing these label values (uncomment to enable)
# compare_by = ["data"]
# Fields naming rows and columns
row = ["label"]
column = ["metric"]
# Cell contents: a field name, or "colored:<field>"
value = "comp_short"
# Sort rows by key
sort = false
# Colored output
color = true

[output]
# Sample file to load and save (uncomment to enable)
# save_file = "results.json"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Invalid duration: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier as f64) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SweetConfig::default();
        assert_eq!(config.job.metrics, vec!["ips"]);
        assert_eq!(config.job.warmup, "2s");
        assert_eq!(config.report.format, ReportFormat::Table);
        assert!(config.report.color);
        assert!(config.output.save_file.is_none());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(SweetConfig::parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(
            SweetConfig::parse_duration("500ms").unwrap(),
            Duration::from_millis(500)
        );
        assert_eq!(SweetConfig::parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(
            SweetConfig::parse_duration("1.5s").unwrap(),
            Duration::from_millis(1500)
        );
        assert_eq!(SweetConfig::parse_duration("4").unwrap(), Duration::from_secs(4));
        assert!(SweetConfig::parse_duration("").is_err());
        assert!(SweetConfig::parse_duration("3h").is_err());
        assert!(SweetConfig::parse_duration("fast").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [job]
            metrics = ["ips", "memsize"]
            time = "1s"

            [report]
            format = "compare"
            compare_by = ["data"]
        "#;

        let config: SweetConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.job.metrics, vec!["ips", "memsize"]);
        assert_eq!(config.report.format, ReportFormat::Compare);
        // Defaults should still apply
        assert_eq!(config.job.warmup, "2s");
        assert_eq!(config.report.row, vec!["label"]);

        let options = config.job.job_options().unwrap();
        assert_eq!(options.time, Duration::from_secs(1));
    }

    #[test]
    fn test_default_toml_parses() {
        let default_toml = SweetConfig::default_toml();
        let config: SweetConfig = toml::from_str(&default_toml).unwrap();
        assert_eq!(config.job.time, "5s");
        assert_eq!(config.report.value, "comp_short");
    }

    #[test]
    fn test_pivot_grouping_follows_compare_by() {
        let report = ReportConfig {
            compare_by: Some(vec!["data".to_string()]),
            ..ReportConfig::default()
        };
        let options = report.pivot_options();
        assert_eq!(options.header_name(), "data");

        let report = ReportConfig {
            compare_by: Some(vec!["data".to_string()]),
            grouping: Some(vec!["metric".to_string(), "version".to_string()]),
            ..ReportConfig::default()
        };
        assert_eq!(report.pivot_options().header_name(), "metric_version");

        assert_eq!(ReportConfig::default().pivot_options().header_name(), "metric");
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("compare".parse::<ReportFormat>().unwrap(), ReportFormat::Compare);
        assert!("html".parse::<ReportFormat>().is_err());
    }
}
