#![warn(missing_docs)]
//! SweetBench CLI Library
//!
//! Renders saved sample files as comparison reports:
//!
//! ```text
//! sweetbench report results.json --compare-by data --row method --column data
//! sweetbench metrics
//! sweetbench init > sweet.toml
//! ```
//!
//! Settings come from a discovered `sweet.toml`; command line flags override it.

mod config;

pub use config::*;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use sweetbench_core::{Job, JobOptions, Reporting};
use sweetbench_stats::Metric;

/// SweetBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "sweetbench")]
#[command(author, version, about = "SweetBench - compare benchmark results side by side")]
pub struct Cli {
    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a saved sample file
    Report(ReportArgs),
    /// List known metrics
    Metrics,
    /// Print a default sweet.toml
    Init,
}

/// Options of the `report` subcommand
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Sample file (defaults to `output.save_file` from sweet.toml)
    #[arg(name = "FILE")]
    pub file: Option<PathBuf>,

    /// Metrics to report, comma separated
    #[arg(long, value_delimiter = ',')]
    pub metric: Vec<String>,

    /// Label fields; only results sharing these values are compared
    #[arg(long, value_delimiter = ',')]
    pub compare_by: Vec<String>,

    /// Fields splitting results into separate tables
    #[arg(long, value_delimiter = ',')]
    pub grouping: Vec<String>,

    /// Fields naming each row
    #[arg(long, value_delimiter = ',')]
    pub row: Vec<String>,

    /// Fields naming each column
    #[arg(long, value_delimiter = ',')]
    pub column: Vec<String>,

    /// Cell contents: a field name, or `colored:<field>`
    #[arg(long)]
    pub value: Option<String>,

    /// Sort rows by key
    #[arg(long)]
    pub sort: bool,

    /// Report format: table, compare
    #[arg(long)]
    pub format: Option<ReportFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl ReportArgs {
    /// Apply command line overrides to the configuration
    pub fn apply(&self, config: &mut SweetConfig) {
        if !self.metric.is_empty() {
            config.job.metrics = self.metric.clone();
        }
        if !self.compare_by.is_empty() {
            config.report.compare_by = Some(self.compare_by.clone());
        }
        if !self.grouping.is_empty() {
            config.report.grouping = Some(self.grouping.clone());
        }
        if !self.row.is_empty() {
            config.report.row = self.row.clone();
        }
        if !self.column.is_empty() {
            config.report.column = self.column.clone();
        }
        if let Some(value) = &self.value {
            config.report.value = value.clone();
        }
        if self.sort {
            config.report.sort = true;
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
        if self.no_color {
            config.report.color = false;
        }
        if let Some(file) = &self.file {
            config.output.save_file = Some(file.clone());
        }
    }
}

/// Run the SweetBench CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the SweetBench CLI with pre-parsed arguments
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("sweetbench=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("sweetbench=info")
            .with_writer(std::io::stderr)
            .init();
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Metrics => print_metrics(&mut out)?,
        Commands::Init => write!(out, "{}", SweetConfig::default_toml())?,
        Commands::Report(args) => {
            let mut config = SweetConfig::discover().unwrap_or_default();
            args.apply(&mut config);
            report(&config, &mut out)?;
        }
    }

    Ok(())
}

/// Build a job from `config`, load its sample file and write the report
pub fn report(config: &SweetConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    let path = config
        .output
        .save_file
        .as_ref()
        .context("No sample file given and no output.save_file configured")?;
    if !path.exists() {
        anyhow::bail!("Sample file not found: {}", path.display());
    }

    let options: JobOptions = config.job.job_options()?;
    let mut job = Job::new(options)?;
    job.save_file(path);
    job.color(config.report.color);
    if let Some(spec) = config.report.compare_spec() {
        job.compare_by(spec);
    }
    job.report_with(match config.report.format {
        ReportFormat::Compare => Reporting::Compare,
        ReportFormat::Table => Reporting::table_with_grouping(config.report.pivot_options()),
    });

    let loaded = job
        .load_entries()
        .with_context(|| format!("Failed to load {}", path.display()))?;
    tracing::info!(path = %path.display(), records = loaded, "loaded sample file");

    let comparisons = job.run_report(out)?;
    if comparisons.is_empty() {
        tracing::warn!(
            metrics = ?job.metrics(),
            "no results for the requested metrics"
        );
    }
    Ok(())
}

/// Write the metric table
pub fn print_metrics(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "{:<18} {:<6} {:<17} suite", "metric", "unit", "direction")?;
    for metric in Metric::ALL {
        let direction = if metric.higher_is_better() {
            "higher-is-better"
        } else {
            "lower-is-better"
        };
        writeln!(
            out,
            "{:<18} {:<6} {:<17} {:?}",
            metric.name(),
            metric.unit(),
            direction,
            metric.suite()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweetbench_core::ResultsStore;
    use sweetbench_report::Label;

    fn sample_file(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("results.json");
        let mut store = ResultsStore::new();
        for (method, data, v) in [
            ("split", "nil", 300.0),
            ("to_s", "nil", 100.0),
            ("split", "str", 200.0),
            ("to_s", "str", 180.0),
        ] {
            store
                .add_entry(Label::method(method).with("data", data), Metric::Ips, vec![v, v])
                .unwrap();
        }
        store.save(&path).unwrap();
        path
    }

    #[test]
    fn test_cli_parses_report() {
        let cli = Cli::parse_from([
            "sweetbench",
            "report",
            "results.json",
            "--compare-by",
            "data",
            "--row",
            "method",
            "--column",
            "data",
            "--metric",
            "ips,memsize",
            "--format",
            "compare",
            "--no-color",
        ]);
        let Commands::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.file, Some(PathBuf::from("results.json")));
        assert_eq!(args.metric, vec!["ips", "memsize"]);
        assert_eq!(args.format, Some(ReportFormat::Compare));
        assert!(args.no_color);
    }

    #[test]
    fn test_args_override_config() {
        let mut config = SweetConfig::default();
        let args = ReportArgs {
            row: vec!["method".to_string()],
            no_color: true,
            sort: true,
            ..ReportArgs::default()
        };
        args.apply(&mut config);
        assert_eq!(config.report.row, vec!["method"]);
        assert!(!config.report.color);
        assert!(config.report.sort);
        // untouched settings keep their defaults
        assert_eq!(config.report.column, vec!["metric"]);
    }

    #[test]
    fn test_report_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_file(dir.path());

        let mut config = SweetConfig::default();
        ReportArgs {
            file: Some(path),
            compare_by: vec!["data".to_string()],
            row: vec!["method".to_string()],
            column: vec!["data".to_string()],
            grouping: vec!["metric".to_string()],
            no_color: true,
            ..ReportArgs::default()
        }
        .apply(&mut config);

        let mut out = Vec::new();
        report(&config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "metric ips");
        assert!(lines[3].starts_with("method | nil"));
        assert!(text.contains("100.0 i/s - 3.00x (± 0.00)"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_report_compare() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_file(dir.path());

        let mut config = SweetConfig::default();
        config.report.format = ReportFormat::Compare;
        config.output.save_file = Some(path);

        let mut out = Vec::new();
        report(&config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Comparing ips"));
        assert_eq!(text.matches(" slower").count(), 3);
    }

    #[test]
    fn test_report_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SweetConfig::default();
        config.output.save_file = Some(dir.path().join("nothing.json"));
        assert!(report(&config, &mut Vec::new()).is_err());

        config.output.save_file = None;
        assert!(report(&config, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_report_unknown_metric() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SweetConfig::default();
        config.output.save_file = Some(sample_file(dir.path()));
        config.job.metrics = vec!["latency".to_string()];
        let err = report(&config, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("latency"));
    }

    #[test]
    fn test_print_metrics() {
        let mut out = Vec::new();
        print_metrics(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 12);
        assert!(text.contains("memsize_retained"));
        assert!(text.contains("higher-is-better"));
    }
}
