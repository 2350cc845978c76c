//! Compare Report
//!
//! Line-per-result output in the style of a throughput `compare!` block:
//!
//! ```text
//!
//! Comparing ips
//!
//!
//! nil
//! ---
//!
//!      {method: split}: 51825798.8 i/s
//!       {method: to_s}:  5685237.1 i/s - 9.12x (± 0.12) slower
//! ```

use std::io::{self, Write};
use sweetbench_report::{Comparison, Entry, Key, KeySpec};
use sweetbench_stats::Metric;

/// Write `comparisons` section by section: one per metric, and within a metric
/// one heading per comparison group.
pub fn compare_report<W: Write + ?Sized>(
    comparisons: &[Comparison],
    grouping: Option<&KeySpec<Entry>>,
    out: &mut W,
) -> io::Result<()> {
    let grouping = grouping.map(KeySpec::for_comparisons);
    let extract = grouping.as_ref().map(|spec| spec.extractor());

    let mut last_metric: Option<Metric> = None;
    let mut last_group: Option<Key> = None;

    for comparison in comparisons {
        if last_metric != Some(comparison.metric()) {
            last_metric = Some(comparison.metric());
            last_group = None;
            writeln!(out)?;
            writeln!(out, "Comparing {}", comparison.metric())?;
            writeln!(out)?;
        }

        let group = extract.as_ref().and_then(|f| f(comparison));
        if group != last_group {
            let name = group.as_ref().map(Key::short).unwrap_or_default();
            writeln!(out)?;
            writeln!(out, "{name}")?;
            writeln!(out, "{}", "-".repeat(name.chars().count()))?;
            writeln!(out)?;
            last_group = group;
        }

        writeln!(out, "{}", comparison.comp_string())?;
    }

    Ok(())
}

/// [`compare_report`] into a string
pub fn format_compare_report(
    comparisons: &[Comparison],
    grouping: Option<&KeySpec<Entry>>,
) -> String {
    let mut buf = Vec::new();
    // writing to a Vec cannot fail
    let _ = compare_report(comparisons, grouping, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
