//! Comparison
//!
//! One entry's result classified against the best entry of its partition.
//!
//! Classification is computed once, at construction, in a fixed order:
//!
//! ```text
//! no baseline / equals baseline ──► Best
//!            │
//!    overlapping interval ─────────► Same
//!            │
//!   separation within error ───────► Slowerish
//!            │
//!            └─────────────────────► Slower
//! ```

use crate::key::Key;
use crate::label::Label;
use crate::partition::Record;
use crate::table::{Cell, Color};
use std::fmt;
use std::sync::Arc;
use sweetbench_stats::{Metric, SampleStatistics, Slowdown};

/// Classification of an entry relative to its partition's baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The baseline itself, or alone in its partition
    Best,
    /// Indistinguishable from the baseline
    Same,
    /// Worse than the baseline, but not cleanly separated
    Slowerish,
    /// Clearly worse than the baseline
    Slower,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Best => write!(f, "best"),
            Mode::Same => write!(f, "same"),
            Mode::Slowerish => write!(f, "slowerish"),
            Mode::Slower => write!(f, "slower"),
        }
    }
}

/// One entry of a ranked partition, classified against the partition's best entry
#[derive(Debug, Clone)]
pub struct Comparison {
    metric: Metric,
    label: Label,
    stats: Arc<SampleStatistics>,
    baseline: Option<Arc<SampleStatistics>>,
    worst: Option<Arc<SampleStatistics>>,
    offset: usize,
    total: usize,
    slowdown: Slowdown,
    mode: Mode,
}

impl Comparison {
    /// Classify `stats`, ranked `offset` of `total` in its partition, against `baseline`.
    pub fn new(
        metric: Metric,
        label: Label,
        stats: Arc<SampleStatistics>,
        offset: usize,
        total: usize,
        baseline: Option<Arc<SampleStatistics>>,
    ) -> Self {
        let slowdown = baseline
            .as_deref()
            .map_or(Slowdown::NONE, |b| stats.slowdown(b));

        let mut comparison = Self {
            metric,
            label,
            stats,
            baseline,
            worst: None,
            offset,
            total,
            slowdown,
            mode: Mode::Best,
        };
        comparison.mode = comparison.classify();
        comparison
    }

    /// Use `worst` as the reference for [`Comparison::is_worst`] instead of rank
    pub fn with_worst(mut self, worst: Arc<SampleStatistics>) -> Self {
        self.worst = Some(worst);
        self
    }

    fn classify(&self) -> Mode {
        if self.is_best() {
            Mode::Best
        } else if self.overlaps() {
            Mode::Same
        } else if self.slowdown.within_error {
            Mode::Slowerish
        } else {
            Mode::Slower
        }
    }

    /// Metric this comparison is about
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Label of the compared entry
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Statistics of the compared entry
    pub fn stats(&self) -> &Arc<SampleStatistics> {
        &self.stats
    }

    /// Statistics of the partition's best entry
    pub fn baseline(&self) -> Option<&Arc<SampleStatistics>> {
        self.baseline.as_ref()
    }

    /// Explicit worst-case reference, if one was supplied
    pub fn worst(&self) -> Option<&Arc<SampleStatistics>> {
        self.worst.as_ref()
    }

    /// Zero-based rank within the partition
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Size of the partition
    pub fn total(&self) -> usize {
        self.total
    }

    /// Mean of the compared entry
    pub fn central_tendency(&self) -> f64 {
        self.stats.central_tendency()
    }

    /// Error of the compared entry
    pub fn error(&self) -> f64 {
        self.stats.error()
    }

    /// Display unit of the metric
    pub fn units(&self) -> &'static str {
        self.metric.unit()
    }

    /// Times worse than the baseline (1 for the baseline itself)
    pub fn slowdown(&self) -> f64 {
        self.slowdown.ratio
    }

    /// Classification
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// No baseline, or the statistics are the baseline's
    pub fn is_best(&self) -> bool {
        match &self.baseline {
            None => true,
            Some(b) => Arc::ptr_eq(b, &self.stats) || **b == *self.stats,
        }
    }

    /// Basically the same as the best entry
    pub fn overlaps(&self) -> bool {
        if (self.slowdown.ratio * 100.0).round() == 100.0 {
            return true;
        }
        self.baseline.as_deref().is_some_and(|b| {
            b.central_tendency() == self.stats.central_tendency() || self.stats.overlaps(b)
        })
    }

    /// Worst entry of its partition.
    ///
    /// With an explicit worst reference this is an interval overlap with it.
    /// Otherwise the entry must rank last and be more than 1x slower, or be
    /// infinitely slower (zero-valued counterpart).
    pub fn is_worst(&self) -> bool {
        if let Some(worst) = &self.worst {
            return self.stats.overlaps(worst);
        }
        let ratio = self.slowdown.ratio;
        (self.offset + 1 == self.total && ratio.trunc() > 1.0) || ratio.is_infinite()
    }

    /// Whether this entry ranks last in its partition
    pub fn is_last(&self) -> bool {
        self.offset + 1 == self.total
    }

    /// Terminal color for this entry
    pub fn color(&self) -> Color {
        if self.baseline.is_none() {
            Color::Neutral
        } else if self.is_best() || self.overlaps() {
            Color::Green
        } else if self.is_worst() {
            Color::Red
        } else {
            Color::Neutral
        }
    }

    /// Value with units, plus the slowdown when worse than the baseline.
    ///
    /// `display` replaces the `"{value} {units}"` part.
    pub fn comp_short(&self, display: Option<&str>) -> String {
        let value = match display {
            Some(v) => v.to_string(),
            None => format!("{:.1} {}", self.central_tendency(), self.units()),
        };
        match self.mode {
            Mode::Best | Mode::Same => value,
            Mode::Slower => format!(
                "{} - {:.2}x (± {:.2})",
                value,
                self.slowdown(),
                self.error()
            ),
            Mode::Slowerish => format!("{} - {:.2}x", value, self.slowdown()),
        }
    }

    /// One-line summary: label, value, units and verdict
    pub fn comp_string(&self) -> String {
        self.comp_string_with(|label| label.to_string())
    }

    /// [`Comparison::comp_string`] with a custom label rendering
    pub fn comp_string_with<F>(&self, format_label: F) -> String
    where
        F: Fn(&Label) -> String,
    {
        let label = format_label(&self.label);
        let head = format!(
            "{:>20}: {:>10.1} {}",
            label,
            self.central_tendency(),
            self.units()
        );
        match self.mode {
            Mode::Best => head,
            Mode::Same => format!("{head} - same-ish: difference falls within error"),
            Mode::Slower => format!(
                "{} - {:.2}x (± {:.2}) slower",
                head,
                self.slowdown(),
                self.error()
            ),
            Mode::Slowerish => format!("{} - {:.2}x slower", head, self.slowdown()),
        }
    }

    /// A field rendered as a colored cell: green when best or overlapping,
    /// red when ranked last, neutral otherwise.
    pub fn colored(&self, field: &str) -> Cell {
        let content = self.field(field).map(|k| k.short()).unwrap_or_default();
        let color = if self.is_best() || self.overlaps() {
            Color::Green
        } else if self.is_last() {
            Color::Red
        } else {
            Color::Neutral
        };
        Cell::styled(content, color)
    }
}

impl Record for Comparison {
    fn field(&self, name: &str) -> Option<Key> {
        match name {
            "metric" => Some(Key::text(self.metric.name())),
            "comp_short" => Some(Key::text(self.comp_short(None))),
            "comp_string" => Some(Key::text(self.comp_string())),
            "label" => Some(Key::Label(self.label.clone())),
            "mode" => Some(Key::text(self.mode.to_string())),
            other => self.label.get(other).cloned().map(Key::Value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(samples: &[f64]) -> Arc<SampleStatistics> {
        Arc::new(SampleStatistics::new(samples.to_vec()).unwrap())
    }

    fn fast() -> Arc<SampleStatistics> {
        stats(&[100.0, 110.0, 105.0])
    }

    fn slow() -> Arc<SampleStatistics> {
        stats(&[50.0, 55.0, 52.0])
    }

    fn compare(
        metric: Metric,
        label: Label,
        s: Arc<SampleStatistics>,
        offset: usize,
        total: usize,
        baseline: Option<Arc<SampleStatistics>>,
    ) -> Comparison {
        Comparison::new(metric, label, s, offset, total, baseline)
    }

    #[test]
    fn test_baseline_entry_is_best() {
        let f = fast();
        let c = compare(Metric::Ips, Label::method("fast"), f.clone(), 0, 2, Some(f));
        assert_eq!(c.mode(), Mode::Best);
        assert_eq!(c.slowdown(), 1.0);
    }

    #[test]
    fn test_equal_statistics_are_best() {
        let c = compare(Metric::Ips, Label::method("same"), fast(), 1, 2, Some(fast()));
        assert_eq!(c.mode(), Mode::Best);
        assert_eq!(c.slowdown(), 1.0);
    }

    #[test]
    fn test_no_baseline_is_best() {
        let c = compare(Metric::Ips, Label::method("only"), fast(), 0, 1, None);
        assert_eq!(c.mode(), Mode::Best);
        assert_eq!(c.slowdown(), 1.0);
        assert_eq!(c.color(), Color::Neutral);
    }

    #[test]
    fn test_clearly_slower() {
        let c = compare(Metric::Ips, Label::method("slow"), slow(), 1, 2, Some(fast()));
        assert_eq!(c.mode(), Mode::Slower);
        assert!(c.slowdown() > 1.0);
        assert!((c.slowdown() - 105.0 / (157.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_is_same() {
        let close = stats(&[98.0, 104.0, 101.0]);
        let c = compare(Metric::Ips, Label::method("close"), close, 1, 2, Some(fast()));
        assert_eq!(c.mode(), Mode::Same);
        assert_eq!(c.color(), Color::Green);
    }

    #[test]
    fn test_ratio_rounding_to_one_is_same() {
        // tight intervals that do not overlap, but only 0.1% apart
        let base = stats(&[1000.0, 1000.0]);
        let other = stats(&[999.0, 999.0]);
        let c = compare(Metric::Ips, Label::method("x"), other, 1, 2, Some(base));
        assert_eq!(c.mode(), Mode::Same);
    }

    #[test]
    fn test_slowerish() {
        let base = stats(&[96.0, 104.0]);
        let other = stats(&[87.0, 93.0]);
        let c = compare(Metric::Ips, Label::method("x"), other, 1, 2, Some(base));
        assert_eq!(c.mode(), Mode::Slowerish);
        assert_eq!(c.comp_short(None), "90.0 i/s - 1.11x");
    }

    #[test]
    fn test_worst_by_rank() {
        let c = compare(Metric::Ips, Label::method("slow"), slow(), 1, 2, Some(fast()));
        assert!(c.is_worst());
        assert_eq!(c.color(), Color::Red);

        // last, but less than 2x slower
        let mid = stats(&[70.0, 71.0]);
        let c = compare(Metric::Ips, Label::method("mid"), mid, 1, 2, Some(fast()));
        assert!(!c.is_worst());
        assert_eq!(c.color(), Color::Neutral);
    }

    #[test]
    fn test_worst_not_last() {
        let c = compare(Metric::Ips, Label::method("slow"), slow(), 1, 3, Some(fast()));
        assert!(!c.is_worst());
    }

    #[test]
    fn test_worst_with_explicit_reference() {
        let c = compare(Metric::Ips, Label::method("slow"), slow(), 0, 3, Some(fast()))
            .with_worst(stats(&[51.0, 53.0]));
        assert!(c.is_worst());

        let c = compare(Metric::Ips, Label::method("slow"), slow(), 2, 3, Some(fast()))
            .with_worst(stats(&[10.0, 11.0]));
        assert!(!c.is_worst());
    }

    #[test]
    fn test_zero_baseline_is_worst() {
        let zero = stats(&[0.0, 0.0]);
        let c = compare(Metric::Memsize, Label::method("heavy"), stats(&[40.0]), 0, 3, Some(zero));
        assert!(c.slowdown().is_infinite());
        assert!(c.is_worst());
    }

    #[test]
    fn test_comp_short() {
        let f = fast();
        let best = compare(Metric::Ips, Label::method("fast"), f.clone(), 0, 2, Some(f.clone()));
        assert_eq!(best.comp_short(None), "105.0 i/s");

        let slower = compare(Metric::Ips, Label::method("slow"), slow(), 1, 2, Some(f));
        assert_eq!(slower.comp_short(None), "52.3 i/s - 2.01x (± 2.52)");
        assert_eq!(slower.comp_short(Some("custom")), "custom - 2.01x (± 2.52)");
    }

    #[test]
    fn test_comp_string() {
        let f = fast();
        let best = compare(Metric::Memsize, Label::method("fast"), f.clone(), 0, 2, Some(f.clone()));
        assert_eq!(
            best.comp_string_with(|l: &Label| l.short()),
            "                fast:      105.0 bytes"
        );

        let close = stats(&[98.0, 104.0, 101.0]);
        let same = compare(Metric::Ips, Label::method("close"), close, 1, 3, Some(f.clone()));
        assert!(same.comp_string().ends_with("same-ish: difference falls within error"));

        let slower = compare(Metric::Ips, Label::method("slow"), slow(), 2, 3, Some(f));
        assert!(slower.comp_string().ends_with(" - 2.01x (± 2.52) slower"));
    }

    #[test]
    fn test_units() {
        let f = fast();
        for (metric, unit) in [
            (Metric::Ips, "i/s"),
            (Metric::Memsize, "bytes"),
            (Metric::Queries, "objs"),
        ] {
            let c = compare(metric, Label::new(), f.clone(), 0, 1, Some(f.clone()));
            assert_eq!(c.units(), unit);
        }
    }

    #[test]
    fn test_field_access() {
        let label = Label::method("fast").with("data", "nil");
        let c = compare(Metric::Ips, label.clone(), fast(), 0, 1, None);

        assert_eq!(c.field("metric"), Some(Key::text("ips")));
        assert_eq!(c.field("label"), Some(Key::Label(label)));
        assert_eq!(c.field("method"), Some(Key::text("fast")));
        assert_eq!(c.field("data"), Some(Key::text("nil")));
        assert_eq!(c.field("comp_short"), Some(Key::text("105.0 i/s")));
        assert_eq!(c.field("version"), None);
    }

    #[test]
    fn test_colored_cell() {
        let f = fast();
        let best = compare(Metric::Ips, Label::method("fast"), f.clone(), 0, 3, Some(f.clone()));
        assert_eq!(best.colored("method"), Cell::styled("fast", Color::Green));

        let mid = compare(Metric::Ips, Label::method("mid"), stats(&[70.0, 71.0]), 1, 3, Some(f.clone()));
        assert_eq!(mid.colored("method").color(), Some(Color::Neutral));

        let last = compare(Metric::Ips, Label::method("slow"), slow(), 2, 3, Some(f));
        assert_eq!(last.colored("method").color(), Some(Color::Red));
    }
}
