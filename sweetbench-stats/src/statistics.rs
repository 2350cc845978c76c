//! Sample Statistics
//!
//! Reduces a raw sample series to a central tendency and an error bound.
//! The samples are kept alongside the derived values so the series can be
//! persisted and reloaded verbatim.

use crate::error::StatsError;

/// Central tendency and error bound of one sample series
#[derive(Debug, Clone, PartialEq)]
pub struct SampleStatistics {
    samples: Vec<f64>,
    central_tendency: f64,
    error: f64,
}

/// Ratio between two central tendencies, oriented so that it is always >= 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slowdown {
    /// Larger central tendency divided by the smaller one
    pub ratio: f64,
    /// The two values are not cleanly separated (less than two combined errors apart)
    pub within_error: bool,
}

impl Slowdown {
    /// Slowdown of an entry against itself
    pub const NONE: Slowdown = Slowdown {
        ratio: 1.0,
        within_error: false,
    };
}

impl SampleStatistics {
    /// Compute statistics for a sample series.
    ///
    /// The central tendency is the arithmetic mean and the error is the
    /// sample standard deviation (zero for a single sample).
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidInput`] when `samples` is empty.
    pub fn new(samples: impl Into<Vec<f64>>) -> Result<Self, StatsError> {
        let samples = samples.into();
        if samples.is_empty() {
            return Err(StatsError::InvalidInput);
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;

        let std_dev = if samples.len() < 2 {
            0.0
        } else {
            let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        };

        Ok(Self {
            samples,
            central_tendency: mean,
            error: std_dev,
        })
    }

    /// Raw observations this was computed from
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Mean of the samples
    pub fn central_tendency(&self) -> f64 {
        self.central_tendency
    }

    /// Sample standard deviation
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Error relative to the central tendency, in percent
    pub fn error_percentage(&self) -> f64 {
        100.0 * (self.error / self.central_tendency)
    }

    /// Lower bound of the error interval
    pub fn low(&self) -> f64 {
        self.central_tendency - self.error
    }

    /// Upper bound of the error interval
    pub fn high(&self) -> f64 {
        self.central_tendency + self.error
    }

    /// Whether the `[ct - error, ct + error]` intervals of both series intersect.
    ///
    /// This is the only significance test the engine applies.
    pub fn overlaps(&self, other: &SampleStatistics) -> bool {
        self.high() > other.low() && self.low() < other.high()
    }

    /// How many times worse the worse of the two values is.
    ///
    /// Direction agnostic: the ratio is larger over smaller, so it reads the
    /// same for higher-is-better and lower-is-better metrics. A zero
    /// smaller value yields `f64::INFINITY`.
    pub fn slowdown(&self, baseline: &SampleStatistics) -> Slowdown {
        let mine = self.central_tendency;
        let theirs = baseline.central_tendency;

        if mine == theirs {
            return Slowdown::NONE;
        }

        let ratio = if theirs > mine {
            theirs / mine
        } else {
            mine / theirs
        };

        let separation = (mine - theirs).abs();
        let within_error = separation < 2.0 * (self.error + baseline.error);

        Slowdown {
            ratio,
            within_error,
        }
    }
}
