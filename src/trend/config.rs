//! Detector and run configuration.

use crate::error::{Result, TrendError};
use crate::transform::SeasonalFrequency;
use crate::trend::result::TrendLabel;
use crate::utils::quantile_normal;
use std::fmt;
use std::str::FromStr;

/// Configuration of the Mann-Kendall decision rule.
#[derive(Debug, Clone)]
pub struct MKConfig {
    /// Minimum |Tau| for a significant trend to be reported.
    pub threshold: f64,
    /// Significance level of the two-sided test.
    pub alpha: f64,
    /// Caller's expectation about the data shape. The detector follows the
    /// data and warns when the two disagree.
    pub multivariate: bool,
}

impl Default for MKConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            alpha: 0.05,
            multivariate: false,
        }
    }
}

impl MKConfig {
    /// Set the Tau magnitude threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the significance level.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Declare the input as multivariate.
    pub fn multivariate(mut self, multivariate: bool) -> Self {
        self.multivariate = multivariate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(TrendError::InvalidParameter(format!(
                "threshold must lie in [0, 1], got {}",
                self.threshold
            )));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(TrendError::InvalidParameter(format!(
                "alpha must lie in (0, 1), got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// Critical value `Φ⁻¹(1 - α/2)` of the two-sided test.
    pub fn critical_value(&self) -> f64 {
        quantile_normal(1.0 - self.alpha / 2.0)
    }
}

/// Trend direction requested from a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    Down,
    #[default]
    Both,
}

impl Direction {
    /// Whether a record with trend `label` is selected by this direction.
    pub fn matches(&self, label: TrendLabel) -> bool {
        match self {
            Direction::Up => label == TrendLabel::Increasing,
            Direction::Down => label == TrendLabel::Decreasing,
            Direction::Both => label != TrendLabel::NoTrend,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "both" => Ok(Direction::Both),
            other => Err(TrendError::InvalidParameter(format!(
                "direction should be chosen from {{'up', 'down', 'both'}}, got '{other}'"
            ))),
        }
    }
}

/// Parameters of a single detection run.
#[derive(Debug, Clone)]
pub struct DetectionParams {
    /// Number of look-back observations tested at each anchor point.
    pub window_size: usize,
    /// When set, only the final anchor point is evaluated, and only the last
    /// `training_days` observations are used for deseasonalization and
    /// smoothing.
    pub training_days: Option<usize>,
    /// Trend direction to report.
    pub direction: Direction,
    /// Seasonal frequency to remove before testing.
    pub freq: Option<SeasonalFrequency>,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            window_size: 20,
            training_days: None,
            direction: Direction::Both,
            freq: None,
        }
    }
}

impl DetectionParams {
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn training_days(mut self, training_days: usize) -> Self {
        self.training_days = Some(training_days);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn freq(mut self, freq: SeasonalFrequency) -> Self {
        self.freq = Some(freq);
        self
    }

    /// Validate the parameters against a series of `series_len` observations.
    pub fn validate(&self, series_len: usize) -> Result<()> {
        if self.window_size < 2 {
            return Err(TrendError::InvalidParameter(format!(
                "window_size must be at least 2, got {}",
                self.window_size
            )));
        }

        match self.training_days {
            None => {
                if series_len < self.window_size {
                    return Err(TrendError::InsufficientData {
                        needed: self.window_size,
                        got: series_len,
                    });
                }
            }
            Some(training_days) => {
                if training_days < self.window_size {
                    return Err(TrendError::InvalidParameter(format!(
                        "training_days ({training_days}) must be at least window_size ({})",
                        self.window_size
                    )));
                }
                if series_len < training_days {
                    return Err(TrendError::InsufficientData {
                        needed: training_days,
                        got: series_len,
                    });
                }
            }
        }

        Ok(())
    }
}
