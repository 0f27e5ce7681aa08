//! Simple exponential smoothing used to denoise windows before trend testing.
//!
//! The smoother runs with a fixed smoothing level (no optimization) and
//! returns one-step-ahead fitted values:
//! `fitted_0 = y_0`, `fitted_t = level_{t-1}`,
//! `level_t = α × y_t + (1-α) × level_{t-1}`.

use crate::core::Window;
use tracing::debug;

/// Smoothing level applied to every column.
pub const SMOOTHING_LEVEL: f64 = 0.2;

/// Outcome of smoothing one column.
#[derive(Debug, Clone, PartialEq)]
pub enum SmoothingOutcome {
    /// Fitted values of the exponential smoother.
    Smoothed(Vec<f64>),
    /// The input was degenerate (fewer than two observations or constant)
    /// and is returned unchanged.
    Passthrough(Vec<f64>),
}

impl SmoothingOutcome {
    pub fn values(&self) -> &[f64] {
        match self {
            SmoothingOutcome::Smoothed(v) | SmoothingOutcome::Passthrough(v) => v,
        }
    }

    pub fn into_values(self) -> Vec<f64> {
        match self {
            SmoothingOutcome::Smoothed(v) | SmoothingOutcome::Passthrough(v) => v,
        }
    }

    pub fn is_smoothed(&self) -> bool {
        matches!(self, SmoothingOutcome::Smoothed(_))
    }
}

/// Smooth a column of observed values (no NaN).
///
/// # Arguments
/// * `values` - Observed values in time order
/// * `alpha` - Smoothing level (0 < alpha <= 1)
pub fn exponential_smoothing(values: &[f64], alpha: f64) -> SmoothingOutcome {
    if values.len() < 2 || is_constant(values) {
        return SmoothingOutcome::Passthrough(values.to_vec());
    }

    let mut level = values[0];
    let mut fitted = Vec::with_capacity(values.len());
    fitted.push(level);

    for &y in &values[..values.len() - 1] {
        level = alpha * y + (1.0 - alpha) * level;
        fitted.push(level);
    }

    SmoothingOutcome::Smoothed(fitted)
}

/// Smooth a column that may contain missing values.
///
/// Missing entries are dropped before smoothing and stay NaN in the output,
/// so the result is aligned with the input positions.
pub fn smooth_column(column: &[f64]) -> SmoothingOutcome {
    let observed: Vec<usize> = (0..column.len())
        .filter(|&i| !column[i].is_nan())
        .collect();
    let values: Vec<f64> = observed.iter().map(|&i| column[i]).collect();

    let scatter = |fitted: Vec<f64>| {
        let mut out = vec![f64::NAN; column.len()];
        for (&i, v) in observed.iter().zip(fitted) {
            out[i] = v;
        }
        out
    };

    match exponential_smoothing(&values, SMOOTHING_LEVEL) {
        SmoothingOutcome::Smoothed(fitted) => SmoothingOutcome::Smoothed(scatter(fitted)),
        SmoothingOutcome::Passthrough(raw) => SmoothingOutcome::Passthrough(scatter(raw)),
    }
}

/// Smooth every column of `window` independently.
pub fn smooth(window: &Window) -> Window {
    window.map_columns(|label, column| {
        let outcome = smooth_column(column);
        if !outcome.is_smoothed() {
            debug!(column = label, "column is degenerate, smoothing skipped");
        }
        outcome.into_values()
    })
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeSeries;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn fitted_values_lag_the_level() {
        let outcome = exponential_smoothing(&[10.0, 20.0, 20.0], 0.2);
        assert!(outcome.is_smoothed());
        let fitted = outcome.values();
        assert_relative_eq!(fitted[0], 10.0, epsilon = 1e-12);
        assert_relative_eq!(fitted[1], 10.0, epsilon = 1e-12);
        assert_relative_eq!(fitted[2], 12.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_column_passes_through() {
        let outcome = exponential_smoothing(&[5.0; 10], SMOOTHING_LEVEL);
        assert_eq!(outcome, SmoothingOutcome::Passthrough(vec![5.0; 10]));
    }

    #[test]
    fn short_column_passes_through() {
        assert!(!exponential_smoothing(&[1.0], SMOOTHING_LEVEL).is_smoothed());
        assert!(exponential_smoothing(&[], SMOOTHING_LEVEL).values().is_empty());
    }

    #[test]
    fn missing_values_keep_their_positions() {
        let outcome = smooth_column(&[f64::NAN, 1.0, f64::NAN, 2.0, 4.0]);
        let values = outcome.values();
        assert!(values[0].is_nan());
        assert!(values[2].is_nan());
        assert_relative_eq!(values[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(values[3], 1.0, epsilon = 1e-12);
        assert_relative_eq!(values[4], 1.2, epsilon = 1e-12);
    }

    #[test]
    fn smooth_handles_each_column_independently() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<_> = (0..4).map(|i| base + Duration::days(i)).collect();
        let ts = TimeSeries::multivariate(
            timestamps,
            vec![vec![3.0, 3.0, 3.0, 3.0], vec![0.0, 10.0, 0.0, 10.0]],
            vec!["flat".to_string(), "noisy".to_string()],
        )
        .unwrap();

        let smoothed = smooth(&ts.to_window());
        assert_eq!(smoothed.column(0).unwrap(), &[3.0, 3.0, 3.0, 3.0]);
        let noisy = smoothed.column(1).unwrap();
        assert_relative_eq!(noisy[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(noisy[2], 2.0, epsilon = 1e-12);
        assert_relative_eq!(noisy[3], 1.6, epsilon = 1e-12);
    }
}
