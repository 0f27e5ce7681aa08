//! Rolling-window deseasonalization.
//!
//! Seasonality is removed with a trailing moving average whose length equals
//! the seasonal period.

use crate::core::Window;
use crate::error::{Result, TrendError};
use std::fmt;
use std::str::FromStr;

/// Seasonal frequency of the input, mapped to a moving-average period in
/// observations (the series is assumed to be daily).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeasonalFrequency {
    Weekly,
    Monthly,
    Yearly,
}

impl SeasonalFrequency {
    /// Length of the moving-average window for this frequency.
    pub fn period(&self) -> usize {
        match self {
            SeasonalFrequency::Weekly => 7,
            SeasonalFrequency::Monthly => 30,
            SeasonalFrequency::Yearly => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonalFrequency::Weekly => "weekly",
            SeasonalFrequency::Monthly => "monthly",
            SeasonalFrequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for SeasonalFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeasonalFrequency {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "weekly" => Ok(SeasonalFrequency::Weekly),
            "monthly" => Ok(SeasonalFrequency::Monthly),
            "yearly" => Ok(SeasonalFrequency::Yearly),
            other => Err(TrendError::InvalidParameter(format!(
                "freq should be chosen from {{'weekly', 'monthly', 'yearly'}}, got '{other}'"
            ))),
        }
    }
}

/// Compute the trailing rolling mean (moving average).
///
/// The first `window - 1` positions have no complete window and are NaN. A
/// window that contains a NaN yields NaN.
///
/// # Arguments
/// * `series` - Input time series
/// * `window` - Window size
pub fn rolling_mean(series: &[f64], window: usize) -> Vec<f64> {
    if series.is_empty() || window == 0 {
        return vec![f64::NAN; series.len()];
    }

    let n = series.len();
    let mut result = vec![f64::NAN; n];

    for i in (window - 1)..n {
        let sum: f64 = series[i + 1 - window..=i].iter().sum();
        result[i] = sum / window as f64;
    }

    result
}

/// Remove seasonality from every column of `window`.
///
/// `None` leaves the window unchanged.
pub fn remove_seasonality(window: &Window, freq: Option<SeasonalFrequency>) -> Window {
    match freq {
        None => window.clone(),
        Some(freq) => {
            let period = freq.period();
            window.map_columns(|_, column| rolling_mean(column, period))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeSeries;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn rolling_mean_basic() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = rolling_mean(&series, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_relative_eq!(result[2], 2.0, epsilon = 1e-10);
        assert_relative_eq!(result[3], 3.0, epsilon = 1e-10);
        assert_relative_eq!(result[4], 4.0, epsilon = 1e-10);
    }

    #[test]
    fn rolling_mean_propagates_missing_values() {
        let series = vec![1.0, f64::NAN, 3.0, 4.0, 5.0];
        let result = rolling_mean(&series, 2);

        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_relative_eq!(result[3], 3.5, epsilon = 1e-10);
    }

    #[test]
    fn rolling_mean_window_longer_than_series() {
        let result = rolling_mean(&[1.0, 2.0], 7);
        assert!(result.iter().all(|v| v.is_nan()));
        assert!(rolling_mean(&[], 3).is_empty());
    }

    #[test]
    fn frequency_periods() {
        assert_eq!(SeasonalFrequency::Weekly.period(), 7);
        assert_eq!(SeasonalFrequency::Monthly.period(), 30);
        assert_eq!(SeasonalFrequency::Yearly.period(), 365);
    }

    #[test]
    fn frequency_parses_from_str() {
        assert_eq!(
            "monthly".parse::<SeasonalFrequency>().unwrap(),
            SeasonalFrequency::Monthly
        );
        assert!("daily".parse::<SeasonalFrequency>().is_err());
    }

    #[test]
    fn weekly_moving_average_flattens_weekly_cycle() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<_> = (0..28).map(|i| base + Duration::days(i)).collect();
        let values: Vec<f64> = (0..28)
            .map(|i| 10.0 + (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin())
            .collect();
        let window = TimeSeries::univariate(timestamps, values)
            .unwrap()
            .to_window();

        let deseasonalized = remove_seasonality(&window, Some(SeasonalFrequency::Weekly));
        let column = deseasonalized.column(0).unwrap();

        assert!(column[..6].iter().all(|v| v.is_nan()));
        for &v in &column[6..] {
            assert_relative_eq!(v, 10.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn no_frequency_is_identity() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<_> = (0..3).map(|i| base + Duration::days(i)).collect();
        let window = TimeSeries::univariate(timestamps, vec![3.0, 1.0, 2.0])
            .unwrap()
            .to_window();
        assert_eq!(remove_seasonality(&window, None), window);
    }
}
