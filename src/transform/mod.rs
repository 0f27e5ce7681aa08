//! Preprocessing transforms applied to a window before trend testing.
//!
//! # Example
//!
//! ```
//! use anofox_trend::transform::{exponential_smoothing, rolling_mean, SMOOTHING_LEVEL};
//!
//! let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//!
//! // Trailing moving average with window 3
//! let rm = rolling_mean(&series, 3);
//! assert!(rm[0].is_nan());
//!
//! // Exponential smoothing with the fixed level
//! let smoothed = exponential_smoothing(&series, SMOOTHING_LEVEL);
//! assert!(smoothed.is_smoothed());
//! ```

pub mod smoothing;
pub mod window;

pub use smoothing::{
    exponential_smoothing, smooth, smooth_column, SmoothingOutcome, SMOOTHING_LEVEL,
};
pub use window::{remove_seasonality, rolling_mean, SeasonalFrequency};

use crate::core::Window;

/// Deseasonalize then smooth a window.
pub fn preprocess(window: &Window, freq: Option<SeasonalFrequency>) -> Window {
    smooth(&remove_seasonality(window, freq))
}
