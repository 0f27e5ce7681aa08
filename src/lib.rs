//! # anofox-trend
//!
//! Sequential monotonic-trend detection for time series.
//!
//! Runs the Mann-Kendall test over a sliding lookback window (or at a single
//! anchor point) on univariate or multivariate series, after optional
//! deseasonalization and exponential smoothing. Multivariate series are pooled
//! with the Hirsch-Slack extension: per-series scores and variances are summed
//! before the overall decision is taken.

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod transform;
pub mod trend;
pub mod utils;

pub use error::{Result, TrendError};

pub mod prelude {
    pub use crate::core::{TimeSeries, Window};
    pub use crate::error::{Result, TrendError};
    pub use crate::transform::SeasonalFrequency;
    pub use crate::trend::{
        ChangePoint, DetectionParams, Direction, MKConfig, MKDetector, MKMetadata, RankedMetric,
        StatisticRecord, TrendLabel,
    };
}
