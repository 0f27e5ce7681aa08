//! Mann-Kendall trend detection.
//!
//! - [`mann_kendall`]: univariate score, variance, z-score, Tau and decision
//! - [`multivariate`]: per-column evaluation pooled into an overall decision
//! - [`detector`]: whole-series scan and anchor-point evaluation
//! - [`selection`]: filtering by direction and ranking of metrics
//!
//! # Example
//!
//! ```
//! use anofox_trend::core::TimeSeries;
//! use anofox_trend::trend::{DetectionParams, Direction, MKConfig, MKDetector};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let timestamps: Vec<_> = (0..60).map(|i| base + Duration::days(i)).collect();
//! let up: Vec<f64> = (0..60).map(|i| i as f64).collect();
//! let flat: Vec<f64> = (0..60).map(|i| (i % 3) as f64).collect();
//! let series = TimeSeries::multivariate(
//!     timestamps,
//!     vec![up, flat],
//!     vec!["cpu".to_string(), "latency".to_string()],
//! )
//! .unwrap();
//!
//! let mut detector = MKDetector::new(series, MKConfig::default().multivariate(true));
//! let params = DetectionParams::default().training_days(30).direction(Direction::Up);
//! detector.run(&params).unwrap();
//!
//! let ranked = detector.rank_metrics(None, Some(1)).unwrap();
//! assert_eq!(ranked[0].name, "cpu");
//! ```

pub mod config;
pub mod detector;
pub mod mann_kendall;
pub mod multivariate;
pub mod result;
pub mod selection;

pub use config::{DetectionParams, Direction, MKConfig};
pub use detector::MKDetector;
pub use mann_kendall::{
    kendall_tau, mann_kendall_test, mk_score, mk_variance, pair_count, tie_term, trend_decision,
    variance_no_ties, z_score, MannKendallResult,
};
pub use multivariate::{evaluate_columns, evaluate_window, ColumnStatistic, TrendEvaluation};
pub use result::{
    ChangePoint, MKMetadata, MetricTrend, OverallTrend, RankedMetric, StatisticRecord, TauHistory,
    TrendLabel,
};
pub use selection::{rank_metrics, select_records};
