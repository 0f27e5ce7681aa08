//! Sequential Mann-Kendall trend detector.
//!
//! The detector evaluates the Mann-Kendall test either at every anchor point
//! of a series (whole-series scan) or at the final timestamp only (anchor-point
//! evaluation), then reports the anchor points whose trend matches the
//! requested direction.

use crate::core::{TimeSeries, Window};
use crate::error::{Result, TrendError};
use crate::transform::preprocess;
use crate::trend::config::{DetectionParams, MKConfig};
use crate::trend::multivariate::{evaluate_columns, evaluate_window, TrendEvaluation};
use crate::trend::result::{ChangePoint, MKMetadata, RankedMetric, StatisticRecord, TauHistory};
use crate::trend::selection::{rank_metrics, select_records};
use chrono::{DateTime, Utc};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::ops::Range;
use tracing::{debug, info, warn};

/// Mann-Kendall trend detector over a univariate or multivariate series.
///
/// # Example
/// ```
/// use anofox_trend::core::TimeSeries;
/// use anofox_trend::trend::{DetectionParams, Direction, MKConfig, MKDetector, TrendLabel};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps: Vec<_> = (0..40).map(|i| base + Duration::days(i)).collect();
/// let values: Vec<f64> = (0..40).map(|i| i as f64).collect();
/// let series = TimeSeries::univariate(timestamps, values).unwrap();
///
/// let mut detector = MKDetector::new(series, MKConfig::default());
/// let detected = detector
///     .run(&DetectionParams::default().direction(Direction::Up))
///     .unwrap();
///
/// assert_eq!(detector.statistics().unwrap().len(), 20);
/// assert!(detected
///     .iter()
///     .all(|(_, meta)| meta.trend_direction() == TrendLabel::Increasing));
/// ```
#[derive(Debug, Clone)]
pub struct MKDetector {
    series: TimeSeries,
    config: MKConfig,
    multivariate: bool,
    last_run: Option<DetectionRun>,
}

#[derive(Debug, Clone)]
struct DetectionRun {
    params: DetectionParams,
    records: Vec<StatisticRecord>,
}

impl MKDetector {
    /// Create a detector for `series`.
    ///
    /// Univariate or multivariate handling follows the data; a mismatch with
    /// `config.multivariate` is logged.
    pub fn new(series: TimeSeries, config: MKConfig) -> Self {
        let multivariate = series.is_multivariate();
        if multivariate && !config.multivariate {
            warn!(
                dimensions = series.dimensions(),
                "data is multivariate, a multivariate Mann-Kendall test will be performed"
            );
        } else if !multivariate && config.multivariate {
            warn!("data is univariate, a univariate Mann-Kendall test will be performed");
        }

        Self {
            series,
            config,
            multivariate,
            last_run: None,
        }
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn config(&self) -> &MKConfig {
        &self.config
    }

    pub fn is_multivariate(&self) -> bool {
        self.multivariate
    }

    /// Parameters of the last successful run.
    pub fn params(&self) -> Option<&DetectionParams> {
        self.last_run.as_ref().map(|run| &run.params)
    }

    /// Run trend detection and return the anchor points whose trend matches
    /// `params.direction`, in chronological order.
    ///
    /// Configuration errors abort the run before any statistic is computed. A
    /// failed run discards the results of any previous run.
    pub fn run(&mut self, params: &DetectionParams) -> Result<Vec<(ChangePoint, MKMetadata)>> {
        self.last_run = None;
        self.config.validate()?;
        params.validate(self.series.len())?;

        let records = match params.training_days {
            None => {
                info!(
                    window_size = params.window_size,
                    freq = ?params.freq,
                    "performing trend detection on the whole time series"
                );
                self.scan_whole_series(params)?
            }
            Some(training_days) => {
                info!(
                    anchor = ?self.series.last_timestamp(),
                    training_days,
                    window_size = params.window_size,
                    "performing trend detection for the anchor point"
                );
                vec![self.evaluate_anchor(params, training_days)?]
            }
        };

        let detected: Vec<_> = select_records(&records, params.direction)
            .into_iter()
            .map(|r| {
                (
                    ChangePoint::from_record(r),
                    MKMetadata::from_record(r, self.multivariate),
                )
            })
            .collect();

        if detected.is_empty() {
            warn!(direction = %params.direction, "no trend detected");
        }

        self.last_run = Some(DetectionRun {
            params: params.clone(),
            records,
        });

        Ok(detected)
    }

    /// Full, unfiltered statistics of the last run, in chronological order.
    pub fn statistics(&self) -> Result<&[StatisticRecord]> {
        self.last_run
            .as_ref()
            .map(|run| run.records.as_slice())
            .ok_or(TrendError::DetectionRequired)
    }

    /// Rank metrics by trend strength at `time_point`, using the direction of
    /// the last run.
    ///
    /// After an anchor-point run `time_point` may be `None`, meaning the single
    /// anchor. Multivariate input only.
    pub fn rank_metrics(
        &self,
        time_point: Option<DateTime<Utc>>,
        top_k: Option<usize>,
    ) -> Result<Vec<RankedMetric>> {
        if !self.multivariate {
            return Err(TrendError::NotMultivariate);
        }
        let run = self.last_run.as_ref().ok_or(TrendError::DetectionRequired)?;

        let record = match (time_point, run.params.training_days) {
            (Some(t), _) => run
                .records
                .iter()
                .find(|r| r.timestamp == t)
                .ok_or_else(|| TrendError::TimestampError(format!("no statistics at {t}")))?,
            (None, Some(_)) => run.records.last().ok_or(TrendError::DetectionRequired)?,
            (None, None) => {
                return Err(TrendError::InvalidParameter(
                    "time_point is required after a whole-series scan".to_string(),
                ))
            }
        };

        Ok(rank_metrics(record, run.params.direction, top_k))
    }

    /// Per-metric Tau at every evaluated time point. Multivariate input only.
    pub fn tau_history(&self) -> Result<TauHistory> {
        if !self.multivariate {
            return Err(TrendError::NotMultivariate);
        }
        let records = self.statistics()?;

        Ok(TauHistory {
            timestamps: records.iter().map(|r| r.timestamp).collect(),
            metrics: self.series.labels().to_vec(),
            values: records
                .iter()
                .map(|r| r.per_metric.iter().map(|m| m.tau).collect())
                .collect(),
        })
    }

    fn scan_whole_series(&self, params: &DetectionParams) -> Result<Vec<StatisticRecord>> {
        let window = preprocess(&self.series.to_window(), params.freq).without_empty_rows();
        if window.len() < params.window_size {
            return Err(TrendError::InsufficientData {
                needed: params.window_size,
                got: window.len(),
            });
        }
        let anchors = scan_anchors(window.len(), params.window_size);
        debug!(
            rows = window.len(),
            states = anchors.len(),
            "scanning anchor points"
        );

        #[cfg(feature = "rayon")]
        let records = anchors
            .into_par_iter()
            .map(|t| self.evaluate_at(&window, t, params.window_size))
            .collect();
        #[cfg(not(feature = "rayon"))]
        let records = anchors
            .map(|t| self.evaluate_at(&window, t, params.window_size))
            .collect();

        records
    }

    fn evaluate_at(
        &self,
        window: &Window,
        t: usize,
        window_size: usize,
    ) -> Result<StatisticRecord> {
        let evaluation = evaluate_window(window, t, window_size, &self.config)?;
        Ok(into_record(window.timestamps()[t], evaluation))
    }

    fn evaluate_anchor(
        &self,
        params: &DetectionParams,
        training_days: usize,
    ) -> Result<StatisticRecord> {
        let recent = self.series.tail(training_days);
        let anchor = recent.last_timestamp().ok_or(TrendError::EmptyData)?;
        let window = preprocess(&recent.to_window(), params.freq).without_empty_rows();

        let evaluation = if window.is_empty() {
            debug!(%anchor, "no observations survive preprocessing");
            let empty: Vec<&[f64]> = window.labels().iter().map(|_| &[][..]).collect();
            evaluate_columns(window.labels(), &empty, &self.config)
        } else {
            evaluate_window(&window, window.len() - 1, params.window_size, &self.config)?
        };

        Ok(into_record(anchor, evaluation))
    }
}

fn into_record(timestamp: DateTime<Utc>, evaluation: TrendEvaluation) -> StatisticRecord {
    StatisticRecord {
        timestamp,
        per_metric: evaluation.per_metric,
        overall: evaluation.overall,
    }
}

/// Row indices visited by a whole-series scan of `len` rows.
///
/// Anchors run from `window_size` to the last row. A series of exactly
/// `window_size` rows is evaluated once, at its last row.
fn scan_anchors(len: usize, window_size: usize) -> Range<usize> {
    if len > window_size {
        window_size..len
    } else if len == window_size && len > 0 {
        len - 1..len
    } else {
        0..0
    }
}
