//! Statistic records and the change points derived from them.

use chrono::{DateTime, Utc};
use std::fmt;

/// Trend label of a Mann-Kendall decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendLabel {
    Increasing,
    Decreasing,
    NoTrend,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Increasing => "increasing",
            TrendLabel::Decreasing => "decreasing",
            TrendLabel::NoTrend => "no trend",
        }
    }

    /// Label with increasing and decreasing swapped.
    pub fn reversed(&self) -> TrendLabel {
        match self {
            TrendLabel::Increasing => TrendLabel::Decreasing,
            TrendLabel::Decreasing => TrendLabel::Increasing,
            TrendLabel::NoTrend => TrendLabel::NoTrend,
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-metric outcome within one evaluation.
///
/// `tau`, `trend` and `p_value` are `None` when the metric had fewer than two
/// valid observations in the window.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTrend {
    pub name: String,
    /// Valid observations after dropping missing values.
    pub n: usize,
    pub tau: Option<f64>,
    pub trend: Option<TrendLabel>,
    pub p_value: Option<f64>,
}

/// Pooled outcome across all metrics of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallTrend {
    /// Summed Mann-Kendall score.
    pub score: i64,
    /// Summed score variance.
    pub variance: f64,
    pub z: f64,
    /// `ΣS / Σ(n(n-1)/2)`; `None` when no metric had a pair of observations.
    pub tau: Option<f64>,
    pub trend: TrendLabel,
    pub p_value: f64,
}

/// Result of evaluating one anchor point.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticRecord {
    /// Anchor timestamp (last observation of the evaluated window).
    pub timestamp: DateTime<Utc>,
    /// One entry per metric, in column order.
    pub per_metric: Vec<MetricTrend>,
    pub overall: OverallTrend,
}

impl StatisticRecord {
    pub fn trend(&self) -> TrendLabel {
        self.overall.trend
    }

    pub fn tau(&self) -> Option<f64> {
        self.overall.tau
    }

    pub fn p_value(&self) -> f64 {
        self.overall.p_value
    }

    /// Look up a metric by name.
    pub fn metric(&self, name: &str) -> Option<&MetricTrend> {
        self.per_metric.iter().find(|m| m.name == name)
    }
}

/// A detected trend at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangePoint {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// `1 - p`.
    pub confidence: f64,
}

impl ChangePoint {
    pub fn from_record(record: &StatisticRecord) -> Self {
        Self {
            start_time: record.timestamp,
            end_time: record.timestamp,
            confidence: 1.0 - record.p_value(),
        }
    }
}

/// Metadata attached to every reported change point.
#[derive(Debug, Clone, PartialEq)]
pub struct MKMetadata {
    is_multivariate: bool,
    trend_direction: TrendLabel,
    tau: Option<f64>,
    per_metric: Vec<MetricTrend>,
}

impl MKMetadata {
    pub fn from_record(record: &StatisticRecord, is_multivariate: bool) -> Self {
        Self {
            is_multivariate,
            trend_direction: record.trend(),
            tau: record.tau(),
            per_metric: if is_multivariate {
                record.per_metric.clone()
            } else {
                Vec::new()
            },
        }
    }

    pub fn detector_type(&self) -> &'static str {
        "MKDetector"
    }

    pub fn is_multivariate(&self) -> bool {
        self.is_multivariate
    }

    /// Overall trend label.
    pub fn trend_direction(&self) -> TrendLabel {
        self.trend_direction
    }

    /// Overall Kendall's Tau.
    pub fn tau(&self) -> Option<f64> {
        self.tau
    }

    /// Per-metric outcomes; empty for univariate input.
    pub fn per_metric(&self) -> &[MetricTrend] {
        &self.per_metric
    }
}

impl fmt::Display for MKMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(is_multivariate: {}, trend_direction: {}, Tau: {}",
            self.detector_type(),
            self.is_multivariate,
            self.trend_direction,
            fmt_tau(self.tau)
        )?;
        if !self.per_metric.is_empty() {
            f.write_str(", metrics: [")?;
            for (i, m) in self.per_metric.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                let trend = m.trend.map(|t| t.as_str()).unwrap_or("none");
                write!(f, "{}: {} ({})", m.name, fmt_tau(m.tau), trend)?;
            }
            f.write_str("]")?;
        }
        f.write_str(")")
    }
}

fn fmt_tau(tau: Option<f64>) -> String {
    match tau {
        Some(t) => format!("{t:.4}"),
        None => "none".to_string(),
    }
}

/// A metric ranked by trend strength at one time point.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMetric {
    pub name: String,
    pub tau: Option<f64>,
    pub trend: Option<TrendLabel>,
}

/// Per-metric Tau for every evaluated time point.
#[derive(Debug, Clone, PartialEq)]
pub struct TauHistory {
    pub timestamps: Vec<DateTime<Utc>>,
    pub metrics: Vec<String>,
    /// `values[t][m]` is the Tau of metric `m` at `timestamps[t]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl TauHistory {
    /// Tau series of one metric.
    pub fn metric(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.metrics.iter().position(|m| m == name)?;
        Some(self.values.iter().map(|row| row[idx]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(trend: TrendLabel, tau: Option<f64>, p_value: f64) -> StatisticRecord {
        StatisticRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            per_metric: vec![
                MetricTrend {
                    name: "a".to_string(),
                    n: 20,
                    tau,
                    trend: Some(trend),
                    p_value: Some(p_value),
                },
                MetricTrend {
                    name: "b".to_string(),
                    n: 1,
                    tau: None,
                    trend: None,
                    p_value: None,
                },
            ],
            overall: OverallTrend {
                score: 150,
                variance: 950.0,
                z: 4.8,
                tau,
                trend,
                p_value,
            },
        }
    }

    #[test]
    fn labels_render_like_the_decision_rule() {
        assert_eq!(TrendLabel::Increasing.to_string(), "increasing");
        assert_eq!(TrendLabel::NoTrend.to_string(), "no trend");
        assert_eq!(TrendLabel::Increasing.reversed(), TrendLabel::Decreasing);
        assert_eq!(TrendLabel::NoTrend.reversed(), TrendLabel::NoTrend);
    }

    #[test]
    fn change_point_confidence_is_one_minus_p() {
        let rec = record(TrendLabel::Increasing, Some(0.9), 0.01);
        let cp = ChangePoint::from_record(&rec);
        assert_eq!(cp.start_time, rec.timestamp);
        assert_eq!(cp.end_time, rec.timestamp);
        assert!((cp.confidence - 0.99).abs() < 1e-12);
    }

    #[test]
    fn metadata_display_lists_metrics() {
        let rec = record(TrendLabel::Increasing, Some(0.9), 0.01);
        let meta = MKMetadata::from_record(&rec, true);
        let text = meta.to_string();
        assert!(text.starts_with("MKDetector(is_multivariate: true"));
        assert!(text.contains("trend_direction: increasing"));
        assert!(text.contains("a: 0.9000 (increasing)"));
        assert!(text.contains("b: none (none)"));
    }

    #[test]
    fn univariate_metadata_has_no_metric_list() {
        let rec = record(TrendLabel::Decreasing, Some(-0.85), 0.001);
        let meta = MKMetadata::from_record(&rec, false);
        assert!(meta.per_metric().is_empty());
        assert_eq!(meta.tau(), Some(-0.85));
        assert!(!meta.to_string().contains("metrics"));
    }

    #[test]
    fn record_metric_lookup() {
        let rec = record(TrendLabel::NoTrend, Some(0.1), 0.5);
        assert_eq!(rec.metric("b").map(|m| m.n), Some(1));
        assert!(rec.metric("c").is_none());
    }
}
