//! Multivariate Mann-Kendall test (Hirsch & Slack, 1984).
//!
//! Every column is tested on its own valid observations; the overall statistic
//! sums the per-column scores, variances and pair counts before the z-score and
//! Tau are formed. A univariate series is the one-column case.

use crate::core::Window;
use crate::error::Result;
use crate::trend::config::MKConfig;
use crate::trend::mann_kendall::{
    drop_missing, kendall_tau, mk_score, mk_variance, pair_count, trend_decision, z_score,
};
use crate::trend::result::{MetricTrend, OverallTrend, TrendLabel};
use crate::utils::two_sided_p_value;
use tracing::debug;

/// Score components of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStatistic {
    /// Valid observations.
    pub n: usize,
    pub score: i64,
    pub variance: f64,
}

impl ColumnStatistic {
    /// Compute the components of `x`, ignoring missing values.
    pub fn from_values(x: &[f64]) -> Self {
        let x = drop_missing(x);
        Self {
            n: x.len(),
            score: mk_score(&x),
            variance: mk_variance(&x),
        }
    }

    /// Tau denominator `n(n-1)/2`.
    pub fn pairs(&self) -> f64 {
        pair_count(self.n)
    }

    pub fn tau(&self) -> Option<f64> {
        kendall_tau(self.score, self.n)
    }
}

/// Per-metric and pooled outcome of one window.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendEvaluation {
    pub per_metric: Vec<MetricTrend>,
    pub overall: OverallTrend,
}

/// Test every column and pool the results.
///
/// Columns with fewer than two valid observations get `None` for Tau, trend
/// and p-value and contribute nothing to the pooled statistic.
pub fn evaluate_columns(
    labels: &[String],
    columns: &[&[f64]],
    config: &MKConfig,
) -> TrendEvaluation {
    let mut score = 0i64;
    let mut variance = 0.0;
    let mut pairs = 0.0;
    let mut per_metric = Vec::with_capacity(columns.len());

    for (label, column) in labels.iter().zip(columns) {
        let stat = ColumnStatistic::from_values(column);

        let metric = match stat.tau() {
            Some(tau) => {
                let z = z_score(stat.score, stat.variance);
                let (p_value, trend) = trend_decision(z, tau, config);
                MetricTrend {
                    name: label.clone(),
                    n: stat.n,
                    tau: Some(tau),
                    trend: Some(trend),
                    p_value: Some(p_value),
                }
            }
            None => {
                debug!(metric = %label, valid = stat.n, "fewer than two valid observations");
                MetricTrend {
                    name: label.clone(),
                    n: stat.n,
                    tau: None,
                    trend: None,
                    p_value: None,
                }
            }
        };
        per_metric.push(metric);

        score += stat.score;
        variance += stat.variance;
        pairs += stat.pairs();
    }

    let z = z_score(score, variance);
    let tau = (pairs > 0.0).then(|| score as f64 / pairs);
    let (p_value, trend) = match tau {
        Some(tau) => trend_decision(z, tau, config),
        None => (two_sided_p_value(z), TrendLabel::NoTrend),
    };

    TrendEvaluation {
        per_metric,
        overall: OverallTrend {
            score,
            variance,
            z,
            tau,
            trend,
            p_value,
        },
    }
}

/// Evaluate the trailing `window_size` rows of `window` ending at row `end`
/// (inclusive).
pub fn evaluate_window(
    window: &Window,
    end: usize,
    window_size: usize,
    config: &MKConfig,
) -> Result<TrendEvaluation> {
    let start = (end + 1).saturating_sub(window_size);
    let columns = window.rows(start, end + 1)?;
    Ok(evaluate_columns(window.labels(), &columns, config))
}
