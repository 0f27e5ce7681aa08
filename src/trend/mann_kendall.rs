//! Univariate Mann-Kendall trend test.
//!
//! Non-parametric test for a monotonic trend (Mann 1945, Kendall 1975,
//! Gilbert 1987). The score `S` counts concordant minus discordant pairs, its
//! variance is corrected for tied values, and the normal approximation with
//! continuity correction gives the z-score and two-sided p-value.

use crate::error::{Result, TrendError};
use crate::trend::config::MKConfig;
use crate::trend::result::TrendLabel;
use crate::utils::two_sided_p_value;

/// Result of a univariate Mann-Kendall test.
#[derive(Debug, Clone, PartialEq)]
pub struct MannKendallResult {
    /// Number of valid observations tested.
    pub n: usize,
    pub score: i64,
    pub variance: f64,
    pub z: f64,
    /// Kendall's Tau, in [-1, 1].
    pub tau: f64,
    pub p_value: f64,
    pub trend: TrendLabel,
}

/// Mann-Kendall score `S = Σ_{k<j} sign(x_j - x_k)`.
pub fn mk_score(x: &[f64]) -> i64 {
    let n = x.len();
    let mut s = 0i64;
    for k in 0..n.saturating_sub(1) {
        let xk = x[k];
        s += x[k + 1..].iter().map(|&xj| sign(xj - xk)).sum::<i64>();
    }
    s
}

#[inline]
fn sign(d: f64) -> i64 {
    if d > 0.0 {
        1
    } else if d < 0.0 {
        -1
    } else {
        0
    }
}

/// Variance of `S` when every value is distinct: `n(n-1)(2n+5)/18`.
pub fn variance_no_ties(n: usize) -> f64 {
    let n = n as f64;
    n * (n - 1.0) * (2.0 * n + 5.0) / 18.0
}

/// Tie term `Σ t(t-1)(2t+5)` over groups of `t` equal values.
pub fn tie_term(x: &[f64]) -> f64 {
    let mut sorted = x.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
        .chunk_by(|a, b| a == b)
        .map(|group| {
            let t = group.len() as f64;
            t * (t - 1.0) * (2.0 * t + 5.0)
        })
        .sum()
}

/// Tie-corrected variance of `S`: `(n(n-1)(2n+5) - Σ t(t-1)(2t+5)) / 18`.
pub fn mk_variance(x: &[f64]) -> f64 {
    let n = x.len() as f64;
    (n * (n - 1.0) * (2.0 * n + 5.0) - tie_term(x)) / 18.0
}

/// Normalized test statistic with continuity correction.
pub fn z_score(score: i64, variance: f64) -> f64 {
    if score == 0 || variance <= 0.0 {
        return 0.0;
    }
    let s = score as f64;
    if score > 0 {
        (s - 1.0) / variance.sqrt()
    } else {
        (s + 1.0) / variance.sqrt()
    }
}

/// Number of pairs `n(n-1)/2`, the denominator of Kendall's Tau.
pub fn pair_count(n: usize) -> f64 {
    0.5 * n as f64 * (n as f64 - 1.0)
}

/// Kendall's Tau `S / (n(n-1)/2)`; `None` for fewer than two observations.
pub fn kendall_tau(score: i64, n: usize) -> Option<f64> {
    let pairs = pair_count(n);
    (pairs > 0.0).then(|| score as f64 / pairs)
}

/// Apply the decision rule to a z-score and Tau.
///
/// A trend is reported only when the test is significant at `alpha` *and*
/// `|Tau|` exceeds `threshold` in the direction of `z`.
///
/// Returns the two-sided p-value and the trend label.
pub fn trend_decision(z: f64, tau: f64, config: &MKConfig) -> (f64, TrendLabel) {
    let p_value = two_sided_p_value(z);
    let significant = z.abs() > config.critical_value();

    let trend = if significant && z < 0.0 && tau < -config.threshold {
        TrendLabel::Decreasing
    } else if significant && z > 0.0 && tau > config.threshold {
        TrendLabel::Increasing
    } else {
        TrendLabel::NoTrend
    };

    (p_value, trend)
}

/// Remove missing values.
pub fn drop_missing(x: &[f64]) -> Vec<f64> {
    x.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Run the Mann-Kendall test on `x`, ignoring missing values.
///
/// # Errors
/// Returns [`TrendError::InsufficientData`] when fewer than two valid
/// observations remain.
///
/// # Example
/// ```
/// use anofox_trend::trend::{mann_kendall_test, MKConfig, TrendLabel};
///
/// let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
/// let result = mann_kendall_test(&x, &MKConfig::default()).unwrap();
/// assert_eq!(result.tau, 1.0);
/// assert_eq!(result.trend, TrendLabel::Increasing);
/// ```
pub fn mann_kendall_test(x: &[f64], config: &MKConfig) -> Result<MannKendallResult> {
    let x = drop_missing(x);
    let n = x.len();

    if n < 2 {
        return Err(TrendError::InsufficientData { needed: 2, got: n });
    }

    let score = mk_score(&x);
    let tau = score as f64 / pair_count(n);

    let variance = mk_variance(&x);
    let z = z_score(score, variance);
    let (p_value, trend) = trend_decision(z, tau, config);

    Ok(MannKendallResult {
        n,
        score,
        variance,
        z,
        tau,
        p_value,
        trend,
    })
}
