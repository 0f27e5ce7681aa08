//! Filtering of statistic records and ranking of metrics by trend strength.

use crate::trend::config::Direction;
use crate::trend::result::{RankedMetric, StatisticRecord};

/// Keep the records whose overall trend matches `direction`.
pub fn select_records(
    records: &[StatisticRecord],
    direction: Direction,
) -> Vec<&StatisticRecord> {
    records
        .iter()
        .filter(|r| direction.matches(r.trend()))
        .collect()
}

/// Rank the metrics of one record by trend strength.
///
/// - `Down`: Tau ascending
/// - `Up`: Tau descending
/// - `Both`: |Tau| descending
///
/// The sort is stable, so ties keep column order. Metrics without a Tau are
/// placed after every ranked metric, in column order. `top_k = None` returns
/// all metrics.
pub fn rank_metrics(
    record: &StatisticRecord,
    direction: Direction,
    top_k: Option<usize>,
) -> Vec<RankedMetric> {
    let (mut ranked, unranked): (Vec<_>, Vec<_>) =
        record.per_metric.iter().partition(|m| m.tau.is_some());

    let key = |tau: Option<f64>| tau.unwrap_or(0.0);
    ranked.sort_by(|a, b| {
        let (ta, tb) = (key(a.tau), key(b.tau));
        match direction {
            Direction::Down => ta.total_cmp(&tb),
            Direction::Up => tb.total_cmp(&ta),
            Direction::Both => tb.abs().total_cmp(&ta.abs()),
        }
    });

    let limit = top_k.unwrap_or(usize::MAX);
    ranked
        .into_iter()
        .chain(unranked)
        .take(limit)
        .map(|m| RankedMetric {
            name: m.name.clone(),
            tau: m.tau,
            trend: m.trend,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::result::{MetricTrend, OverallTrend, TrendLabel};
    use chrono::{Duration, TimeZone, Utc};

    fn metric(name: &str, tau: Option<f64>) -> MetricTrend {
        MetricTrend {
            name: name.to_string(),
            n: 20,
            tau,
            trend: tau.map(|t| {
                if t > 0.8 {
                    TrendLabel::Increasing
                } else if t < -0.8 {
                    TrendLabel::Decreasing
                } else {
                    TrendLabel::NoTrend
                }
            }),
            p_value: tau.map(|_| 0.01),
        }
    }

    fn record(day: i64, trend: TrendLabel, per_metric: Vec<MetricTrend>) -> StatisticRecord {
        StatisticRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day),
            per_metric,
            overall: OverallTrend {
                score: 0,
                variance: 1.0,
                z: 0.0,
                tau: Some(0.0),
                trend,
                p_value: 0.5,
            },
        }
    }

    fn names(ranked: &[RankedMetric]) -> Vec<&str> {
        ranked.iter().map(|m| m.name.as_str()).collect()
    }

    fn sample() -> StatisticRecord {
        record(
            0,
            TrendLabel::NoTrend,
            vec![
                metric("a", Some(0.5)),
                metric("b", None),
                metric("c", Some(-0.9)),
                metric("d", Some(0.9)),
                metric("e", Some(-0.5)),
            ],
        )
    }

    #[test]
    fn select_by_direction() {
        let records = vec![
            record(0, TrendLabel::Increasing, vec![]),
            record(1, TrendLabel::NoTrend, vec![]),
            record(2, TrendLabel::Decreasing, vec![]),
            record(3, TrendLabel::Increasing, vec![]),
        ];

        let up = select_records(&records, Direction::Up);
        assert_eq!(up.len(), 2);
        assert!(up.iter().all(|r| r.trend() == TrendLabel::Increasing));

        let down = select_records(&records, Direction::Down);
        assert_eq!(down.len(), 1);
        assert_eq!(down[0].timestamp, records[2].timestamp);

        let both = select_records(&records, Direction::Both);
        assert_eq!(both.len(), 3);
        assert!(both.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn rank_down_sorts_tau_ascending() {
        let ranked = rank_metrics(&sample(), Direction::Down, None);
        assert_eq!(names(&ranked), vec!["c", "e", "a", "d", "b"]);
    }

    #[test]
    fn rank_up_sorts_tau_descending() {
        let ranked = rank_metrics(&sample(), Direction::Up, None);
        assert_eq!(names(&ranked), vec!["d", "a", "e", "c", "b"]);
    }

    #[test]
    fn rank_both_sorts_by_magnitude_with_stable_ties() {
        let ranked = rank_metrics(&sample(), Direction::Both, None);
        assert_eq!(names(&ranked), vec!["c", "d", "a", "e", "b"]);
    }

    #[test]
    fn top_k_truncates() {
        let ranked = rank_metrics(&sample(), Direction::Both, Some(2));
        assert_eq!(names(&ranked), vec!["c", "d"]);
        assert!(rank_metrics(&sample(), Direction::Both, Some(0)).is_empty());
        assert_eq!(rank_metrics(&sample(), Direction::Both, Some(10)).len(), 5);
    }

    #[test]
    fn null_metrics_are_kept_last() {
        let ranked = rank_metrics(&sample(), Direction::Up, None);
        let last = ranked.last().unwrap();
        assert_eq!(last.name, "b");
        assert!(last.tau.is_none());
        assert!(last.trend.is_none());
    }
}
