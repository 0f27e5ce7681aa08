//! Trend detection on a multivariate daily series.
//!
//! Run with: `cargo run --example trend_detection`

use anofox_trend::prelude::*;
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("anofox_trend=info")
        .init();

    let n = 180;
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<_> = (0..n).map(|i| base + Duration::days(i)).collect();

    // Weekly cycle everywhere; "signups" starts climbing after day 100.
    let weekly = |i: i64| 5.0 * (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin();
    let signups: Vec<f64> = (0..n)
        .map(|i| 100.0 + weekly(i) + if i > 100 { 2.0 * (i - 100) as f64 } else { 0.0 })
        .collect();
    let errors: Vec<f64> = (0..n).map(|i| 20.0 + weekly(i) + (i % 5) as f64).collect();
    let churn: Vec<f64> = (0..n).map(|i| 50.0 + weekly(i) - 0.1 * i as f64).collect();

    let series = TimeSeries::multivariate(
        timestamps,
        vec![signups, errors, churn],
        vec!["signups".into(), "errors".into(), "churn".into()],
    )?;

    println!("=== Whole-series scan ===");
    let mut detector = MKDetector::new(series.clone(), MKConfig::default().multivariate(true));
    let params = DetectionParams::default()
        .window_size(20)
        .direction(Direction::Up)
        .freq(SeasonalFrequency::Weekly);
    let detected = detector.run(&params)?;
    println!("evaluated points: {}", detector.statistics()?.len());
    println!("upward trends:    {}", detected.len());
    if let Some((cp, meta)) = detected.first() {
        println!("first detection at {} (confidence {:.4})", cp.start_time, cp.confidence);
        println!("  {meta}");

        println!("\nMetrics ranked at {}:", cp.start_time);
        for metric in detector.rank_metrics(Some(cp.start_time), None)? {
            let tau = metric.tau.map(|t| format!("{t:+.3}")).unwrap_or("n/a".into());
            let trend = metric.trend.map(|t| t.to_string()).unwrap_or("n/a".into());
            println!("  {:<8} tau={tau:<7} {trend}", metric.name);
        }
    }

    println!("\n=== Anchor-point evaluation ===");
    let mut detector = MKDetector::new(series, MKConfig::default());
    let params = DetectionParams::default()
        .window_size(20)
        .training_days(60)
        .direction(Direction::Both);
    detector.run(&params)?;
    let record = &detector.statistics()?[0];
    println!(
        "anchor {}: {} (tau {:?}, p {:.2e})",
        record.timestamp,
        record.trend(),
        record.tau(),
        record.p_value()
    );
    for metric in detector.rank_metrics(None, Some(2))? {
        println!("  top metric: {} ({:?})", metric.name, metric.tau);
    }

    Ok(())
}
