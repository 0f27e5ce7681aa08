//! Core data structures for trend detection.

mod time_series;

pub use time_series::{TimeSeries, TimeSeriesBuilder, ValueLayout, Window};
