//! TimeSeries data structure and the tabular window view used by preprocessing.

use crate::error::{Result, TrendError};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Layout of multivariate data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueLayout {
    /// Each inner vector is a dimension (column-major).
    #[default]
    Column,
    /// Each inner vector is an observation across dimensions (row-major).
    Row,
}

/// A time series with timestamps and one or more named value columns.
///
/// Missing observations are encoded as NaN. Timestamps are strictly
/// increasing and shared by every column.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    /// Values stored in column-major format: values[dimension][observation]
    values: Vec<Vec<f64>>,
    labels: Vec<String>,
}

/// Builder for constructing TimeSeries.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuilder {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<Vec<f64>>,
    layout: ValueLayout,
    labels: Vec<String>,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Set univariate values.
    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = vec![values];
        self.layout = ValueLayout::Column;
        self
    }

    /// Set multivariate values with specified layout.
    pub fn multivariate_values(mut self, values: Vec<Vec<f64>>, layout: ValueLayout) -> Self {
        self.values = values;
        self.layout = layout;
        self
    }

    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn build(self) -> Result<TimeSeries> {
        TimeSeries::new(self.timestamps, self.values, self.layout, self.labels)
    }
}

impl TimeSeries {
    /// Create a new TimeSeries.
    ///
    /// Empty `labels` are replaced by `value` for a single column and
    /// `value_0`, `value_1`, ... otherwise.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<Vec<f64>>,
        layout: ValueLayout,
        labels: Vec<String>,
    ) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(TrendError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        let values = match layout {
            ValueLayout::Column => {
                for series in &values {
                    if series.len() != timestamps.len() {
                        return Err(TrendError::DimensionMismatch {
                            expected: timestamps.len(),
                            got: series.len(),
                        });
                    }
                }
                values
            }
            ValueLayout::Row => {
                if values.len() != timestamps.len() {
                    return Err(TrendError::DimensionMismatch {
                        expected: timestamps.len(),
                        got: values.len(),
                    });
                }

                let dims = values.first().map(|row| row.len()).unwrap_or(0);
                for row in &values {
                    if row.len() != dims {
                        return Err(TrendError::DimensionMismatch {
                            expected: dims,
                            got: row.len(),
                        });
                    }
                }

                (0..dims)
                    .map(|d| values.iter().map(|row| row[d]).collect())
                    .collect()
            }
        };

        if values.is_empty() {
            return Err(TrendError::EmptyData);
        }

        let labels = if labels.is_empty() {
            default_labels(values.len())
        } else {
            if labels.len() != values.len() {
                return Err(TrendError::DimensionMismatch {
                    expected: values.len(),
                    got: labels.len(),
                });
            }
            let mut seen = HashSet::new();
            for label in &labels {
                if !seen.insert(label.as_str()) {
                    return Err(TrendError::InvalidParameter(format!(
                        "duplicate column label '{label}'"
                    )));
                }
            }
            labels
        };

        Ok(Self {
            timestamps,
            values,
            labels,
        })
    }

    /// Create a simple univariate time series.
    pub fn univariate(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        Self::new(timestamps, vec![values], ValueLayout::Column, vec![])
    }

    /// Create a multivariate time series from named columns.
    pub fn multivariate(
        timestamps: Vec<DateTime<Utc>>,
        columns: Vec<Vec<f64>>,
        labels: Vec<String>,
    ) -> Result<Self> {
        Self::new(timestamps, columns, ValueLayout::Column, labels)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get the number of dimensions (1 for univariate).
    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    pub fn is_univariate(&self) -> bool {
        self.values.len() == 1
    }

    pub fn is_multivariate(&self) -> bool {
        self.values.len() > 1
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values for a specific dimension.
    pub fn values(&self, dimension: usize) -> Result<&[f64]> {
        self.values
            .get(dimension)
            .map(|v| v.as_slice())
            .ok_or(TrendError::IndexOutOfBounds {
                index: dimension,
                size: self.values.len(),
            })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Last timestamp of the series.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Keep only the final `count` observations.
    pub fn tail(&self, count: usize) -> TimeSeries {
        let start = self.len().saturating_sub(count);
        TimeSeries {
            timestamps: self.timestamps[start..].to_vec(),
            values: self.values.iter().map(|dim| dim[start..].to_vec()).collect(),
            labels: self.labels.clone(),
        }
    }

    /// Tabular view indexed by time, used by the preprocessing stages.
    pub fn to_window(&self) -> Window {
        Window {
            timestamps: self.timestamps.clone(),
            labels: self.labels.clone(),
            columns: self.values.clone(),
        }
    }
}

fn default_labels(dimensions: usize) -> Vec<String> {
    if dimensions == 1 {
        vec!["value".to_string()]
    } else {
        (0..dimensions).map(|i| format!("value_{i}")).collect()
    }
}

/// A contiguous block of observations with named columns.
///
/// Unlike [`TimeSeries`], columns may carry different missing-value patterns:
/// a NaN marks a timestamp at which that column has no observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    timestamps: Vec<DateTime<Utc>>,
    labels: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Window {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Get a single column by position.
    pub fn column(&self, index: usize) -> Result<&[f64]> {
        self.columns
            .get(index)
            .map(|c| c.as_slice())
            .ok_or(TrendError::IndexOutOfBounds {
                index,
                size: self.columns.len(),
            })
    }

    /// Apply `f` to every column, keeping the timestamp index.
    ///
    /// `f` must return a column of the same length as its input.
    pub fn map_columns<F>(&self, mut f: F) -> Window
    where
        F: FnMut(&str, &[f64]) -> Vec<f64>,
    {
        let columns = self
            .labels
            .iter()
            .zip(self.columns.iter())
            .map(|(label, column)| {
                let mapped = f(label, column);
                debug_assert_eq!(mapped.len(), column.len());
                mapped
            })
            .collect();

        Window {
            timestamps: self.timestamps.clone(),
            labels: self.labels.clone(),
            columns,
        }
    }

    /// Drop the rows at which no column has an observation.
    pub fn without_empty_rows(&self) -> Window {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| self.columns.iter().any(|c| !c[i].is_nan()))
            .collect();

        Window {
            timestamps: keep.iter().map(|&i| self.timestamps[i]).collect(),
            labels: self.labels.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| keep.iter().map(|&i| c[i]).collect())
                .collect(),
        }
    }

    /// Column slices covering rows `start..end`.
    pub fn rows(&self, start: usize, end: usize) -> Result<Vec<&[f64]>> {
        if start > end {
            return Err(TrendError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(TrendError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }
        Ok(self.columns.iter().map(|c| &c[start..end]).collect())
    }
}
