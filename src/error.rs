//! Error types for the anofox-trend library.

use thiserror::Error;

/// Result type alias for trend detection operations.
pub type Result<T> = std::result::Result<T, TrendError>;

/// Errors that can occur during trend detection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrendError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Statistics were requested before a detection run completed.
    #[error("detector must be run before statistics are available")]
    DetectionRequired,

    /// A multivariate-only operation was called on univariate results.
    #[error("operation requires multivariate data")]
    NotMultivariate,

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },
}
