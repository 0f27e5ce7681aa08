//! Utility functions shared by the trend tests.

pub mod stats;

pub use stats::{quantile_normal, two_sided_p_value};
