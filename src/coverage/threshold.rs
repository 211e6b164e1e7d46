use crate::errors::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Default per-unit threshold, in percent.
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 75.0;

/// Validated coverage target. Holds a percentage in (0, 100].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CoverageThreshold(f64);

impl CoverageThreshold {
    /// Accept a percentage such as `75` (meaning 0.75).
    pub fn from_percentage(percentage: f64) -> Result<Self> {
        if !percentage.is_finite() || percentage <= 0.0 || percentage > 100.0 {
            return Err(Error::configuration(format!(
                "coverage threshold must be greater than 0 and at most 100, got {percentage}"
            )));
        }
        Ok(Self(percentage))
    }

    pub fn percentage(&self) -> f64 {
        self.0
    }

    pub fn ratio(&self) -> f64 {
        self.0 / 100.0
    }

    /// Whether `ratio` (a fraction of 1) meets this threshold.
    pub fn is_met_by(&self, ratio: f64) -> bool {
        ratio >= self.ratio()
    }
}

impl Default for CoverageThreshold {
    fn default() -> Self {
        Self(DEFAULT_COVERAGE_THRESHOLD)
    }
}

impl fmt::Display for CoverageThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
