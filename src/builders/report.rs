//! Build results handed to the writers.

use crate::coverage::{coverage_ratio, CoverageThreshold, TestIdentity, TestSuite, UnitCoverage};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A selected test and its share of its unit's lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestShare {
    pub test_id: String,
    pub test_name: String,
    /// Lines the test covers in the unit, overlap included
    pub covered_lines: usize,
    /// Lines it added when it was selected
    pub unique_lines: usize,
    /// `covered_lines / total_lines * 100`
    pub share: f64,
}

/// Selection outcome for one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitReport {
    pub unit_id: String,
    pub unit_name: String,
    pub total_lines: usize,
    pub covered_lines: usize,
    /// `None` when the unit has no observed lines
    pub percentage: Option<f64>,
    pub meets_threshold: bool,
    /// Selected tests in selection order
    pub tests: Vec<TestShare>,
}

impl UnitReport {
    pub fn from_selection(
        unit: &UnitCoverage,
        suite: &TestSuite,
        threshold: CoverageThreshold,
    ) -> Self {
        let total_lines = unit.all_lines().len();
        let ratio = suite.ratio(total_lines);

        let tests = suite
            .selected()
            .iter()
            .map(|selected| TestShare {
                test_id: selected.test.id.clone(),
                test_name: selected.test.name.clone(),
                covered_lines: selected.covered_lines,
                unique_lines: selected.unique_lines,
                share: percentage(selected.covered_lines, total_lines).unwrap_or(0.0),
            })
            .collect();

        Self {
            unit_id: unit.unit_id().to_string(),
            unit_name: unit.unit_name().to_string(),
            total_lines,
            covered_lines: suite.covered_lines().len(),
            percentage: ratio.map(|r| r * 100.0),
            // A unit with nothing to cover needs no tests.
            meets_threshold: ratio.map_or(true, |r| threshold.is_met_by(r)),
            tests,
        }
    }

    pub fn test_names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|t| t.test_name.as_str())
    }
}

/// A unit left out of the build because its data failed an integrity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub unit_id: String,
    pub message: String,
}

/// Everything one build produced.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub generated_at: DateTime<Utc>,
    pub threshold: CoverageThreshold,
    /// Units in name order
    pub units: Vec<UnitReport>,
    pub total_tests: usize,
    /// Tests no unit needed, sorted by name
    pub unutilized: Vec<TestIdentity>,
    pub failures: Vec<UnitFailure>,
}

impl BuildReport {
    pub fn passing_units(&self) -> usize {
        self.units.iter().filter(|u| u.meets_threshold).count()
    }

    pub fn failing_units(&self) -> usize {
        self.units.len() - self.passing_units()
    }

    pub fn utilized_tests(&self) -> usize {
        self.total_tests - self.unutilized.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// `part / total * 100`, `None` for an empty total.
pub fn percentage(part: usize, total: usize) -> Option<f64> {
    coverage_ratio(part, total).map(|r| r * 100.0)
}

/// Percentage to one decimal, or `N/A` for an empty unit.
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1}"),
        None => "N/A".to_string(),
    }
}
