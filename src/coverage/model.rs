//! Data model shared by the aggregation, selection and utilization stages.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of a single source line within a unit.
pub type LineId = u32;

/// Ordered set of line identifiers.
pub type LineSet = BTreeSet<LineId>;

/// One observation: a test exercised `covered_lines` and left
/// `uncovered_lines` untouched within a single unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRecord {
    pub unit_id: String,
    pub unit_name: String,
    pub test_id: String,
    pub test_name: String,
    #[serde(default)]
    pub covered_lines: LineSet,
    #[serde(default)]
    pub uncovered_lines: LineSet,
}

impl CoverageRecord {
    pub fn new(
        unit_id: impl Into<String>,
        unit_name: impl Into<String>,
        test_id: impl Into<String>,
        test_name: impl Into<String>,
    ) -> Self {
        Self {
            unit_id: unit_id.into(),
            unit_name: unit_name.into(),
            test_id: test_id.into(),
            test_name: test_name.into(),
            covered_lines: LineSet::new(),
            uncovered_lines: LineSet::new(),
        }
    }

    pub fn with_covered(mut self, lines: impl IntoIterator<Item = LineId>) -> Self {
        self.covered_lines.extend(lines);
        self
    }

    pub fn with_uncovered(mut self, lines: impl IntoIterator<Item = LineId>) -> Self {
        self.uncovered_lines.extend(lines);
        self
    }
}

/// Identity of a test, independent of any unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestIdentity {
    pub id: String,
    pub name: String,
}

impl TestIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A test offered to one unit's selection together with everything it
/// covers in that unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCandidate {
    pub test: TestIdentity,
    pub covered_lines: LineSet,
}

impl TestCandidate {
    pub fn new(test: TestIdentity, covered_lines: LineSet) -> Self {
        Self {
            test,
            covered_lines,
        }
    }
}

/// Coverage of one unit: its denominator and the candidate tests.
///
/// Fields are private so that the subset invariant checked in
/// [`UnitCoverage::new`] cannot be broken after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCoverage {
    unit_id: String,
    unit_name: String,
    all_lines: LineSet,
    candidates: Vec<TestCandidate>,
}

impl UnitCoverage {
    /// Build a unit, rejecting any candidate that claims a line outside
    /// `all_lines`.
    pub fn new(
        unit_id: impl Into<String>,
        unit_name: impl Into<String>,
        all_lines: LineSet,
        candidates: Vec<TestCandidate>,
    ) -> Result<Self> {
        let unit_id = unit_id.into();

        for candidate in &candidates {
            if let Some(line) = candidate
                .covered_lines
                .iter()
                .find(|line| !all_lines.contains(line))
            {
                return Err(Error::MalformedInput {
                    unit_id,
                    test_id: candidate.test.id.clone(),
                    line: *line,
                });
            }
        }

        Ok(Self {
            unit_id,
            unit_name: unit_name.into(),
            all_lines,
            candidates,
        })
    }

    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    pub fn all_lines(&self) -> &LineSet {
        &self.all_lines
    }

    pub fn candidates(&self) -> &[TestCandidate] {
        &self.candidates
    }

    /// True when no line of this unit was ever observed.
    pub fn is_empty(&self) -> bool {
        self.all_lines.is_empty()
    }
}

/// A test appended to a suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedTest {
    pub test: TestIdentity,
    /// Size of the test's full covered set for the unit.
    pub covered_lines: usize,
    /// Lines no previously selected test covered, at the time of selection.
    pub unique_lines: usize,
}

/// Ordered minimal suite for one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSuite {
    selected: Vec<SelectedTest>,
    covered_lines: LineSet,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a test. `original` is the test's full covered set, which is
    /// what the suite's union is built from.
    pub(crate) fn push(&mut self, test: TestIdentity, original: &LineSet, unique_lines: usize) {
        self.covered_lines.extend(original.iter().copied());
        self.selected.push(SelectedTest {
            test,
            covered_lines: original.len(),
            unique_lines,
        });
    }

    pub fn selected(&self) -> &[SelectedTest] {
        &self.selected
    }

    pub fn covered_lines(&self) -> &LineSet {
        &self.covered_lines
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Fraction of `total` lines covered, or `None` when `total` is zero.
    pub fn ratio(&self, total: usize) -> Option<f64> {
        coverage_ratio(self.covered_lines.len(), total)
    }
}

/// `covered / total`, undefined for an empty denominator.
pub fn coverage_ratio(covered: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(covered as f64 / total as f64)
    }
}
