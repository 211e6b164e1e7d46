//! Corpus-wide record of which tests any minimal suite actually needed.

use super::model::{TestIdentity, TestSuite, UnitCoverage};
use std::collections::{BTreeMap, BTreeSet};

/// Registry of every test offered to any unit in one build, and the subset
/// selected into at least one suite.
///
/// Registries built on separate workers can be combined with
/// [`UtilizationRegistry::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtilizationRegistry {
    all_tests: BTreeMap<String, TestIdentity>,
    utilized: BTreeSet<String>,
}

impl UtilizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every candidate of `unit` and mark the tests in `suite`
    /// as utilized.
    pub fn record(&mut self, unit: &UnitCoverage, suite: &TestSuite) {
        for candidate in unit.candidates() {
            self.register(&candidate.test);
        }
        for selected in suite.selected() {
            self.register(&selected.test);
            self.utilized.insert(selected.test.id.clone());
        }
    }

    fn register(&mut self, test: &TestIdentity) {
        self.all_tests
            .entry(test.id.clone())
            .or_insert_with(|| test.clone());
    }

    pub fn merge(mut self, other: Self) -> Self {
        for (id, test) in other.all_tests {
            self.all_tests.entry(id).or_insert(test);
        }
        self.utilized.extend(other.utilized);
        self
    }

    pub fn total(&self) -> usize {
        self.all_tests.len()
    }

    pub fn is_utilized(&self, test_id: &str) -> bool {
        self.utilized.contains(test_id)
    }

    /// Tests selected for at least one unit, sorted by name then id.
    pub fn utilized(&self) -> Vec<TestIdentity> {
        self.partition(true)
    }

    /// Tests never selected for any unit, sorted by name then id.
    pub fn unutilized(&self) -> Vec<TestIdentity> {
        self.partition(false)
    }

    fn partition(&self, utilized: bool) -> Vec<TestIdentity> {
        let mut tests: Vec<TestIdentity> = self
            .all_tests
            .values()
            .filter(|test| self.utilized.contains(&test.id) == utilized)
            .cloned()
            .collect();
        tests.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        tests
    }
}
