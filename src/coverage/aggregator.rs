//! Groups raw coverage records into per-unit denominators and candidates.
//!
//! Records sharing `(unit, test)` (several test methods of one test class,
//! or several ingestion batches) are merged by set union before selection.
//! Units are emitted sorted by name so that manifests and reports come out
//! in the same order on every run.

use super::model::{CoverageRecord, LineSet, TestCandidate, TestIdentity, UnitCoverage};
use crate::errors::Result;
use std::collections::HashMap;

/// Accumulates one unit's records before validation.
#[derive(Debug)]
struct UnitBuilder<'a> {
    unit_id: &'a str,
    unit_name: &'a str,
    all_lines: LineSet,
    candidates: Vec<(TestIdentity, LineSet)>,
    candidate_index: HashMap<&'a str, usize>,
}

impl<'a> UnitBuilder<'a> {
    fn new(record: &'a CoverageRecord) -> Self {
        Self {
            unit_id: &record.unit_id,
            unit_name: &record.unit_name,
            all_lines: LineSet::new(),
            candidates: Vec::new(),
            candidate_index: HashMap::new(),
        }
    }

    fn add(&mut self, record: &'a CoverageRecord) {
        if record.unit_name != self.unit_name {
            log::debug!(
                "Unit {} seen as both '{}' and '{}', keeping the first name",
                self.unit_id,
                self.unit_name,
                record.unit_name
            );
        }

        self.all_lines.extend(record.covered_lines.iter().copied());
        self.all_lines.extend(record.uncovered_lines.iter().copied());

        let next = self.candidates.len();
        let slot = *self
            .candidate_index
            .entry(record.test_id.as_str())
            .or_insert(next);
        if slot == next {
            self.candidates.push((
                TestIdentity::new(&record.test_id, &record.test_name),
                LineSet::new(),
            ));
        }
        self.candidates[slot]
            .1
            .extend(record.covered_lines.iter().copied());
    }

    fn finish(self) -> Result<UnitCoverage> {
        let candidates = self
            .candidates
            .into_iter()
            .map(|(test, covered)| TestCandidate::new(test, covered))
            .collect();
        UnitCoverage::new(self.unit_id, self.unit_name, self.all_lines, candidates)
    }
}

/// Aggregate records into one [`UnitCoverage`] per distinct unit id.
///
/// Every unit is validated on its own; the returned vector holds one result
/// per unit so a single corrupt unit does not hide the others.
pub fn aggregate_units(records: &[CoverageRecord]) -> Vec<Result<UnitCoverage>> {
    let mut builders: Vec<UnitBuilder<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.unit_id.as_str()).or_insert_with(|| {
            builders.push(UnitBuilder::new(record));
            builders.len() - 1
        });
        builders[slot].add(record);
    }

    builders.sort_by(|a, b| {
        a.unit_name
            .cmp(b.unit_name)
            .then_with(|| a.unit_id.cmp(b.unit_id))
    });

    log::debug!(
        "Aggregated {} coverage record(s) into {} unit(s)",
        records.len(),
        builders.len()
    );

    builders.into_iter().map(UnitBuilder::finish).collect()
}

/// Aggregate records, failing on the first malformed unit.
pub fn aggregate(records: &[CoverageRecord]) -> Result<Vec<UnitCoverage>> {
    aggregate_units(records).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(values: &[u32]) -> LineSet {
        values.iter().copied().collect()
    }

    #[test]
    fn test_all_lines_is_union_of_covered_and_uncovered() {
        let records = vec![
            CoverageRecord::new("U1", "Account", "T1", "AccountTest")
                .with_covered([1, 2])
                .with_uncovered([3, 4]),
            CoverageRecord::new("U1", "Account", "T2", "OtherTest")
                .with_covered([4])
                .with_uncovered([1, 2, 3, 5]),
        ];

        let units = aggregate(&records).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].all_lines(), &lines(&[1, 2, 3, 4, 5]));
        assert_eq!(units[0].candidates().len(), 2);
    }

    #[test]
    fn test_records_sharing_unit_and_test_are_merged() {
        let records = vec![
            CoverageRecord::new("U1", "Account", "T1", "AccountTest")
                .with_covered([1])
                .with_uncovered([2, 3]),
            CoverageRecord::new("U1", "Account", "T1", "AccountTest")
                .with_covered([3])
                .with_uncovered([1, 2]),
        ];

        let units = aggregate(&records).unwrap();
        let candidates = units[0].candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].covered_lines, lines(&[1, 3]));
    }

    #[test]
    fn test_units_sorted_by_name_case_sensitive() {
        let records = vec![
            CoverageRecord::new("U1", "beta", "T1", "t").with_covered([1]),
            CoverageRecord::new("U2", "Zeta", "T1", "t").with_covered([1]),
            CoverageRecord::new("U3", "Alpha", "T1", "t").with_covered([1]),
        ];

        let names: Vec<String> = aggregate(&records)
            .unwrap()
            .iter()
            .map(|u| u.unit_name().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta", "beta"]);
    }

    #[test]
    fn test_units_with_equal_names_ordered_by_id() {
        let records = vec![
            CoverageRecord::new("01pB", "Account", "T1", "t").with_covered([1]),
            CoverageRecord::new("01pA", "Account", "T1", "t").with_covered([1]),
            CoverageRecord::new("01pC", "Aardvark", "T1", "t").with_covered([1]),
        ];

        let ids: Vec<String> = aggregate(&records)
            .unwrap()
            .iter()
            .map(|u| u.unit_id().to_string())
            .collect();
        assert_eq!(ids, vec!["01pC", "01pA", "01pB"]);
    }

    #[test]
    fn test_unit_keeps_first_seen_name() {
        let records = vec![
            CoverageRecord::new("U1", "AccountService", "T1", "A").with_covered([1]),
            CoverageRecord::new("U1", "AccountServiceRenamed", "T2", "B").with_covered([2]),
        ];

        let units = aggregate(&records).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].unit_name(), "AccountService");
        assert_eq!(units[0].all_lines(), &lines(&[1, 2]));
    }

    #[test]
    fn test_candidates_keep_discovery_order() {
        let records = vec![
            CoverageRecord::new("U1", "Account", "T9", "Zed").with_covered([1]),
            CoverageRecord::new("U1", "Account", "T1", "Alpha").with_covered([2]),
            CoverageRecord::new("U1", "Account", "T9", "Zed").with_covered([3]),
        ];

        let units = aggregate(&records).unwrap();
        let ids: Vec<&str> = units[0]
            .candidates()
            .iter()
            .map(|c| c.test.id.as_str())
            .collect();
        assert_eq!(ids, vec!["T9", "T1"]);
    }

    #[test]
    fn test_unit_without_lines_has_empty_denominator() {
        let records = vec![CoverageRecord::new("U1", "Empty", "T1", "EmptyTest")];

        let units = aggregate(&records).unwrap();
        assert!(units[0].is_empty());
        assert!(units[0].candidates()[0].covered_lines.is_empty());
    }

    #[test]
    fn test_input_records_are_untouched() {
        let records = vec![CoverageRecord::new("U1", "Account", "T1", "AccountTest")
            .with_covered([1, 2])
            .with_uncovered([3])];
        let before = records.clone();

        let _ = aggregate(&records).unwrap();
        assert_eq!(records, before);
    }

    #[test]
    fn test_empty_input_yields_no_units() {
        assert!(aggregate(&[]).unwrap().is_empty());
    }
}
