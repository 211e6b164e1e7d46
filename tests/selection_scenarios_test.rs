use covsuite::builders::{build_report, BuildOptions};
use covsuite::coverage::{
    aggregate, select_suite, CoverageRecord, CoverageThreshold, GreedySelector, LineSet,
    SelectionStep, TestCandidate, TestIdentity, UnitCoverage, UtilizationRegistry,
};
use pretty_assertions::assert_eq;

fn lines(values: &[u32]) -> LineSet {
    values.iter().copied().collect()
}

fn unit(all: &[u32], tests: &[(&str, &[u32])]) -> UnitCoverage {
    let candidates = tests
        .iter()
        .map(|(name, covered)| {
            TestCandidate::new(TestIdentity::new(format!("id-{name}"), *name), lines(covered))
        })
        .collect();
    UnitCoverage::new("U", "Unit", lines(all), candidates).unwrap()
}

fn threshold(percentage: f64) -> CoverageThreshold {
    CoverageThreshold::from_percentage(percentage).unwrap()
}

fn names(suite: &covsuite::coverage::TestSuite) -> Vec<&str> {
    suite.selected().iter().map(|s| s.test.name.as_str()).collect()
}

#[test]
fn test_tie_resolved_by_name_and_stops_at_threshold() {
    let unit = unit(
        &[1, 2, 3, 4, 5],
        &[("A", &[1, 2, 3]), ("B", &[3, 4]), ("C", &[5])],
    );

    let suite = select_suite(&unit, threshold(80.0));

    assert_eq!(names(&suite), vec!["A", "B"]);
    assert_eq!(suite.ratio(5), Some(0.8));
    assert_eq!(suite.selected()[1].unique_lines, 1);
}

#[test]
fn test_full_threshold_needs_both_tests() {
    let unit = unit(&[1, 2], &[("A", &[1]), ("B", &[2])]);

    let suite = select_suite(&unit, threshold(100.0));

    assert_eq!(names(&suite), vec!["A", "B"]);
    assert_eq!(suite.ratio(2), Some(1.0));
}

#[test]
fn test_unit_without_lines_is_reported_not_applicable() {
    let records = vec![CoverageRecord::new("U1", "Empty", "T1", "SomeTest")];

    let units = aggregate(&records).unwrap();
    assert!(units[0].is_empty());
    assert!(select_suite(&units[0], threshold(75.0)).is_empty());

    let report = build_report(&records, &BuildOptions::default().sequential());
    assert_eq!(report.units.len(), 1);
    assert_eq!(report.units[0].percentage, None);
    assert!(report.units[0].meets_threshold);
    assert_eq!(report.unutilized, vec![TestIdentity::new("T1", "SomeTest")]);
}

#[test]
fn test_unreachable_line_stops_below_threshold() {
    let unit = unit(&[1, 2], &[("A", &[1]), ("B", &[1]), ("C", &[1])]);

    let mut selector = GreedySelector::new(&unit, threshold(75.0));
    let mut steps = Vec::new();
    while let Some(step) = selector.step() {
        steps.push(step);
    }

    assert!(matches!(
        &steps[0],
        SelectionStep::Selected { test, unique_lines: 1, ratio } if test.name == "A" && *ratio == 0.5
    ));
    assert!(steps[1..]
        .iter()
        .all(|step| matches!(step, SelectionStep::Discarded { .. })));
    assert_eq!(names(selector.suite()), vec!["A"]);
    assert_eq!(selector.ratio(), Some(0.5));
    assert!(selector.steps_taken() <= 3);
}

#[test]
fn test_test_used_by_one_unit_is_globally_utilized() {
    let records = vec![
        CoverageRecord::new("U1", "First", "X", "SharedTest").with_covered([1, 2]),
        CoverageRecord::new("U1", "First", "Y", "SmallTest")
            .with_covered([1])
            .with_uncovered([2]),
        CoverageRecord::new("U2", "Second", "X", "SharedTest")
            .with_covered([1])
            .with_uncovered([2, 3]),
        CoverageRecord::new("U2", "Second", "Z", "WideTest").with_covered([1, 2, 3]),
    ];
    let threshold = threshold(100.0);

    let mut registry = UtilizationRegistry::new();
    for unit in aggregate(&records).unwrap() {
        let suite = select_suite(&unit, threshold);
        registry.record(&unit, &suite);
    }

    assert!(registry.is_utilized("X"));
    assert!(registry.is_utilized("Z"));
    assert_eq!(registry.unutilized(), vec![TestIdentity::new("Y", "SmallTest")]);
}

#[test]
fn test_rerunning_selection_leaves_unit_unchanged() {
    let unit = unit(&[1, 2, 3, 4], &[("A", &[1, 2]), ("B", &[2, 3]), ("C", &[4])]);
    let before = unit.clone();

    let strict = select_suite(&unit, threshold(100.0));
    let lenient = select_suite(&unit, threshold(50.0));

    assert_eq!(unit, before);
    assert_eq!(names(&strict), vec!["A", "B", "C"]);
    assert_eq!(names(&lenient), vec!["A"]);
}
