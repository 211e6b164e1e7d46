//! Runs aggregation, selection and utilization tracking over a corpus.
//!
//! Units are independent, so selection may run on the rayon pool. Every
//! worker owns the unit it is processing and accumulates its own
//! [`UtilizationRegistry`]; the registries are merged once all units are done.
//! Unit order in the result always matches aggregation order.

use super::report::{BuildReport, UnitFailure, UnitReport};
use crate::coverage::{
    aggregate_units, select_suite, CoverageRecord, CoverageThreshold, UnitCoverage,
    UtilizationRegistry,
};
use crate::observability::{
    increment_processed, set_current_unit, set_phase, set_progress, BuildPhase,
};
use rayon::prelude::*;
use tracing::debug_span;

/// Options for one build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    pub threshold: CoverageThreshold,
    pub parallel: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            threshold: CoverageThreshold::default(),
            parallel: true,
        }
    }
}

impl BuildOptions {
    pub fn new(threshold: CoverageThreshold) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

fn select_unit(
    unit: &UnitCoverage,
    threshold: CoverageThreshold,
) -> (UnitReport, UtilizationRegistry) {
    let _span = debug_span!("select_suite", unit = %unit.unit_name()).entered();
    let _phase = set_phase(BuildPhase::Selection);
    let _unit = set_current_unit(unit.unit_name());

    let suite = select_suite(unit, threshold);
    let mut registry = UtilizationRegistry::new();
    registry.record(unit, &suite);
    let report = UnitReport::from_selection(unit, &suite, threshold);

    log::debug!(
        "{}: {} of {} candidate(s) selected, {}/{} lines",
        unit.unit_name(),
        suite.len(),
        unit.candidates().len(),
        report.covered_lines,
        report.total_lines
    );
    increment_processed();

    (report, registry)
}

/// Build minimal suites for every unit in `records`.
///
/// A unit whose data fails an integrity check is reported in
/// [`BuildReport::failures`] and left out; the other units are unaffected.
pub fn build_report(records: &[CoverageRecord], options: &BuildOptions) -> BuildReport {
    let threshold = options.threshold;

    let (units, failures) = {
        let _phase = set_phase(BuildPhase::Aggregation);
        partition_units(aggregate_units(records))
    };
    set_progress(0, units.len());

    let (reports, registries): (Vec<UnitReport>, Vec<UtilizationRegistry>) = if options.parallel
    {
        units
            .par_iter()
            .map(|unit| select_unit(unit, threshold))
            .unzip()
    } else {
        units
            .iter()
            .map(|unit| select_unit(unit, threshold))
            .unzip()
    };

    let registry = registries
        .into_iter()
        .fold(UtilizationRegistry::new(), UtilizationRegistry::merge);

    let report = BuildReport {
        generated_at: chrono::Utc::now(),
        threshold,
        units: reports,
        total_tests: registry.total(),
        unutilized: registry.unutilized(),
        failures,
    };

    log::info!(
        "Selected suites for {} unit(s): {} meet {}, {} below",
        report.units.len(),
        report.passing_units(),
        threshold,
        report.failing_units()
    );
    log::info!(
        "{} of {} test(s) utilized by at least one suite",
        report.utilized_tests(),
        report.total_tests
    );

    report
}

fn partition_units(
    results: Vec<crate::errors::Result<UnitCoverage>>,
) -> (Vec<UnitCoverage>, Vec<UnitFailure>) {
    let mut units = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for result in results {
        match result {
            Ok(unit) => units.push(unit),
            Err(err) => {
                log::error!("Skipping unit: {}", err);
                failures.push(UnitFailure {
                    unit_id: err.unit_id().unwrap_or_default().to_string(),
                    message: err.to_string(),
                });
            }
        }
    }

    (units, failures)
}
