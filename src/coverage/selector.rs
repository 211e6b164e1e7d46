//! Greedy maximum-coverage selection of a minimal test suite for one unit.
//!
//! Each step picks the candidate whose not-yet-covered lines are most
//! numerous, appends it to the suite, and strips its lines from every other
//! candidate. Selection stops once the suite reaches the threshold or the
//! candidates run out. The result approximates the smallest suite; it is not
//! guaranteed to be optimal.
//!
//! Ties on unique coverage go to the smallest test name, then the smallest
//! test id, then the candidate discovered first.

use super::model::{LineSet, TestCandidate, TestIdentity, TestSuite, UnitCoverage};
use super::threshold::CoverageThreshold;
use std::cmp::Ordering;

/// Outcome of a single selection step.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionStep {
    /// The candidate added new lines and joined the suite.
    Selected {
        test: TestIdentity,
        unique_lines: usize,
        ratio: f64,
    },
    /// The best remaining candidate had nothing left to add.
    Discarded { test: TestIdentity },
}

/// Per-run copy of a candidate. Only `remaining` shrinks; the candidate
/// owned by the unit is never touched.
#[derive(Debug)]
struct WorkingCandidate<'a> {
    candidate: &'a TestCandidate,
    order: usize,
    remaining: LineSet,
}

impl WorkingCandidate<'_> {
    /// Ordering in which the best candidate sorts first.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .remaining
            .len()
            .cmp(&self.remaining.len())
            .then_with(|| self.candidate.test.name.cmp(&other.candidate.test.name))
            .then_with(|| self.candidate.test.id.cmp(&other.candidate.test.id))
            .then_with(|| self.order.cmp(&other.order))
    }
}

/// Stepwise greedy selector over one unit.
#[derive(Debug)]
pub struct GreedySelector<'a> {
    unit: &'a UnitCoverage,
    threshold: CoverageThreshold,
    working: Vec<WorkingCandidate<'a>>,
    suite: TestSuite,
    steps: usize,
}

impl<'a> GreedySelector<'a> {
    pub fn new(unit: &'a UnitCoverage, threshold: CoverageThreshold) -> Self {
        let working = unit
            .candidates()
            .iter()
            .enumerate()
            .map(|(order, candidate)| WorkingCandidate {
                candidate,
                order,
                remaining: candidate.covered_lines.clone(),
            })
            .collect();

        Self {
            unit,
            threshold,
            working,
            suite: TestSuite::new(),
            steps: 0,
        }
    }

    /// Current suite coverage, `None` for a unit without lines.
    pub fn ratio(&self) -> Option<f64> {
        self.suite.ratio(self.unit.all_lines().len())
    }

    /// True once no further step will be taken.
    pub fn is_finished(&self) -> bool {
        match self.ratio() {
            // Nothing to cover: trivially satisfied.
            None => true,
            Some(ratio) => self.threshold.is_met_by(ratio) || self.working.is_empty(),
        }
    }

    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    pub fn suite(&self) -> &TestSuite {
        &self.suite
    }

    /// Lines each remaining candidate would still add, by test id.
    pub fn remaining_unique(&self) -> impl Iterator<Item = (&TestIdentity, &LineSet)> + '_ {
        self.working
            .iter()
            .map(|w| (&w.candidate.test, &w.remaining))
    }

    /// Run one iteration. Returns `None` once selection has stopped.
    pub fn step(&mut self) -> Option<SelectionStep> {
        if self.is_finished() {
            return None;
        }

        let best = self
            .working
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.rank(b))
            .map(|(index, _)| index)?;
        let chosen = self.working.swap_remove(best);
        self.steps += 1;

        for other in &mut self.working {
            other
                .remaining
                .retain(|line| !chosen.candidate.covered_lines.contains(line));
        }

        let test = chosen.candidate.test.clone();
        if chosen.remaining.is_empty() {
            return Some(SelectionStep::Discarded { test });
        }

        let unique_lines = chosen.remaining.len();
        self.suite
            .push(test.clone(), &chosen.candidate.covered_lines, unique_lines);

        Some(SelectionStep::Selected {
            test,
            unique_lines,
            ratio: self.ratio().unwrap_or(1.0),
        })
    }

    /// Drive selection to completion.
    pub fn run(mut self) -> TestSuite {
        let bound = self.unit.candidates().len();
        while let Some(step) = self.step() {
            if let SelectionStep::Discarded { test } = &step {
                log::trace!(
                    "{}: discarded {} (no unique coverage)",
                    self.unit.unit_name(),
                    test.name
                );
            }
        }
        debug_assert!(self.steps <= bound);
        self.suite
    }
}

/// Select the minimal suite for `unit` at `threshold`.
pub fn select_suite(unit: &UnitCoverage, threshold: CoverageThreshold) -> TestSuite {
    GreedySelector::new(unit, threshold).run()
}
