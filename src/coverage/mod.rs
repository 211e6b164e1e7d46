//! Coverage aggregation and greedy test-suite minimization.
//!
//! The pipeline is pure and in-memory:
//!
//! 1. [`aggregate`] groups raw [`CoverageRecord`]s into one [`UnitCoverage`]
//!    per unit (denominator plus candidate tests).
//! 2. [`select_suite`] runs the greedy selector on a unit and returns the
//!    ordered [`TestSuite`].
//! 3. [`UtilizationRegistry`] collects which tests any suite needed.
//!
//! ```rust
//! use covsuite::coverage::{aggregate, select_suite, CoverageRecord, CoverageThreshold};
//!
//! let records = vec![
//!     CoverageRecord::new("U1", "Account", "T1", "AccountTest").with_covered([1, 2]).with_uncovered([3]),
//!     CoverageRecord::new("U1", "Account", "T2", "SmokeTest").with_covered([3]),
//! ];
//! let units = aggregate(&records).unwrap();
//! let suite = select_suite(&units[0], CoverageThreshold::from_percentage(100.0).unwrap());
//! assert_eq!(suite.len(), 2);
//! ```

pub mod aggregator;
pub mod model;
pub mod selector;
pub mod threshold;
pub mod utilization;

pub use aggregator::{aggregate, aggregate_units};
pub use model::{
    coverage_ratio, CoverageRecord, LineId, LineSet, SelectedTest, TestCandidate, TestIdentity,
    TestSuite, UnitCoverage,
};
pub use selector::{select_suite, GreedySelector, SelectionStep};
pub use threshold::{CoverageThreshold, DEFAULT_COVERAGE_THRESHOLD};
pub use utilization::UtilizationRegistry;
