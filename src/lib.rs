// Export modules for library usage
pub mod builders;
pub mod cli;
pub mod commands;
pub mod config;
pub mod coverage;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod observability;
pub mod store;

// Re-export commonly used types
pub use crate::coverage::{
    aggregate, aggregate_units, select_suite, CoverageRecord, CoverageThreshold, GreedySelector,
    LineId, LineSet, TestCandidate, TestIdentity, TestSuite, UnitCoverage, UtilizationRegistry,
};

pub use crate::builders::{build_report, BuildOptions, BuildReport, UnitReport};

pub use crate::errors::{Error, Result};

pub use crate::io::output::{create_writer, BuildType, OutputWriter};

pub use crate::store::{RecordStore, StoredRecord};
