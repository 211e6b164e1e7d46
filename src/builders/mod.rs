pub mod report;
pub mod suite_builder;

pub use report::{format_percentage, percentage, BuildReport, TestShare, UnitFailure, UnitReport};
pub use suite_builder::{build_report, BuildOptions};
