//! CLI command implementations.
//!
//! - **ingest**: merge exported coverage into the local store
//! - **build**: select minimal suites and write an artifact
//! - **clean**: delete the local store
//! - **init**: write a starter configuration file

pub mod build;
pub mod clean;
pub mod ingest;
pub mod init;

pub use build::{build_from_store, run_build, BuildFlags, BuildSettings};
pub use clean::clean_store;
pub use ingest::{ingest_files, IngestConfig};
pub use init::init_config;
