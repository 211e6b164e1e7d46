//! Command-line interface: argument parsing (`args`) and runtime setup
//! (`setup`).

pub mod args;
pub mod setup;

pub use args::{BuildType, Cli, Commands};
pub use setup::{configure_thread_pool, init_logging, log_level};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
