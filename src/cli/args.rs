use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "covsuite")]
#[command(about = "Builds minimal Apex test suites from per-test coverage", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    /// -v: Show debug output per unit
    /// -vv: Show trace output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Configuration file (defaults to the nearest .covsuite.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load exported coverage records into the local store
    Ingest {
        /// Coverage export files (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Store file
        #[arg(long, env = "COVSUITE_STORE")]
        store: Option<PathBuf>,
    },

    /// Build minimal test suites from the stored coverage
    Build {
        /// Artifact to produce
        #[arg(value_enum)]
        build_type: BuildType,

        /// Directory the artifact is written to
        #[arg(short, long = "output-dir")]
        output_dir: Option<PathBuf>,

        /// Target coverage percentage for each unit, in (0, 100]
        #[arg(short = 't', long = "coverage-threshold")]
        coverage_threshold: Option<f64>,

        /// Store file
        #[arg(long, env = "COVSUITE_STORE")]
        store: Option<PathBuf>,

        /// Select suites on a single thread
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs")]
        jobs: Option<usize>,

        /// Disable colours in the terminal summary
        #[arg(long)]
        plain: bool,
    },

    /// Delete the local store
    Clean {
        /// Store file
        #[arg(long, env = "COVSUITE_STORE")]
        store: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BuildType {
    /// Single XHTML coverage report
    Report,
    /// One .testSuite manifest per unit
    TestSuites,
    /// Machine-readable build report
    Json,
}

impl From<BuildType> for crate::io::output::BuildType {
    fn from(t: BuildType) -> Self {
        match t {
            BuildType::Report => crate::io::output::BuildType::Report,
            BuildType::TestSuites => crate::io::output::BuildType::TestSuites,
            BuildType::Json => crate::io::output::BuildType::Json,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
