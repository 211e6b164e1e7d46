//! The `build` command: load the store, select suites, write artifacts.

use crate::builders::{build_report, BuildOptions, BuildReport};
use crate::cli::setup::configure_thread_pool;
use crate::config::CovsuiteConfig;
use crate::coverage::CoverageThreshold;
use crate::formatting::ColorMode;
use crate::io::writers::TerminalWriter;
use crate::io::{create_writer, BuildType, OutputWriter};
use crate::observability::{set_phase, BuildPhase};
use crate::store::RecordStore;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// `build` options as given on the command line. `None` falls back to the
/// configuration file, then to defaults.
#[derive(Debug, Clone, Default)]
pub struct BuildFlags {
    pub output_dir: Option<PathBuf>,
    pub coverage_threshold: Option<f64>,
    pub no_parallel: bool,
    pub jobs: Option<usize>,
    pub plain: bool,
}

/// Fully resolved `build` settings.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub build_type: BuildType,
    pub output_dir: PathBuf,
    pub threshold: CoverageThreshold,
    pub store: PathBuf,
    pub parallel: bool,
    pub jobs: usize,
    pub color: ColorMode,
}

impl BuildSettings {
    pub fn resolve(
        build_type: BuildType,
        flags: BuildFlags,
        store: PathBuf,
        file: &CovsuiteConfig,
    ) -> Result<Self> {
        let output_dir = flags
            .output_dir
            .or_else(|| file.output_dir().cloned())
            .context("No output directory given; pass --output-dir or set build.output_dir")?;

        let threshold = match flags.coverage_threshold.or(file.coverage_threshold()) {
            Some(percentage) => CoverageThreshold::from_percentage(percentage)?,
            None => CoverageThreshold::default(),
        };

        let parallel = !flags.no_parallel && file.parallel().unwrap_or(true);
        let color = if flags.plain {
            ColorMode::Never
        } else {
            ColorMode::from_env()
        };

        Ok(Self {
            build_type,
            output_dir,
            threshold,
            store,
            parallel,
            jobs: flags.jobs.or(file.jobs()).unwrap_or(0),
            color,
        })
    }
}

/// Run a build. Writes the requested artifact and a terminal summary, then
/// fails if any unit was skipped for invalid data.
pub fn run_build(config: BuildSettings) -> Result<BuildReport> {
    let report = build_from_store(&config)?;

    config.color.apply();
    TerminalWriter::stdout(config.color.should_use_color()).write_report(&report)?;

    if report.has_failures() {
        for failure in &report.failures {
            log::error!("{}: {}", failure.unit_id, failure.message);
        }
        anyhow::bail!(
            "{} unit(s) skipped because of invalid coverage data",
            report.failures.len()
        );
    }

    Ok(report)
}

/// Load, select and write the artifact, without the terminal summary.
pub fn build_from_store(config: &BuildSettings) -> Result<BuildReport> {
    if config.parallel {
        configure_thread_pool(config.jobs);
    }

    let store = RecordStore::open(&config.store)
        .with_context(|| format!("Failed to open store {}", config.store.display()))?;
    if store.is_empty() {
        log::warn!(
            "Store {} has no coverage records; run `covsuite ingest` first",
            config.store.display()
        );
    }

    let records = store.coverage_records();
    log::info!("Loaded {} coverage record(s)", records.len());

    let mut options = BuildOptions::new(config.threshold);
    if !config.parallel {
        options = options.sequential();
    }
    let report = build_report(&records, &options);

    {
        let _phase = set_phase(BuildPhase::Rendering);
        let mut writer = create_writer(config.build_type, &config.output_dir)?;
        writer.write_report(&report)?;
    }
    log::info!(
        "Wrote {}",
        config.build_type.output_path(&config.output_dir).display()
    );

    Ok(report)
}
