use anyhow::Result;
use covsuite::cli::{self, Cli, Commands};
use covsuite::commands::{self, BuildFlags, BuildSettings, IngestConfig};
use covsuite::config;
use covsuite::observability::install_panic_hook;
use std::path::Path;

// Main orchestrator function
fn main() -> Result<()> {
    install_panic_hook();

    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity);

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let file_config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest { files, store } => {
            let store = config::resolve_store_path(store.as_deref(), &file_config);
            commands::ingest_files(IngestConfig { files, store })?;
        }
        Commands::Build {
            build_type,
            output_dir,
            coverage_threshold,
            store,
            no_parallel,
            jobs,
            plain,
        } => {
            let store = config::resolve_store_path(store.as_deref(), &file_config);
            let flags = BuildFlags {
                output_dir,
                coverage_threshold,
                no_parallel,
                jobs,
                plain,
            };
            let settings =
                BuildSettings::resolve(build_type.into(), flags, store, &file_config)?;
            commands::run_build(settings)?;
        }
        Commands::Clean { store } => {
            let store = config::resolve_store_path(store.as_deref(), &file_config);
            commands::clean_store(&store)?;
        }
        Commands::Init { force } => {
            commands::init_config(Path::new("."), force)?;
        }
    }

    Ok(())
}
