use crate::observability::{set_current_file, set_phase, BuildPhase};
use crate::store::{read_export, IngestSummary, RecordStore};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct IngestConfig {
    pub files: Vec<PathBuf>,
    pub store: PathBuf,
}

/// Merge every export in `config.files` into the store. Nothing is saved
/// unless all files parse.
pub fn ingest_files(config: IngestConfig) -> Result<IngestSummary> {
    let _phase = set_phase(BuildPhase::Ingest);
    let mut store = RecordStore::open(&config.store)
        .with_context(|| format!("Failed to open store {}", config.store.display()))?;

    let mut summary = IngestSummary::default();
    for file in &config.files {
        let _file = set_current_file(file);
        let records = read_export(file)?;
        let file_summary = store.insert_many(records);
        log::debug!(
            "{}: {} new, {} duplicate record(s)",
            file.display(),
            file_summary.inserted,
            file_summary.duplicates()
        );
        summary += file_summary;
    }

    store
        .save()
        .with_context(|| format!("Failed to save store {}", store.path().display()))?;

    log::info!(
        "Inserted {} new coverage record(s) of total {}.",
        summary.inserted,
        summary.total
    );
    Ok(summary)
}
