use crate::store::RecordStore;
use anyhow::{Context, Result};
use std::path::Path;

/// Delete the record store at `store`.
pub fn clean_store(store: &Path) -> Result<bool> {
    let removed = RecordStore::clean(store)
        .with_context(|| format!("Failed to remove store {}", store.display()))?;

    if removed {
        log::info!("Removed coverage store {}", store.display());
    } else {
        log::info!("No coverage store at {}", store.display());
    }
    Ok(removed)
}
