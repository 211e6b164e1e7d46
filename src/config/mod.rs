//! Configuration for covsuite.
//!
//! Values are layered: command-line flags win over `.covsuite.toml`, which
//! wins over built-in defaults. The store path may also come from the
//! `COVSUITE_STORE` environment variable, which stands in for `--store`.

mod core;
mod loader;

pub use self::core::{BuildConfig, CovsuiteConfig, StoreConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

use crate::store::DEFAULT_STORE_PATH;
use std::path::{Path, PathBuf};

/// Load either the explicitly given file or the discovered one.
pub fn load(explicit: Option<&Path>) -> crate::errors::Result<CovsuiteConfig> {
    match explicit {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
}

/// Resolve the record store location: flag (or `COVSUITE_STORE`, which clap
/// folds into the flag), then file, then default.
pub fn resolve_store_path(flag: Option<&Path>, config: &CovsuiteConfig) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.store_path().cloned())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
}
