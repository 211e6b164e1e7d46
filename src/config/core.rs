use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure, read from `.covsuite.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CovsuiteConfig {
    /// Suite building options
    #[serde(default)]
    pub build: Option<BuildConfig>,

    /// Record store options
    #[serde(default)]
    pub store: Option<StoreConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Per-unit coverage threshold in percent, (0, 100]
    #[serde(default)]
    pub coverage_threshold: Option<f64>,

    /// Directory receiving manifests and reports
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Select suites on the rayon pool (default: true)
    #[serde(default)]
    pub parallel: Option<bool>,

    /// Worker threads, 0 = all cores
    #[serde(default)]
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CovsuiteConfig {
    pub fn coverage_threshold(&self) -> Option<f64> {
        self.build.as_ref().and_then(|b| b.coverage_threshold)
    }

    pub fn output_dir(&self) -> Option<&PathBuf> {
        self.build.as_ref().and_then(|b| b.output_dir.as_ref())
    }

    pub fn parallel(&self) -> Option<bool> {
        self.build.as_ref().and_then(|b| b.parallel)
    }

    pub fn jobs(&self) -> Option<usize> {
        self.build.as_ref().and_then(|b| b.jobs)
    }

    pub fn store_path(&self) -> Option<&PathBuf> {
        self.store.as_ref().and_then(|s| s.path.as_ref())
    }
}
