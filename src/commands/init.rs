use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# covsuite configuration

[build]
# Per-unit coverage target in percent, (0, 100]
coverage_threshold = 75.0
output_dir = "test-suites"
parallel = true
# Worker threads, 0 = all cores
jobs = 0

[store]
path = ".covsuite/coverage.json"
"#;

/// Write a starter `.covsuite.toml` into `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(crate::config::CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    log::info!("Created {}", config_path.display());

    Ok(())
}
