use std::fs;
use std::path::{Path, PathBuf};

use super::core::CovsuiteConfig;
use crate::coverage::CoverageThreshold;
use crate::errors::{Error, Result};

/// Name of the configuration file searched for in the working directory
/// and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".covsuite.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<CovsuiteConfig> {
    let config = toml::from_str::<CovsuiteConfig>(contents)?;

    if let Some(threshold) = config.coverage_threshold() {
        CoverageThreshold::from_percentage(threshold)?;
    }

    Ok(config)
}

/// Load an explicitly requested config file. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<CovsuiteConfig> {
    try_load_config_from_path(path)?
        .ok_or_else(|| Error::configuration(format!("config file {} not found", path.display())))
}

/// `Ok(None)` when the file does not exist; read and validation failures
/// are errors.
fn try_load_config_from_path(config_path: &Path) -> Result<Option<CovsuiteConfig>> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        // A missing file just means "keep looking".
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::configuration(format!(
                "failed to read {}: {}",
                config_path.display(),
                e
            )))
        }
    };

    let config = parse_and_validate_config(&contents).map_err(|e| {
        Error::configuration(format!("invalid config {}: {}", config_path.display(), e))
    })?;
    log::debug!("Loaded config from {}", config_path.display());
    Ok(Some(config))
}

/// `start` followed by its ancestors, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.covsuite.toml`. The nearest file
/// wins; a file that exists but does not validate is an error.
pub fn discover_config(start: PathBuf) -> Result<CovsuiteConfig> {
    for dir in directory_ancestors(start, MAX_TRAVERSAL_DEPTH) {
        if let Some(config) = try_load_config_from_path(&dir.join(CONFIG_FILE_NAME))? {
            return Ok(config);
        }
    }

    log::debug!(
        "No {} found after checking {} directories. Using defaults.",
        CONFIG_FILE_NAME,
        MAX_TRAVERSAL_DEPTH
    );
    Ok(CovsuiteConfig::default())
}

/// Load the config from the current directory hierarchy.
pub fn load_config() -> Result<CovsuiteConfig> {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            Ok(CovsuiteConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_and_validate_config(indoc! {r#"
            [build]
            coverage_threshold = 85.5
            output_dir = "out"
            parallel = false
            jobs = 2

            [store]
            path = "data/coverage.json"
        "#})
        .unwrap();

        assert_eq!(config.coverage_threshold(), Some(85.5));
        assert_eq!(config.output_dir(), Some(&PathBuf::from("out")));
        assert_eq!(config.parallel(), Some(false));
        assert_eq!(config.jobs(), Some(2));
        assert_eq!(
            config.store_path(),
            Some(&PathBuf::from("data/coverage.json"))
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(
            parse_and_validate_config("").unwrap(),
            CovsuiteConfig::default()
        );
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let err = parse_and_validate_config("[build]\ncoverage_threshold = 150\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_and_validate_config("[build]\nthreshold = 50\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_discover_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[build]\ncoverage_threshold = 90\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = discover_config(nested).unwrap();
        assert_eq!(config.coverage_threshold(), Some(90.0));
    }

    #[test]
    fn test_invalid_discovered_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[build\n").unwrap();

        let err = discover_config(dir.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_discovered_out_of_range_threshold_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[build]\ncoverage_threshold = 150\n",
        )
        .unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();

        let err = discover_config(nested).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_no_config_found_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path().to_path_buf()).unwrap();
        assert_eq!(config, CovsuiteConfig::default());
    }

    #[test]
    fn test_load_config_from_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let err = load_config_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
    }
}
