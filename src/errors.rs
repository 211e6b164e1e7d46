//! Shared error types for covsuite
//!
//! Library code returns [`Error`]; command handlers and the binary wrap it
//! in `anyhow` with additional context.

use crate::coverage::LineId;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for covsuite operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid threshold, option or configuration file. Fatal for a build.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A test claims a line that is not part of its unit's line set.
    #[error("Malformed coverage for unit {unit_id}: test {test_id} covers line {line} outside the unit's observed lines")]
    MalformedInput {
        unit_id: String,
        test_id: String,
        line: LineId,
    },

    /// Record store or ingest input could not be read or parsed
    #[error("Store error at {}: {message}", path.display())]
    Store { path: PathBuf, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn store(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Store {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The unit an integrity error concerns. A build may skip that unit and
    /// carry on with the rest; other errors have no unit.
    pub fn unit_id(&self) -> Option<&str> {
        match self {
            Self::MalformedInput { unit_id, .. } => Some(unit_id),
            _ => None,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
