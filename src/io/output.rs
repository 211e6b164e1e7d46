use crate::builders::BuildReport;
use crate::io::ensure_dir;
use crate::io::writers::{
    JsonWriter, ManifestWriter, XhtmlWriter, JSON_REPORT_FILE_NAME, REPORT_FILE_NAME,
};
use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Artifact produced by `build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    Report,
    TestSuites,
    Json,
}

impl BuildType {
    /// Where the artifact lands inside `output_dir`. Test suites produce one
    /// file per unit, so the directory itself is returned.
    pub fn output_path(self, output_dir: &Path) -> PathBuf {
        match self {
            BuildType::Report => output_dir.join(REPORT_FILE_NAME),
            BuildType::Json => output_dir.join(JSON_REPORT_FILE_NAME),
            BuildType::TestSuites => output_dir.to_path_buf(),
        }
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &BuildReport) -> anyhow::Result<()>;
}

/// Writer for `build_type`, creating `output_dir` when missing.
pub fn create_writer(
    build_type: BuildType,
    output_dir: &Path,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    ensure_dir(output_dir)?;

    let writer: Box<dyn OutputWriter> = match build_type {
        BuildType::TestSuites => Box::new(ManifestWriter::new(output_dir)),
        BuildType::Report => Box::new(XhtmlWriter::new(create_file(
            &build_type.output_path(output_dir),
        )?)),
        BuildType::Json => Box::new(JsonWriter::new(create_file(
            &build_type.output_path(output_dir),
        )?)),
    };
    Ok(writer)
}

fn create_file(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
