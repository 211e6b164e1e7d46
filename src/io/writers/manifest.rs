//! Per-unit test-suite manifests.
//!
//! Each unit gets `<unit name>.testSuite`, an `ApexTestSuite` document that
//! lists the selected test classes in selection order. When two units share
//! a name (a class and a trigger, say) the later one is written as
//! `<unit name>_<unit id>.testSuite`.

use crate::builders::{BuildReport, UnitReport};
use crate::io::{ensure_dir, OutputWriter};
use crate::observability::{set_current_file, set_current_unit};
use anyhow::{Context, Result};
use html_escape::encode_text;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

pub const MANIFEST_NAMESPACE: &str = "http://soap.sforce.com/2006/04/metadata";
pub const MANIFEST_EXTENSION: &str = "testSuite";

/// Render the manifest document for one unit.
pub fn render_manifest(unit: &UnitReport) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<ApexTestSuite xmlns=\"{MANIFEST_NAMESPACE}\">");
    for name in unit.test_names() {
        let _ = writeln!(xml, "  <testClassName>{}</testClassName>", encode_text(name));
    }
    xml.push_str("</ApexTestSuite>\n");
    xml
}

/// File name for a unit's manifest. Path separators in the unit name are
/// replaced so the file always lands directly in the output directory.
pub fn manifest_file_name(unit_name: &str) -> String {
    let safe: String = unit_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}.{MANIFEST_EXTENSION}")
}

pub struct ManifestWriter {
    output_dir: PathBuf,
    used_names: HashSet<String>,
}

impl ManifestWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            used_names: HashSet::new(),
        }
    }

    /// File name for `unit`, unique within one report. Names are compared
    /// case-insensitively; a clash gets the unit id appended.
    fn file_name_for(&mut self, unit: &UnitReport) -> String {
        let name = manifest_file_name(&unit.unit_name);
        if self.used_names.insert(name.to_lowercase()) {
            return name;
        }

        let unique = manifest_file_name(&format!("{}_{}", unit.unit_name, unit.unit_id));
        log::warn!(
            "Unit {} shares the name '{}' with another unit; writing {}",
            unit.unit_id,
            unit.unit_name,
            unique
        );
        self.used_names.insert(unique.to_lowercase());
        unique
    }

    fn write_unit(&mut self, unit: &UnitReport) -> Result<PathBuf> {
        let file_name = self.file_name_for(unit);
        let path = self.output_dir.join(file_name);
        let _file = set_current_file(&path);
        fs::write(&path, render_manifest(unit))
            .with_context(|| format!("Failed to write manifest {}", path.display()))?;
        Ok(path)
    }
}

impl OutputWriter for ManifestWriter {
    fn write_report(&mut self, report: &BuildReport) -> Result<()> {
        ensure_dir(&self.output_dir)?;
        self.used_names.clear();

        for unit in &report.units {
            let _unit = set_current_unit(&unit.unit_name);
            let path = self.write_unit(unit)?;
            log::debug!("Wrote {}", path.display());
        }

        log::info!(
            "Wrote {} test suite manifest(s) to {}",
            report.units.len(),
            self.output_dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::TestShare;
    use crate::coverage::CoverageThreshold;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn unit(name: &str, tests: &[&str]) -> UnitReport {
        UnitReport {
            unit_id: "U".into(),
            unit_name: name.into(),
            total_lines: 10,
            covered_lines: 8,
            percentage: Some(80.0),
            meets_threshold: true,
            tests: tests
                .iter()
                .map(|t| TestShare {
                    test_id: t.to_string(),
                    test_name: t.to_string(),
                    covered_lines: 4,
                    unique_lines: 4,
                    share: 40.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_render_manifest_lists_tests_in_order() {
        let xml = render_manifest(&unit("AccountService", &["ZedTest", "AlphaTest"]));
        assert_eq!(
            xml,
            indoc! {r#"
                <?xml version="1.0" encoding="UTF-8"?>
                <ApexTestSuite xmlns="http://soap.sforce.com/2006/04/metadata">
                  <testClassName>ZedTest</testClassName>
                  <testClassName>AlphaTest</testClassName>
                </ApexTestSuite>
            "#}
        );
    }

    #[test]
    fn test_render_manifest_escapes_names() {
        let xml = render_manifest(&unit("U", &["A<B>&C"]));
        assert!(xml.contains("<testClassName>A&lt;B&gt;&amp;C</testClassName>"));
    }

    #[test]
    fn test_manifest_file_name_is_flat() {
        assert_eq!(manifest_file_name("AccountService"), "AccountService.testSuite");
        assert_eq!(manifest_file_name("ns/Trigger"), "ns_Trigger.testSuite");
    }

    #[test]
    fn test_units_sharing_a_name_get_distinct_files() {
        let dir = TempDir::new().unwrap();
        let mut class = unit("Account", &["ClassTest"]);
        class.unit_id = "01pA".into();
        let mut trigger = unit("account", &["TriggerTest"]);
        trigger.unit_id = "01qT".into();
        let report = BuildReport {
            generated_at: chrono::Utc::now(),
            threshold: CoverageThreshold::default(),
            units: vec![class, trigger],
            total_tests: 2,
            unutilized: vec![],
            failures: vec![],
        };

        ManifestWriter::new(dir.path()).write_report(&report).unwrap();

        let first = fs::read_to_string(dir.path().join("Account.testSuite")).unwrap();
        let second = fs::read_to_string(dir.path().join("account_01qT.testSuite")).unwrap();
        assert!(first.contains("ClassTest"));
        assert!(second.contains("TriggerTest"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
