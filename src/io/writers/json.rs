use crate::builders::BuildReport;
use crate::io::output::OutputWriter;
use std::io::Write;

pub const JSON_REPORT_FILE_NAME: &str = "coverage-report.json";

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &BuildReport) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{build_report, BuildOptions};
    use crate::coverage::{CoverageRecord, CoverageThreshold};

    #[test]
    fn test_json_contains_units_and_unutilized() {
        let records = vec![
            CoverageRecord::new("U1", "Account", "T1", "AccountTest").with_covered([1, 2]),
            CoverageRecord::new("U1", "Account", "T2", "SlowTest").with_covered([1]),
        ];
        let options = BuildOptions::new(CoverageThreshold::from_percentage(100.0).unwrap());
        let report = build_report(&records, &options.sequential());

        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["threshold"], 100.0);
        assert_eq!(value["units"][0]["unit_name"], "Account");
        assert_eq!(value["units"][0]["percentage"], 100.0);
        assert_eq!(value["units"][0]["tests"][0]["test_name"], "AccountTest");
        assert_eq!(value["unutilized"][0]["name"], "SlowTest");
        assert_eq!(value["total_tests"], 2);
    }

    #[test]
    fn test_empty_unit_percentage_is_null() {
        let records = vec![CoverageRecord::new("U1", "Empty", "T1", "Test")];
        let report = build_report(&records, &BuildOptions::default().sequential());

        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert!(value["units"][0]["percentage"].is_null());
        assert_eq!(value["units"][0]["meets_threshold"], true);
    }
}
