use crate::builders::{format_percentage, BuildReport, UnitReport};
use crate::io::output::OutputWriter;
use anyhow::Result;
use html_escape::encode_text;
use std::fmt::Write as _;
use std::io::Write;

pub const REPORT_FILE_NAME: &str = "Apex Code Coverage Report.xhtml";

pub struct XhtmlWriter<W: Write> {
    writer: W,
    template: &'static str,
}

impl<W: Write> XhtmlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            template: include_str!("templates/report.xhtml"),
        }
    }

    fn render(&self, report: &BuildReport) -> String {
        let title = format!(
            "Apex Code Coverage Report {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        let units = render_units(&report.units);
        let unutilized = render_unutilized(report);
        let unutilized_count = report.unutilized.len().to_string();
        let total_tests = report.total_tests.to_string();
        let threshold = report.threshold.to_string();
        let title = encode_text(&title);

        fill_template(self.template, |key| match key {
            "TITLE" => Some(&*title),
            "THRESHOLD" => Some(threshold.as_str()),
            "UNITS" => Some(units.as_str()),
            "UNUTILIZED_COUNT" => Some(unutilized_count.as_str()),
            "TOTAL_TESTS" => Some(total_tests.as_str()),
            "UNUTILIZED" => Some(unutilized.as_str()),
            _ => None,
        })
    }
}

/// Replace each `{{{KEY}}}` in `template` in a single pass. Substituted text
/// is never scanned again; unknown keys are left as they are.
fn fill_template<'a>(template: &str, value: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 3..];
        match after.find("}}}") {
            Some(end) => match value(&after[..end]) {
                Some(text) => {
                    out.push_str(text);
                    rest = &after[end + 3..];
                }
                None => {
                    out.push_str("{{{");
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

impl<W: Write> OutputWriter for XhtmlWriter<W> {
    fn write_report(&mut self, report: &BuildReport) -> Result<()> {
        let xhtml = self.render(report);
        self.writer.write_all(xhtml.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

fn render_units(units: &[UnitReport]) -> String {
    let mut out = String::new();
    for unit in units {
        let class = if unit.meets_threshold { "pass" } else { "fail" };
        let _ = writeln!(out, "    <table>");
        let _ = writeln!(out, "      <thead class=\"{class}\">");
        let _ = writeln!(
            out,
            "        <tr><th>{}</th><th>{}</th></tr>",
            encode_text(&unit.unit_name),
            format_percentage(unit.percentage)
        );
        let _ = writeln!(out, "      </thead>");
        let _ = writeln!(out, "      <tbody>");
        for test in &unit.tests {
            let _ = writeln!(
                out,
                "        <tr><td>{}</td><td>{:.1}</td></tr>",
                encode_text(&test.test_name),
                test.share
            );
        }
        let _ = writeln!(out, "      </tbody>");
        let _ = writeln!(out, "    </table>");
    }
    out.trim_end_matches('\n').to_string()
}

fn render_unutilized(report: &BuildReport) -> String {
    report
        .unutilized
        .iter()
        .map(|test| format!("      <li>{}</li>", encode_text(&test.name)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::TestShare;
    use crate::coverage::{CoverageThreshold, TestIdentity};

    fn unit(name: &str, percentage: Option<f64>, passing: bool) -> UnitReport {
        UnitReport {
            unit_id: format!("id-{name}"),
            unit_name: name.into(),
            total_lines: 3,
            covered_lines: 2,
            percentage,
            meets_threshold: passing,
            tests: vec![TestShare {
                test_id: "T1".into(),
                test_name: "AccountTest".into(),
                covered_lines: 2,
                unique_lines: 2,
                share: 200.0 / 3.0,
            }],
        }
    }

    fn report() -> BuildReport {
        BuildReport {
            generated_at: chrono::Utc::now(),
            threshold: CoverageThreshold::default(),
            units: vec![
                unit("Account & Co", Some(200.0 / 3.0), false),
                unit("Empty", None, true),
            ],
            total_tests: 2,
            unutilized: vec![TestIdentity::new("T9", "<Orphan>")],
            failures: vec![],
        }
    }

    fn render(report: &BuildReport) -> String {
        let mut buffer = Vec::new();
        XhtmlWriter::new(&mut buffer).write_report(report).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_all_template_variables_substituted() {
        let xhtml = render(&report());
        assert!(!xhtml.contains("{{{"));
        assert!(xhtml.contains("xmlns=\"http://www.w3.org/1999/xhtml\""));
        assert!(xhtml.contains("Threshold: 75%"));
    }

    #[test]
    fn test_units_render_with_status_class() {
        let xhtml = render(&report());
        assert!(xhtml.contains("<thead class=\"fail\">"));
        assert!(xhtml.contains("<th>Account &amp; Co</th><th>66.7</th>"));
        assert!(xhtml.contains("<thead class=\"pass\">"));
        assert!(xhtml.contains("<th>Empty</th><th>N/A</th>"));
        assert!(xhtml.contains("<tr><td>AccountTest</td><td>66.7</td></tr>"));
    }

    #[test]
    fn test_unutilized_section() {
        let xhtml = render(&report());
        assert!(xhtml.contains("Unutilized tests (1 of 2)"));
        assert!(xhtml.contains("<li>&lt;Orphan&gt;</li>"));
    }

    #[test]
    fn test_placeholder_text_in_names_is_not_substituted() {
        let mut report = report();
        report.units[0].unit_name = "{{{TOTAL_TESTS}}}".into();
        report.unutilized = vec![TestIdentity::new("T9", "{{{UNUTILIZED}}}")];

        let xhtml = render(&report);
        assert!(xhtml.contains("<th>{{{TOTAL_TESTS}}}</th>"));
        assert!(xhtml.contains("<li>{{{UNUTILIZED}}}</li>"));
        assert!(xhtml.contains("Unutilized tests (1 of 2)"));
    }

    #[test]
    fn test_fill_template_leaves_unknown_keys() {
        let filled = fill_template("a {{{X}}} b {{{Y}}} c {{{", |key| {
            (key == "X").then_some("x")
        });
        assert_eq!(filled, "a x b {{{Y}}} c {{{");
    }

    #[test]
    fn test_empty_report() {
        let mut empty = report();
        empty.units.clear();
        empty.unutilized.clear();
        empty.total_tests = 0;

        let xhtml = render(&empty);
        assert!(!xhtml.contains("<table>"));
        assert!(xhtml.contains("Unutilized tests (0 of 0)"));
    }
}
