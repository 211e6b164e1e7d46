use crate::builders::{format_percentage, BuildReport, UnitReport};
use crate::io::output::OutputWriter;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, Table};
use std::io::Write;

/// Human-readable build summary: one row per unit, then utilization and
/// failure counts.
pub struct TerminalWriter<W: Write> {
    writer: W,
    use_color: bool,
}

impl TerminalWriter<std::io::Stdout> {
    pub fn stdout(use_color: bool) -> Self {
        Self::new(std::io::stdout(), use_color)
    }
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, use_color: bool) -> Self {
        Self { writer, use_color }
    }

    fn unit_table(&self, units: &[UnitReport]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        if self.use_color {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }

        table.set_header(vec!["Unit", "Coverage %", "Tests", "Status"]);
        for unit in units {
            let status = if unit.meets_threshold {
                Cell::new("PASS").fg(Color::Green)
            } else {
                Cell::new("FAIL").fg(Color::Red)
            };
            table.add_row(vec![
                Cell::new(&unit.unit_name),
                Cell::new(format_percentage(unit.percentage)).set_alignment(CellAlignment::Right),
                Cell::new(unit.tests.len()).set_alignment(CellAlignment::Right),
                status,
            ]);
        }
        table
    }

    fn write_header(&mut self, report: &BuildReport) -> anyhow::Result<()> {
        let title = format!("Test suites at {} coverage", report.threshold);
        if self.use_color {
            writeln!(self.writer, "{}", title.bold().cyan())?;
        } else {
            writeln!(self.writer, "{title}")?;
        }
        Ok(())
    }

    fn write_footer(&mut self, report: &BuildReport) -> anyhow::Result<()> {
        let passing = format!("{} passing", report.passing_units());
        let failing = format!("{} below threshold", report.failing_units());
        if self.use_color {
            writeln!(self.writer, "{}, {}", passing.green(), failing.red())?;
        } else {
            writeln!(self.writer, "{passing}, {failing}")?;
        }

        writeln!(
            self.writer,
            "Unutilized tests: {} of {}",
            report.unutilized.len(),
            report.total_tests
        )?;

        if report.has_failures() {
            let line = format!("{} unit(s) skipped due to invalid data", report.failures.len());
            if self.use_color {
                writeln!(self.writer, "{}", line.yellow())?;
            } else {
                writeln!(self.writer, "{line}")?;
            }
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &BuildReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        if report.units.is_empty() {
            writeln!(self.writer, "No coverage data found.")?;
        } else {
            let table = self.unit_table(&report.units);
            writeln!(self.writer, "{table}")?;
        }
        self.write_footer(report)?;
        self.writer.flush()?;
        Ok(())
    }
}
