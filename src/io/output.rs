//! Report writers for the audit result.

use crate::core::RecordLabel;
use crate::pipeline::report::{AuditReport, FlagCounts};
use crate::pipeline::stages::discrepancy::Discrepancy;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()>;
}

pub fn create_writer<'w>(format: OutputFormat, writer: Box<dyn Write + 'w>) -> Box<dyn OutputWriter + 'w> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

fn label_cell(label: RecordLabel) -> String {
    if label.is_empty() {
        "-".to_string()
    } else {
        label.to_string()
    }
}

fn transition(stored: RecordLabel, calculated: RecordLabel) -> String {
    if stored == calculated {
        label_cell(stored)
    } else {
        format!("{} → {}", label_cell(stored), label_cell(calculated))
    }
}

fn action_list(discrepancy: &Discrepancy) -> String {
    discrepancy
        .actions
        .iter()
        .map(|a| format!("{}: {}", a.metric, a.description))
        .collect::<Vec<_>>()
        .join("; ")
}

fn summary_rows(report: &AuditReport) -> Vec<(&'static str, String)> {
    let s = &report.summary;
    let flags = |counts: FlagCounts| format!("{} single / {} average", counts.single, counts.average);
    vec![
        ("Results in archive", s.results_total.to_string()),
        ("Results in audit window", s.results_in_window.to_string()),
        ("Baseline results", s.baseline_results.to_string()),
        ("Candidates", s.candidates.to_string()),
        ("Regional candidates", s.regional_candidates.to_string()),
        ("National records", flags(s.national_records)),
        ("Continental records", flags(s.continental_records)),
        ("World records", flags(s.world_records)),
        ("Discrepancies", s.discrepancies.to_string()),
        ("Corrective actions", s.actions.to_string()),
        ("Skipped results", s.skipped.to_string()),
    ]
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Record Audit Report")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Audit window: competitions from {} onward", report.target_year)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        for (metric, value) in summary_rows(report) {
            writeln!(self.writer, "| {metric} | {value} |")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_discrepancies(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Discrepancies")?;
        writeln!(self.writer)?;
        if report.discrepancies.is_empty() {
            writeln!(self.writer, "No discrepancies found.")?;
            writeln!(self.writer)?;
            return Ok(());
        }

        writeln!(
            self.writer,
            "| Result | Competition | Event | Person | Country | Date | Single | Average | Actions |"
        )?;
        writeln!(
            self.writer,
            "|--------|-------------|-------|--------|---------|------|--------|---------|---------|"
        )?;
        for d in &report.discrepancies {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                d.result_id,
                d.competition_id,
                d.event_id,
                d.person_id,
                d.country_id,
                d.date,
                transition(d.stored_single, d.calculated_single),
                transition(d.stored_average, d.calculated_average),
                action_list(d)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_skipped(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        if report.skipped.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Skipped Results ({})", report.skipped.len())?;
        writeln!(self.writer)?;
        for s in &report.skipped {
            writeln!(
                self.writer,
                "- `{}` ({} {}): {}",
                s.result_id, s.competition_id, s.event_id, s.reason
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        self.write_discrepancies(report)?;
        self.write_skipped(report)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

fn discrepancy_table(discrepancies: &[Discrepancy]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Result", "Competition", "Event", "Country", "Date", "Single", "Average", "Actions",
        ]);
    for d in discrepancies {
        table.add_row(vec![
            Cell::new(d.result_id),
            Cell::new(&d.competition_id),
            Cell::new(&d.event_id),
            Cell::new(&d.country_id),
            Cell::new(d.date),
            Cell::new(transition(d.stored_single, d.calculated_single)),
            Cell::new(transition(d.stored_average, d.calculated_average)),
            Cell::new(action_list(d)),
        ]);
    }
    table
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Record Audit Report".bold().blue())?;
        writeln!(self.writer, "{}", "===================".blue())?;
        writeln!(self.writer, "Audit window: competitions from {} onward", report.target_year)?;
        writeln!(self.writer)?;

        writeln!(self.writer, "{}", "Summary:".bold())?;
        for (metric, value) in summary_rows(report) {
            writeln!(self.writer, "  {metric}: {value}")?;
        }
        writeln!(self.writer)?;

        if report.discrepancies.is_empty() {
            writeln!(self.writer, "{}", "✓ Stored record labels match".green())?;
        } else {
            writeln!(
                self.writer,
                "{}",
                format!("{} results need label corrections", report.discrepancies.len())
                    .yellow()
                    .bold()
            )?;
            writeln!(self.writer, "{}", discrepancy_table(&report.discrepancies))?;
        }

        if !report.skipped.is_empty() {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{}",
                format!("{} results skipped (no usable date):", report.skipped.len()).yellow()
            )?;
            for s in &report.skipped {
                writeln!(self.writer, "  {} {} {}: {}", s.result_id, s.competition_id, s.event_id, s.reason)?;
            }
        }
        Ok(())
    }
}
