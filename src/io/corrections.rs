//! Machine-applicable corrections for the archive update step.
//!
//! One entry per label to change. A `value` sets the field; `clear: true`
//! empties it.

use crate::core::{RecordLabel, ResultId};
use crate::pipeline::report::AuditReport;
use crate::pipeline::stages::discrepancy::FieldChange;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionEntry {
    pub result_id: ResultId,
    pub field: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<RecordLabel>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub clear: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionFile {
    pub target_year: i32,
    pub corrections: Vec<CorrectionEntry>,
}

pub fn collect_corrections(report: &AuditReport) -> CorrectionFile {
    let corrections = report
        .instructions()
        .into_iter()
        .map(|instruction| {
            let (value, clear) = match instruction.change {
                FieldChange::Set(label) => (Some(label), false),
                FieldChange::Clear => (None, true),
            };
            CorrectionEntry {
                result_id: instruction.result_id,
                field: instruction.field,
                value,
                clear,
            }
        })
        .collect();
    CorrectionFile {
        target_year: report.target_year,
        corrections,
    }
}

pub fn write_corrections<W: Write>(report: &AuditReport, mut writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, &collect_corrections(report))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn write_corrections_file(report: &AuditReport, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create corrections file {}", path.display()))?;
    write_corrections(report, BufWriter::new(file))
        .with_context(|| format!("Failed to write corrections to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{run_audit, AuditOptions};
    use crate::testkit::SnapshotBuilder;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_corrections_json_shape() {
        let snapshot = SnapshotBuilder::new()
            .competition("Old2023", 2023, Some((2023, 6, 1)))
            .competition("Open2024", 2024, Some((2024, 2, 1)))
            .result(1, "Old2023", "333", "f", "Norway", 500, 600)
            .result(2, "Old2023", "333", "f", "Sweden", 480, 550)
            .result(10, "Open2024", "333", "f", "Norway", 520, 590)
            .labeled(10, "NR", "")
            .snapshot();
        let report = run_audit(&snapshot, &AuditOptions::new(2024)).unwrap();

        let mut buffer = Vec::new();
        write_corrections(&report, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(
            value,
            json!({
                "target_year": 2024,
                "corrections": [
                    { "result_id": 10, "field": "regional_single_record", "clear": true },
                    { "result_id": 10, "field": "regional_average_record", "value": "NR" }
                ]
            })
        );
    }
}
