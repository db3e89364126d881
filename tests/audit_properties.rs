//! Property tests for the record audit over generated archives.
//!
//! Archives are small on purpose: few countries, two events and a narrow
//! value range so that ties, invalid values and same-day peers show up often.

use proptest::prelude::*;
use record_audit::core::default_continent_tags;
use record_audit::pipeline::stages::labels::resolve_label;
use record_audit::pipeline::{evaluate_window, run_audit, AuditOptions};
use record_audit::testkit::{SnapshotBuilder, COUNTRIES, EVENTS};
use record_audit::{ArchiveSnapshot, Metric, RecordLabel};
use std::collections::BTreeSet;

const TARGET_YEAR: i32 = 2024;
const LABELS: [&str; 5] = ["", "NR", "ER", "AsR", "WR"];

#[derive(Debug, Clone)]
struct Row {
    country: usize,
    event: usize,
    year: i32,
    month: u32,
    day: u32,
    best: i64,
    average: i64,
    stored_single: usize,
    stored_average: usize,
}

fn competition_id(row: &Row) -> String {
    format!("Comp{}{:02}{:02}", row.year, row.month, row.day)
}

fn value_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        1 => Just(-1i64),
        1 => Just(0i64),
        8 => 100i64..160,
    ]
}

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        (0..3usize, 0..2usize, 2022..2026i32, 1..=12u32, 1..=28u32),
        (value_strategy(), value_strategy(), 0..LABELS.len(), 0..LABELS.len()),
    )
        .prop_map(
            |((country, event, year, month, day), (best, average, stored_single, stored_average))| Row {
                country,
                event,
                year,
                month,
                day,
                best,
                average,
                stored_single,
                stored_average,
            },
        )
}

fn archive_strategy() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(row_strategy(), 1..40)
}

fn builder(rows: &[Row]) -> SnapshotBuilder {
    let competitions: BTreeSet<(String, i32, u32, u32)> = rows
        .iter()
        .map(|row| (competition_id(row), row.year, row.month, row.day))
        .collect();

    let mut builder = SnapshotBuilder::new();
    for (id, year, month, day) in &competitions {
        builder = builder.competition(id, *year, Some((*year, *month, *day)));
    }
    for (i, row) in rows.iter().enumerate() {
        let id = i as u64 + 1;
        builder = builder
            .result(
                id,
                &competition_id(row),
                EVENTS[row.event],
                "f",
                COUNTRIES[row.country].0,
                row.best,
                row.average,
            )
            .labeled(id, LABELS[row.stored_single], LABELS[row.stored_average]);
    }
    builder
}

fn snapshot(rows: &[Row]) -> ArchiveSnapshot {
    builder(rows).snapshot()
}

proptest! {
    /// Property: the audit is a deterministic function of the snapshot,
    /// whether partitions are scanned in parallel or not
    #[test]
    fn prop_audit_is_deterministic(rows in archive_strategy()) {
        let snapshot = snapshot(&rows);
        let parallel = run_audit(&snapshot, &AuditOptions::new(TARGET_YEAR)).unwrap();
        let again = run_audit(&snapshot, &AuditOptions::new(TARGET_YEAR)).unwrap();
        let sequential = run_audit(&snapshot, &AuditOptions::new(TARGET_YEAR).sequential()).unwrap();

        prop_assert_eq!(&parallel, &again);
        prop_assert_eq!(&parallel, &sequential);
    }

    /// Property: a value worse than the frozen national baseline never sets
    /// a national record
    #[test]
    fn prop_national_record_respects_baseline(rows in archive_strategy()) {
        let snapshot = snapshot(&rows);
        let evaluation = evaluate_window(&snapshot, &AuditOptions::new(TARGET_YEAR)).unwrap();

        for entry in &evaluation.evaluated {
            for metric in Metric::ALL {
                let value = entry.candidate.value(metric);
                let baseline = entry.candidate.national_baseline.get(metric);
                if let (Some(value), Some(baseline)) = (value, baseline) {
                    if value > baseline {
                        prop_assert!(!entry.national.get(metric));
                    }
                }
                if value.is_none() {
                    prop_assert!(!entry.national.get(metric));
                    prop_assert!(!entry.world.get(metric));
                }
            }
        }
    }

    /// Property: a world record is also continental, and a continental record
    /// is also national, for the same metric
    #[test]
    fn prop_scope_flags_nest(rows in archive_strategy()) {
        let snapshot = snapshot(&rows);
        let evaluation = evaluate_window(&snapshot, &AuditOptions::new(TARGET_YEAR)).unwrap();

        for entry in &evaluation.evaluated {
            for metric in Metric::ALL {
                if entry.world.get(metric) {
                    prop_assert!(entry.continental.get(metric), "WR without CR: {:?}", entry);
                }
                if entry.continental.get(metric) {
                    prop_assert!(entry.national.get(metric), "CR without NR: {:?}", entry);
                }
            }
        }
    }

    /// Property: the calculated label is the broadest scope flagged
    #[test]
    fn prop_label_precedence(rows in archive_strategy()) {
        let snapshot = snapshot(&rows);
        let evaluation = evaluate_window(&snapshot, &AuditOptions::new(TARGET_YEAR)).unwrap();

        for entry in &evaluation.evaluated {
            for metric in Metric::ALL {
                let label = resolve_label(entry, metric);
                let expected = if entry.world.get(metric) {
                    RecordLabel::World
                } else if entry.continental.get(metric) {
                    RecordLabel::Continental(entry.continent_tag.unwrap())
                } else if entry.national.get(metric) {
                    RecordLabel::National
                } else {
                    RecordLabel::None
                };
                prop_assert_eq!(label, expected);
            }
        }
    }

    /// Property: applying every reported correction leaves nothing to report
    #[test]
    fn prop_corrections_are_stable(rows in archive_strategy()) {
        let snapshot = snapshot(&rows);
        let report = run_audit(&snapshot, &AuditOptions::new(TARGET_YEAR)).unwrap();

        let mut document = builder(&rows).document();
        for discrepancy in &report.discrepancies {
            let row = document
                .results
                .iter_mut()
                .find(|r| r.id == discrepancy.result_id)
                .unwrap();
            row.regional_single_record = discrepancy.calculated_single;
            row.regional_average_record = discrepancy.calculated_average;
        }
        let corrected = ArchiveSnapshot::from_document(document, default_continent_tags()).unwrap();
        let rerun = run_audit(&corrected, &AuditOptions::new(TARGET_YEAR)).unwrap();

        prop_assert!(rerun.discrepancies.is_empty(), "still reported: {:?}", rerun.discrepancies);
    }

    /// Property: summary counts match the generated window split, and the
    /// report is ordered by result id
    #[test]
    fn prop_report_accounts_for_window(rows in archive_strategy()) {
        let snapshot = snapshot(&rows);
        let report = run_audit(&snapshot, &AuditOptions::new(TARGET_YEAR)).unwrap();
        let in_window = rows.iter().filter(|r| r.year >= TARGET_YEAR).count();

        prop_assert_eq!(report.summary.results_in_window, in_window);
        prop_assert_eq!(report.summary.baseline_results, rows.len() - in_window);
        prop_assert!(report.summary.candidates <= report.summary.ranked_results);
        prop_assert!(report
            .discrepancies
            .windows(2)
            .all(|pair| pair[0].result_id < pair[1].result_id));
    }
}
