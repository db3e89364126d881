//! Record audit orchestration.
//!
//! Runs the stages strictly in order: round dates, round sequence, baselines,
//! candidate filter, national scan, continental/world scan, label
//! resolution, discrepancy report. Every stage returns a fresh collection;
//! nothing is written back to the snapshot.

use super::report::{AuditReport, AuditSummary};
use super::stage::{run_stage, FallibleStage, PureStage};
use super::stages::baseline::{snapshot_baselines, Baselines};
use super::stages::candidates::{select_candidates, CandidateContext, CandidateSet, SkippedResult};
use super::stages::discrepancy::report_discrepancies;
use super::stages::labels::resolve_labels;
use super::stages::national::{evaluate_national, EvaluatedCandidate};
use super::stages::regional::{evaluate_regional, regional_input_count};
use super::stages::round_dates::resolve_round_dates;
use super::stages::round_sequence::sequence_rounds;
use crate::core::{ArchiveSnapshot, CompetitionResult, ScheduledRound};
use crate::errors::Result;
use crate::observability::{begin_progress, AuditPhase};
use tracing::{debug, info, info_span};

/// Stages run by [`run_audit`], for crash-report progress.
pub const AUDIT_STAGES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditOptions {
    pub target_year: i32,
    pub parallel: bool,
}

impl AuditOptions {
    pub fn new(target_year: i32) -> Self {
        Self {
            target_year,
            parallel: true,
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Flags for every candidate, before labels are resolved.
#[derive(Debug, Clone)]
pub struct AuditEvaluation {
    pub evaluated: Vec<EvaluatedCandidate>,
    pub skipped: Vec<SkippedResult>,
    pub baselines: Baselines,
    pub summary: AuditSummary,
}

/// Split results into the audit window (target year and later) and the
/// baseline set (strictly earlier), by competition year.
pub fn split_by_year(snapshot: &ArchiveSnapshot, target_year: i32) -> (Vec<&CompetitionResult>, Vec<&CompetitionResult>) {
    snapshot.results.iter().partition(|result| {
        snapshot
            .competitions
            .get(&result.competition_id)
            .is_some_and(|competition| competition.year >= target_year)
    })
}

/// Run stages 1 through 6 and return the evaluated candidates.
pub fn evaluate_window(snapshot: &ArchiveSnapshot, options: &AuditOptions) -> Result<AuditEvaluation> {
    let (window, prior) = split_by_year(snapshot, options.target_year);
    debug!(
        window = window.len(),
        prior = prior.len(),
        "Split archive at target year"
    );

    let round_dates = run_stage(
        &PureStage::new("round_dates", AuditPhase::RoundDates, |schedule: &[ScheduledRound]| {
            resolve_round_dates(schedule, &snapshot.timezones)
        }),
        snapshot.schedule.as_slice(),
    )?;

    let sequence = run_stage(
        &PureStage::new("round_sequence", AuditPhase::RoundSequence, |window: &[&CompetitionResult]| {
            sequence_rounds(window.iter().copied(), &snapshot.reference)
        }),
        window.as_slice(),
    )?;

    let baselines = run_stage(
        &PureStage::new("baselines", AuditPhase::Baseline, |prior: &[&CompetitionResult]| {
            snapshot_baselines(prior.iter().copied(), &snapshot.reference)
        }),
        prior.as_slice(),
    )?;
    debug!(
        rounds_dated = round_dates.len(),
        rounds_sequenced = sequence.len(),
        national_scopes = baselines.national_scopes(),
        "Reference joins ready"
    );

    let context = CandidateContext {
        competitions: &snapshot.competitions,
        reference: &snapshot.reference,
        round_dates: &round_dates,
        sequence: &sequence,
        baselines: &baselines,
    };
    let CandidateSet {
        candidates,
        mut skipped,
        ranked,
    } = run_stage(
        &PureStage::new("candidates", AuditPhase::CandidateFilter, |window: &[&CompetitionResult]| {
            select_candidates(window.iter().copied(), &context)
        }),
        window.as_slice(),
    )?;
    skipped.sort_by_key(|s| s.result_id);
    let candidate_count = candidates.len();

    let national = run_stage(
        &FallibleStage::new("national_records", AuditPhase::NationalRecords, |candidates| {
            evaluate_national(candidates, options.parallel)
        }),
        candidates,
    )?;
    let regional_candidates = regional_input_count(&national);

    let evaluated = run_stage(
        &FallibleStage::new("regional_records", AuditPhase::RegionalRecords, |national| {
            evaluate_regional(national, &baselines, &snapshot.reference, options.parallel)
        }),
        national,
    )?;

    let summary = AuditSummary {
        results_total: snapshot.results.len(),
        results_in_window: window.len(),
        baseline_results: prior.len(),
        ranked_results: ranked,
        candidates: candidate_count,
        regional_candidates,
        skipped: skipped.len(),
        ..AuditSummary::default()
    }
    .with_flag_counts(&evaluated);

    Ok(AuditEvaluation {
        evaluated,
        skipped,
        baselines,
        summary,
    })
}

/// Run the full audit and report every label that needs correcting.
pub fn run_audit(snapshot: &ArchiveSnapshot, options: &AuditOptions) -> Result<AuditReport> {
    let span = info_span!(
        "record_audit",
        target_year = options.target_year,
        results = snapshot.results.len(),
        parallel = options.parallel,
    );
    let _guard = span.enter();
    let _progress = begin_progress(AUDIT_STAGES);
    info!(results = snapshot.results.len(), "Starting record audit");

    let AuditEvaluation {
        evaluated,
        skipped,
        summary,
        ..
    } = evaluate_window(snapshot, options)?;

    let labeled = run_stage(
        &PureStage::new("labels", AuditPhase::LabelResolution, resolve_labels),
        evaluated,
    )?;
    let discrepancies = run_stage(
        &PureStage::new("discrepancies", AuditPhase::DiscrepancyReport, |labeled: Vec<_>| {
            report_discrepancies(&labeled)
        }),
        labeled,
    )?;

    let summary = AuditSummary {
        discrepancies: discrepancies.len(),
        actions: discrepancies.iter().map(|d| d.actions.len()).sum(),
        ..summary
    };
    info!(
        candidates = summary.candidates,
        discrepancies = summary.discrepancies,
        skipped = summary.skipped,
        "Record audit complete"
    );

    Ok(AuditReport {
        target_year: options.target_year,
        summary,
        discrepancies,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RecordLabel;
    use crate::testkit::SnapshotBuilder;

    #[test]
    fn test_split_by_competition_year() {
        let snapshot = SnapshotBuilder::new()
            .competition("Old2023", 2023, Some((2023, 6, 1)))
            .competition("New2024", 2024, Some((2024, 6, 1)))
            .competition("Next2025", 2025, Some((2025, 6, 1)))
            .result(1, "Old2023", "333", "f", "Norway", 700, 800)
            .result(2, "New2024", "333", "f", "Norway", 690, 790)
            .result(3, "Next2025", "333", "f", "Norway", 680, 780)
            .snapshot();
        let (window, prior) = split_by_year(&snapshot, 2024);
        assert_eq!(window.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(prior.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_example_scenario_add_national_record() {
        let snapshot = SnapshotBuilder::new()
            .competition("Old2023", 2023, Some((2023, 6, 1)))
            .competition("Winter2024", 2024, Some((2024, 1, 5)))
            .competition("Spring2024", 2024, Some((2024, 3, 2)))
            .result(1, "Old2023", "333", "f", "Norway", 600, 0)
            .result(10, "Winter2024", "333", "f", "Norway", 580, 0)
            .result(11, "Spring2024", "333", "f", "Norway", 590, 0)
            // a faster European keeps the Norwegian results national only
            .result(2, "Old2023", "333", "f", "Sweden", 500, 0)
            .snapshot();

        let report = run_audit(&snapshot, &AuditOptions::new(2024).sequential()).unwrap();
        assert_eq!(report.discrepancies.len(), 1);
        let d = &report.discrepancies[0];
        assert_eq!(d.result_id, 10);
        assert_eq!(d.calculated_single, RecordLabel::National);
        assert_eq!(d.actions[0].description, "add NR");
    }

    #[test]
    fn test_stale_label_removed() {
        let snapshot = SnapshotBuilder::new()
            .competition("Old2023", 2023, Some((2023, 6, 1)))
            .competition("Open2024", 2024, Some((2024, 2, 1)))
            .result(1, "Old2023", "333", "f", "Norway", 500, 0)
            .result(10, "Open2024", "333", "f", "Norway", 520, 0)
            .labeled(10, "NR", "")
            .snapshot();

        let report = run_audit(&snapshot, &AuditOptions::new(2024)).unwrap();
        assert_eq!(report.discrepancies.len(), 1);
        assert_eq!(report.discrepancies[0].actions[0].description, "remove NR");
    }

    #[test]
    fn test_skipped_results_reported() {
        let snapshot = SnapshotBuilder::new()
            .competition("Undated2024", 2024, None)
            .result(10, "Undated2024", "333", "f", "Norway", 520, 0)
            .labeled(10, "NR", "")
            .snapshot();
        let report = run_audit(&snapshot, &AuditOptions::new(2024)).unwrap();
        assert!(report.discrepancies.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.summary.skipped, 1);
    }

    #[test]
    fn test_progress_scoped_to_run() {
        crate::observability::reset_context();
        let snapshot = SnapshotBuilder::new()
            .competition("Open2024", 2024, Some((2024, 2, 1)))
            .result(10, "Open2024", "333", "f", "Norway", 520, 600)
            .snapshot();
        run_audit(&snapshot, &AuditOptions::new(2024)).unwrap();
        assert!(crate::observability::get_current_context().progress.is_none());
    }

    #[test]
    fn test_summary_counts() {
        let snapshot = SnapshotBuilder::new()
            .competition("Open2024", 2024, Some((2024, 2, 1)))
            .result(10, "Open2024", "333", "f", "Norway", 520, 600)
            .result(11, "Open2024", "333", "f", "Norway", 530, 610)
            .snapshot();
        let evaluation = evaluate_window(&snapshot, &AuditOptions::new(2024)).unwrap();
        assert_eq!(evaluation.summary.results_in_window, 2);
        assert_eq!(evaluation.summary.ranked_results, 2);
        assert_eq!(evaluation.summary.candidates, 1);
        assert_eq!(evaluation.summary.world_records.single, 1);
        assert_eq!(evaluation.summary.world_records.average, 1);
    }
}
