//! Audit report handed to output writers and the corrections export.

use super::stages::candidates::SkippedResult;
use super::stages::discrepancy::{CorrectiveInstruction, Discrepancy};
use super::stages::national::EvaluatedCandidate;
use crate::core::Metric;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlagCounts {
    pub single: usize,
    pub average: usize,
}

impl FlagCounts {
    fn count<F>(evaluated: &[EvaluatedCandidate], flag: F) -> Self
    where
        F: Fn(&EvaluatedCandidate, Metric) -> bool,
    {
        Self {
            single: evaluated.iter().filter(|e| flag(e, Metric::Single)).count(),
            average: evaluated.iter().filter(|e| flag(e, Metric::Average)).count(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub results_total: usize,
    pub results_in_window: usize,
    pub baseline_results: usize,
    pub ranked_results: usize,
    pub candidates: usize,
    pub regional_candidates: usize,
    pub national_records: FlagCounts,
    pub continental_records: FlagCounts,
    pub world_records: FlagCounts,
    pub discrepancies: usize,
    pub actions: usize,
    pub skipped: usize,
}

impl AuditSummary {
    pub(crate) fn with_flag_counts(mut self, evaluated: &[EvaluatedCandidate]) -> Self {
        self.national_records = FlagCounts::count(evaluated, |e, m| e.national.get(m));
        self.continental_records = FlagCounts::count(evaluated, |e, m| e.continental.get(m));
        self.world_records = FlagCounts::count(evaluated, |e, m| e.world.get(m));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub target_year: i32,
    pub summary: AuditSummary,
    pub discrepancies: Vec<Discrepancy>,
    pub skipped: Vec<SkippedResult>,
}

impl AuditReport {
    pub fn has_discrepancies(&self) -> bool {
        !self.discrepancies.is_empty()
    }

    /// Every instruction the archive update step has to apply.
    pub fn instructions(&self) -> Vec<&CorrectiveInstruction> {
        self.discrepancies
            .iter()
            .flat_map(|d| d.instructions())
            .collect()
    }
}
