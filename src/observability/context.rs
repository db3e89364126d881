//! Thread-local context tracking for crash reports.
//!
//! Each thread (including rayon workers) keeps its own context. Progress
//! counts pipeline stages completed on the thread driving the audit.

use std::cell::RefCell;

thread_local! {
    static CURRENT_CONTEXT: RefCell<AuditContext> = const { RefCell::new(AuditContext::new()) };
}

/// What the audit was doing when something went wrong.
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub phase: Option<AuditPhase>,
    /// Snapshot file being audited, if any
    pub snapshot: Option<String>,
    pub progress: Option<StageProgress>,
}

impl AuditContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            snapshot: None,
            progress: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProgress {
    pub completed: usize,
    pub total: usize,
}

impl StageProgress {
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        self.completed * 100 / self.total
    }
}

/// Major steps of an audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditPhase {
    /// Reading and validating the archive snapshot
    Loading,
    RoundDates,
    RoundSequence,
    Baseline,
    CandidateFilter,
    NationalRecords,
    RegionalRecords,
    LabelResolution,
    DiscrepancyReport,
    /// Writing reports and correction files
    OutputGeneration,
}

impl std::fmt::Display for AuditPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::RoundDates => write!(f, "round_dates"),
            Self::RoundSequence => write!(f, "round_sequence"),
            Self::Baseline => write!(f, "baseline"),
            Self::CandidateFilter => write!(f, "candidate_filter"),
            Self::NationalRecords => write!(f, "national_records"),
            Self::RegionalRecords => write!(f, "regional_records"),
            Self::LabelResolution => write!(f, "label_resolution"),
            Self::DiscrepancyReport => write!(f, "discrepancy_report"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// RAII guard restoring the previous context on drop.
pub struct ContextGuard {
    previous: AuditContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update_context(update: impl FnOnce(&mut AuditContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        update(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current phase until the returned guard drops.
#[must_use]
pub fn set_phase(phase: AuditPhase) -> ContextGuard {
    update_context(|ctx| ctx.phase = Some(phase))
}

/// Record which snapshot file is being processed.
#[must_use]
pub fn set_snapshot(path: impl Into<String>) -> ContextGuard {
    update_context(|ctx| ctx.snapshot = Some(path.into()))
}

/// Start counting stages for one audit run until the returned guard drops.
#[must_use]
pub fn begin_progress(total: usize) -> ContextGuard {
    update_context(|ctx| ctx.progress = Some(StageProgress { completed: 0, total }))
}

/// Mark one stage as completed. A no-op outside [`begin_progress`].
///
/// Call after the stage's own guards have dropped, otherwise the restore
/// undoes the increment.
pub fn advance_progress() {
    CURRENT_CONTEXT.with(|ctx| {
        if let Some(progress) = ctx.borrow_mut().progress.as_mut() {
            progress.completed = (progress.completed + 1).min(progress.total);
        }
    });
}

#[must_use]
pub fn get_current_context() -> AuditContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = AuditContext::new();
    });
}
