//! Audit stages, in pipeline order.
//!
//! Each stage is a pure function over the previous stage's output and the
//! read-only reference data in the snapshot.

pub mod round_dates;
pub mod round_sequence;
pub mod baseline;
pub mod candidates;
pub mod running_min;
pub mod national;
pub mod regional;
pub mod labels;
pub mod discrepancy;

pub use baseline::{snapshot_baselines, Baseline, Baselines};
pub use candidates::{select_candidates, Candidate, CandidateContext, CandidateSet, DateSource, SkippedResult};
pub use discrepancy::{
    report_discrepancies, CorrectiveAction, CorrectiveInstruction, Discrepancy, FieldChange, LabelAction,
};
pub use labels::{resolve_labels, LabeledResult};
pub use national::{evaluate_national, EvaluatedCandidate, ScopeFlags};
pub use regional::evaluate_regional;
pub use round_dates::{resolve_round_dates, RoundDates};
pub use round_sequence::{sequence_rounds, RoundSequence};
