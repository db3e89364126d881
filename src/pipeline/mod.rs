//! Record audit pipeline.
//!
//! All business logic lives here as pure functions over an
//! [`ArchiveSnapshot`](crate::core::ArchiveSnapshot). Loading the snapshot and
//! writing reports happen in [`crate::io`].

pub mod audit;
pub mod report;
pub mod stage;
pub mod stages;

pub use audit::{evaluate_window, run_audit, split_by_year, AuditEvaluation, AuditOptions};
pub use report::{AuditReport, AuditSummary, FlagCounts};
pub use stage::{run_stage, FallibleStage, PureStage, Stage};
