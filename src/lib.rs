//! Record audit for a competition result archive.
//!
//! Recomputes national (NR), continental (AfR/AsR/ER/OcR/NAR/SAR) and world
//! (WR) record labels for single and average results from a target year
//! onward, and reports every stored label that disagrees.
//!
//! ```rust,ignore
//! use record_audit::{load_snapshot, run_audit, AuditOptions};
//! use record_audit::core::default_continent_tags;
//!
//! let snapshot = load_snapshot("archive.json".as_ref(), default_continent_tags())?;
//! let report = run_audit(&snapshot, &AuditOptions::new(2024))?;
//! for discrepancy in &report.discrepancies {
//!     println!("{}: {:?}", discrepancy.result_id, discrepancy.actions);
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod observability;
pub mod pipeline;
pub mod testkit;

pub use crate::core::{ArchiveSnapshot, ContinentTag, Metric, RecordLabel, SnapshotDocument};
pub use crate::errors::{AuditError, Result};
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::io::{load_snapshot, write_corrections};
pub use crate::pipeline::stages::discrepancy::{CorrectiveInstruction, Discrepancy, FieldChange, LabelAction};
pub use crate::pipeline::{run_audit, AuditOptions, AuditReport, AuditSummary};
