//! Error types for record audit operations.
//!
//! Library code returns [`AuditError`]; the binary wraps it in `anyhow` at the
//! edges. Every variant carries enough context (table, identifier, stage) to
//! fix the input and re-run. Nothing here is retryable: the audit is a
//! deterministic computation over a fixed snapshot.
//!
//! # Example
//!
//! ```rust
//! use record_audit::errors::AuditError;
//!
//! let err = AuditError::reference("countries", "Atlantis", "unknown continent '_Sunken'");
//! assert_eq!(err.category(), "Reference");
//! assert!(err.to_string().contains("Atlantis"));
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the audit.
#[derive(Debug, Error)]
pub enum AuditError {
    /// File system errors reading snapshots or writing reports
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The archive snapshot could not be decoded
    #[error("Snapshot error: {message}")]
    Snapshot {
        message: String,
        path: Option<PathBuf>,
    },

    /// A reference table is malformed or references an unknown id
    #[error("Invalid reference data in '{table}' (id {identifier}): {message}")]
    Reference {
        table: &'static str,
        identifier: String,
        message: String,
    },

    /// Configuration file issues
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// A continent appears in the data without a continental record tag
    #[error("No continental record tag configured for continent '{continent_id}' (stage: {stage})")]
    MissingContinentTag {
        continent_id: String,
        stage: &'static str,
    },

    /// A stage received input that an earlier stage should have ruled out
    #[error("Internal invariant violated in stage '{stage}' for result {result_id}: {message}")]
    InvariantViolation {
        stage: &'static str,
        result_id: u64,
        message: String,
    },
}

impl AuditError {
    /// Create an I/O error with path context.
    pub fn io(message: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Create a snapshot decoding error.
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
            path: None,
        }
    }

    /// Create a snapshot decoding error with path context.
    pub fn snapshot_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Snapshot {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a reference data error for one table row.
    pub fn reference(
        table: &'static str,
        identifier: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::Reference {
            table,
            identifier: identifier.to_string(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path context.
    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn invariant(stage: &'static str, result_id: u64, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            stage,
            result_id,
            message: message.into(),
        }
    }

    /// Get the associated path, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => path.as_ref(),
            Self::Snapshot { path, .. } => path.as_ref(),
            Self::Config { path, .. } => path.as_ref(),
            _ => None,
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io { .. } => "I/O",
            Self::Snapshot { .. } => "Snapshot",
            Self::Reference { .. } => "Reference",
            Self::Config { .. } => "Config",
            Self::MissingContinentTag { .. } => "Config",
            Self::InvariantViolation { .. } => "Internal",
        }
    }

    /// Pipeline stage the error was raised in, when it came from a stage.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Self::MissingContinentTag { stage, .. } => Some(stage),
            Self::InvariantViolation { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Whether fixing the input data or configuration resolves the error.
    ///
    /// Invariant violations point at a defect in the audit itself.
    pub fn is_user_fixable(&self) -> bool {
        !matches!(self, Self::InvariantViolation { .. })
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::snapshot(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
