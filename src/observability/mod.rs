//! Observability for audit runs: structured logging, crash reports and
//! per-thread stage context.
//!
//! Install the panic hook and the subscriber at startup:
//!
//! ```ignore
//! use record_audit::observability::{init_tracing, install_panic_hook};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_tracing(0);
//! }
//! ```
//!
//! Stages mark themselves while they run, so a crash report names the stage
//! and the snapshot being audited:
//!
//! ```ignore
//! let _phase = set_phase(AuditPhase::NationalRecords);
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    advance_progress, begin_progress, get_current_context, reset_context, set_phase,
    set_snapshot, AuditContext, AuditPhase, ContextGuard, StageProgress,
};
pub use panic_hook::install_panic_hook;
pub use tracing::{init_tracing, verbosity_filter};
