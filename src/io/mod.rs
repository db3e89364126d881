//! File input and report output.

pub mod corrections;
pub mod output;
pub mod snapshot;

pub use corrections::{collect_corrections, write_corrections, write_corrections_file, CorrectionFile};
pub use output::{create_writer, OutputFormat, OutputWriter};
pub use snapshot::{load_snapshot, read_snapshot_document};
