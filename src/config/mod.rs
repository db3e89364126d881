//! `.record-audit.toml` configuration.
//!
//! ```toml
//! [audit]
//! target_year = 2024
//! parallel = true
//! jobs = 0
//!
//! [continents]
//! "_Europe" = "ER"
//!
//! [output]
//! default_format = "markdown"
//! ```

mod core;
mod loader;

pub use core::{default_config_toml, AuditSection, OutputConfig, RecordAuditConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path, parse_config,
    CONFIG_FILE_NAME,
};
