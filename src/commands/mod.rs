pub mod audit;
pub mod init;
pub mod validate;

pub use audit::{audit_archive, AuditCommand};
pub use init::init_config;
pub use validate::validate_snapshot;
