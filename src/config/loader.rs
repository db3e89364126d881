use std::fs;
use std::path::{Path, PathBuf};

use super::core::RecordAuditConfig;
use crate::errors::{AuditError, Result};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = ".record-audit.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse and validate configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<RecordAuditConfig> {
    let config = toml::from_str::<RecordAuditConfig>(contents)
        .map_err(|e| AuditError::config(format!("failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;
    config.continent_tags()?;
    Ok(config)
}

/// Load a config file the user named explicitly. Any problem is an error.
pub fn load_config_from_path(path: &Path) -> Result<RecordAuditConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| AuditError::io("failed to read config file", path, e))?;
    parse_config(&contents).map_err(|e| match e {
        AuditError::Config { message, .. } => AuditError::config_with_path(message, path),
        other => other,
    })
}

/// Discovered files are best-effort: unreadable or malformed ones are skipped.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<RecordAuditConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %config_path.display(), error = %e, "Failed to read config file");
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            debug!(path = %config_path.display(), "Loaded config");
            Some(config)
        }
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Ignoring invalid config file, using defaults");
            None
        }
    }
}

/// `start` and its ancestors, nearest first, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Walk up from `start` and return the nearest usable config.
///
/// An invalid file is reported and treated as absent, which ends the search
/// with defaults.
pub fn discover_config(start: PathBuf) -> RecordAuditConfig {
    let mut candidates = directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists());

    match candidates.next() {
        Some(path) => try_load_config_from_path(&path).unwrap_or_default(),
        None => {
            debug!(
                depth = MAX_TRAVERSAL_DEPTH,
                "No config found, using default config"
            );
            RecordAuditConfig::default()
        }
    }
}

/// Config named by `--config`, or discovered from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<RecordAuditConfig> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }
    match std::env::current_dir() {
        Ok(dir) => Ok(discover_config(dir)),
        Err(e) => {
            warn!(error = %e, "Failed to get current directory, using default config");
            Ok(RecordAuditConfig::default())
        }
    }
}
