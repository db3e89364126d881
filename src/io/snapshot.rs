//! Read an archive snapshot from disk.

use crate::core::{ArchiveSnapshot, ContinentTag, SnapshotDocument};
use crate::errors::{AuditError, Result};
use crate::observability::{set_phase, set_snapshot, AuditPhase};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Decode a snapshot document without validating references.
pub fn read_snapshot_document(path: &Path) -> Result<SnapshotDocument> {
    let contents = fs::read_to_string(path)
        .map_err(|e| AuditError::io("failed to read snapshot", path, e))?;
    debug!(path = %path.display(), bytes = contents.len(), "Read snapshot");
    serde_json::from_str(&contents)
        .map_err(|e| AuditError::snapshot_with_path(e.to_string(), path))
}

/// Read, decode and validate a snapshot.
pub fn load_snapshot(path: &Path, continent_tags: BTreeMap<String, ContinentTag>) -> Result<ArchiveSnapshot> {
    let _phase = set_phase(AuditPhase::Loading);
    let _snapshot = set_snapshot(path.display().to_string());

    let document = read_snapshot_document(path)?;
    let snapshot = ArchiveSnapshot::from_document(document, continent_tags)?;
    info!(
        path = %path.display(),
        results = snapshot.results.len(),
        competitions = snapshot.competitions.len(),
        scheduled_rounds = snapshot.schedule.len(),
        "Loaded archive snapshot"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::default_continent_tags;
    use crate::testkit::SnapshotBuilder;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_load_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        let document = SnapshotBuilder::new()
            .competition("Open2024", 2024, Some((2024, 3, 9)))
            .result(1, "Open2024", "333", "f", "Norway", 900, 1000)
            .labeled(1, "ER", "")
            .document();
        fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();

        let snapshot = load_snapshot(&path, default_continent_tags()).unwrap();
        assert_eq!(snapshot.results.len(), 1);
        assert!(snapshot.results[0].has_stored_label());
    }

    #[test]
    fn test_unknown_label_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(
            &path,
            indoc! {r#"
                {
                  "competitions": [{ "id": "Open2024", "year": 2024 }],
                  "results": [{
                    "id": 1, "competition_id": "Open2024", "event_id": "333",
                    "round_type_id": "f", "person_id": "p1", "country_id": "Norway",
                    "best": 900, "regional_single_record": "XR"
                  }]
                }
            "#},
        )
        .unwrap();

        let err = load_snapshot(&path, default_continent_tags()).unwrap_err();
        assert!(matches!(err, AuditError::Snapshot { .. }));
        assert!(err.to_string().contains("XR"));
        assert_eq!(err.path(), Some(&path));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_snapshot(&dir.path().join("none.json"), default_continent_tags()).unwrap_err();
        assert!(matches!(err, AuditError::Io { .. }));
    }
}
