use crate::config::load_config;
use crate::io::load_snapshot;
use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

/// Table counts of a validated snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotCounts {
    pub results: usize,
    pub competitions: usize,
    pub scheduled_rounds: usize,
    pub events: usize,
    pub countries: usize,
    pub continents: usize,
    pub round_types: usize,
    pub timezone_overrides: usize,
}

pub fn validate_snapshot(snapshot: PathBuf, config: Option<PathBuf>) -> Result<SnapshotCounts> {
    let config = load_config(config.as_deref())?;
    let snapshot_path = snapshot;
    let snapshot = load_snapshot(&snapshot_path, config.continent_tags()?)
        .with_context(|| format!("Snapshot {} failed validation", snapshot_path.display()))?;

    let counts = SnapshotCounts {
        results: snapshot.results.len(),
        competitions: snapshot.competitions.len(),
        scheduled_rounds: snapshot.schedule.len(),
        events: snapshot.reference.event_count(),
        countries: snapshot.reference.country_count(),
        continents: snapshot.reference.continent_count(),
        round_types: snapshot.reference.round_type_count(),
        timezone_overrides: snapshot.timezones.overrides().len(),
    };

    println!("{} {}", "✓".green(), format!("{} is valid", snapshot_path.display()).bold());
    for (table, count) in [
        ("results", counts.results),
        ("competitions", counts.competitions),
        ("scheduled rounds", counts.scheduled_rounds),
        ("events", counts.events),
        ("countries", counts.countries),
        ("continents", counts.continents),
        ("round types", counts.round_types),
        ("timezone overrides", counts.timezone_overrides),
    ] {
        println!("  {:<18} {}", table, count);
    }
    Ok(counts)
}
