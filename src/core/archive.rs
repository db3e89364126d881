//! Validated, read-only snapshot of the result archive.
//!
//! [`SnapshotDocument`] is the wire shape handed over by the archive
//! collaborator. [`ArchiveSnapshot::from_document`] checks every cross-table
//! reference before any pipeline stage runs, so stages can look ids up
//! without re-validating them.

use super::label::ContinentTag;
use super::reference::ReferenceData;
use super::timezone::{OffsetTable, TimezoneConverter, VenueTimezones};
use super::types::{
    ActivityCode, Competition, CompetitionResult, Continent, Country, Event, Room, RoundType,
    ScheduleActivity, Venue,
};
use crate::errors::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub results: Vec<CompetitionResult>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
    #[serde(default)]
    pub venues: Vec<Venue>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub schedule_activities: Vec<ScheduleActivity>,
    #[serde(default)]
    pub round_types: Vec<RoundType>,
    #[serde(default)]
    pub countries: Vec<Country>,
    #[serde(default)]
    pub continents: Vec<Continent>,
    #[serde(default)]
    pub events: Vec<Event>,
    /// Timezone id → fixed offset from UTC in minutes, overriding the IANA
    /// database for that id.
    #[serde(default)]
    pub timezones: BTreeMap<String, i32>,
}

/// Schedule activity joined to its venue's timezone, restricted to
/// recognized events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledRound {
    pub activity_id: u64,
    pub competition_id: String,
    pub code: ActivityCode,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub timezone_id: String,
}

#[derive(Debug, Clone)]
pub struct ArchiveSnapshot {
    pub results: Vec<CompetitionResult>,
    pub competitions: HashMap<String, Competition>,
    pub schedule: Vec<ScheduledRound>,
    pub reference: ReferenceData,
    pub timezones: VenueTimezones,
}

impl ArchiveSnapshot {
    pub fn from_document(
        document: SnapshotDocument,
        continent_tags: BTreeMap<String, ContinentTag>,
    ) -> Result<Self> {
        let SnapshotDocument {
            results,
            competitions,
            venues,
            rooms,
            schedule_activities,
            round_types,
            countries,
            continents,
            events,
            timezones,
        } = document;

        let timezones = build_timezones(timezones)?;
        let reference = build_reference(round_types, countries, continents, events, continent_tags)?;
        let competitions = index_unique("competitions", competitions, |c| c.id.clone())?;
        let venues = index_unique("venues", venues, |v| v.id)?;
        let rooms = index_unique("rooms", rooms, |r| r.id)?;

        for venue in venues.values() {
            if !competitions.contains_key(&venue.competition_id) {
                return Err(AuditError::reference(
                    "venues",
                    venue.id,
                    format!("unknown competition '{}'", venue.competition_id),
                ));
            }
            if !timezones.knows(&venue.timezone_id) {
                return Err(AuditError::reference(
                    "venues",
                    venue.id,
                    format!("unknown timezone '{}'", venue.timezone_id),
                ));
            }
        }
        for room in rooms.values() {
            if !venues.contains_key(&room.venue_id) {
                return Err(AuditError::reference(
                    "rooms",
                    room.id,
                    format!("unknown venue {}", room.venue_id),
                ));
            }
        }

        let schedule = join_schedule(schedule_activities, &rooms, &venues, &reference)?;
        validate_results(&results, &competitions, &reference)?;

        Ok(Self {
            results,
            competitions,
            schedule,
            reference,
            timezones,
        })
    }
}

fn index_unique<T, K, F>(table: &'static str, rows: Vec<T>, key: F) -> Result<HashMap<K, T>>
where
    K: Eq + Hash + Clone + std::fmt::Display,
    F: Fn(&T) -> K,
{
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        let id = key(&row);
        if index.insert(id.clone(), row).is_some() {
            return Err(AuditError::reference(table, id, "duplicate id"));
        }
    }
    Ok(index)
}

fn build_timezones(raw: BTreeMap<String, i32>) -> Result<VenueTimezones> {
    let overrides = raw.into_iter().try_fold(OffsetTable::new(), |table, (id, minutes)| {
        let message = format!("offset of {} minutes is out of range", minutes);
        table
            .with_offset_minutes(id.clone(), minutes)
            .ok_or_else(|| AuditError::reference("timezones", id, message))
    })?;
    Ok(VenueTimezones::new(overrides))
}

fn build_reference(
    round_types: Vec<RoundType>,
    countries: Vec<Country>,
    continents: Vec<Continent>,
    events: Vec<Event>,
    continent_tags: BTreeMap<String, ContinentTag>,
) -> Result<ReferenceData> {
    let mut reference = ReferenceData::new(continent_tags);

    let mut seen = HashSet::new();
    for event in events {
        if event.id.is_empty() || !seen.insert(event.id.clone()) {
            return Err(AuditError::reference("events", event.id, "empty or duplicate id"));
        }
        reference = reference.with_event(event.id);
    }

    seen.clear();
    for continent in continents {
        if !seen.insert(continent.id.clone()) {
            return Err(AuditError::reference("continents", continent.id, "duplicate id"));
        }
        reference = reference.with_continent(continent.id);
    }

    for country in countries {
        if reference.has_country(&country.id) {
            return Err(AuditError::reference("countries", country.id, "duplicate id"));
        }
        if !reference.has_continent(&country.continent_id) {
            let message = format!("unknown continent '{}'", country.continent_id);
            return Err(AuditError::reference("countries", country.id, message));
        }
        reference = reference.with_country(country.id, country.continent_id);
    }

    for round_type in round_types {
        if reference.has_round_type(&round_type.id) {
            return Err(AuditError::reference("round_types", round_type.id, "duplicate id"));
        }
        reference = reference.with_round_type(round_type.id, round_type.rank);
    }

    Ok(reference)
}

fn join_schedule(
    activities: Vec<ScheduleActivity>,
    rooms: &HashMap<u64, Room>,
    venues: &HashMap<u64, Venue>,
    reference: &ReferenceData,
) -> Result<Vec<ScheduledRound>> {
    let mut schedule = Vec::new();
    for activity in activities {
        let venue = rooms
            .get(&activity.room_id)
            .and_then(|room| venues.get(&room.venue_id))
            .ok_or_else(|| {
                AuditError::reference(
                    "schedule_activities",
                    activity.id,
                    format!("unknown room {}", activity.room_id),
                )
            })?;
        if activity.end_time < activity.start_time {
            return Err(AuditError::reference(
                "schedule_activities",
                activity.id,
                "activity ends before it starts",
            ));
        }

        // Non-round activities (lunch, registration, ...) carry no round date.
        let Some(code) = ActivityCode::parse(&activity.activity_code) else {
            continue;
        };
        if !reference.is_recognized_event(&code.event_id) {
            continue;
        }

        schedule.push(ScheduledRound {
            activity_id: activity.id,
            competition_id: venue.competition_id.clone(),
            code,
            end_time: activity.end_time,
            timezone_id: venue.timezone_id.clone(),
        });
    }
    Ok(schedule)
}

fn validate_results(
    results: &[CompetitionResult],
    competitions: &HashMap<String, Competition>,
    reference: &ReferenceData,
) -> Result<()> {
    let mut ids = HashSet::with_capacity(results.len());
    for result in results {
        if !ids.insert(result.id) {
            return Err(AuditError::reference("results", result.id, "duplicate id"));
        }
        let problem = if !competitions.contains_key(&result.competition_id) {
            Some(format!("unknown competition '{}'", result.competition_id))
        } else if !reference.is_recognized_event(&result.event_id) {
            Some(format!("unknown event '{}'", result.event_id))
        } else if !reference.has_round_type(&result.round_type_id) {
            Some(format!("unknown round type '{}'", result.round_type_id))
        } else if !reference.has_country(&result.country_id) {
            Some(format!("unknown country '{}'", result.country_id))
        } else {
            None
        };
        if let Some(message) = problem {
            return Err(AuditError::reference("results", result.id, message));
        }
    }
    Ok(())
}
