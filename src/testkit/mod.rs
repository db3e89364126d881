//! Test fixtures for the record audit.
//!
//! - [`reference_data`]: a small reference table set (three events, four
//!   countries on three continents, round types `1`, `2`, `f`)
//! - [`result`] and [`candidate`]: single rows with sensible defaults
//! - [`SnapshotBuilder`]: a fluent builder for whole snapshot documents
//!
//! ```rust,ignore
//! use record_audit::testkit::SnapshotBuilder;
//!
//! let snapshot = SnapshotBuilder::new()
//!     .competition("Open2024", 2024, Some((2024, 3, 9)))
//!     .result(1, "Open2024", "333", "f", "Norway", 900, 1000)
//!     .labeled(1, "NR", "")
//!     .snapshot();
//! ```
//!
//! Fixture code panics on malformed input; it is only meant for tests.

use crate::core::{
    default_continent_tags, ArchiveSnapshot, Competition, CompetitionResult, Continent, Country,
    Event, RecordLabel, ReferenceData, Room, RoundType, ScheduleActivity, SnapshotDocument, Venue,
};
use crate::pipeline::stages::baseline::Baseline;
use crate::pipeline::stages::candidates::{Candidate, DateSource};
use chrono::{DateTime, Duration, NaiveDate, Utc};

pub const EVENTS: [&str; 3] = ["333", "222", "444"];

pub const COUNTRIES: [(&str, &str); 4] = [
    ("Norway", "_Europe"),
    ("Sweden", "_Europe"),
    ("Japan", "_Asia"),
    ("USA", "_North America"),
];

/// Round types in ascending rank order.
pub const ROUND_TYPES: [(&str, i32); 3] = [("1", 10), ("2", 20), ("f", 100)];

/// Competition every fixture row belongs to unless moved.
pub const DEFAULT_COMPETITION: &str = "Open2024";

pub fn reference_data() -> ReferenceData {
    let mut reference = ReferenceData::new(default_continent_tags());
    for event in EVENTS {
        reference = reference.with_event(event);
    }
    for continent in default_continent_tags().keys() {
        reference = reference.with_continent(continent.clone());
    }
    for (country, continent) in COUNTRIES {
        reference = reference.with_country(country, continent);
    }
    for (id, rank) in ROUND_TYPES {
        reference = reference.with_round_type(id, rank);
    }
    reference
}

/// A final-round result at [`DEFAULT_COMPETITION`].
pub fn result(id: u64, country: &str, event: &str, best: i64, average: i64) -> CompetitionResult {
    CompetitionResult {
        id,
        competition_id: DEFAULT_COMPETITION.to_string(),
        event_id: event.to_string(),
        round_type_id: "f".to_string(),
        person_id: format!("person-{}", id),
        country_id: country.to_string(),
        best,
        average,
        regional_single_record: RecordLabel::None,
        regional_average_record: RecordLabel::None,
    }
}

/// A candidate dated `(month, day)` of 2024, with no national baseline.
pub fn candidate(
    id: u64,
    country: &str,
    event: &str,
    (month, day): (u32, u32),
    best: i64,
    average: i64,
) -> Candidate {
    let continent_id = COUNTRIES
        .iter()
        .find(|(c, _)| *c == country)
        .map(|(_, continent)| continent.to_string())
        .unwrap_or_else(|| panic!("fixture country '{}' is not in COUNTRIES", country));
    Candidate {
        result_id: id,
        competition_id: DEFAULT_COMPETITION.to_string(),
        event_id: event.to_string(),
        person_id: format!("person-{}", id),
        country_id: country.to_string(),
        continent_id,
        round_index: 1,
        date: NaiveDate::from_ymd_opt(2024, month, day).expect("valid fixture date"),
        date_source: DateSource::CompetitionStart,
        best,
        average,
        stored_single: RecordLabel::None,
        stored_average: RecordLabel::None,
        national_baseline: Baseline::default(),
    }
}

fn parse_instant(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("fixture instants are RFC 3339")
        .with_timezone(&Utc)
}

/// Fluent builder for [`SnapshotDocument`]s seeded with the fixture
/// reference tables.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    document: SnapshotDocument,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        let document = SnapshotDocument {
            events: EVENTS
                .iter()
                .map(|id| Event {
                    id: id.to_string(),
                    name: String::new(),
                })
                .collect(),
            continents: default_continent_tags()
                .into_keys()
                .map(|id| Continent { id })
                .collect(),
            countries: COUNTRIES
                .iter()
                .map(|(id, continent)| Country {
                    id: id.to_string(),
                    continent_id: continent.to_string(),
                })
                .collect(),
            round_types: ROUND_TYPES
                .iter()
                .map(|(id, rank)| RoundType {
                    id: id.to_string(),
                    rank: *rank,
                })
                .collect(),
            ..SnapshotDocument::default()
        };
        Self { document }
    }

    pub fn competition(mut self, id: &str, year: i32, start: Option<(i32, u32, u32)>) -> Self {
        self.document.competitions.push(Competition {
            id: id.to_string(),
            year,
            start_date: start.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")),
        });
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn result(
        mut self,
        id: u64,
        competition: &str,
        event: &str,
        round_type: &str,
        country: &str,
        best: i64,
        average: i64,
    ) -> Self {
        let mut row = result(id, country, event, best, average);
        row.competition_id = competition.to_string();
        row.round_type_id = round_type.to_string();
        self.document.results.push(row);
        self
    }

    /// Set the stored labels of the most recently added result with `id`.
    pub fn labeled(mut self, id: u64, single: &str, average: &str) -> Self {
        let row = self
            .document
            .results
            .iter_mut()
            .rev()
            .find(|r| r.id == id)
            .unwrap_or_else(|| panic!("no fixture result with id {}", id));
        row.regional_single_record = single.parse().expect("valid fixture label");
        row.regional_average_record = average.parse().expect("valid fixture label");
        self
    }

    /// Pin `timezone` to a fixed UTC offset instead of the IANA rules.
    pub fn timezone_override(mut self, timezone: &str, minutes: i32) -> Self {
        self.document.timezones.insert(timezone.to_string(), minutes);
        self
    }

    /// Add a venue and a room sharing its id.
    pub fn venue(mut self, id: u64, competition: &str, timezone: &str) -> Self {
        self.document.venues.push(Venue {
            id,
            competition_id: competition.to_string(),
            timezone_id: timezone.to_string(),
        });
        self.document.rooms.push(Room { id, venue_id: id });
        self
    }

    /// Add an activity lasting 30 minutes and ending at `end_time`.
    pub fn activity(mut self, id: u64, room: u64, code: &str, end_time: &str) -> Self {
        let end_time = parse_instant(end_time);
        self.document.schedule_activities.push(ScheduleActivity {
            id,
            room_id: room,
            activity_code: code.to_string(),
            start_time: end_time - Duration::minutes(30),
            end_time,
        });
        self
    }

    pub fn document(self) -> SnapshotDocument {
        self.document
    }

    pub fn snapshot(self) -> ArchiveSnapshot {
        ArchiveSnapshot::from_document(self.document, default_continent_tags())
            .expect("fixture snapshot is valid")
    }
}
