//! Domain model for the record audit: archive rows, record labels, reference
//! tables and the validated snapshot the pipeline reads from.

pub mod archive;
pub mod label;
pub mod reference;
pub mod timezone;
pub mod types;

pub use archive::{ArchiveSnapshot, ScheduledRound, SnapshotDocument};
pub use label::{ContinentTag, RecordLabel};
pub use reference::{default_continent_tags, ReferenceData};
pub use timezone::{IanaTimezones, OffsetTable, TimezoneConverter, VenueTimezones};
pub use types::{
    ranking_value, valid_value, ActivityCode, Competition, CompetitionResult, Continent, Country,
    Event, Metric, ResultId, Room, RoundKey, RoundType, ScheduleActivity, Venue,
};
