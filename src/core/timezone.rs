//! Conversion of archive-clock instants to venue-local wall time.
//!
//! Venues name IANA timezones, resolved with daylight-saving rules through
//! `chrono-tz`. A snapshot may pin an id to a fixed offset instead.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;

/// Converts instants on the archive clock into venue-local wall time.
pub trait TimezoneConverter: Send + Sync {
    /// Returns `None` when the timezone id is not known to the converter.
    fn to_local(&self, instant: DateTime<Utc>, timezone_id: &str) -> Option<NaiveDateTime>;

    fn knows(&self, timezone_id: &str) -> bool;
}

/// IANA timezone database lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct IanaTimezones;

impl TimezoneConverter for IanaTimezones {
    fn to_local(&self, instant: DateTime<Utc>, timezone_id: &str) -> Option<NaiveDateTime> {
        let tz = timezone_id.parse::<Tz>().ok()?;
        Some(instant.with_timezone(&tz).naive_local())
    }

    fn knows(&self, timezone_id: &str) -> bool {
        timezone_id.parse::<Tz>().is_ok()
    }
}

/// Venue timezones: fixed-offset overrides first, then the IANA database.
#[derive(Debug, Clone, Default)]
pub struct VenueTimezones {
    overrides: OffsetTable,
}

impl VenueTimezones {
    pub fn new(overrides: OffsetTable) -> Self {
        Self { overrides }
    }

    pub fn overrides(&self) -> &OffsetTable {
        &self.overrides
    }
}

impl TimezoneConverter for VenueTimezones {
    fn to_local(&self, instant: DateTime<Utc>, timezone_id: &str) -> Option<NaiveDateTime> {
        self.overrides
            .to_local(instant, timezone_id)
            .or_else(|| IanaTimezones.to_local(instant, timezone_id))
    }

    fn knows(&self, timezone_id: &str) -> bool {
        self.overrides.knows(timezone_id) || IanaTimezones.knows(timezone_id)
    }
}

/// Fixed UTC offsets keyed by timezone id.
#[derive(Debug, Clone, Default)]
pub struct OffsetTable {
    offsets: HashMap<String, FixedOffset>,
}

impl OffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an offset in minutes east of UTC. Returns `None` when the
    /// offset is outside what a real timezone can hold (±24h exclusive).
    pub fn with_offset_minutes(mut self, timezone_id: impl Into<String>, minutes: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(minutes.checked_mul(60)?)?;
        self.offsets.insert(timezone_id.into(), offset);
        Some(self)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl TimezoneConverter for OffsetTable {
    fn to_local(&self, instant: DateTime<Utc>, timezone_id: &str) -> Option<NaiveDateTime> {
        self.offsets
            .get(timezone_id)
            .map(|offset| instant.with_timezone(offset).naive_local())
    }

    fn knows(&self, timezone_id: &str) -> bool {
        self.offsets.contains_key(timezone_id)
    }
}
