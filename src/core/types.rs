use super::label::RecordLabel;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ResultId = u64;

/// A value of zero or below means "no result" for that metric.
pub fn valid_value(value: i64) -> Option<i64> {
    (value > 0).then_some(value)
}

/// Ordering key that places invalid values after every valid one.
pub fn ranking_value(value: i64) -> i64 {
    valid_value(value).unwrap_or(i64::MAX)
}

/// The two metrics a result is labeled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Single,
    Average,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Single, Metric::Average];

    /// Archive column holding the stored label for this metric.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Single => "regional_single_record",
            Self::Average => "regional_average_record",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Average => write!(f, "average"),
        }
    }
}

/// One attempt-set by one person in one round of one event at one competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionResult {
    pub id: ResultId,
    pub competition_id: String,
    pub event_id: String,
    pub round_type_id: String,
    pub person_id: String,
    pub country_id: String,
    pub best: i64,
    #[serde(default)]
    pub average: i64,
    #[serde(default)]
    pub regional_single_record: RecordLabel,
    #[serde(default)]
    pub regional_average_record: RecordLabel,
}

impl CompetitionResult {
    pub fn value(&self, metric: Metric) -> Option<i64> {
        match metric {
            Metric::Single => valid_value(self.best),
            Metric::Average => valid_value(self.average),
        }
    }

    pub fn stored_label(&self, metric: Metric) -> RecordLabel {
        match metric {
            Metric::Single => self.regional_single_record,
            Metric::Average => self.regional_average_record,
        }
    }

    pub fn has_stored_label(&self) -> bool {
        !self.regional_single_record.is_empty() || !self.regional_average_record.is_empty()
    }

    /// Neither metric holds a value and nothing is stored to re-validate.
    pub fn is_blank(&self) -> bool {
        self.value(Metric::Single).is_none()
            && self.value(Metric::Average).is_none()
            && !self.has_stored_label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub id: String,
    pub year: i32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: u64,
    pub competition_id: String,
    pub timezone_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: u64,
    pub venue_id: u64,
}

/// A scheduled block. Instants are on the archive clock (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleActivity {
    pub id: u64,
    pub room_id: u64,
    pub activity_code: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundType {
    pub id: String,
    pub rank: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub continent_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Parsed `{event}-r{round}` activity code. Trailing segments such as
/// groups (`-g2`) or attempts (`-a1`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivityCode {
    pub event_id: String,
    pub round_number: u32,
}

impl ActivityCode {
    pub fn parse(code: &str) -> Option<Self> {
        let mut parts = code.split('-');
        let event_id = parts.next().filter(|s| !s.is_empty())?;
        let round_number = parts
            .next()?
            .strip_prefix('r')?
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)?;
        Some(Self {
            event_id: event_id.to_string(),
            round_number,
        })
    }
}

/// Identifies one round of one event at one competition by its ordinal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoundKey {
    pub competition_id: String,
    pub event_id: String,
    pub round_number: u32,
}
