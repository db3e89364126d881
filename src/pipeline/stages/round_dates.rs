//! Calendar date of each scheduled round.
//!
//! A round can span several scheduled blocks, possibly in different rooms.
//! Its date is the local date of the block that finishes last.

use crate::core::{RoundKey, ScheduledRound, TimezoneConverter};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use tracing::warn;

pub type RoundDates = HashMap<RoundKey, NaiveDate>;

/// Map (competition, event, round number) to the round's local date.
///
/// Rounds without any scheduled block are absent; the candidate stage falls
/// back to the competition start date for those.
pub fn resolve_round_dates(schedule: &[ScheduledRound], timezones: &dyn TimezoneConverter) -> RoundDates {
    let mut latest: HashMap<RoundKey, NaiveDateTime> = HashMap::new();

    for round in schedule {
        let Some(local_end) = timezones.to_local(round.end_time, &round.timezone_id) else {
            warn!(
                activity_id = round.activity_id,
                timezone = %round.timezone_id,
                "Skipping activity with unknown timezone"
            );
            continue;
        };
        let key = RoundKey {
            competition_id: round.competition_id.clone(),
            event_id: round.code.event_id.clone(),
            round_number: round.code.round_number,
        };
        latest
            .entry(key)
            .and_modify(|end| *end = (*end).max(local_end))
            .or_insert(local_end);
    }

    latest
        .into_iter()
        .map(|(key, end)| (key, end.date()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ActivityCode, OffsetTable, VenueTimezones};
    use chrono::{DateTime, Utc};

    fn block(id: u64, competition: &str, code: &str, end: &str, tz: &str) -> ScheduledRound {
        ScheduledRound {
            activity_id: id,
            competition_id: competition.into(),
            code: ActivityCode::parse(code).unwrap(),
            end_time: end.parse::<DateTime<Utc>>().unwrap(),
            timezone_id: tz.into(),
        }
    }

    fn key(competition: &str, event: &str, round: u32) -> RoundKey {
        RoundKey {
            competition_id: competition.into(),
            event_id: event.into(),
            round_number: round,
        }
    }

    fn timezones() -> OffsetTable {
        OffsetTable::new()
            .with_offset_minutes("Europe/Oslo", 60)
            .and_then(|t| t.with_offset_minutes("Pacific/Auckland", 13 * 60))
            .unwrap()
    }

    #[test]
    fn test_latest_block_sets_round_date() {
        let schedule = vec![
            block(1, "Open2024", "333-r1-g1", "2024-03-09T10:00:00Z", "Europe/Oslo"),
            block(2, "Open2024", "333-r1-g2", "2024-03-10T09:00:00Z", "Europe/Oslo"),
        ];
        let dates = resolve_round_dates(&schedule, &timezones());
        assert_eq!(
            dates.get(&key("Open2024", "333", 1)),
            NaiveDate::from_ymd_opt(2024, 3, 10).as_ref()
        );
    }

    #[test]
    fn test_local_date_differs_from_utc_date() {
        let schedule = vec![block(
            1,
            "KiwiOpen2024",
            "333-r2",
            "2024-02-03T12:30:00Z",
            "Pacific/Auckland",
        )];
        let dates = resolve_round_dates(&schedule, &timezones());
        assert_eq!(
            dates.get(&key("KiwiOpen2024", "333", 2)),
            NaiveDate::from_ymd_opt(2024, 2, 4).as_ref()
        );
    }

    #[test]
    fn test_summer_round_after_local_midnight() {
        // 22:30 UTC on 9 June is 00:30 CEST on 10 June
        let schedule = vec![block(1, "Midsummer2024", "333-r1", "2024-06-09T22:30:00Z", "Europe/Oslo")];
        let dates = resolve_round_dates(&schedule, &VenueTimezones::default());
        assert_eq!(
            dates.get(&key("Midsummer2024", "333", 1)),
            NaiveDate::from_ymd_opt(2024, 6, 10).as_ref()
        );
    }

    #[test]
    fn test_rounds_are_keyed_separately() {
        let schedule = vec![
            block(1, "Open2024", "333-r1", "2024-03-09T10:00:00Z", "Europe/Oslo"),
            block(2, "Open2024", "333-r2", "2024-03-10T10:00:00Z", "Europe/Oslo"),
            block(3, "Open2024", "222-r1", "2024-03-09T12:00:00Z", "Europe/Oslo"),
        ];
        let dates = resolve_round_dates(&schedule, &timezones());
        assert_eq!(dates.len(), 3);
        assert!(!dates.contains_key(&key("Open2024", "222", 2)));
    }

    #[test]
    fn test_unknown_timezone_is_skipped() {
        let schedule = vec![block(1, "Open2024", "333-r1", "2024-03-09T10:00:00Z", "Mars/Olympus")];
        assert!(resolve_round_dates(&schedule, &timezones()).is_empty());
    }
}
