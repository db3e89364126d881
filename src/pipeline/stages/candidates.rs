//! Narrow the audit window to results that can plausibly be records.
//!
//! A result that is not its country's best of the day for either metric
//! cannot be a record at any scope. Results with a stored label are always
//! kept so the label gets re-validated.

use super::baseline::{Baseline, Baselines};
use super::round_dates::RoundDates;
use super::round_sequence::RoundSequence;
use crate::core::{
    ranking_value, Competition, CompetitionResult, Metric, RecordLabel, ReferenceData, ResultId,
    RoundKey,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Where a candidate's date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    Schedule,
    CompetitionStart,
}

/// A result in the audit window annotated with everything the evaluators need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub result_id: ResultId,
    pub competition_id: String,
    pub event_id: String,
    pub person_id: String,
    pub country_id: String,
    pub continent_id: String,
    pub round_index: u32,
    pub date: NaiveDate,
    pub date_source: DateSource,
    pub best: i64,
    pub average: i64,
    pub stored_single: RecordLabel,
    pub stored_average: RecordLabel,
    pub national_baseline: Baseline,
}

impl Candidate {
    pub fn value(&self, metric: Metric) -> Option<i64> {
        match metric {
            Metric::Single => crate::core::valid_value(self.best),
            Metric::Average => crate::core::valid_value(self.average),
        }
    }

    pub fn stored_label(&self, metric: Metric) -> RecordLabel {
        match metric {
            Metric::Single => self.stored_single,
            Metric::Average => self.stored_average,
        }
    }

    pub fn has_stored_label(&self) -> bool {
        !self.stored_single.is_empty() || !self.stored_average.is_empty()
    }

    /// Nothing to evaluate and nothing to re-validate.
    pub fn is_blank(&self) -> bool {
        self.value(Metric::Single).is_none()
            && self.value(Metric::Average).is_none()
            && !self.has_stored_label()
    }
}

/// A result that could not be placed on a day and was left out of the audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedResult {
    pub result_id: ResultId,
    pub competition_id: String,
    pub event_id: String,
    pub reason: String,
}

/// Read-only lookups the candidate stage joins against.
pub struct CandidateContext<'a> {
    pub competitions: &'a HashMap<String, Competition>,
    pub reference: &'a ReferenceData,
    pub round_dates: &'a RoundDates,
    pub sequence: &'a RoundSequence,
    pub baselines: &'a Baselines,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<SkippedResult>,
    /// Results that reached the day-best ranking.
    pub ranked: usize,
}

/// Attach date, round index and national baselines to each window result,
/// then keep only day-best and already-labeled results.
pub fn select_candidates<'a, I>(window: I, context: &CandidateContext<'_>) -> CandidateSet
where
    I: IntoIterator<Item = &'a CompetitionResult>,
{
    let mut annotated = Vec::new();
    let mut skipped = Vec::new();

    for result in window.into_iter().filter(|r| !r.is_blank()) {
        match annotate(result, context) {
            Ok(candidate) => annotated.push(candidate),
            Err(skip) => {
                warn!(
                    result_id = skip.result_id,
                    competition = %skip.competition_id,
                    reason = %skip.reason,
                    "Excluding result from audit"
                );
                skipped.push(skip);
            }
        }
    }

    let ranked = annotated.len();
    CandidateSet {
        candidates: retain_day_best(annotated),
        skipped,
        ranked,
    }
}

fn annotate(result: &CompetitionResult, context: &CandidateContext<'_>) -> Result<Candidate, SkippedResult> {
    let skip = |reason: String| SkippedResult {
        result_id: result.id,
        competition_id: result.competition_id.clone(),
        event_id: result.event_id.clone(),
        reason,
    };

    let round_index = context
        .sequence
        .index_of(&result.competition_id, &result.event_id, &result.round_type_id)
        .ok_or_else(|| skip(format!("round type '{}' was not sequenced", result.round_type_id)))?;

    let key = RoundKey {
        competition_id: result.competition_id.clone(),
        event_id: result.event_id.clone(),
        round_number: round_index,
    };
    let (date, date_source) = match context.round_dates.get(&key) {
        Some(date) => (*date, DateSource::Schedule),
        None => context
            .competitions
            .get(&result.competition_id)
            .and_then(|c| c.start_date)
            .map(|date| (date, DateSource::CompetitionStart))
            .ok_or_else(|| {
                skip(format!(
                    "no scheduled date for round {} and no competition start date",
                    round_index
                ))
            })?,
    };

    let continent_id = context
        .reference
        .continent_of(&result.country_id)
        .ok_or_else(|| skip(format!("country '{}' has no continent", result.country_id)))?;

    Ok(Candidate {
        result_id: result.id,
        competition_id: result.competition_id.clone(),
        event_id: result.event_id.clone(),
        person_id: result.person_id.clone(),
        country_id: result.country_id.clone(),
        continent_id: continent_id.to_string(),
        round_index,
        date,
        date_source,
        best: result.best,
        average: result.average,
        stored_single: result.regional_single_record,
        stored_average: result.regional_average_record,
        national_baseline: context
            .baselines
            .national(&result.country_id, &result.event_id),
    })
}

/// Keep results ranked first for single or average within their
/// (country, event, date) group, plus every result with a stored label.
///
/// Ranking shares rank 1 among ties; invalid values rank after valid ones.
pub fn retain_day_best(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut day_best: HashMap<(String, String, NaiveDate), (i64, i64)> = HashMap::new();
    for c in &candidates {
        let single = ranking_value(c.best);
        let average = ranking_value(c.average);
        day_best
            .entry((c.country_id.clone(), c.event_id.clone(), c.date))
            .and_modify(|(s, a)| {
                *s = (*s).min(single);
                *a = (*a).min(average);
            })
            .or_insert((single, average));
    }

    candidates
        .into_iter()
        .filter(|c| {
            let (best_single, best_average) =
                day_best[&(c.country_id.clone(), c.event_id.clone(), c.date)];
            ranking_value(c.best) == best_single
                || ranking_value(c.average) == best_average
                || c.has_stored_label()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stages::baseline::snapshot_baselines;
    use crate::pipeline::stages::round_sequence::sequence_rounds;
    use crate::testkit::{reference_data, result};

    fn competitions(start: Option<NaiveDate>) -> HashMap<String, Competition> {
        HashMap::from([(
            "Open2024".to_string(),
            Competition {
                id: "Open2024".into(),
                year: 2024,
                start_date: start,
            },
        )])
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn run(window: &[CompetitionResult], start: Option<NaiveDate>, dates: RoundDates) -> CandidateSet {
        let reference = reference_data();
        let competitions = competitions(start);
        let sequence = sequence_rounds(window, &reference);
        let baselines = snapshot_baselines(Vec::<&CompetitionResult>::new(), &reference);
        let context = CandidateContext {
            competitions: &competitions,
            reference: &reference,
            round_dates: &dates,
            sequence: &sequence,
            baselines: &baselines,
        };
        select_candidates(window, &context)
    }

    fn ids(set: &CandidateSet) -> Vec<ResultId> {
        let mut ids: Vec<_> = set.candidates.iter().map(|c| c.result_id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_day_best_single_or_average_retained() {
        let window = vec![
            result(1, "Norway", "333", 800, 1000),
            result(2, "Norway", "333", 900, 950),
            result(3, "Norway", "333", 850, 990),
            result(4, "Sweden", "333", 1200, 1300),
        ];
        let set = run(&window, Some(day(9)), RoundDates::new());
        assert_eq!(ids(&set), vec![1, 2, 4]);
    }

    #[test]
    fn test_ties_share_rank_one() {
        let window = vec![
            result(1, "Norway", "333", 800, 0),
            result(2, "Norway", "333", 800, 0),
        ];
        let set = run(&window, Some(day(9)), RoundDates::new());
        assert_eq!(ids(&set), vec![1, 2]);
    }

    #[test]
    fn test_stored_label_always_retained() {
        let mut labeled = result(2, "Norway", "333", 900, 1100);
        labeled.regional_single_record = RecordLabel::National;
        let window = vec![result(1, "Norway", "333", 800, 1000), labeled];
        let set = run(&window, Some(day(9)), RoundDates::new());
        assert_eq!(ids(&set), vec![1, 2]);
    }

    #[test]
    fn test_blank_results_discarded() {
        let window = vec![result(1, "Norway", "333", -1, 0)];
        let set = run(&window, Some(day(9)), RoundDates::new());
        assert!(set.candidates.is_empty());
        assert!(set.skipped.is_empty());
        assert_eq!(set.ranked, 0);
    }

    #[test]
    fn test_invalid_single_ranks_last() {
        let window = vec![
            result(1, "Norway", "333", -1, 1000),
            result(2, "Norway", "333", 900, 0),
        ];
        let set = run(&window, Some(day(9)), RoundDates::new());
        // 1 holds the best average, 2 the best single
        assert_eq!(ids(&set), vec![1, 2]);
    }

    #[test]
    fn test_schedule_date_preferred_over_start_date() {
        let mut dates = RoundDates::new();
        dates.insert(
            RoundKey {
                competition_id: "Open2024".into(),
                event_id: "333".into(),
                round_number: 1,
            },
            day(10),
        );
        let window = vec![result(1, "Norway", "333", 800, 1000)];
        let set = run(&window, Some(day(9)), dates);
        assert_eq!(set.candidates[0].date, day(10));
        assert_eq!(set.candidates[0].date_source, DateSource::Schedule);
        assert_eq!(set.candidates[0].round_index, 1);
    }

    #[test]
    fn test_missing_dates_skip_result() {
        let window = vec![result(1, "Norway", "333", 800, 1000)];
        let set = run(&window, None, RoundDates::new());
        assert!(set.candidates.is_empty());
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].result_id, 1);
    }

    #[test]
    fn test_different_days_rank_separately() {
        let mut dates = RoundDates::new();
        dates.insert(
            RoundKey {
                competition_id: "Open2024".into(),
                event_id: "333".into(),
                round_number: 2,
            },
            day(10),
        );
        let mut later = result(2, "Norway", "333", 900, 1100);
        later.round_type_id = "f".into();
        let mut earlier = result(1, "Norway", "333", 800, 1000);
        earlier.round_type_id = "1".into();

        let set = run(&[earlier, later], Some(day(9)), dates);
        assert_eq!(ids(&set), vec![1, 2]);
    }
}
