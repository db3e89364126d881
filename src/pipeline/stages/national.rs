//! National record evaluation.
//!
//! Each (country, event) group is scanned in date order against the
//! country's frozen pre-year baseline. Rows on the same date are peers, so a
//! result is compared with everything from its country up to and including
//! its own day. That gives the same flags as ordering same-day rows by value:
//! a smaller value on the day blocks a larger one whichever comes first.

use super::candidates::Candidate;
use super::running_min::{within_baseline, RunningMinimum};
use crate::core::{ContinentTag, Metric};
use crate::errors::{AuditError, Result};

pub const STAGE: &str = "national_records";

/// Record flags at one scope, per metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeFlags {
    pub single: bool,
    pub average: bool,
}

impl ScopeFlags {
    pub fn get(&self, metric: Metric) -> bool {
        match metric {
            Metric::Single => self.single,
            Metric::Average => self.average,
        }
    }

    pub fn any(&self) -> bool {
        self.single || self.average
    }
}

/// A candidate with its record flags at every scope evaluated so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedCandidate {
    pub candidate: Candidate,
    pub national: ScopeFlags,
    pub continental: ScopeFlags,
    pub world: ScopeFlags,
    /// Set by the regional stage for candidates it evaluated.
    pub continent_tag: Option<ContinentTag>,
}

/// Flag national records for single and average.
///
/// Fails if a candidate has nothing to evaluate: the candidate filter must
/// have dropped it.
pub fn evaluate_national(candidates: Vec<Candidate>, parallel: bool) -> Result<Vec<EvaluatedCandidate>> {
    if let Some(blank) = candidates.iter().find(|c| c.is_blank()) {
        return Err(AuditError::invariant(
            STAGE,
            blank.result_id,
            "candidate has no valid single, no valid average and no stored label",
        ));
    }

    let single = national_scan(Metric::Single).flag(&candidates, parallel);
    let average = national_scan(Metric::Average).flag(&candidates, parallel);

    Ok(candidates
        .into_iter()
        .zip(single.into_iter().zip(average))
        .map(|(candidate, (single, average))| EvaluatedCandidate {
            candidate,
            national: ScopeFlags { single, average },
            continental: ScopeFlags::default(),
            world: ScopeFlags::default(),
            continent_tag: None,
        })
        .collect())
}

fn national_scan(
    metric: Metric,
) -> RunningMinimum<
    impl Fn(&Candidate) -> (String, String) + Sync,
    impl Fn(&Candidate) -> chrono::NaiveDate + Sync,
    impl Fn(&Candidate) -> Option<i64> + Sync,
    impl Fn(&Candidate, i64) -> bool + Sync,
> {
    RunningMinimum {
        partition: |c: &Candidate| (c.country_id.clone(), c.event_id.clone()),
        order: |c: &Candidate| c.date,
        value: move |c: &Candidate| c.value(metric),
        eligible: move |c: &Candidate, value: i64| within_baseline(value, c.national_baseline.get(metric)),
    }
}
