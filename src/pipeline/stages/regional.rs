//! Continental and world record evaluation.
//!
//! Only national-record candidates (or results with a stored label under
//! review) can hold a broader record. Groups are ordered by date and then by
//! the metric value itself, so within one day the smaller value is visited
//! first. The national scan deliberately has no value tie-break.

use super::baseline::Baselines;
use super::candidates::Candidate;
use super::national::{EvaluatedCandidate, ScopeFlags};
use super::running_min::{within_baseline, RunningMinimum};
use crate::core::{ranking_value, Metric, ReferenceData};
use crate::errors::{AuditError, Result};
use chrono::NaiveDate;

pub const STAGE: &str = "regional_records";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Continental,
    World,
}

/// Fill continental and world flags.
///
/// Every continent present in the input must map to a continental record
/// tag; a missing one aborts the run rather than mislabel results.
pub fn evaluate_regional(
    evaluated: Vec<EvaluatedCandidate>,
    baselines: &Baselines,
    reference: &ReferenceData,
    parallel: bool,
) -> Result<Vec<EvaluatedCandidate>> {
    let mut tagged = Vec::with_capacity(evaluated.len());
    for mut entry in evaluated {
        let continent_id = &entry.candidate.continent_id;
        let tag = reference
            .continent_tag(continent_id)
            .ok_or_else(|| AuditError::MissingContinentTag {
                continent_id: continent_id.clone(),
                stage: STAGE,
            })?;
        entry.continent_tag = Some(tag);
        tagged.push(entry);
    }

    let (regional, national_only): (Vec<_>, Vec<_>) = tagged
        .into_iter()
        .partition(|e| e.national.any() || e.candidate.has_stored_label());

    let rows: Vec<&Candidate> = regional.iter().map(|e| &e.candidate).collect();
    let continental_single = regional_scan(Scope::Continental, Metric::Single, baselines).flag(&rows, parallel);
    let continental_average = regional_scan(Scope::Continental, Metric::Average, baselines).flag(&rows, parallel);
    let world_single = regional_scan(Scope::World, Metric::Single, baselines).flag(&rows, parallel);
    let world_average = regional_scan(Scope::World, Metric::Average, baselines).flag(&rows, parallel);

    let mut output: Vec<EvaluatedCandidate> = regional
        .into_iter()
        .enumerate()
        .map(|(i, entry)| EvaluatedCandidate {
            continental: ScopeFlags {
                single: continental_single[i],
                average: continental_average[i],
            },
            world: ScopeFlags {
                single: world_single[i],
                average: world_average[i],
            },
            ..entry
        })
        .collect();
    output.extend(national_only);
    output.sort_by_key(|e| e.candidate.result_id);
    Ok(output)
}

/// Number of candidates that enter the continental/world scans.
pub fn regional_input_count(evaluated: &[EvaluatedCandidate]) -> usize {
    evaluated
        .iter()
        .filter(|e| e.national.any() || e.candidate.has_stored_label())
        .count()
}

fn regional_scan<'b>(
    scope: Scope,
    metric: Metric,
    baselines: &'b Baselines,
) -> RunningMinimum<
    impl Fn(&&Candidate) -> (String, Option<String>) + Sync + 'b,
    impl Fn(&&Candidate) -> (NaiveDate, i64) + Sync + 'b,
    impl Fn(&&Candidate) -> Option<i64> + Sync + 'b,
    impl Fn(&&Candidate, i64) -> bool + Sync + 'b,
> {
    RunningMinimum {
        partition: move |c: &&Candidate| match scope {
            Scope::Continental => (c.event_id.clone(), Some(c.continent_id.clone())),
            Scope::World => (c.event_id.clone(), None),
        },
        order: move |c: &&Candidate| {
            let value = match metric {
                Metric::Single => c.best,
                Metric::Average => c.average,
            };
            (c.date, ranking_value(value))
        },
        value: move |c: &&Candidate| c.value(metric),
        eligible: move |c: &&Candidate, value: i64| {
            let baseline = match scope {
                Scope::Continental => baselines.continental(&c.continent_id, &c.event_id),
                Scope::World => baselines.world(&c.event_id),
            };
            within_baseline(value, baseline.get(metric))
        },
    }
}
