//! Pre-year record baselines per scope.
//!
//! Baselines are the best valid values recorded before the target year. They
//! are frozen for the whole run: nothing in the target window updates them.

use crate::core::{CompetitionResult, Metric, ReferenceData};
use std::collections::HashMap;

/// Best prior single and average for one scope and event. `None` means no
/// prior valid value, so any valid value can set the first record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Baseline {
    pub single: Option<i64>,
    pub average: Option<i64>,
}

impl Baseline {
    pub fn get(&self, metric: Metric) -> Option<i64> {
        match metric {
            Metric::Single => self.single,
            Metric::Average => self.average,
        }
    }

    fn absorb(&mut self, result: &CompetitionResult) {
        fold_min(&mut self.single, result.value(Metric::Single));
        fold_min(&mut self.average, result.value(Metric::Average));
    }
}

fn fold_min(slot: &mut Option<i64>, value: Option<i64>) {
    if let Some(value) = value {
        *slot = Some(slot.map_or(value, |current| current.min(value)));
    }
}

/// Baselines for every scope, keyed by event within the scope.
#[derive(Debug, Clone, Default)]
pub struct Baselines {
    national: HashMap<(String, String), Baseline>,
    continental: HashMap<(String, String), Baseline>,
    world: HashMap<String, Baseline>,
}

impl Baselines {
    pub fn national(&self, country_id: &str, event_id: &str) -> Baseline {
        self.national
            .get(&(country_id.to_string(), event_id.to_string()))
            .copied()
            .unwrap_or_default()
    }

    pub fn continental(&self, continent_id: &str, event_id: &str) -> Baseline {
        self.continental
            .get(&(continent_id.to_string(), event_id.to_string()))
            .copied()
            .unwrap_or_default()
    }

    pub fn world(&self, event_id: &str) -> Baseline {
        self.world.get(event_id).copied().unwrap_or_default()
    }

    pub fn national_scopes(&self) -> usize {
        self.national.len()
    }
}

/// Aggregate prior results into national, continental and world baselines.
///
/// Results whose country has no continent are skipped at continental scope;
/// the snapshot loader rejects such countries, so this only matters for
/// hand-built inputs.
pub fn snapshot_baselines<'a, I>(prior: I, reference: &ReferenceData) -> Baselines
where
    I: IntoIterator<Item = &'a CompetitionResult>,
{
    let mut baselines = Baselines::default();
    for result in prior {
        baselines
            .national
            .entry((result.country_id.clone(), result.event_id.clone()))
            .or_default()
            .absorb(result);

        if let Some(continent_id) = reference.continent_of(&result.country_id) {
            baselines
                .continental
                .entry((continent_id.to_string(), result.event_id.clone()))
                .or_default()
                .absorb(result);
        }

        baselines
            .world
            .entry(result.event_id.clone())
            .or_default()
            .absorb(result);
    }
    baselines
}
