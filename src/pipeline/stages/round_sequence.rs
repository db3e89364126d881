//! Ordinal round numbers per competition and event.
//!
//! Schedules name rounds by ordinal (`333-r2`) while results carry a round
//! type id. The ordinal is the position of the round type among those used
//! at that competition and event, ordered by round type rank.

use crate::core::{CompetitionResult, ReferenceData};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundSequence {
    indices: HashMap<(String, String, String), u32>,
}

impl RoundSequence {
    pub fn index_of(&self, competition_id: &str, event_id: &str, round_type_id: &str) -> Option<u32> {
        self.indices
            .get(&(
                competition_id.to_string(),
                event_id.to_string(),
                round_type_id.to_string(),
            ))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Number the round types used in `window`, starting at 1 per
/// (competition, event), lowest rank first.
pub fn sequence_rounds<'a, I>(window: I, reference: &ReferenceData) -> RoundSequence
where
    I: IntoIterator<Item = &'a CompetitionResult>,
{
    let mut used: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
    for result in window {
        used.entry((result.competition_id.clone(), result.event_id.clone()))
            .or_default()
            .insert(result.round_type_id.clone());
    }

    let mut indices = HashMap::new();
    for ((competition_id, event_id), round_types) in used {
        let mut ordered: Vec<(i32, String)> = round_types
            .into_iter()
            .map(|id| (reference.round_type_rank(&id).unwrap_or(i32::MAX), id))
            .collect();
        ordered.sort();

        for (position, (_, round_type_id)) in ordered.into_iter().enumerate() {
            indices.insert(
                (competition_id.clone(), event_id.clone(), round_type_id),
                position as u32 + 1,
            );
        }
    }
    RoundSequence { indices }
}
