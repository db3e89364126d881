//! Read-only reference tables: round ranks, country→continent, continent→tag
//! and the closed list of recognized events.

use super::label::ContinentTag;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Continental record tags keyed by the archive's continent ids.
pub fn default_continent_tags() -> BTreeMap<String, ContinentTag> {
    [
        ("_Africa", ContinentTag::Africa),
        ("_Asia", ContinentTag::Asia),
        ("_Europe", ContinentTag::Europe),
        ("_Oceania", ContinentTag::Oceania),
        ("_North America", ContinentTag::NorthAmerica),
        ("_South America", ContinentTag::SouthAmerica),
    ]
    .into_iter()
    .map(|(id, tag)| (id.to_string(), tag))
    .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    round_type_ranks: HashMap<String, i32>,
    country_continents: HashMap<String, String>,
    continents: BTreeSet<String>,
    events: BTreeSet<String>,
    continent_tags: BTreeMap<String, ContinentTag>,
}

impl ReferenceData {
    pub fn new(continent_tags: BTreeMap<String, ContinentTag>) -> Self {
        Self {
            continent_tags,
            ..Self::default()
        }
    }

    pub fn with_event(mut self, event_id: impl Into<String>) -> Self {
        self.events.insert(event_id.into());
        self
    }

    pub fn with_continent(mut self, continent_id: impl Into<String>) -> Self {
        self.continents.insert(continent_id.into());
        self
    }

    pub fn with_country(mut self, country_id: impl Into<String>, continent_id: impl Into<String>) -> Self {
        self.country_continents
            .insert(country_id.into(), continent_id.into());
        self
    }

    pub fn with_round_type(mut self, round_type_id: impl Into<String>, rank: i32) -> Self {
        self.round_type_ranks.insert(round_type_id.into(), rank);
        self
    }

    pub fn round_type_rank(&self, round_type_id: &str) -> Option<i32> {
        self.round_type_ranks.get(round_type_id).copied()
    }

    pub fn continent_of(&self, country_id: &str) -> Option<&str> {
        self.country_continents.get(country_id).map(String::as_str)
    }

    pub fn has_continent(&self, continent_id: &str) -> bool {
        self.continents.contains(continent_id)
    }

    pub fn is_recognized_event(&self, event_id: &str) -> bool {
        self.events.contains(event_id)
    }

    pub fn continent_tag(&self, continent_id: &str) -> Option<ContinentTag> {
        self.continent_tags.get(continent_id).copied()
    }

    pub fn has_round_type(&self, round_type_id: &str) -> bool {
        self.round_type_ranks.contains_key(round_type_id)
    }

    pub fn has_country(&self, country_id: &str) -> bool {
        self.country_continents.contains_key(country_id)
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn country_count(&self) -> usize {
        self.country_continents.len()
    }

    pub fn continent_count(&self) -> usize {
        self.continents.len()
    }

    pub fn round_type_count(&self) -> usize {
        self.round_type_ranks.len()
    }
}
