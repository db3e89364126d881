//! Resolve scope flags into one calculated label per metric.

use super::candidates::Candidate;
use super::national::EvaluatedCandidate;
use crate::core::{Metric, RecordLabel};

/// A candidate with its calculated labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledResult {
    pub candidate: Candidate,
    pub calculated_single: RecordLabel,
    pub calculated_average: RecordLabel,
}

impl LabeledResult {
    pub fn calculated(&self, metric: Metric) -> RecordLabel {
        match metric {
            Metric::Single => self.calculated_single,
            Metric::Average => self.calculated_average,
        }
    }
}

pub fn resolve_label(entry: &EvaluatedCandidate, metric: Metric) -> RecordLabel {
    let continental = entry
        .continent_tag
        .filter(|_| entry.continental.get(metric));
    RecordLabel::from_flags(entry.world.get(metric), continental, entry.national.get(metric))
}

pub fn resolve_labels(evaluated: Vec<EvaluatedCandidate>) -> Vec<LabeledResult> {
    evaluated
        .into_iter()
        .map(|entry| LabeledResult {
            calculated_single: resolve_label(&entry, Metric::Single),
            calculated_average: resolve_label(&entry, Metric::Average),
            candidate: entry.candidate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContinentTag;
    use crate::pipeline::stages::national::ScopeFlags;
    use crate::testkit::candidate;

    fn entry(national: (bool, bool), continental: (bool, bool), world: (bool, bool)) -> EvaluatedCandidate {
        let flags = |(single, average): (bool, bool)| ScopeFlags { single, average };
        EvaluatedCandidate {
            candidate: candidate(1, "Norway", "333", (2, 1), 600, 700),
            national: flags(national),
            continental: flags(continental),
            world: flags(world),
            continent_tag: Some(ContinentTag::Europe),
        }
    }

    #[test]
    fn test_world_overrides_narrower_scopes() {
        let e = entry((true, false), (true, false), (true, false));
        assert_eq!(resolve_label(&e, Metric::Single), RecordLabel::World);
        assert_eq!(resolve_label(&e, Metric::Average), RecordLabel::None);
    }

    #[test]
    fn test_continental_uses_continent_tag() {
        let e = entry((true, true), (false, true), (false, false));
        assert_eq!(resolve_label(&e, Metric::Single), RecordLabel::National);
        assert_eq!(
            resolve_label(&e, Metric::Average),
            RecordLabel::Continental(ContinentTag::Europe)
        );
    }

    #[test]
    fn test_resolve_labels_keeps_candidate() {
        let labeled = resolve_labels(vec![entry((true, false), (false, false), (false, false))]);
        assert_eq!(labeled[0].candidate.result_id, 1);
        assert_eq!(labeled[0].calculated(Metric::Single), RecordLabel::National);
        assert_eq!(labeled[0].calculated(Metric::Average), RecordLabel::None);
    }
}
