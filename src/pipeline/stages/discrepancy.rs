//! Diff calculated labels against stored ones.
//!
//! The reporter only describes changes. Applying them is left to the archive
//! update step, which keeps the audit safe to re-run.

use super::labels::LabeledResult;
use crate::core::{Metric, RecordLabel, ResultId};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// What has to happen to one stored label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelAction {
    Add { label: RecordLabel },
    Remove { label: RecordLabel },
    Replace { stored: RecordLabel, calculated: RecordLabel },
}

impl LabelAction {
    pub fn classify(stored: RecordLabel, calculated: RecordLabel) -> Option<Self> {
        match (stored.is_empty(), calculated.is_empty()) {
            _ if stored == calculated => None,
            (true, false) => Some(Self::Add { label: calculated }),
            (false, true) => Some(Self::Remove { label: stored }),
            _ => Some(Self::Replace { stored, calculated }),
        }
    }

    pub fn change(&self) -> FieldChange {
        match self {
            Self::Add { label } => FieldChange::Set(*label),
            Self::Remove { .. } => FieldChange::Clear,
            Self::Replace { calculated, .. } => FieldChange::Set(*calculated),
        }
    }
}

impl fmt::Display for LabelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { label } => write!(f, "add {}", label),
            Self::Remove { label } => write!(f, "remove {}", label),
            Self::Replace { stored, calculated } => write!(f, "replace {} with {}", stored, calculated),
        }
    }
}

/// New value for an archive field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldChange {
    Set(RecordLabel),
    Clear,
}

/// Machine-applicable instruction for the archive update step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectiveInstruction {
    pub result_id: ResultId,
    pub field: &'static str,
    pub change: FieldChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectiveAction {
    pub metric: Metric,
    pub action: LabelAction,
    pub description: String,
    pub instruction: CorrectiveInstruction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub result_id: ResultId,
    pub competition_id: String,
    pub event_id: String,
    pub person_id: String,
    pub country_id: String,
    pub date: NaiveDate,
    pub stored_single: RecordLabel,
    pub calculated_single: RecordLabel,
    pub stored_average: RecordLabel,
    pub calculated_average: RecordLabel,
    pub actions: Vec<CorrectiveAction>,
}

impl Discrepancy {
    pub fn instructions(&self) -> impl Iterator<Item = &CorrectiveInstruction> {
        self.actions.iter().map(|a| &a.instruction)
    }
}

fn corrective_action(labeled: &LabeledResult, metric: Metric) -> Option<CorrectiveAction> {
    let stored = labeled.candidate.stored_label(metric);
    let calculated = labeled.calculated(metric);
    LabelAction::classify(stored, calculated).map(|action| CorrectiveAction {
        metric,
        action,
        description: action.to_string(),
        instruction: CorrectiveInstruction {
            result_id: labeled.candidate.result_id,
            field: metric.field_name(),
            change: action.change(),
        },
    })
}

/// One entry per result with at least one label to fix, ordered by result id.
pub fn report_discrepancies(labeled: &[LabeledResult]) -> Vec<Discrepancy> {
    let mut discrepancies: Vec<Discrepancy> = labeled
        .iter()
        .filter(|l| {
            l.candidate.has_stored_label()
                || !l.calculated_single.is_empty()
                || !l.calculated_average.is_empty()
        })
        .filter_map(|l| {
            let actions: Vec<CorrectiveAction> = Metric::ALL
                .iter()
                .filter_map(|metric| corrective_action(l, *metric))
                .collect();
            if actions.is_empty() {
                return None;
            }
            let c = &l.candidate;
            Some(Discrepancy {
                result_id: c.result_id,
                competition_id: c.competition_id.clone(),
                event_id: c.event_id.clone(),
                person_id: c.person_id.clone(),
                country_id: c.country_id.clone(),
                date: c.date,
                stored_single: c.stored_single,
                calculated_single: l.calculated_single,
                stored_average: c.stored_average,
                calculated_average: l.calculated_average,
                actions,
            })
        })
        .collect();
    discrepancies.sort_by_key(|d| d.result_id);
    discrepancies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContinentTag;
    use crate::testkit::candidate;
    use pretty_assertions::assert_eq;

    fn labeled(stored: (RecordLabel, RecordLabel), calculated: (RecordLabel, RecordLabel)) -> LabeledResult {
        let mut c = candidate(5, "Norway", "333", (3, 2), 580, 640);
        c.stored_single = stored.0;
        c.stored_average = stored.1;
        LabeledResult {
            candidate: c,
            calculated_single: calculated.0,
            calculated_average: calculated.1,
        }
    }

    const NONE: RecordLabel = RecordLabel::None;
    const NR: RecordLabel = RecordLabel::National;
    const ER: RecordLabel = RecordLabel::Continental(ContinentTag::Europe);

    #[test]
    fn test_classify() {
        assert_eq!(LabelAction::classify(NONE, NONE), None);
        assert_eq!(LabelAction::classify(NR, NR), None);
        assert_eq!(LabelAction::classify(NONE, NR), Some(LabelAction::Add { label: NR }));
        assert_eq!(LabelAction::classify(NR, NONE), Some(LabelAction::Remove { label: NR }));
        assert_eq!(
            LabelAction::classify(NR, ER),
            Some(LabelAction::Replace {
                stored: NR,
                calculated: ER
            })
        );
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(LabelAction::Add { label: NR }.to_string(), "add NR");
        assert_eq!(LabelAction::Remove { label: NR }.to_string(), "remove NR");
        assert_eq!(
            LabelAction::Replace {
                stored: NR,
                calculated: RecordLabel::World
            }
            .to_string(),
            "replace NR with WR"
        );
    }

    #[test]
    fn test_add_produces_set_instruction() {
        let discrepancies = report_discrepancies(&[labeled((NONE, NONE), (NR, NONE))]);
        assert_eq!(discrepancies.len(), 1);
        let action = &discrepancies[0].actions[0];
        assert_eq!(action.description, "add NR");
        assert_eq!(
            action.instruction,
            CorrectiveInstruction {
                result_id: 5,
                field: "regional_single_record",
                change: FieldChange::Set(NR),
            }
        );
    }

    #[test]
    fn test_remove_produces_clear_instruction() {
        let discrepancies = report_discrepancies(&[labeled((NONE, NR), (NONE, NONE))]);
        let action = &discrepancies[0].actions[0];
        assert_eq!(action.metric, Metric::Average);
        assert_eq!(action.description, "remove NR");
        assert_eq!(action.instruction.field, "regional_average_record");
        assert_eq!(action.instruction.change, FieldChange::Clear);
    }

    #[test]
    fn test_matching_labels_produce_no_entry() {
        assert!(report_discrepancies(&[labeled((NR, ER), (NR, ER))]).is_empty());
        assert!(report_discrepancies(&[labeled((NONE, NONE), (NONE, NONE))]).is_empty());
    }

    #[test]
    fn test_both_metrics_reported_on_one_entry() {
        let discrepancies = report_discrepancies(&[labeled((NR, NONE), (ER, NR))]);
        assert_eq!(discrepancies.len(), 1);
        let descriptions: Vec<&str> = discrepancies[0]
            .actions
            .iter()
            .map(|a| a.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["replace NR with ER", "add NR"]);
        assert_eq!(discrepancies[0].instructions().count(), 2);
    }

    #[test]
    fn test_instruction_json_shape() {
        let set = serde_json::to_value(FieldChange::Set(NR)).unwrap();
        assert_eq!(set, serde_json::json!({ "set": "NR" }));
        let clear = serde_json::to_value(FieldChange::Clear).unwrap();
        assert_eq!(clear, serde_json::json!("clear"));
    }
}
