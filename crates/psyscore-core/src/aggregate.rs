//! Per-dimension aggregation and normalization.

use std::collections::BTreeMap;

use crate::model::{NormalizationBase, TestConfig};
use crate::results::QuestionScore;

/// Assumed per-item ceiling used for normalization, independent of how many
/// options a question declares.
pub const ITEM_SCALE_CEILING: f64 = 5.0;

/// Running totals for one dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionTally {
    /// Sum of final scores of answered questions.
    pub sum: f64,
    /// Answered, scorable questions.
    pub answered: usize,
    /// Scorable questions declared for the dimension.
    pub declared: usize,
}

impl DimensionTally {
    /// Number of items the achievable maximum is counted over.
    pub fn items(&self, base: NormalizationBase) -> usize {
        match base {
            NormalizationBase::Answered => self.answered,
            NormalizationBase::Declared => self.declared,
        }
    }

    pub fn normalized(&self, base: NormalizationBase) -> f64 {
        normalize(self.sum, self.items(base))
    }
}

/// Express `sum` as a percentage of `items × ITEM_SCALE_CEILING`.
///
/// Zero items normalize to 0. The result is not clamped.
pub fn normalize(sum: f64, items: usize) -> f64 {
    if items == 0 {
        return 0.0;
    }
    sum * 100.0 / (items as f64 * ITEM_SCALE_CEILING)
}

/// Sum and normalization for one dimension, before banding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionTotal {
    pub score: f64,
    pub normalized: f64,
}

/// Collects item scores into per-dimension totals.
#[derive(Debug, Clone)]
pub struct DimensionAggregator {
    tallies: BTreeMap<String, DimensionTally>,
    base: NormalizationBase,
}

impl DimensionAggregator {
    /// Start an aggregation for `config`, counting declared scorable questions
    /// per dimension up front.
    pub fn new(config: &TestConfig, base: NormalizationBase) -> Self {
        let mut tallies: BTreeMap<String, DimensionTally> = BTreeMap::new();
        for question in config.questions().filter(|q| q.is_scorable()) {
            if let Some(dimension) = &question.dimension {
                tallies.entry(dimension.clone()).or_default().declared += 1;
            }
        }
        Self { tallies, base }
    }

    /// Add one scored item. Items without a dimension are ignored.
    pub fn record(&mut self, item: &QuestionScore) {
        let Some(dimension) = &item.dimension else {
            return;
        };
        let tally = self.tallies.entry(dimension.clone()).or_default();
        tally.sum += item.final_score;
        tally.answered += 1;
        // Keeps `declared` meaningful when items come from outside the config.
        tally.declared = tally.declared.max(tally.answered);
    }

    pub fn tally(&self, dimension: &str) -> Option<&DimensionTally> {
        self.tallies.get(dimension)
    }

    /// Totals for every dimension with at least one answered question.
    pub fn finish(self) -> BTreeMap<String, DimensionTotal> {
        let base = self.base;
        self.tallies
            .into_iter()
            .filter(|(_, tally)| tally.answered > 0)
            .map(|(key, tally)| {
                let total = DimensionTotal {
                    score: tally.sum,
                    normalized: tally.normalized(base),
                };
                (key, total)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_test_config;
    use serde_json::json;

    fn item(id: &str, dimension: Option<&str>, final_score: f64) -> QuestionScore {
        QuestionScore {
            question_id: id.into(),
            dimension: dimension.map(String::from),
            original_score: final_score,
            final_score,
            reverse: false,
        }
    }

    fn two_dimension_config() -> TestConfig {
        let likert = |id: &str, dim: &str| {
            json!({
                "id": id, "text": "?", "type": "likert", "dimension": dim,
                "options": [{ "value": 1, "score": 1 }, { "value": 5, "score": 5 }]
            })
        };
        parse_test_config(json!({
            "pages": [
                { "questions": [likert("q1", "teamwork"), likert("q2", "teamwork")] },
                { "questions": [
                    likert("q3", "focus"),
                    { "id": "q4", "text": "?", "type": "text", "dimension": "focus" }
                ] }
            ],
            "dimensions": {
                "teamwork": { "name": "Teamwork" },
                "focus": { "name": "Focus" },
                "unused": { "name": "Unused" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn normalize_guards_zero_items() {
        assert_eq!(normalize(0.0, 0), 0.0);
        assert_eq!(normalize(12.0, 0), 0.0);
    }

    #[test]
    fn normalize_uses_fixed_ceiling() {
        assert_eq!(normalize(7.0, 2), 70.0);
        assert_eq!(normalize(8.0, 2), 80.0);
        assert_eq!(normalize(5.0, 1), 100.0);
        // Not clamped: a 7-point item can exceed 100.
        assert_eq!(normalize(7.0, 1), 140.0);
    }

    #[test]
    fn counts_declared_scorable_questions() {
        let aggregator =
            DimensionAggregator::new(&two_dimension_config(), NormalizationBase::Answered);
        assert_eq!(aggregator.tally("teamwork").unwrap().declared, 2);
        assert_eq!(aggregator.tally("focus").unwrap().declared, 1);
        assert!(aggregator.tally("unused").is_none());
    }

    #[test]
    fn answered_base_ignores_unanswered() {
        let mut aggregator =
            DimensionAggregator::new(&two_dimension_config(), NormalizationBase::Answered);
        aggregator.record(&item("q1", Some("teamwork"), 5.0));
        let totals = aggregator.finish();

        assert_eq!(totals.len(), 1);
        assert_eq!(totals["teamwork"].score, 5.0);
        assert_eq!(totals["teamwork"].normalized, 100.0);
    }

    #[test]
    fn declared_base_counts_unanswered() {
        let mut aggregator =
            DimensionAggregator::new(&two_dimension_config(), NormalizationBase::Declared);
        aggregator.record(&item("q1", Some("teamwork"), 5.0));
        let totals = aggregator.finish();

        assert_eq!(totals["teamwork"].score, 5.0);
        assert_eq!(totals["teamwork"].normalized, 50.0);
    }

    #[test]
    fn dimensions_without_answers_are_excluded() {
        let mut aggregator =
            DimensionAggregator::new(&two_dimension_config(), NormalizationBase::Answered);
        aggregator.record(&item("q3", Some("focus"), 2.0));
        aggregator.record(&item("q9", None, 4.0));
        let totals = aggregator.finish();

        assert_eq!(totals.keys().collect::<Vec<_>>(), vec!["focus"]);
        assert_eq!(totals["focus"].normalized, 40.0);
    }
}
