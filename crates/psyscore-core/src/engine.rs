//! Scoring pipeline entry point.
//!
//! Runs item scoring, dimension aggregation, banding and composition for one
//! answer set. The pipeline is pure: no I/O, no state kept between calls, and
//! no error path. Unanswered questions, unknown answers and unmatched bands
//! all fall back to documented defaults instead of failing.

use std::collections::BTreeMap;

use crate::aggregate::DimensionAggregator;
use crate::model::{AnswerSet, NormalizationBase, TestConfig};
use crate::results::{BandedScore, ScoreResult};
use crate::scorer::score_item;

/// Score `answers` against `config` using the config's normalization policy.
pub fn score_test(config: &TestConfig, answers: &AnswerSet) -> ScoreResult {
    score_test_with(config, answers, config.scoring.normalization)
}

/// Score `answers` against `config` with an explicit normalization policy.
pub fn score_test_with(
    config: &TestConfig,
    answers: &AnswerSet,
    normalization: NormalizationBase,
) -> ScoreResult {
    let mut aggregator = DimensionAggregator::new(config, normalization);
    let details: Vec<_> = config
        .questions()
        .filter_map(|question| score_item(question, answers))
        .inspect(|item| aggregator.record(item))
        .collect();

    let bands = &config.scoring.bands;
    let dimensions: BTreeMap<String, BandedScore> = aggregator
        .finish()
        .into_iter()
        .map(|(key, total)| {
            let banded = BandedScore::classified(total.score, total.normalized, bands);
            (key, banded)
        })
        .collect();

    let overall_sum: f64 = dimensions.values().map(|d| d.normalized).sum();
    let overall_normalized = if dimensions.is_empty() {
        0.0
    } else {
        overall_sum / dimensions.len() as f64
    };
    let overall = BandedScore::classified(overall_sum, overall_normalized, bands);

    tracing::debug!(
        answers = answers.len(),
        scored = details.len(),
        dimensions = dimensions.len(),
        overall = overall_normalized,
        %normalization,
        "scored answer set"
    );

    ScoreResult {
        dimensions,
        overall,
        details,
    }
}
