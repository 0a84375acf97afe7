//! Scoring output types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bands::classify;
use crate::model::Band;

/// A raw score with its 0-100 normalization and band, if any matched.
///
/// Used for each dimension and for the overall result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandedScore {
    pub score: f64,
    pub normalized: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BandedScore {
    /// Build a score and classify `normalized` against `bands`.
    pub fn classified(score: f64, normalized: f64, bands: &[Band]) -> Self {
        let band = classify(normalized, bands);
        Self {
            score,
            normalized,
            band: band.map(|b| b.name.clone()),
            color: band.and_then(|b| b.color.clone()),
        }
    }
}

/// Audit record of how one answered question was scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionScore {
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    /// Score of the selected option (0 when nothing matched).
    pub original_score: f64,
    /// Score after reverse adjustment.
    pub final_score: f64,
    pub reverse: bool,
}

/// The complete result of scoring one answer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Per-dimension results; only dimensions with at least one answer.
    pub dimensions: BTreeMap<String, BandedScore>,
    /// Mean of the dimension normalizations, classified with the same bands.
    pub overall: BandedScore,
    /// One entry per answered, scorable question in question order.
    pub details: Vec<QuestionScore>,
}

impl ScoreResult {
    pub fn dimension(&self, key: &str) -> Option<&BandedScore> {
        self.dimensions.get(key)
    }

    pub fn detail(&self, question_id: &str) -> Option<&QuestionScore> {
        self.details.iter().find(|d| d.question_id == question_id)
    }
}
