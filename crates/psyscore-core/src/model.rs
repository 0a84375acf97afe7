//! Core data model types for psyscore.
//!
//! A [`TestConfig`] is the validated shape of an assessment definition: pages
//! of questions, the dimension registry, and the scoring bands. Configs loaded
//! through [`crate::parser`] uphold the structural invariants checked there;
//! the fields are public, so a config built by hand carries no such guarantee.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A validated assessment definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestConfig {
    /// Optional display title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional disclaimer shown before the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    /// Pages in display order.
    pub pages: Vec<Page>,
    /// Dimension registry keyed by dimension key.
    pub dimensions: BTreeMap<String, DimensionDef>,
    /// Banding and normalization rules shared by every dimension.
    pub scoring: ScoringConfig,
}

impl TestConfig {
    /// All questions across all pages, in numbering order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.pages.iter().flat_map(|p| p.questions.iter())
    }

    /// Total number of questions across all pages.
    pub fn question_count(&self) -> usize {
        self.pages.iter().map(|p| p.questions.len()).sum()
    }

    /// Look up a question by identifier.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|q| q.id == id)
    }

    /// Title for display, falling back to a placeholder.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

/// An ordered group of questions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

/// A single question definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Identifier, unique across the whole config.
    pub id: String,
    /// Display text.
    pub text: String,
    /// Question type together with its answer options.
    #[serde(flatten)]
    pub kind: QuestionKind,
    /// Dimension this question measures, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    /// Whether the item is reverse scored.
    pub reverse: bool,
    /// Explicit ceiling for reverse scoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_max: Option<f64>,
}

impl Question {
    /// Declared options. Always empty for text questions.
    pub fn options(&self) -> &[ChoiceOption] {
        match &self.kind {
            QuestionKind::Likert { options } | QuestionKind::MultipleChoice { options } => options,
            QuestionKind::Text => &[],
        }
    }

    /// Whether answers to this question ever produce a score.
    pub fn is_scorable(&self) -> bool {
        !matches!(self.kind, QuestionKind::Text)
    }
}

/// The closed set of question types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Likert { options: Vec<ChoiceOption> },
    MultipleChoice { options: Vec<ChoiceOption> },
    Text,
}

impl QuestionKind {
    /// The type tag as written in config files.
    pub fn tag(&self) -> &'static str {
        match self {
            QuestionKind::Likert { .. } => "likert",
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::Text => "text",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An answer option for a choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// What the respondent submits when selecting this option.
    pub value: ChoiceValue,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Points awarded; absent means 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ChoiceOption {
    pub fn new(value: impl Into<ChoiceValue>, label: impl Into<String>, score: f64) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            score: Some(score),
        }
    }

    /// Declared score, or 0 when the option carries none.
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// A submitted or declared choice value.
///
/// Numbers and strings never compare equal to each other: `3` and `"3"` are
/// different answers. Any other JSON value (boolean, array, object) is kept as
/// [`ChoiceValue::Other`]; it can be submitted but never selects an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ChoiceValue {
    /// Whether this value can ever match a declared option.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, ChoiceValue::Other(_))
    }
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceValue::Number(n) => write!(f, "{n}"),
            ChoiceValue::Text(s) => write!(f, "{s:?}"),
            ChoiceValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for ChoiceValue {
    fn from(value: f64) -> Self {
        ChoiceValue::Number(value)
    }
}

impl From<i32> for ChoiceValue {
    fn from(value: i32) -> Self {
        ChoiceValue::Number(f64::from(value))
    }
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        ChoiceValue::Text(value.to_string())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        ChoiceValue::Text(value)
    }
}

/// Descriptive metadata for a dimension. Not used in arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named classification range, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Band {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Whether `value` lies in `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Scoring rules shared by every dimension and the overall score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoringConfig {
    /// Bands in authoring order; the first match wins.
    pub bands: Vec<Band>,
    /// How a dimension's normalization denominator is counted.
    pub normalization: NormalizationBase,
}

/// Which questions count toward a dimension's achievable maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationBase {
    /// Only the questions the respondent answered.
    #[default]
    Answered,
    /// Every scorable question declared for the dimension.
    Declared,
}

impl fmt::Display for NormalizationBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationBase::Answered => write!(f, "answered"),
            NormalizationBase::Declared => write!(f, "declared"),
        }
    }
}

impl FromStr for NormalizationBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "answered" => Ok(NormalizationBase::Answered),
            "declared" | "total" => Ok(NormalizationBase::Declared),
            other => Err(format!("unknown normalization base: {other}")),
        }
    }
}

/// One respondent's submitted values, keyed by question id.
///
/// Unanswered questions are absent. A JSON `null` is read as "unanswered".
/// The set itself must be a JSON object; individual values of any other shape
/// are accepted and score 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<ChoiceValue>>",
    into = "BTreeMap<String, ChoiceValue>"
)]
pub struct AnswerSet(BTreeMap<String, ChoiceValue>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&ChoiceValue> {
        self.0.get(question_id)
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: impl Into<ChoiceValue>) {
        self.0.insert(question_id.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Option<ChoiceValue>>> for AnswerSet {
    fn from(raw: BTreeMap<String, Option<ChoiceValue>>) -> Self {
        Self(
            raw.into_iter()
                .filter_map(|(id, value)| value.map(|v| (id, v)))
                .collect(),
        )
    }
}

impl From<AnswerSet> for BTreeMap<String, ChoiceValue> {
    fn from(answers: AnswerSet) -> Self {
        answers.0
    }
}

impl<K: Into<String>, V: Into<ChoiceValue>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The stock five-point agreement scale, scored 1 through 5.
pub fn likert_scale() -> Vec<ChoiceOption> {
    [
        "Strongly Disagree",
        "Disagree",
        "Neutral",
        "Agree",
        "Strongly Agree",
    ]
    .iter()
    .zip(1i32..)
    .map(|(label, n)| ChoiceOption::new(n, *label, f64::from(n)))
    .collect()
}
