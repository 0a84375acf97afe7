//! Assessment definition parser.
//!
//! Turns a loosely-typed JSON or TOML payload into a validated [`TestConfig`],
//! loads definitions from files and directories, and lints them for authoring
//! mistakes that are legal but probably unintended.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ConfigError, FieldError};
use crate::model::{
    Band, ChoiceOption, ChoiceValue, DimensionDef, NormalizationBase, Page, Question,
    QuestionKind, ScoringConfig, TestConfig,
};

/// Serialization formats accepted for assessment definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Intermediate shape of a question before validation.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    options: Option<Vec<Value>>,
    #[serde(default)]
    dimension: Option<String>,
    #[serde(default)]
    reverse: bool,
    #[serde(rename = "reverseMax", alias = "reverse_max", default)]
    reverse_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    label: String,
    #[serde(default)]
    score: Option<f64>,
}

/// Parse JSON or TOML text into a validated [`TestConfig`].
pub fn parse_test_config_str(
    content: &str,
    format: ConfigFormat,
) -> std::result::Result<TestConfig, ConfigError> {
    let value: Value = match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::Syntax(e.to_string()))?
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::Syntax(e.to_string()))?
        }
    };
    parse_test_config(value)
}

/// Validate a loosely-typed payload into a [`TestConfig`].
///
/// All field errors are collected before returning, so authors see every
/// problem in one pass.
pub fn parse_test_config(value: Value) -> std::result::Result<TestConfig, ConfigError> {
    let Value::Object(mut root) = value else {
        return Err(ConfigError::Invalid(vec![FieldError::new(
            "$",
            "expected an object",
        )]));
    };

    let mut errors = Vec::new();

    let title = optional_string(&mut root, "title", "title", &mut errors);
    let disclaimer = optional_string(&mut root, "disclaimer", "disclaimer", &mut errors);
    let dimensions = parse_dimensions(root.remove("dimensions"), &mut errors);
    let pages = parse_pages(root.remove("pages"), &dimensions, &mut errors);
    let scoring = parse_scoring(root.remove("scoring"), &mut errors);

    // Identifiers are unique across pages, not just within one.
    let mut seen: HashMap<&str, String> = HashMap::new();
    for (p, page) in pages.iter().enumerate() {
        for (q, question) in page.questions.iter().enumerate() {
            let path = format!("pages[{p}].questions[{q}]");
            if let Some(first) = seen.get(question.id.as_str()) {
                errors.push(FieldError::new(
                    format!("{path}.id"),
                    format!(
                        "duplicate question id '{}' (first declared at {first})",
                        question.id
                    ),
                ));
            } else {
                seen.insert(&question.id, path);
            }
        }
    }

    if !errors.is_empty() {
        return Err(ConfigError::Invalid(errors));
    }

    Ok(TestConfig {
        title,
        disclaimer,
        pages,
        dimensions,
        scoring,
    })
}

fn optional_string(
    map: &mut Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match map.remove(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            errors.push(FieldError::new(path, "expected a string"));
            None
        }
    }
}

fn parse_dimensions(
    value: Option<Value>,
    errors: &mut Vec<FieldError>,
) -> BTreeMap<String, DimensionDef> {
    let mut dimensions = BTreeMap::new();
    match value {
        None | Some(Value::Null) => {}
        Some(Value::Object(map)) => {
            for (key, def) in map {
                match serde_json::from_value::<DimensionDef>(def) {
                    Ok(def) => {
                        dimensions.insert(key, def);
                    }
                    Err(e) => errors.push(FieldError::new(format!("dimensions.{key}"), e.to_string())),
                }
            }
        }
        Some(_) => errors.push(FieldError::new(
            "dimensions",
            "expected a map of dimension key to definition",
        )),
    }
    dimensions
}

fn parse_pages(
    value: Option<Value>,
    dimensions: &BTreeMap<String, DimensionDef>,
    errors: &mut Vec<FieldError>,
) -> Vec<Page> {
    let raw_pages = match value {
        Some(Value::Array(pages)) => pages,
        None | Some(Value::Null) => {
            errors.push(FieldError::new("pages", "missing required field"));
            return Vec::new();
        }
        Some(_) => {
            errors.push(FieldError::new("pages", "expected an array of pages"));
            return Vec::new();
        }
    };

    let mut pages = Vec::with_capacity(raw_pages.len());
    for (p, raw) in raw_pages.into_iter().enumerate() {
        let path = format!("pages[{p}]");
        let Value::Object(mut page) = raw else {
            errors.push(FieldError::new(path, "expected an object"));
            continue;
        };

        let title = optional_string(&mut page, "title", &format!("{path}.title"), errors);
        let raw_questions = match page.remove("questions") {
            Some(Value::Array(questions)) => questions,
            None | Some(Value::Null) => {
                errors.push(FieldError::new(
                    format!("{path}.questions"),
                    "missing required field",
                ));
                continue;
            }
            Some(_) => {
                errors.push(FieldError::new(
                    format!("{path}.questions"),
                    "expected an array of questions",
                ));
                continue;
            }
        };

        let questions = raw_questions
            .into_iter()
            .enumerate()
            .filter_map(|(q, raw)| {
                parse_question(raw, &format!("{path}.questions[{q}]"), dimensions, errors)
            })
            .collect();

        pages.push(Page { title, questions });
    }
    pages
}

fn parse_question(
    value: Value,
    path: &str,
    dimensions: &BTreeMap<String, DimensionDef>,
    errors: &mut Vec<FieldError>,
) -> Option<Question> {
    let raw: RawQuestion = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            errors.push(FieldError::new(path, e.to_string()));
            return None;
        }
    };
    let before = errors.len();

    let id = raw.id.unwrap_or_default();
    if id.trim().is_empty() {
        errors.push(FieldError::new(format!("{path}.id"), "must not be empty"));
    }

    if raw.text.is_none() {
        errors.push(FieldError::new(format!("{path}.text"), "missing required field"));
    }

    let options = raw.options.map(|options| {
        options
            .into_iter()
            .enumerate()
            .filter_map(|(i, o)| parse_option(o, &format!("{path}.options[{i}]"), errors))
            .collect::<Vec<_>>()
    });

    let kind = match raw.kind.as_deref() {
        None | Some("") => {
            errors.push(FieldError::new(format!("{path}.type"), "missing required field"));
            None
        }
        Some(tag @ ("likert" | "multiple_choice")) => {
            let options = options.unwrap_or_default();
            if options.is_empty() {
                errors.push(FieldError::new(
                    format!("{path}.options"),
                    format!("{tag} questions need at least one option"),
                ));
            }
            Some(if tag == "likert" {
                QuestionKind::Likert { options }
            } else {
                QuestionKind::MultipleChoice { options }
            })
        }
        Some("text") => Some(QuestionKind::Text),
        Some(other) => {
            errors.push(FieldError::new(
                format!("{path}.type"),
                format!("unknown type '{other}' (expected likert, multiple_choice or text)"),
            ));
            None
        }
    };

    if let Some(dimension) = &raw.dimension {
        if !dimensions.contains_key(dimension) {
            errors.push(FieldError::new(
                format!("{path}.dimension"),
                format!("undeclared dimension '{dimension}'"),
            ));
        }
    }

    if errors.len() > before {
        return None;
    }

    Some(Question {
        id,
        text: raw.text.unwrap_or_default(),
        kind: kind?,
        dimension: raw.dimension,
        reverse: raw.reverse,
        reverse_max: raw.reverse_max,
    })
}

fn parse_option(value: Value, path: &str, errors: &mut Vec<FieldError>) -> Option<ChoiceOption> {
    let raw: RawOption = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            errors.push(FieldError::new(path, e.to_string()));
            return None;
        }
    };

    let value = match raw.value {
        Some(Value::String(s)) => ChoiceValue::Text(s),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(n) => ChoiceValue::Number(n),
            None => {
                errors.push(FieldError::new(format!("{path}.value"), "number out of range"));
                return None;
            }
        },
        None | Some(Value::Null) => {
            errors.push(FieldError::new(format!("{path}.value"), "missing required field"));
            return None;
        }
        Some(_) => {
            errors.push(FieldError::new(
                format!("{path}.value"),
                "expected a string or a number",
            ));
            return None;
        }
    };

    Some(ChoiceOption {
        value,
        label: raw.label,
        score: raw.score,
    })
}

fn parse_scoring(value: Option<Value>, errors: &mut Vec<FieldError>) -> ScoringConfig {
    let mut scoring = ScoringConfig::default();
    let mut map = match value {
        None | Some(Value::Null) => return scoring,
        Some(Value::Object(map)) => map,
        Some(_) => {
            errors.push(FieldError::new("scoring", "expected an object"));
            return scoring;
        }
    };

    match map.remove("bands") {
        None | Some(Value::Null) => {}
        Some(Value::Array(bands)) => {
            for (i, band) in bands.into_iter().enumerate() {
                match serde_json::from_value::<Band>(band) {
                    Ok(band) => scoring.bands.push(band),
                    Err(e) => {
                        errors.push(FieldError::new(format!("scoring.bands[{i}]"), e.to_string()))
                    }
                }
            }
        }
        Some(_) => errors.push(FieldError::new("scoring.bands", "expected an array of bands")),
    }

    match map.remove("normalization") {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => match s.parse::<NormalizationBase>() {
            Ok(base) => scoring.normalization = base,
            Err(e) => errors.push(FieldError::new("scoring.normalization", e)),
        },
        Some(_) => errors.push(FieldError::new(
            "scoring.normalization",
            "expected \"answered\" or \"declared\"",
        )),
    }

    scoring
}

/// Load and validate a single definition file (`.json` or `.toml`).
pub fn load_test_config(path: &Path) -> Result<TestConfig> {
    let format = ConfigFormat::from_path(path).with_context(|| {
        format!(
            "unsupported file extension (expected .json or .toml): {}",
            path.display()
        )
    })?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test config: {}", path.display()))?;

    parse_test_config_str(&content, format)
        .with_context(|| format!("failed to load test config: {}", path.display()))
}

/// Recursively collect definition files under `dir`, sorted by path.
pub fn find_test_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(find_test_files(&path)?);
        } else if ConfigFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Definitions found under a directory, split by whether they loaded.
#[derive(Debug, Default)]
pub struct LoadedDirectory {
    /// Valid definitions, sorted by path.
    pub tests: Vec<(PathBuf, TestConfig)>,
    /// Files that failed to load, with the reason.
    pub failures: Vec<(PathBuf, anyhow::Error)>,
}

/// Load every definition under `dir`. Invalid files are skipped and reported
/// in [`LoadedDirectory::failures`].
pub fn load_test_directory(dir: &Path) -> Result<LoadedDirectory> {
    let mut loaded = LoadedDirectory::default();
    for path in find_test_files(dir)? {
        match load_test_config(&path) {
            Ok(config) => loaded.tests.push((path, config)),
            Err(e) => {
                tracing::warn!("skipping {}: {:#}", path.display(), e);
                loaded.failures.push((path, e));
            }
        }
    }
    Ok(loaded)
}

/// A non-fatal authoring issue found by [`lint_test_config`].
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn general(message: impl Into<String>) -> Self {
        Self {
            question_id: None,
            message: message.into(),
        }
    }

    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Check a validated config for legal but suspicious authoring choices.
pub fn lint_test_config(config: &TestConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    lint_bands(&config.scoring.bands, &mut warnings);

    for question in config.questions() {
        if question.kind == QuestionKind::Text && question.dimension.is_some() {
            warnings.push(ValidationWarning::question(
                &question.id,
                "text questions are never scored; dimension tag has no effect",
            ));
        }
        if question.is_scorable() && question.dimension.is_none() {
            warnings.push(ValidationWarning::question(
                &question.id,
                "no dimension; the answer is recorded in details only",
            ));
        }
        if question.reverse
            && question.reverse_max.is_none()
            && question.options().iter().all(|o| o.score.is_none())
        {
            warnings.push(ValidationWarning::question(
                &question.id,
                "reverse scored but no option declares a score and reverseMax is unset; \
                 the reverse ceiling will be 0",
            ));
        }

        let mut values: Vec<&ChoiceValue> = Vec::new();
        for option in question.options() {
            if values.contains(&&option.value) {
                warnings.push(ValidationWarning::question(
                    &question.id,
                    format!(
                        "duplicate option value {}; only the first can be selected",
                        option.value
                    ),
                ));
            } else {
                values.push(&option.value);
            }
        }
    }

    let referenced: HashSet<&str> = config
        .questions()
        .filter(|q| q.is_scorable())
        .filter_map(|q| q.dimension.as_deref())
        .collect();
    for key in config.dimensions.keys() {
        if !referenced.contains(key.as_str()) {
            warnings.push(ValidationWarning::general(format!(
                "dimension '{key}' has no scorable questions and will never appear in results"
            )));
        }
    }

    warnings
}

fn lint_bands(bands: &[Band], warnings: &mut Vec<ValidationWarning>) {
    if bands.is_empty() {
        warnings.push(ValidationWarning::general(
            "no scoring bands defined; results will be unclassified",
        ));
        return;
    }

    for band in bands.iter().filter(|b| b.min > b.max) {
        warnings.push(ValidationWarning::general(format!(
            "band '{}' has min {} above max {} and can never match",
            band.name, band.min, band.max
        )));
    }

    let mut sorted: Vec<&Band> = bands.iter().filter(|b| b.min <= b.max).collect();
    sorted.sort_by(|a, b| a.min.total_cmp(&b.min));

    let mut covered_to = 0.0_f64;
    let mut previous: Option<&Band> = None;
    for band in sorted {
        if band.min > covered_to && covered_to < 100.0 {
            warnings.push(ValidationWarning::general(format!(
                "scores between {} and {} match no band",
                covered_to,
                band.min.min(100.0)
            )));
        }
        if let Some(prev) = previous {
            if band.min < prev.max {
                warnings.push(ValidationWarning::general(format!(
                    "bands '{}' and '{}' overlap; the one declared first wins",
                    prev.name, band.name
                )));
            } else if band.min == prev.max {
                let winner = bands
                    .iter()
                    .find(|b| b.contains(band.min))
                    .map_or(prev.name.as_str(), |b| b.name.as_str());
                warnings.push(ValidationWarning::general(format!(
                    "bands '{}' and '{}' share the boundary {}; it classifies as '{}'",
                    prev.name, band.name, band.min, winner
                )));
            }
        }
        if band.max > covered_to {
            covered_to = band.max;
            previous = Some(band);
        }
    }
    if covered_to < 100.0 {
        warnings.push(ValidationWarning::general(format!(
            "scores between {covered_to} and 100 match no band"
        )));
    }
}
