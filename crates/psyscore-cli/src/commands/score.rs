//! The `psyscore score` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use psyscore_core::model::{AnswerSet, NormalizationBase, TestConfig};
use psyscore_core::parser::load_test_config;
use psyscore_core::results::{BandedScore, ScoreResult};
use psyscore_core::score_test_with;

use crate::config::{load_config_from, OutputFormat};

pub fn execute(
    test_path: PathBuf,
    answers_path: PathBuf,
    format: Option<String>,
    output: Option<PathBuf>,
    normalization: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let format = match format {
        Some(f) => f.parse::<OutputFormat>().map_err(|e| anyhow::anyhow!(e))?,
        None => config.default_format,
    };
    let normalization = normalization
        .map(|n| n.parse::<NormalizationBase>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()?;

    let test = load_test_config(&test_path)?;
    let answers = load_answers(&answers_path)?;

    let policy = normalization
        .or(config.normalization)
        .unwrap_or(test.scoring.normalization);
    tracing::info!(
        "scoring {} answer(s) against '{}' ({} normalization)",
        answers.len(),
        test.display_title(),
        policy
    );

    let result = score_test_with(&test, &answers, policy);

    if let Some(path) = &output {
        save_json(&result, path)?;
        eprintln!("Result saved to: {}", path.display());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => print_result(&test, &result, config.precision),
    }

    Ok(())
}

fn load_answers(path: &Path) -> Result<AnswerSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers JSON: {}", path.display()))
}

fn save_json(result: &ScoreResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("failed to serialize result")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write result to {}", path.display()))?;
    Ok(())
}

fn print_result(test: &TestConfig, result: &ScoreResult, precision: usize) {
    use comfy_table::{Cell, Table};

    let row = |label: String, score: &BandedScore| {
        vec![
            Cell::new(label),
            Cell::new(format!("{:.*}", precision, score.score)),
            Cell::new(format!("{:.*}%", precision, score.normalized)),
            Cell::new(score.band.as_deref().unwrap_or("-")),
        ]
    };

    let mut table = Table::new();
    table.set_header(vec!["Dimension", "Score", "Normalized", "Band"]);

    for (key, score) in &result.dimensions {
        let label = test
            .dimensions
            .get(key)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| key.clone());
        table.add_row(row(label, score));
    }
    table.add_row(row("Overall".to_string(), &result.overall));

    println!("{}", test.display_title());
    println!("{table}");
    println!(
        "{} of {} question(s) scored",
        result.details.len(),
        test.question_count()
    );
}
