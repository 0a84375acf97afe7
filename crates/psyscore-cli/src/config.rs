//! CLI configuration loading.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use psyscore_core::model::NormalizationBase;

/// How `psyscore score` prints a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other} (expected table or json)")),
        }
    }
}

/// Top-level psyscore configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsyscoreConfig {
    /// Output format when `--format` is not given.
    #[serde(default)]
    pub default_format: OutputFormat,
    /// Decimal places shown in table output.
    #[serde(default = "default_precision")]
    pub precision: usize,
    /// Treat lint warnings as failures in `validate`.
    #[serde(default)]
    pub strict: bool,
    /// Overrides the normalization policy declared by each test.
    #[serde(default)]
    pub normalization: Option<NormalizationBase>,
}

fn default_precision() -> usize {
    1
}

impl Default for PsyscoreConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::default(),
            precision: default_precision(),
            strict: false,
            normalization: None,
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `psyscore.toml` in the current directory
/// 2. `~/.config/psyscore/config.toml`
///
/// Environment variable override: `PSYSCORE_FORMAT`.
pub fn load_config_from(path: Option<&Path>) -> Result<PsyscoreConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("psyscore.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<PsyscoreConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => PsyscoreConfig::default(),
    };

    if let Ok(format) = std::env::var("PSYSCORE_FORMAT") {
        config.default_format = format
            .parse()
            .map_err(|e: String| anyhow::anyhow!("PSYSCORE_FORMAT: {e}"))?;
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("psyscore"))
}
