//! Configuration error types.
//!
//! Malformed assessment definitions are rejected here, at load time, with a
//! path to every offending field. Scoring itself never fails.

use std::fmt;

use thiserror::Error;

/// A single problem with a config payload, located by field path
/// (e.g. `pages[0].questions[2].options`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors produced while turning a payload into a [`crate::model::TestConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The text was not well-formed JSON or TOML.
    #[error("malformed config: {0}")]
    Syntax(String),

    /// The payload parsed but failed structural validation.
    #[error("invalid test config: {}", FieldErrors(.0))]
    Invalid(Vec<FieldError>),
}

impl ConfigError {
    /// Field errors, if this is a validation failure.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ConfigError::Invalid(errors) => errors,
            ConfigError::Syntax(_) => &[],
        }
    }

    /// Returns `true` if any field error is located at `path`.
    pub fn has_error_at(&self, path: &str) -> bool {
        self.field_errors().iter().any(|e| e.path == path)
    }
}

struct FieldErrors<'a>(&'a [FieldError]);

impl fmt::Display for FieldErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}
