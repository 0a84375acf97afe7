//! psyscore-core: scoring engine for config-driven psychometric assessments.
//!
//! A [`model::TestConfig`] is parsed and validated once by [`parser`], then
//! [`engine::score_test`] turns a respondent's [`model::AnswerSet`] into a
//! banded, per-dimension [`results::ScoreResult`].

pub mod aggregate;
pub mod bands;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod results;
pub mod scorer;

pub use engine::{score_test, score_test_with};
pub use error::{ConfigError, FieldError};
pub use model::{AnswerSet, TestConfig};
pub use results::ScoreResult;
