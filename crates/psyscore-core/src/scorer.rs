//! Per-question scoring.
//!
//! Resolves one submitted answer against one question definition into an
//! original score and a final, possibly reverse-adjusted, score.

use crate::model::{AnswerSet, Question, QuestionKind};
use crate::results::QuestionScore;

/// Score a single question against the answer set.
///
/// Returns `None` when the question contributes nothing: it was not answered,
/// or it is a text question. An answer that matches no option, including a
/// value that is neither a number nor a string, scores 0.
pub fn score_item(question: &Question, answers: &AnswerSet) -> Option<QuestionScore> {
    let answer = answers.get(&question.id)?;

    let options = match &question.kind {
        QuestionKind::Likert { options } | QuestionKind::MultipleChoice { options } => options,
        QuestionKind::Text => return None,
    };

    let selected = if answer.is_selectable() {
        options.iter().find(|o| &o.value == answer)
    } else {
        None
    };

    let original_score = match selected {
        Some(option) => option.score_or_zero(),
        None => {
            tracing::debug!(
                question = %question.id,
                answer = %answer,
                "answer matches no option, scoring 0"
            );
            0.0
        }
    };

    let final_score = if question.reverse {
        reverse_ceiling(question) - original_score
    } else {
        original_score
    };

    tracing::trace!(
        question = %question.id,
        original_score,
        final_score,
        "scored item"
    );

    Some(QuestionScore {
        question_id: question.id.clone(),
        dimension: question.dimension.clone(),
        original_score,
        final_score,
        reverse: question.reverse,
    })
}

/// The value a reverse-scored answer is subtracted from.
///
/// An explicit `reverse_max` wins; otherwise the highest score among the
/// question's own options, with undeclared scores counting as 0.
pub fn reverse_ceiling(question: &Question) -> f64 {
    if let Some(max) = question.reverse_max {
        return max;
    }
    question
        .options()
        .iter()
        .map(|o| o.score_or_zero())
        .reduce(f64::max)
        .unwrap_or(0.0)
}
