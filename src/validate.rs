use crate::error::QuizError;
use crate::models::{Catalog, Submission};
use std::collections::HashSet;

// First bad answer wins; missing questions are reported together, sorted.
pub fn validate(submission: &Submission, catalog: &Catalog) -> Result<(), QuizError> {
    let mut answered = HashSet::with_capacity(submission.answers.len());

    for answer in &submission.answers {
        let question = catalog
            .get(answer.question_id)
            .ok_or(QuizError::UnknownQuestion(answer.question_id))?;

        if question.option(answer.answer_id).is_none() {
            return Err(QuizError::InvalidOption {
                answer_id: answer.answer_id,
                question_id: answer.question_id,
            });
        }

        if !answered.insert(answer.question_id) {
            return Err(QuizError::DuplicateAnswer(answer.question_id));
        }
    }

    let mut missing: Vec<i64> = catalog
        .questions()
        .iter()
        .map(|q| q.id)
        .filter(|id| !answered.contains(id))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    missing.sort_unstable();
    Err(QuizError::MissingAnswers(missing))
}
