use crate::models::{question_key, Catalog, Question, ScoredResult, SubmissionOutcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question_id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl QuestionView {
    pub fn new(question: &Question, correct_option_id: i64) -> Self {
        let correct_answer = question
            .option(correct_option_id)
            .map(|o| o.text.clone())
            .unwrap_or_default();
        Self {
            question_id: question_key(question.id),
            text: question.text.clone(),
            options: question.options.iter().map(|o| o.text.clone()).collect(),
            correct_answer,
        }
    }
}

pub fn question_views(catalog: &Catalog) -> Vec<QuestionView> {
    catalog
        .entries()
        .map(|(question, correct_id)| QuestionView::new(question, correct_id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub score: usize,
    pub total: usize,
    pub correct_answers: usize,
    pub percentage: f64,
    pub passed: bool,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ScoredResult>>,
}

impl SubmissionResponse {
    pub fn from_outcome(outcome: SubmissionOutcome, detailed: bool) -> Self {
        Self {
            score: outcome.score,
            total: outcome.total,
            correct_answers: outcome.correct_answers,
            percentage: outcome.percentage,
            passed: outcome.passed,
            session_id: outcome.session_id,
            results: detailed.then_some(outcome.results),
        }
    }
}
