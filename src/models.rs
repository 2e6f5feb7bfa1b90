use crate::error::QuizError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use validator::{Validate, ValidationError};

pub const PASS_THRESHOLD: f64 = 60.0;

pub fn question_key(question_id: i64) -> String {
    format!("q{question_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub options: Vec<QuizOption>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Question {
    pub fn option(&self, option_id: i64) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn option_by_text(&self, text: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.text == text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOption {
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl NewOption {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewQuestion {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
    #[validate(custom(function = "validate_new_options"))]
    pub options: Vec<NewOption>,
}

fn validate_new_options(options: &[NewOption]) -> Result<(), ValidationError> {
    if options.len() < 2 {
        return Err(ValidationError::new("at_least_two_options"));
    }
    if options.iter().any(|o| o.validate().is_err()) {
        return Err(ValidationError::new("option_text_length"));
    }
    if options.iter().filter(|o| o.is_correct).count() != 1 {
        return Err(ValidationError::new("exactly_one_correct_option"));
    }
    Ok(())
}

// Unique ids and exactly one correct option per question, checked in `new`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    questions: Vec<Question>,
    correct_ids: Vec<i64>,
    positions: HashMap<i64, usize>,
}

impl Catalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        let mut positions = HashMap::with_capacity(questions.len());
        let mut correct_ids = Vec::with_capacity(questions.len());

        for (idx, q) in questions.iter().enumerate() {
            if positions.insert(q.id, idx).is_some() {
                return Err(QuizError::CatalogIntegrity {
                    question_id: q.id,
                    reason: "duplicate question id".into(),
                });
            }

            let mut seen = HashSet::new();
            if let Some(dup) = q.options.iter().find(|o| !seen.insert(o.id)) {
                return Err(QuizError::CatalogIntegrity {
                    question_id: q.id,
                    reason: format!("duplicate option id {}", dup.id),
                });
            }

            let correct: Vec<i64> = q
                .options
                .iter()
                .filter(|o| o.is_correct)
                .map(|o| o.id)
                .collect();
            match correct.as_slice() {
                [id] => correct_ids.push(*id),
                other => {
                    return Err(QuizError::CatalogIntegrity {
                        question_id: q.id,
                        reason: format!(
                            "expected exactly one correct option, found {}",
                            other.len()
                        ),
                    })
                }
            }
        }

        Ok(Self {
            questions,
            correct_ids,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, question_id: i64) -> Option<&Question> {
        self.positions.get(&question_id).map(|&i| &self.questions[i])
    }

    pub fn correct_option_id(&self, question_id: i64) -> Option<i64> {
        self.positions.get(&question_id).map(|&i| self.correct_ids[i])
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Question, i64)> + '_ {
        self.questions.iter().zip(self.correct_ids.iter().copied())
    }

    pub fn resolve_key(&self, key: &str) -> Option<&Question> {
        let id: i64 = key.strip_prefix('q')?.parse().ok()?;
        if question_key(id) != key {
            return None;
        }
        self.get(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: i64,
    pub answer_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub answers: Vec<Answer>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    pub question_id: i64,
    #[serde(rename = "question")]
    pub question_text: String,
    pub selected_id: i64,
    pub correct_id: i64,
    pub is_correct: bool,
    pub selected_text: String,
    pub correct_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub score: usize,
    pub total: usize,
    pub correct_answers: usize,
    pub percentage: f64,
    pub passed: bool,
    pub session_id: String,
    pub results: Vec<ScoredResult>,
}
