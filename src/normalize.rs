use crate::error::QuizError;
use crate::models::{question_key, Answer, Catalog, Submission};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawAnswers {
    Indexed(Vec<Answer>),
    Textual(BTreeMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    pub answers: RawAnswers,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub quiz_id: Option<String>,
}

impl RawSubmission {
    pub fn from_json(value: Value) -> Result<Self, QuizError> {
        serde_json::from_value(value).map_err(|err| {
            tracing::debug!(error = %err, "submission payload has no recognised shape");
            QuizError::UnrecognizedFormat
        })
    }

    pub fn is_empty(&self) -> bool {
        match &self.answers {
            RawAnswers::Indexed(list) => list.is_empty(),
            RawAnswers::Textual(map) => map.is_empty(),
        }
    }
}

pub fn normalize(raw: RawSubmission, catalog: &Catalog) -> Result<Submission, QuizError> {
    if raw.is_empty() {
        return Err(QuizError::EmptySubmission);
    }

    let answers = match raw.answers {
        RawAnswers::Indexed(list) => list,
        RawAnswers::Textual(map) => resolve_textual(&map, catalog)?,
    };

    Ok(Submission {
        answers,
        user_id: raw.user_id,
    })
}

fn resolve_textual(map: &BTreeMap<String, String>, catalog: &Catalog) -> Result<Vec<Answer>, QuizError> {
    let mut answers = Vec::with_capacity(map.len());
    for (key, text) in map {
        let question = catalog
            .resolve_key(key)
            .ok_or_else(|| QuizError::UnknownQuestionKey(key.clone()))?;
        let option = question
            .option_by_text(text)
            .ok_or_else(|| QuizError::UnknownAnswerText {
                question_key: question_key(question.id),
                text: text.clone(),
            })?;
        answers.push(Answer {
            question_id: question.id,
            answer_id: option.id,
        });
    }
    answers.sort_by_key(|a| a.question_id);
    Ok(answers)
}
