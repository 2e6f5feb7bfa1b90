use crate::models::question_key;
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub field: String,
    pub issue: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: ErrorPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
    pub request_id: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Vec<ErrorDetail>,
    pub request_id: String,
}

impl AppError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: Vec::new(),
            request_id: request_id.into(),
        }
    }

    pub fn with_details(mut self, details: Vec<ErrorDetail>) -> Self {
        self.details = details;
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let payload = ErrorBody {
            error: ErrorPayload {
                code: self.code,
                message: self.message,
                details: self.details,
                request_id: self.request_id,
            },
        };
        (self.status, Json(payload)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("invalid question: {0}")]
    InvalidQuestion(String),
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("no answers provided")]
    EmptySubmission,

    #[error("answers must be a list of {{questionId, answerId}} pairs or a map of question key to option text")]
    UnrecognizedFormat,

    #[error("invalid question ID: {0}")]
    UnknownQuestion(i64),

    #[error("invalid question ID: {0}")]
    UnknownQuestionKey(String),

    #[error("invalid answer '{text}' for question {question_key}")]
    UnknownAnswerText { question_key: String, text: String },

    #[error("invalid answer ID {answer_id} for question {question_id}")]
    InvalidOption { answer_id: i64, question_id: i64 },

    #[error("duplicate answer for question {0}")]
    DuplicateAnswer(i64),

    #[error("missing answers for questions: {}", join_ids(.0))]
    MissingAnswers(Vec<i64>),

    #[error("no questions available")]
    NoQuestionsAvailable,

    #[error("question {question_id} violates catalog integrity: {reason}")]
    CatalogIntegrity { question_id: i64, reason: String },

    #[error("question store failure: {0}")]
    Store(#[from] StoreError),
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
}

impl QuizError {
    pub fn code(&self) -> &'static str {
        match self {
            QuizError::EmptySubmission => "EMPTY_SUBMISSION",
            QuizError::UnrecognizedFormat => "UNRECOGNIZED_FORMAT",
            QuizError::UnknownQuestion(_) | QuizError::UnknownQuestionKey(_) => "UNKNOWN_QUESTION",
            QuizError::UnknownAnswerText { .. } => "UNKNOWN_ANSWER_TEXT",
            QuizError::InvalidOption { .. } => "INVALID_OPTION",
            QuizError::DuplicateAnswer(_) => "DUPLICATE_ANSWER",
            QuizError::MissingAnswers(_) => "MISSING_ANSWERS",
            QuizError::NoQuestionsAvailable => "NO_QUESTIONS_AVAILABLE",
            QuizError::CatalogIntegrity { .. } => "CATALOG_INTEGRITY",
            QuizError::Store(_) => "STORE_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            QuizError::NoQuestionsAvailable => StatusCode::NOT_FOUND,
            QuizError::CatalogIntegrity { .. } | QuizError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    pub fn into_app_error(self, request_id: impl Into<String>) -> AppError {
        let status = self.status();
        let code = self.code();
        let request_id = request_id.into();

        if status.is_server_error() {
            tracing::error!(code, request_id = %request_id, error = %self, "quiz request failed");
            return AppError::new(status, code, "internal server error", request_id);
        }

        let details = match &self {
            QuizError::MissingAnswers(ids) => ids
                .iter()
                .map(|id| ErrorDetail {
                    field: format!("answers.{}", question_key(*id)),
                    issue: "must be answered".into(),
                })
                .collect(),
            _ => Vec::new(),
        };
        AppError::new(status, code, self.to_string(), request_id).with_details(details)
    }
}
