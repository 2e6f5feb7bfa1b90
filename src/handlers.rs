use crate::error::{AppError, QuizError};
use crate::models::Catalog;
use crate::normalize::RawSubmission;
use crate::scoring::grade;
use crate::state::AppState;
use crate::views::{question_views, QuestionView, SubmissionResponse};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

fn request_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

pub async fn list_questions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<QuestionView>>, AppError> {
    let req_id = request_id_from_headers(&headers);
    let catalog = state.catalog().await.map_err(|e| e.into_app_error(req_id))?;
    Ok(Json(question_views(&catalog)))
}

pub async fn get_question(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<QuestionView>, AppError> {
    let req_id = request_id_from_headers(&headers);
    let Path(id) = path.map_err(|rejection| {
        AppError::new(StatusCode::BAD_REQUEST, "INVALID_QUESTION_ID", rejection.body_text(), req_id.clone())
    })?;
    let question = state
        .store
        .fetch_question(id)
        .await
        .map_err(|e| QuizError::from(e).into_app_error(req_id.clone()))?
        .ok_or_else(|| {
            AppError::new(StatusCode::NOT_FOUND, "QUESTION_NOT_FOUND", "question not found", req_id.clone())
        })?;

    let catalog = Catalog::new(vec![question]).map_err(|e| e.into_app_error(req_id.clone()))?;
    let view = question_views(&catalog)
        .pop()
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "QUESTION_NOT_FOUND", "question not found", req_id))?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct SubmitParams {
    #[serde(default = "detailed_by_default")]
    pub detailed: bool,
}

fn detailed_by_default() -> bool {
    true
}

pub async fn submit_quiz(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<SubmitParams>, QueryRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let req_id = request_id_from_headers(&headers);
    let Query(params) = query.map_err(|rejection| {
        AppError::new(StatusCode::BAD_REQUEST, "INVALID_QUERY", rejection.body_text(), req_id.clone())
    })?;
    let Json(body) = payload.map_err(|rejection| {
        AppError::new(StatusCode::BAD_REQUEST, "INVALID_JSON", rejection.body_text(), req_id.clone())
    })?;

    let raw = RawSubmission::from_json(body).map_err(|e| e.into_app_error(req_id.clone()))?;
    let user_id = raw.user_id.clone();
    let catalog = state.catalog().await.map_err(|e| e.into_app_error(req_id.clone()))?;
    let outcome = grade(raw, &catalog).map_err(|e| e.into_app_error(req_id.clone()))?;

    info!(
        request_id = %req_id,
        user_id = user_id.as_deref().unwrap_or("anonymous"),
        session_id = %outcome.session_id,
        score = outcome.score,
        total = outcome.total,
        passed = outcome.passed,
        "quiz graded"
    );

    Ok(Json(SubmissionResponse::from_outcome(outcome, params.detailed)))
}
