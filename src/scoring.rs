use crate::error::QuizError;
use crate::models::{Catalog, ScoredResult, Submission, SubmissionOutcome, PASS_THRESHOLD};
use crate::normalize::{normalize, RawSubmission};
use crate::validate::validate;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

pub fn score(submission: &Submission, catalog: &Catalog) -> SubmissionOutcome {
    let mut correct_count = 0;
    let mut results = Vec::with_capacity(submission.answers.len());

    for answer in &submission.answers {
        let (Some(question), Some(correct_id)) = (
            catalog.get(answer.question_id),
            catalog.correct_option_id(answer.question_id),
        ) else {
            continue;
        };

        let is_correct = answer.answer_id == correct_id;
        if is_correct {
            correct_count += 1;
        }

        let text_of = |id: i64| question.option(id).map(|o| o.text.clone()).unwrap_or_default();
        results.push(ScoredResult {
            question_id: question.id,
            question_text: question.text.clone(),
            selected_id: answer.answer_id,
            correct_id,
            is_correct,
            selected_text: text_of(answer.answer_id),
            correct_text: text_of(correct_id),
        });
    }

    let total = catalog.len();
    let percentage = if total == 0 {
        0.0
    } else {
        100.0 * correct_count as f64 / total as f64
    };

    SubmissionOutcome {
        score: correct_count,
        total,
        correct_answers: correct_count,
        percentage,
        passed: percentage >= PASS_THRESHOLD,
        session_id: new_session_id(),
        results,
    }
}

pub fn new_session_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("session_{}_{}", Utc::now().timestamp(), suffix)
}

pub fn grade(raw: RawSubmission, catalog: &Catalog) -> Result<SubmissionOutcome, QuizError> {
    if raw.is_empty() {
        return Err(QuizError::EmptySubmission);
    }
    if catalog.is_empty() {
        return Err(QuizError::NoQuestionsAvailable);
    }

    let submission = normalize(raw, catalog)?;
    validate(&submission, catalog)?;
    Ok(score(&submission, catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;
    use crate::test_support::{all_correct, answer, sample_catalog};
    use serde_json::json;
    use std::collections::HashSet;

    fn submission(answers: Vec<Answer>) -> Submission {
        Submission {
            answers,
            user_id: None,
        }
    }

    fn assert_consistent(outcome: &SubmissionOutcome) {
        assert_eq!(outcome.score, outcome.correct_answers);
        assert!(outcome.score <= outcome.total);
        let expected = 100.0 * outcome.score as f64 / outcome.total as f64;
        assert!((outcome.percentage - expected).abs() < 1e-9);
        assert_eq!(outcome.passed, outcome.percentage >= 60.0);
        assert_eq!(outcome.results.iter().filter(|r| r.is_correct).count(), outcome.score);
    }

    #[test]
    fn all_correct_scores_full_marks() {
        let catalog = sample_catalog();
        let outcome = score(&submission(all_correct()), &catalog);
        assert_eq!(outcome.score, 5);
        assert_eq!(outcome.total, 5);
        assert_eq!(outcome.percentage, 100.0);
        assert!(outcome.passed);
        assert_consistent(&outcome);
    }

    #[test]
    fn sixty_percent_passes() {
        let catalog = sample_catalog();
        let mut answers = all_correct();
        answers[1] = answer(2, 5);
        answers[4] = answer(5, 20);
        let outcome = score(&submission(answers), &catalog);
        assert_eq!(outcome.score, 3);
        assert!((outcome.percentage - 60.0).abs() < 1e-9);
        assert!(outcome.passed);
        assert_consistent(&outcome);
    }

    #[test]
    fn forty_percent_fails() {
        let catalog = sample_catalog();
        let answers = vec![answer(1, 2), answer(2, 6), answer(3, 9), answer(4, 14), answer(5, 17)];
        let outcome = score(&submission(answers), &catalog);
        assert_eq!(outcome.score, 2);
        assert!(!outcome.passed);
        assert_consistent(&outcome);
    }

    #[test]
    fn results_carry_texts_in_submission_order() {
        let catalog = sample_catalog();
        let answers = vec![answer(4, 13), answer(1, 1), answer(2, 6), answer(5, 18), answer(3, 10)];
        let outcome = score(&submission(answers), &catalog);

        let order: Vec<i64> = outcome.results.iter().map(|r| r.question_id).collect();
        assert_eq!(order, vec![4, 1, 2, 5, 3]);

        let first = &outcome.results[0];
        assert_eq!(first.question_text, "What is the zero value of an int in Go?");
        assert_eq!(first.selected_id, 13);
        assert_eq!(first.selected_text, "nil");
        assert_eq!(first.correct_id, 14);
        assert_eq!(first.correct_text, "0");
        assert!(!first.is_correct);
        assert_consistent(&outcome);
    }

    #[test]
    fn session_ids_are_distinct() {
        let ids: HashSet<String> = (0..50).map(|_| new_session_id()).collect();
        assert_eq!(ids.len(), 50);
        assert!(ids.iter().all(|id| id.starts_with("session_")));
    }

    #[test]
    fn grade_runs_the_pipeline() {
        let catalog = sample_catalog();
        let raw = RawSubmission::from_json(json!({
            "answers": [
                {"questionId": 1, "answerId": 1},
                {"questionId": 2, "answerId": 6},
                {"questionId": 3, "answerId": 12},
                {"questionId": 4, "answerId": 14},
                {"questionId": 5, "answerId": 18}
            ]
        }))
        .unwrap();
        let outcome = grade(raw, &catalog).unwrap();
        assert_eq!(outcome.score, 5);
        assert_eq!(outcome.results.len(), 5);
    }

    #[test]
    fn grade_rejects_invalid_option_without_outcome() {
        let catalog = sample_catalog();
        let raw = RawSubmission::from_json(json!({
            "answers": [
                {"questionId": 1, "answerId": 6},
                {"questionId": 2, "answerId": 6},
                {"questionId": 3, "answerId": 12},
                {"questionId": 4, "answerId": 14},
                {"questionId": 5, "answerId": 18}
            ]
        }))
        .unwrap();
        assert!(matches!(
            grade(raw, &catalog),
            Err(QuizError::InvalidOption { answer_id: 6, question_id: 1 })
        ));
    }

    #[test]
    fn grade_checks_empty_submission_before_empty_catalog() {
        let empty = Catalog::new(Vec::new()).unwrap();
        let raw = RawSubmission::from_json(json!({"answers": []})).unwrap();
        assert!(matches!(grade(raw, &empty), Err(QuizError::EmptySubmission)));

        let raw = RawSubmission::from_json(json!({"answers": {"q1": "fmt"}})).unwrap();
        assert!(matches!(grade(raw, &empty), Err(QuizError::NoQuestionsAvailable)));
    }

    #[test]
    fn textual_and_indexed_forms_grade_the_same() {
        let catalog = sample_catalog();
        let textual = RawSubmission::from_json(json!({
            "answers": {
                "q1": "A Go function",
                "q2": "type",
                "q3": "Both 2 and 3",
                "q4": "0",
                "q5": "os"
            }
        }))
        .unwrap();
        let indexed = RawSubmission::from_json(json!({
            "answers": [
                {"questionId": 5, "answerId": 19},
                {"questionId": 4, "answerId": 14},
                {"questionId": 3, "answerId": 12},
                {"questionId": 2, "answerId": 6},
                {"questionId": 1, "answerId": 2}
            ]
        }))
        .unwrap();

        let a = grade(textual, &catalog).unwrap();
        let b = grade(indexed, &catalog).unwrap();
        assert_eq!(a.score, 3);
        assert_eq!(a.score, b.score);
        assert_eq!(a.percentage, b.percentage);

        let mut ra = a.results.clone();
        let mut rb = b.results.clone();
        ra.sort_by_key(|r| r.question_id);
        rb.sort_by_key(|r| r.question_id);
        assert_eq!(ra, rb);
    }
}
