use crate::error::StoreError;
use crate::models::{NewQuestion, Question, QuizOption};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use sqlx::{FromRow, MySqlPool};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use validator::Validate;

pub trait QuestionStore: Send + Sync {
    fn fetch_catalog(&self) -> BoxFuture<'static, Result<Vec<Question>, StoreError>>;

    fn fetch_question(&self, id: i64) -> BoxFuture<'static, Result<Option<Question>, StoreError>>;

    fn create_question(&self, question: NewQuestion) -> BoxFuture<'static, Result<Question, StoreError>>;
}

fn check_new_question(question: &NewQuestion) -> Result<(), StoreError> {
    question
        .validate()
        .map_err(|err| StoreError::InvalidQuestion(err.to_string()))
}

#[derive(Debug, FromRow)]
struct QuestionRow {
    id: i64,
    question: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct OptionRow {
    id: i64,
    question_id: i64,
    text: String,
    is_correct: bool,
}

fn assemble(rows: Vec<QuestionRow>, options: Vec<OptionRow>) -> Vec<Question> {
    let mut by_question: HashMap<i64, Vec<QuizOption>> = HashMap::new();
    for o in options {
        by_question.entry(o.question_id).or_default().push(QuizOption {
            id: o.id,
            text: o.text,
            is_correct: o.is_correct,
        });
    }
    rows.into_iter()
        .map(|row| Question {
            options: by_question.remove(&row.id).unwrap_or_default(),
            id: row.id,
            text: row.question,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
        .collect()
}

#[derive(Clone)]
pub struct MySqlQuestionStore {
    pool: MySqlPool,
}

impl MySqlQuestionStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

async fn load_question(pool: &MySqlPool, id: i64) -> Result<Option<Question>, StoreError> {
    let row: Option<QuestionRow> =
        sqlx::query_as("SELECT id, question, created_at, updated_at FROM questions WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let options: Vec<OptionRow> =
        sqlx::query_as("SELECT id, question_id, text, is_correct FROM options WHERE question_id = ? ORDER BY id")
            .bind(id)
            .fetch_all(pool)
            .await?;
    Ok(assemble(vec![row], options).pop())
}

impl QuestionStore for MySqlQuestionStore {
    fn fetch_catalog(&self) -> BoxFuture<'static, Result<Vec<Question>, StoreError>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            // Both reads share one transaction so they see the same snapshot.
            let mut tx = pool.begin().await?;
            let rows: Vec<QuestionRow> =
                sqlx::query_as("SELECT id, question, created_at, updated_at FROM questions ORDER BY id")
                    .fetch_all(&mut *tx)
                    .await?;
            let options: Vec<OptionRow> =
                sqlx::query_as("SELECT id, question_id, text, is_correct FROM options ORDER BY question_id, id")
                    .fetch_all(&mut *tx)
                    .await?;
            tx.commit().await?;
            Ok(assemble(rows, options))
        })
    }

    fn fetch_question(&self, id: i64) -> BoxFuture<'static, Result<Option<Question>, StoreError>> {
        let pool = self.pool.clone();
        Box::pin(async move { load_question(&pool, id).await })
    }

    fn create_question(&self, question: NewQuestion) -> BoxFuture<'static, Result<Question, StoreError>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            check_new_question(&question)?;

            let mut tx = pool.begin().await?;
            let inserted = sqlx::query("INSERT INTO questions (question) VALUES (?)")
                .bind(&question.text)
                .execute(&mut *tx)
                .await?;
            let question_id = inserted.last_insert_id() as i64;

            for option in &question.options {
                sqlx::query("INSERT INTO options (question_id, text, is_correct) VALUES (?, ?, ?)")
                    .bind(question_id)
                    .bind(&option.text)
                    .bind(option.is_correct)
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await?;

            load_question(&pool, question_id)
                .await?
                .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
        })
    }
}

struct InMemoryInner {
    questions: RwLock<Vec<Question>>,
    next_question_id: AtomicI64,
    next_option_id: AtomicI64,
}

#[derive(Clone)]
pub struct InMemoryQuestionStore {
    inner: Arc<InMemoryInner>,
}

impl Default for InMemoryQuestionStore {
    fn default() -> Self {
        Self::with_questions(Vec::new())
    }
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(|q| q.id);
        let max_question = questions.iter().map(|q| q.id).max().unwrap_or(0);
        let max_option = questions
            .iter()
            .flat_map(|q| q.options.iter().map(|o| o.id))
            .max()
            .unwrap_or(0);
        Self {
            inner: Arc::new(InMemoryInner {
                questions: RwLock::new(questions),
                next_question_id: AtomicI64::new(max_question + 1),
                next_option_id: AtomicI64::new(max_option + 1),
            }),
        }
    }
}

impl QuestionStore for InMemoryQuestionStore {
    fn fetch_catalog(&self) -> BoxFuture<'static, Result<Vec<Question>, StoreError>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.questions.read().await.clone()) })
    }

    fn fetch_question(&self, id: i64) -> BoxFuture<'static, Result<Option<Question>, StoreError>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let questions = inner.questions.read().await;
            Ok(questions.iter().find(|q| q.id == id).cloned())
        })
    }

    fn create_question(&self, question: NewQuestion) -> BoxFuture<'static, Result<Question, StoreError>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            check_new_question(&question)?;

            let mut questions = inner.questions.write().await;
            let now = Utc::now();
            let created = Question {
                id: inner.next_question_id.fetch_add(1, Ordering::SeqCst),
                text: question.text,
                options: question
                    .options
                    .into_iter()
                    .map(|o| QuizOption {
                        id: inner.next_option_id.fetch_add(1, Ordering::SeqCst),
                        text: o.text,
                        is_correct: o.is_correct,
                    })
                    .collect(),
                created_at: Some(now),
                updated_at: Some(now),
            };
            questions.push(created.clone());
            Ok(created)
        })
    }
}
