use crate::error::QuizError;
use crate::models::Catalog;
use crate::store::QuestionStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuestionStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    pub async fn catalog(&self) -> Result<Catalog, QuizError> {
        let questions = self.store.fetch_catalog().await?;
        Catalog::new(questions)
    }
}
