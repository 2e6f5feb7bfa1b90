pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod scoring;
pub mod seed;
pub mod state;
pub mod store;
pub mod validate;
pub mod views;

#[cfg(test)]
mod test_support;

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use store::{InMemoryQuestionStore, MySqlQuestionStore, QuestionStore};

pub async fn build_state(config: &config::Config) -> anyhow::Result<state::AppState> {
    let store: Arc<dyn QuestionStore> = match config.database_url.as_deref() {
        Some(url) => match connect_mysql(url, config.db_max_connections).await {
            Ok(store) => {
                tracing::info!("mysql connected and migrations applied");
                Arc::new(store)
            }
            Err(err) => {
                tracing::warn!(
                    "mysql is unavailable ({}), backend continues in local in-memory mode",
                    err
                );
                Arc::new(InMemoryQuestionStore::new())
            }
        },
        None => Arc::new(InMemoryQuestionStore::new()),
    };

    if config.seed_questions {
        seed::seed_if_empty(store.as_ref()).await?;
    }

    Ok(state::AppState::new(store))
}

async fn connect_mysql(url: &str, max_connections: u32) -> Result<MySqlQuestionStore, error::StoreError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    let store = MySqlQuestionStore::new(pool);
    store.migrate().await?;
    Ok(store)
}
