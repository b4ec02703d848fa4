//! Store module - the relational store behind the API and its implementations

pub mod memory;
pub mod models;
pub mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use models::{category_map, Category, NewQuestion, Question};
pub use postgres::PgStore;
pub use seed::SeedData;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::{DatabaseConfig, StoreBackend};

/// Errors raised by a store implementation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unknown category: {0}")]
    UnknownCategory(i32),

    #[error("Seed error: {0}")]
    Seed(String),

    #[error("No question ids left to assign")]
    IdsExhausted,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Query interface over the `questions` and `categories` tables.
///
/// Every listing is ordered by id ascending.
#[async_trait]
pub trait TriviaStore: Send + Sync {
    /// Short name of the backing store, used in logs and health output
    fn backend_name(&self) -> &'static str;

    /// Check that the store is reachable
    async fn ping(&self) -> StoreResult<()>;

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn find_category(&self, id: i32) -> StoreResult<Option<Category>>;

    async fn list_questions(&self) -> StoreResult<Vec<Question>>;

    async fn questions_in_category(&self, category: i32) -> StoreResult<Vec<Question>>;

    /// Case-insensitive substring match over question text
    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>>;

    async fn find_question(&self, id: i32) -> StoreResult<Option<Question>>;

    /// Insert a question and return the stored row with its assigned id
    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question>;

    /// Delete a question, returning whether a row was removed
    async fn delete_question(&self, id: i32) -> StoreResult<bool>;

    async fn count_questions(&self) -> StoreResult<i64>;
}

/// Create the store selected by configuration
pub async fn connect(config: &DatabaseConfig) -> StoreResult<Arc<dyn TriviaStore>> {
    match config.backend {
        StoreBackend::Postgres => {
            let store = PgStore::connect(config).await?;
            info!(max_connections = config.max_connections, "Connected to postgres store");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            let store = match &config.seed_path {
                Some(path) => {
                    let seed = SeedData::load(path)?;
                    info!(
                        path = %path,
                        categories = seed.categories.len(),
                        questions = seed.questions.len(),
                        "Seeding in-memory store"
                    );
                    MemoryStore::from_seed(seed)?
                }
                None => MemoryStore::new(),
            };
            Ok(Arc::new(store))
        }
    }
}
