//! Postgres store backed by a sqlx connection pool

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::DatabaseConfig;
use crate::store::{Category, NewQuestion, Question, StoreResult, TriviaStore};

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

/// Store over the `categories` and `questions` tables
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open a connection pool using the database configuration
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| {
                error!("Failed to connect to database: {}", e);
                e
            })?;

        Ok(Self { pool })
    }
}

/// Turn a search term into an `ILIKE` pattern matching it as a literal substring
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl TriviaStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, type FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    async fn find_category(&self, id: i32) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, type FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn list_questions(&self) -> StoreResult<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions ORDER BY id",
            QUESTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn questions_in_category(&self, category: i32) -> StoreResult<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions WHERE category = $1 ORDER BY id",
            QUESTION_COLUMNS
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            r"SELECT {} FROM questions WHERE question ILIKE $1 ESCAPE '\' ORDER BY id",
            QUESTION_COLUMNS
        ))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn find_question(&self, id: i32) -> StoreResult<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions WHERE id = $1",
            QUESTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(question)
    }

    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question> {
        let question = sqlx::query_as::<_, Question>(&format!(
            r#"
            INSERT INTO questions (question, answer, category, difficulty)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        ))
        .bind(new.question)
        .bind(new.answer)
        .bind(new.category)
        .bind(new.difficulty)
        .fetch_one(&self.pool)
        .await?;

        debug!(question_id = question.id, "Inserted question");
        Ok(question)
    }

    async fn delete_question(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_questions(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
