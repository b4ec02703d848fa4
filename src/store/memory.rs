//! In-memory store backed by ordered maps

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::store::{
    Category, NewQuestion, Question, SeedData, StoreError, StoreResult, TriviaStore,
};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i32, Category>,
    questions: BTreeMap<i32, Question>,
    /// Wider than the id column so a seeded `i32::MAX` cannot overflow it
    next_question_id: i64,
}

impl Tables {
    fn allocate_question_id(&mut self) -> StoreResult<i32> {
        let id = i32::try_from(self.next_question_id.max(1))
            .map_err(|_| StoreError::IdsExhausted)?;
        self.next_question_id = i64::from(id) + 1;
        Ok(id)
    }
}

/// Store that keeps both tables in process memory.
///
/// Enforces the category foreign key on insert.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                next_question_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Create a store pre-populated with seed data
    pub fn from_seed(seed: SeedData) -> StoreResult<Self> {
        let mut tables = Tables {
            next_question_id: 1,
            ..Default::default()
        };

        for category in seed.categories {
            tables.categories.insert(category.id, category);
        }

        // Explicit ids first so generated ids never collide with them
        let explicit_max = seed.questions.iter().filter_map(|q| q.id).max().unwrap_or(0);
        tables.next_question_id = i64::from(explicit_max) + 1;

        for seeded in seed.questions {
            if !tables.categories.contains_key(&seeded.category) {
                return Err(StoreError::UnknownCategory(seeded.category));
            }
            let id = match seeded.id {
                Some(id) => id,
                None => tables.allocate_question_id()?,
            };
            if tables.questions.contains_key(&id) {
                return Err(StoreError::Seed(format!("Duplicate question id {}", id)));
            }
            tables.questions.insert(
                id,
                Question {
                    id,
                    question: seeded.question,
                    answer: seeded.answer,
                    category: seeded.category,
                    difficulty: seeded.difficulty,
                },
            );
        }

        info!(
            categories = tables.categories.len(),
            questions = tables.questions.len(),
            "Memory store seeded"
        );

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TriviaStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.tables.read().categories.values().cloned().collect())
    }

    async fn find_category(&self, id: i32) -> StoreResult<Option<Category>> {
        Ok(self.tables.read().categories.get(&id).cloned())
    }

    async fn list_questions(&self) -> StoreResult<Vec<Question>> {
        Ok(self.tables.read().questions.values().cloned().collect())
    }

    async fn questions_in_category(&self, category: i32) -> StoreResult<Vec<Question>> {
        Ok(self
            .tables
            .read()
            .questions
            .values()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        let needle = term.to_lowercase();
        Ok(self
            .tables
            .read()
            .questions
            .values()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_question(&self, id: i32) -> StoreResult<Option<Question>> {
        Ok(self.tables.read().questions.get(&id).cloned())
    }

    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question> {
        let mut tables = self.tables.write();

        if !tables.categories.contains_key(&new.category) {
            return Err(StoreError::UnknownCategory(new.category));
        }

        let id = tables.allocate_question_id()?;
        let question = Question {
            id,
            question: new.question,
            answer: new.answer,
            category: new.category,
            difficulty: new.difficulty,
        };
        tables.questions.insert(id, question.clone());
        debug!(question_id = id, "Inserted question");

        Ok(question)
    }

    async fn delete_question(&self, id: i32) -> StoreResult<bool> {
        Ok(self.tables.write().questions.remove(&id).is_some())
    }

    async fn count_questions(&self) -> StoreResult<i64> {
        Ok(self.tables.read().questions.len() as i64)
    }
}
