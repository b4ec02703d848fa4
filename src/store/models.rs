//! Row types shared by every store implementation

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A trivia question as stored and as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Question {
    pub id: i32,
    pub question: String,
    pub answer: String,
    /// Id of the owning category
    pub category: i32,
    pub difficulty: i32,
}

/// A question category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// Validated payload for inserting a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

/// Build the `id -> type` label map clients use to render categories
pub fn category_map(categories: Vec<Category>) -> BTreeMap<i32, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}
