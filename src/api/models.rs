//! API request and response models

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::store::{NewQuestion, Question};

/// Accepted difficulty scores
pub const DIFFICULTY_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

/// Body for creating a question
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub question: Option<String>,

    #[serde(default)]
    pub answer: Option<String>,

    /// Id of an existing category
    #[serde(default, deserialize_with = "opt_int_or_string")]
    #[schema(value_type = Option<i32>)]
    pub category: Option<i32>,

    /// Score from 1 to 5
    #[serde(default, deserialize_with = "opt_int_or_string")]
    #[schema(value_type = Option<i32>)]
    pub difficulty: Option<i32>,
}

impl CreateQuestionRequest {
    /// Check required fields and produce the insert payload
    pub fn validate(self) -> Result<NewQuestion, AppError> {
        let question = non_blank(self.question, "question")?;
        let answer = non_blank(self.answer, "answer")?;

        let category = self
            .category
            .ok_or_else(|| AppError::Unprocessable("Missing field 'category'".to_string()))?;

        let difficulty = self
            .difficulty
            .ok_or_else(|| AppError::Unprocessable("Missing field 'difficulty'".to_string()))?;
        if !DIFFICULTY_RANGE.contains(&difficulty) {
            return Err(AppError::Unprocessable(format!(
                "Difficulty {} outside {:?}",
                difficulty, DIFFICULTY_RANGE
            )));
        }

        Ok(NewQuestion {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

fn non_blank(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(AppError::Unprocessable(format!("Field '{}' is empty", field))),
        None => Err(AppError::Unprocessable(format!("Missing field '{}'", field))),
    }
}

/// Body for searching questions
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
}

/// Body for requesting the next quiz question
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct QuizRequest {
    /// Ids already served in this quiz
    #[serde(default)]
    pub previous_questions: Vec<i32>,

    /// Category to draw from; absent or id 0 means all categories
    #[serde(default)]
    pub quiz_category: Option<QuizCategory>,
}

/// Category selector sent by the quiz client
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct QuizCategory {
    #[serde(deserialize_with = "int_or_string")]
    #[schema(value_type = i32)]
    pub id: i32,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Accept an integer given either as a JSON number or a numeric string
fn int_or_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntOrStringVisitor;

    impl<'de> serde::de::Visitor<'de> for IntOrStringVisitor {
        type Value = i32;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a numeric string")
        }

        fn visit_str<E>(self, value: &str) -> Result<i32, E>
        where
            E: serde::de::Error,
        {
            value.trim().parse::<i32>().map_err(serde::de::Error::custom)
        }

        fn visit_i64<E>(self, value: i64) -> Result<i32, E>
        where
            E: serde::de::Error,
        {
            i32::try_from(value).map_err(serde::de::Error::custom)
        }

        fn visit_u64<E>(self, value: u64) -> Result<i32, E>
        where
            E: serde::de::Error,
        {
            i32::try_from(value).map_err(serde::de::Error::custom)
        }
    }

    deserializer.deserialize_any(IntOrStringVisitor)
}

/// Optional form of [`int_or_string`]; `null` stays `None`
fn opt_int_or_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct IntOrString(#[serde(deserialize_with = "int_or_string")] i32);

    Ok(Option::<IntOrString>::deserialize(deserializer)?.map(|IntOrString(value)| value))
}

/// `GET /categories` response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CategoriesResponse {
    pub success: bool,
    /// Category id to type label
    pub categories: BTreeMap<i32, String>,
}

/// A page or filtered list of questions
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct QuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: i64,

    /// Only present on the unfiltered listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<i32, String>>,

    /// Category filter in effect, null when none applies
    pub current_category: Option<i32>,
}

/// `POST /questions` response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub success: bool,
    pub created: i32,
    pub total_questions: i64,
}

/// `DELETE /questions/{id}` response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i32,
    pub total_questions: i64,
}

/// `POST /quizzes` response; `question` is omitted once the pool is exhausted
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct QuizResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
}

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Error body for 4xx and 5xx responses
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}
