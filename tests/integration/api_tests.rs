//! API endpoint integration tests against a seeded in-memory store

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use trivia_api::{
    api::routes::create_router,
    config::{Settings, StoreBackend},
    store::{
        Category, MemoryStore, NewQuestion, Question, SeedData, StoreError, StoreResult,
        TriviaStore,
    },
    AppState,
};

const SEED_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/seed.yaml");

fn create_test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.database.backend = StoreBackend::Memory;
    settings.database.seed_path = Some(SEED_PATH.to_string());
    settings
}

async fn create_test_app() -> Router {
    let seed = SeedData::load(SEED_PATH).unwrap();
    let store = Arc::new(MemoryStore::from_seed(seed).unwrap());
    let state = Arc::new(AppState::new(create_test_settings(), store));
    create_router(state).await
}

/// Store whose every query fails
struct FailingStore;

fn store_down<T>() -> StoreResult<T> {
    Err(StoreError::Seed("store unavailable".to_string()))
}

#[async_trait]
impl TriviaStore for FailingStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn ping(&self) -> StoreResult<()> {
        store_down()
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        store_down()
    }

    async fn find_category(&self, _id: i32) -> StoreResult<Option<Category>> {
        store_down()
    }

    async fn list_questions(&self) -> StoreResult<Vec<Question>> {
        store_down()
    }

    async fn questions_in_category(&self, _category: i32) -> StoreResult<Vec<Question>> {
        store_down()
    }

    async fn search_questions(&self, _term: &str) -> StoreResult<Vec<Question>> {
        store_down()
    }

    async fn find_question(&self, _id: i32) -> StoreResult<Option<Question>> {
        store_down()
    }

    async fn insert_question(&self, _new: NewQuestion) -> StoreResult<Question> {
        store_down()
    }

    async fn delete_question(&self, _id: i32) -> StoreResult<bool> {
        store_down()
    }

    async fn count_questions(&self) -> StoreResult<i64> {
        store_down()
    }
}

async fn create_failing_app() -> Router {
    let state = Arc::new(AppState::new(create_test_settings(), Arc::new(FailingStore)));
    create_router(state).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

fn assert_error(status: StatusCode, body: &Value, expected: StatusCode) {
    assert_eq!(status, expected);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], expected.as_u16());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_retrieve_categories() {
    let app = create_test_app().await;
    let (status, body) = get(&app, "/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let categories = body["categories"].as_object().unwrap();
    assert_eq!(categories.len(), 6);
    assert_eq!(categories["1"], "Science");
    assert_eq!(categories["4"], "History");
    assert_eq!(categories["6"], "Sports");
}

#[tokio::test]
async fn test_paginate_questions() {
    let app = create_test_app().await;
    let (status, body) = get(&app, "/questions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["questions"].as_array().unwrap().len(), 10);
    assert_eq!(body["total_questions"], 19);
    assert_eq!(body["categories"].as_object().unwrap().len(), 6);
    assert!(body["current_category"].is_null());

    // Ordered by id ascending
    let ids: Vec<i64> = body["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn test_second_page_holds_the_rest() {
    let app = create_test_app().await;
    let (status, body) = get(&app, "/questions?page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 9);
    assert_eq!(body["total_questions"], 19);
}

#[tokio::test]
async fn test_paginate_questions_out_of_bound() {
    let app = create_test_app().await;

    let (status, body) = get(&app, "/questions?page=10999").await;
    assert_error(status, &body, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/questions?page=3").await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_page_defaults_to_first() {
    let app = create_test_app().await;
    let (status, body) = get(&app, "/questions?page=abc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"][0]["id"], 2);
}

#[tokio::test]
async fn test_create_question() {
    let app = create_test_app().await;
    let (_, before) = get(&app, "/questions").await;
    let total_before = before["total_questions"].as_i64().unwrap();

    let (status, body) = post(
        &app,
        "/questions",
        json!({ "question": "Q", "answer": "A", "difficulty": 1, "category": 4 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["created"].is_i64());
    assert_eq!(body["total_questions"], total_before + 1);

    // The new question is served by its category
    let created = body["created"].as_i64().unwrap();
    let (_, history) = get(&app, "/categories/4/questions").await;
    assert!(history["questions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|q| q["id"] == created && q["question"] == "Q"));
}

#[tokio::test]
async fn test_create_question_numeric_strings() {
    let app = create_test_app().await;
    let (status, body) = post(
        &app,
        "/questions",
        json!({ "question": "Q", "answer": "A", "difficulty": "1", "category": "4" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["total_questions"], 20);

    let created = body["created"].as_i64().unwrap();
    let (_, history) = get(&app, "/categories/4/questions").await;
    assert!(history["questions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|q| q["id"] == created && q["difficulty"] == 1));
}

#[tokio::test]
async fn test_create_question_non_numeric_difficulty() {
    let app = create_test_app().await;
    let (status, body) = post(
        &app,
        "/questions",
        json!({ "question": "Q", "answer": "A", "difficulty": "hard", "category": "4" }),
    )
    .await;

    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_question_empty_fields() {
    let app = create_test_app().await;

    let (status, body) = post(&app, "/questions", json!({ "question": "", "answer": "" })).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = post(
        &app,
        "/questions",
        json!({ "question": "", "answer": "", "difficulty": 5, "category": 1 }),
    )
    .await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_question_missing_answer() {
    let app = create_test_app().await;
    let (status, body) = post(
        &app,
        "/questions",
        json!({ "question": "Q", "difficulty": 2, "category": 1 }),
    )
    .await;

    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_question_unknown_category() {
    let app = create_test_app().await;
    let (status, body) = post(
        &app,
        "/questions",
        json!({ "question": "Q", "answer": "A", "difficulty": 2, "category": 999 }),
    )
    .await;

    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
    let (_, listing) = get(&app, "/questions").await;
    assert_eq!(listing["total_questions"], 19);
}

#[tokio::test]
async fn test_create_question_malformed_json() {
    let app = create_test_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/questions")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_question() {
    let app = create_test_app().await;
    let (status, body) = delete(&app, "/questions/5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted"], 5);
    assert_eq!(body["total_questions"], 18);

    // A second delete finds nothing
    let (status, body) = delete(&app, "/questions/5").await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_question_not_exist() {
    let app = create_test_app().await;
    let (status, body) = delete(&app, "/questions/9999999").await;

    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_question_malformed_id() {
    let app = create_test_app().await;
    let (status, body) = delete(&app, "/questions/abc").await;

    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_search_question() {
    let app = create_test_app().await;
    let (status, body) = post(&app, "/questions/search", json!({ "searchTerm": "Africa" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["current_category"].is_null());

    let questions = body["questions"].as_array().unwrap();
    assert!(!questions.is_empty());
    assert_eq!(body["total_questions"], questions.len() as i64);
    for question in questions {
        let text = question["question"].as_str().unwrap().to_lowercase();
        assert!(text.contains("africa"));
    }
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let app = create_test_app().await;
    let (status, body) = post(&app, "/questions/search", json!({ "searchTerm": "HALL OF MIRRORS" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_questions"], 1);
    assert_eq!(body["questions"][0]["id"], 14);
}

#[tokio::test]
async fn test_search_without_matches() {
    let app = create_test_app().await;
    let (status, body) = post(&app, "/questions/search", json!({ "searchTerm": "zzzz" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_questions"], 0);
    assert!(body["questions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_results_are_paginated() {
    let app = create_test_app().await;

    let (status, body) = post(&app, "/questions/search", json!({ "searchTerm": "e" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 10);
    assert_eq!(body["total_questions"], 19);

    let (status, body) = post(&app, "/questions/search?page=2", json!({ "searchTerm": "e" })).await;
    assert_eq!(status, StatusCode::OK);
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 9);
    assert_eq!(questions[0]["id"], 15);
    assert_eq!(questions[8]["id"], 23);
    assert_eq!(body["total_questions"], 19);
}

#[tokio::test]
async fn test_search_question_empty() {
    let app = create_test_app().await;

    let (status, body) = post(&app, "/questions/search", json!({ "searchTerm": "" })).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = post(&app, "/questions/search", json!({})).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_category_questions() {
    let app = create_test_app().await;
    let (status, body) = get(&app, "/categories/2/questions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["current_category"], 2);

    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 4);
    assert_eq!(body["total_questions"], 4);
    assert!(questions.iter().all(|q| q["category"] == 2));
}

#[tokio::test]
async fn test_category_not_valid_id() {
    let app = create_test_app().await;

    let (status, body) = get(&app, "/categories/99999/questions").await;
    assert_error(status, &body, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/categories/87/questions").await;
    assert_error(status, &body, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/categories/abc/questions").await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quiz_success() {
    let app = create_test_app().await;

    for _ in 0..20 {
        let (status, body) = post(
            &app,
            "/quizzes",
            json!({
                "previous_questions": [5, 9],
                "quiz_category": { "id": 4, "type": "History" }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let question = &body["question"];
        assert!(question.is_object());
        assert_ne!(question["id"], 5);
        assert_ne!(question["id"], 9);
        assert_eq!(question["category"], 4);
    }
}

#[tokio::test]
async fn test_quiz_all_categories() {
    let app = create_test_app().await;
    let (status, body) = post(
        &app,
        "/quizzes",
        json!({ "previous_questions": [], "quiz_category": { "id": 0, "type": "click" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["question"]["id"].is_i64());
}

#[tokio::test]
async fn test_quiz_category_id_as_string() {
    let app = create_test_app().await;
    let (status, body) = post(
        &app,
        "/quizzes",
        json!({ "previous_questions": [10], "quiz_category": { "id": "6", "type": "Sports" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["id"], 11);
}

#[tokio::test]
async fn test_quiz_exhausted() {
    let app = create_test_app().await;
    let (status, body) = post(
        &app,
        "/quizzes",
        json!({ "previous_questions": [10, 11], "quiz_category": { "id": 6, "type": "Sports" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn test_quiz_empty_pool() {
    let app = create_test_app().await;
    let (status, body) = post(
        &app,
        "/quizzes",
        json!({ "previous_questions": [], "quiz_category": { "id": 99, "type": "Unknown" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn test_quiz_malformed_body() {
    let app = create_test_app().await;
    let (status, body) = post(&app, "/quizzes", json!({ "previous_questions": "nope" })).await;

    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app().await;
    let (status, body) = get(&app, "/nope").await;

    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = create_test_app().await;
    let (status, body) = get(&app, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/quizzes"].is_object());
    assert!(body["paths"]["/questions/{question_id}"].is_object());
}

#[tokio::test]
async fn test_store_failures_map_to_endpoint_errors() {
    let app = create_failing_app().await;

    let (status, body) = get(&app, "/categories").await;
    assert_error(status, &body, StatusCode::NOT_FOUND);

    let (status, body) = post(&app, "/questions/search", json!({ "searchTerm": "e" })).await;
    assert_error(status, &body, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/questions").await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = get(&app, "/categories/1/questions").await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = delete(&app, "/questions/5").await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = post(
        &app,
        "/questions",
        json!({ "question": "Q", "answer": "A", "difficulty": 1, "category": 4 }),
    )
    .await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = post(
        &app,
        "/quizzes",
        json!({ "previous_questions": [], "quiz_category": { "id": 4, "type": "History" } }),
    )
    .await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = post(&app, "/quizzes", json!({ "previous_questions": [] })).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_reports_degraded_store() {
    let app = create_failing_app().await;
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"], "failing");
}
