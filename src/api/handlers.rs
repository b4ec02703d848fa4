//! HTTP request handlers

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::models::{
    CategoriesResponse, CreateQuestionRequest, CreatedResponse, DeletedResponse,
    ErrorResponse, HealthResponse, QuestionsResponse, QuizRequest, QuizResponse, SearchRequest,
};
use crate::api::pagination::{paginate, PageQuery};
use crate::error::AppError;
use crate::quiz::{pick_question, ALL_CATEGORIES};
use crate::store::category_map;
use crate::AppState;
use axum::{extract::State, Json};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// List all categories as an id to label map
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "All categories", body = CategoriesResponse),
        (status = 404, description = "Categories could not be loaded", body = ErrorResponse),
    )
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = state
        .store
        .list_categories()
        .await
        .map_err(AppError::not_found_from("Failed to load categories"))?;

    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

/// List questions ten per page, with the category map
#[utoipa::path(
    get,
    path = "/questions",
    tag = "Questions",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of questions", body = QuestionsResponse),
        (status = 404, description = "Page is empty", body = ErrorResponse),
        (status = 422, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let page = query.page();
    let questions = state
        .store
        .list_questions()
        .await
        .map_err(AppError::unprocessable_from("Failed to load questions"))?;

    let current = paginate(&questions, page);
    if current.is_empty() {
        return Err(AppError::NotFound(format!("No questions on page {}", page)));
    }

    let categories = state
        .store
        .list_categories()
        .await
        .map_err(AppError::unprocessable_from("Failed to load categories"))?;

    Ok(Json(QuestionsResponse {
        success: true,
        questions: current.to_vec(),
        total_questions: questions.len() as i64,
        categories: Some(category_map(categories)),
        current_category: None,
    }))
}

/// Delete a question by id
#[utoipa::path(
    delete,
    path = "/questions/{question_id}",
    tag = "Questions",
    params(("question_id" = i32, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question deleted", body = DeletedResponse),
        (status = 404, description = "No such question", body = ErrorResponse),
        (status = 422, description = "Malformed id or store failure", body = ErrorResponse),
    )
)]
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    ApiPath(question_id): ApiPath<i32>,
) -> Result<Json<DeletedResponse>, AppError> {
    info!(question_id, "Deleting question");

    let existing = state
        .store
        .find_question(question_id)
        .await
        .map_err(AppError::unprocessable_from("Failed to look up question"))?;
    if existing.is_none() {
        return Err(AppError::NotFound(format!("Question {} not found", question_id)));
    }

    let removed = state
        .store
        .delete_question(question_id)
        .await
        .map_err(AppError::unprocessable_from("Failed to delete question"))?;
    if !removed {
        // Deleted concurrently between lookup and delete
        return Err(AppError::Unprocessable(format!(
            "Question {} vanished before delete",
            question_id
        )));
    }

    let total_questions = state
        .store
        .count_questions()
        .await
        .map_err(AppError::unprocessable_from("Failed to count questions"))?;

    Ok(Json(DeletedResponse {
        success: true,
        deleted: question_id,
        total_questions,
    }))
}

/// Create a new question
#[utoipa::path(
    post,
    path = "/questions",
    tag = "Questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 200, description = "Question created", body = CreatedResponse),
        (status = 422, description = "Invalid question or store failure", body = ErrorResponse),
    )
)]
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateQuestionRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let new = request.validate()?;
    info!(category = new.category, difficulty = new.difficulty, "Creating question");

    let created = state
        .store
        .insert_question(new)
        .await
        .map_err(AppError::unprocessable_from("Failed to insert question"))?;

    let total_questions = state
        .store
        .count_questions()
        .await
        .map_err(AppError::unprocessable_from("Failed to count questions"))?;

    info!(question_id = created.id, total_questions, "Question created");

    Ok(Json(CreatedResponse {
        success: true,
        created: created.id,
        total_questions,
    }))
}

/// Search questions by case-insensitive substring
#[utoipa::path(
    post,
    path = "/questions/search",
    tag = "Questions",
    params(PageQuery),
    request_body = SearchRequest,
    responses(
        (status = 200, description = "One page of matches", body = QuestionsResponse),
        (status = 404, description = "Store failure", body = ErrorResponse),
        (status = 422, description = "Empty search term", body = ErrorResponse),
    )
)]
pub async fn search_questions(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
    ApiJson(request): ApiJson<SearchRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let term = match request.search_term {
        Some(term) if !term.is_empty() => term,
        _ => return Err(AppError::Unprocessable("Empty search term".to_string())),
    };
    info!(term = %term, "Searching questions");

    let matches = state
        .store
        .search_questions(&term)
        .await
        .map_err(AppError::not_found_from("Failed to search questions"))?;

    Ok(Json(QuestionsResponse {
        success: true,
        questions: paginate(&matches, query.page()).to_vec(),
        total_questions: matches.len() as i64,
        categories: None,
        current_category: None,
    }))
}

/// List every question in a category
#[utoipa::path(
    get,
    path = "/categories/{category_id}/questions",
    tag = "Categories",
    params(("category_id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Questions in the category", body = QuestionsResponse),
        (status = 404, description = "No such category or non-integer id", body = ErrorResponse),
        (status = 422, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn category_questions(
    State(state): State<Arc<AppState>>,
    ApiPath(raw_id): ApiPath<String>,
) -> Result<Json<QuestionsResponse>, AppError> {
    // Non-integer ids never name a category
    let category_id: i32 = raw_id
        .parse()
        .map_err(|_| AppError::NotFound(format!("Category '{}' not found", raw_id)))?;

    let category = state
        .store
        .find_category(category_id)
        .await
        .map_err(AppError::unprocessable_from("Failed to look up category"))?;
    if category.is_none() {
        return Err(AppError::NotFound(format!("Category {} not found", category_id)));
    }

    let questions = state
        .store
        .questions_in_category(category_id)
        .await
        .map_err(AppError::unprocessable_from("Failed to load category questions"))?;

    Ok(Json(QuestionsResponse {
        success: true,
        total_questions: questions.len() as i64,
        questions,
        categories: None,
        current_category: Some(category_id),
    }))
}

/// Serve a random question the player has not seen yet
#[utoipa::path(
    post,
    path = "/quizzes",
    tag = "Quiz",
    request_body = QuizRequest,
    responses(
        (status = 200, description = "Next question, or no question once exhausted", body = QuizResponse),
        (status = 422, description = "Malformed body or store failure", body = ErrorResponse),
    )
)]
pub async fn play_quiz(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<QuizRequest>,
) -> Result<Json<QuizResponse>, AppError> {
    let category_id = request
        .quiz_category
        .as_ref()
        .map_or(ALL_CATEGORIES, |c| c.id);

    let pool = if category_id == ALL_CATEGORIES {
        state.store.list_questions().await
    } else {
        state.store.questions_in_category(category_id).await
    }
    .map_err(AppError::unprocessable_from("Failed to load quiz pool"))?;

    let previous: HashSet<i32> = request.previous_questions.iter().copied().collect();
    let question = pick_question(&pool, &previous, &mut rand::thread_rng()).cloned();

    match &question {
        Some(q) => info!(
            category = category_id,
            question_id = q.id,
            previous = previous.len(),
            "Serving quiz question"
        ),
        None => info!(
            category = category_id,
            pool = pool.len(),
            "Quiz pool exhausted"
        ),
    }

    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = match state.store.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            warn!(error = %e, "Store ping failed");
            "degraded"
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend_name().to_string(),
    })
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}
