//! HTTP route definitions

use crate::api::handlers;
use crate::api::models::*;
use crate::config::CorsConfig;
use crate::store::{Category, Question};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Trivia API",
        version = "0.2.0",
        description = "Trivia question bank: categories, questions, search and quiz play.",
        license(name = "MIT"),
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        handlers::list_categories,
        handlers::category_questions,
        handlers::list_questions,
        handlers::create_question,
        handlers::delete_question,
        handlers::search_questions,
        handlers::play_quiz,
        handlers::health_check,
    ),
    components(schemas(
        Question,
        Category,
        CategoriesResponse,
        QuestionsResponse,
        CreateQuestionRequest,
        CreatedResponse,
        DeletedResponse,
        SearchRequest,
        QuizRequest,
        QuizCategory,
        QuizResponse,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Categories", description = "Category listing and filtering"),
        (name = "Questions", description = "Question listing, creation, deletion and search"),
        (name = "Quiz", description = "Quiz play"),
        (name = "Health", description = "Health and monitoring endpoints"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub async fn create_router(state: Arc<crate::AppState>) -> Router {
    let (cors, request_timeout) = {
        let config = state.settings.read().await;
        (
            config.cors.clone(),
            Duration::from_secs(config.server.request_timeout_secs),
        )
    };

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/categories", get(handlers::list_categories))
        .route(
            "/categories/:category_id/questions",
            get(handlers::category_questions),
        )
        .route(
            "/questions",
            get(handlers::list_questions).post(handlers::create_question),
        )
        .route("/questions/search", post(handlers::search_questions))
        .route("/questions/:question_id", delete(handlers::delete_question))
        .route("/quizzes", post(handlers::play_quiz))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout));

    let router = if cors.enabled {
        router.layer(cors_layer(&cors))
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

/// Build the CORS layer; `*` in the origin list allows any origin
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
