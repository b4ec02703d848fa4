//! Application error types and their HTTP mapping

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::models::ErrorResponse;
use crate::store::StoreError;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the HTTP layer.
///
/// Only the status code and a fixed message reach the client; the
/// attached detail is logged.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "Resource Not Found",
            AppError::Unprocessable(_) => "Unprocessable Entity",
            AppError::Config(_) => "Internal Server Error",
        }
    }

    /// Build a closure that logs a store error and converts it to `NotFound`
    pub fn not_found_from(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |e| {
            error!(error = %e, "{}", context);
            AppError::NotFound(context.to_string())
        }
    }

    /// Build a closure that logs a store error and converts it to `Unprocessable`
    pub fn unprocessable_from(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |e| {
            error!(error = %e, "{}", context);
            AppError::Unprocessable(context.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            success: false,
            error: status.as_u16(),
            message: self.public_message().to_string(),
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Unprocessable(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Unprocessable(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Unprocessable(format!("Invalid query string: {}", rejection.body_text()))
    }
}
