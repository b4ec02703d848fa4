//! Extractors whose rejections render as API errors

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON body; malformed or missing bodies become `422 Unprocessable Entity`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; values that fail to parse become `422 Unprocessable Entity`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string; undecodable query strings become `422 Unprocessable Entity`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
