//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the bookwise
//! API. It maps engine errors to appropriate HTTP status codes and JSON
//! error responses, ensuring a consistent error handling experience across
//! the entire API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bookwise_core::errors::EngineError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps `EngineError` instances and implements `IntoResponse` to
/// convert them into HTTP responses with appropriate status codes and JSON
/// payloads.
#[derive(Debug)]
pub struct AppError(pub EngineError);

/// Converts application errors to HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::Conflict(_) => StatusCode::CONFLICT,
            EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Allows using the `?` operator with functions that return
/// `Result<T, EngineError>` in handlers returning `Result<T, AppError>`.
impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError(err)
    }
}

/// Allows using the `?` operator with repository functions returning
/// `Result<T, eyre::Report>`; the report is wrapped as a database error.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(EngineError::Database(err))
    }
}
