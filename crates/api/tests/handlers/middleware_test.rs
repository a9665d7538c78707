use axum::response::IntoResponse;
use bookwise_api::middleware::error_handling::AppError;
use bookwise_core::errors::EngineError;

#[tokio::test]
async fn test_error_handling_not_found() {
    // Create a not found error
    let error = EngineError::NotFound("Resource not found".to_string());

    // Map the error to a response
    let response = AppError(error).into_response();

    // Assert the response has the correct status code
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_handling_validation() {
    // Create a validation error
    let error = EngineError::Validation("Invalid input".to_string());

    // Map the error to a response
    let response = AppError(error).into_response();

    // Assert the response has the correct status code
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_handling_conflict() {
    // Create a conflict error, as raised by an overlapping booking insert
    let error = EngineError::Conflict("Slot already taken".to_string());

    // Map the error to a response
    let response = AppError(error).into_response();

    // Assert the response has the correct status code
    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_database() {
    // Create a database error
    let error = EngineError::Database(eyre::eyre!("Database error"));

    // Map the error to a response
    let response = AppError(error).into_response();

    // Assert the response has the correct status code
    assert_eq!(
        response.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_error_handling_internal() {
    // Create an internal error
    let error = EngineError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    // Map the error to a response
    let response = AppError(error).into_response();

    // Assert the response has the correct status code
    assert_eq!(
        response.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_eyre_report_converts_to_database_error() {
    let report = eyre::eyre!("connection refused");
    let app_error: AppError = report.into();

    let response = app_error.into_response();
    assert_eq!(
        response.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}
