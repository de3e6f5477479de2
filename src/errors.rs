// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every failure that can reach a caller of the service.
/// Cache problems never show up here, they are absorbed by the cache layer.
#[derive(Error, Debug)]
pub enum QEatsError {
    /// The source-of-truth could not answer; the query cannot be served
    #[error("Restaurant store error: {0}")]
    SourceFetch(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    /// One search group failed; recorded by the aggregator, never returned
    /// while another group still produced a result
    #[error("Sub-search '{category}' failed: {message}")]
    SubSearch { category: String, message: String },
}

/// Convert QEatsError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for QEatsError {
    fn error_response(&self) -> HttpResponse {
        let error_code = match self {
            QEatsError::SourceFetch(_) => "SOURCE_UNAVAILABLE",
            QEatsError::ValidationError(_) => "VALIDATION_ERROR",
            QEatsError::Unauthorized => "UNAUTHORIZED",
            QEatsError::Forbidden => "FORBIDDEN",
            QEatsError::SubSearch { .. } => "SEARCH_FAILED",
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            QEatsError::SourceFetch(_) => StatusCode::SERVICE_UNAVAILABLE,
            QEatsError::ValidationError(_) => StatusCode::BAD_REQUEST,
            QEatsError::Unauthorized => StatusCode::UNAUTHORIZED,
            QEatsError::Forbidden => StatusCode::FORBIDDEN,
            QEatsError::SubSearch { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Cache backend failures
/// DOCUMENTATION: Always recovered inside the cache layer by falling back
/// to the restaurant store
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend closed or unreachable; skip the write-back as well
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Stored payload could not be decoded; handled like a miss
    #[error("Cache payload unreadable: {0}")]
    Deserialize(String),

    #[error("Cache backend error: {0}")]
    #[allow(dead_code)]
    Backend(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Deserialize(e.to_string())
    }
}
