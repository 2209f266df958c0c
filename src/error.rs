//! Application error taxonomy and its HTTP mapping.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// An external fetch failed or timed out; named by source.
    #[error("could not fetch data from {source_name}: {detail}")]
    SourceUnavailable { source_name: &'static str, detail: String },

    /// Bad query/parameter shape, with field-level detail.
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),

    #[error("{0}")]
    NotFound(String),

    /// A refresh is already in flight.
    #[error("{0}")]
    Conflict(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(field: &str, message: &str) -> Self {
        let mut details = BTreeMap::new();
        details.insert(field.to_string(), message.to_string());
        ApiError::Validation(details)
    }

    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{what} not found"))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return ApiError::validation("name", "Country name already exists");
            }
        }
        ApiError::Internal(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::SourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::SourceUnavailable { .. } => json!({
                "error": "External data source unavailable",
                "details": self.to_string(),
            }),
            ApiError::Validation(details) => json!({
                "error": "Validation failed",
                "details": details,
            }),
            ApiError::NotFound(msg) | ApiError::Conflict(msg) => json!({ "error": msg }),
            ApiError::Internal(_) => {
                tracing::error!(error = %self, "internal failure");
                json!({ "error": "Internal server error" })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
