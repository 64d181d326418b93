//! Error type shared by the document handlers.

use axum::{
    http::{header::InvalidHeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Document store error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document body must be valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Document body is empty")]
    EmptyBody,

    #[error("Document {0} not found")]
    DocumentNotFound(String),

    #[error("Cannot build response header: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl AppError {
    /// HTTP status returned for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJson(_) | AppError::EmptyBody => StatusCode::BAD_REQUEST,
            AppError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::InvalidHeader(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            // Server faults are logged in full but not echoed to clients
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ErrorBody {
                    error: "Database error".to_string(),
                    details: None,
                }
            }
            AppError::InvalidHeader(e) => {
                tracing::error!("Response header error: {}", e);
                ErrorBody {
                    error: "Internal server error".to_string(),
                    details: None,
                }
            }
            AppError::InvalidJson(e) => ErrorBody {
                error: "Document body must be valid JSON".to_string(),
                details: Some(e.to_string()),
            },
            AppError::EmptyBody | AppError::DocumentNotFound(_) => ErrorBody {
                error: self.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
