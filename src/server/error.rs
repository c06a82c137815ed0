use crate::domain::error::DomainError;
use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

/// Route-level failure. Callers only ever see a generic 500 body; the domain
/// error is logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("insert failed: {0}")]
    Insert(DomainError),
    #[error("find failed: {0}")]
    Find(DomainError),
}

impl ApiError {
    fn public_message(&self) -> &'static str {
        match self {
            ApiError::Insert(_) => "Error inserting document",
            ApiError::Find(_) => "Error fetching documents",
        }
    }

    fn source_error(&self) -> &DomainError {
        match self {
            ApiError::Insert(e) | ApiError::Find(e) => e,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let source = self.source_error();
        tracing::error!(
            error = %source,
            retryable = source.is_retryable(),
            "{}",
            self.public_message()
        );
        (StatusCode::INTERNAL_SERVER_ERROR, self.public_message()).into_response()
    }
}
