//! API error types.
//!
//! Absence of data is never an error on the search path; [`ApiError`] covers
//! lookups that miss, malformed parameters, and unexpected failures. Upload
//! validation problems are not errors either: they are returned as
//! [`ValidationErrors`] inside a success response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<crowdseq_core::CoreError> for ApiError {
    fn from(err: crowdseq_core::CoreError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<crowdseq_import::ImportError> for ApiError {
    fn from(err: crowdseq_import::ImportError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": detail }))).into_response()
            }
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
            }
            ApiError::Internal(err) => {
                let reference = Uuid::new_v4();
                error!(%reference, error = ?err, "unhandled request failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "detail": "internal server error",
                        "reference": reference,
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Field-level validation errors, `{"errors": {"<field>": ["..."]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn field(name: &'static str, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(name, vec![message.into()]);
        Self { errors }
    }
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
