//! # error
//!
//! Centralised application error type.
//!
//! Every handler returns `Result<_, AppError>`. Axum's `IntoResponse` impl
//! converts these into structured JSON error bodies so the dashboard frontend
//! always gets a machine-readable response even on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::EngineError;
use crate::models::ParamsError;

#[derive(Debug, Error)]
pub enum AppError {
    /// The request payload was syntactically correct but semantically invalid.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The requested resource (e.g. a snapshot before the first refresh) does
    /// not exist yet.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operator-supplied parameters violate an invariant.
    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] ParamsError),

    /// The core refused to compute — missing data, unsupported unit, short
    /// history. Carries the typed kind through to the response body.
    #[error("Computation unavailable: {0}")]
    Engine(#[from] EngineError),

    /// Catch-all for unexpected failures.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidParams(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            AppError::Engine(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {err}"),
            ),
        };

        let kind = match &self {
            AppError::Engine(err) => Some(err.kind()),
            _ => None,
        };

        let body = Json(json!({
            "ok":    false,
            "error": message,
            "kind":  kind,
        }));

        (status, body).into_response()
    }
}
