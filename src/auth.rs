//! # auth — API Key Middleware
//!
//! Protects the mutating endpoints (parameter updates, overrides) with an
//! `X-API-Key` header.
//!
//! ## Mode
//! - `API_KEY` unset (or empty) → **Allow All** (dev mode)
//! - `API_KEY` set → every non-GET request must send `X-API-Key: <key>`
//!
//! Read endpoints and WebSocket upgrades stay open: the dashboard is a
//! viewer, only operators change the cost model.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

/// Axum middleware — checks `X-API-Key` on mutating requests.
pub async fn require_api_key(request: Request<Body>, next: Next) -> Response {
    let api_key_env = std::env::var("API_KEY").unwrap_or_default();

    // Dev mode: no API_KEY → pass everything through.
    if api_key_env.is_empty() {
        return next.run(request).await;
    }

    // Reads are public; only state changes need the key.
    if request.method() == Method::GET {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if provided == api_key_env {
        next.run(request).await
    } else {
        warn!(path = request.uri().path(), "unauthorized request — invalid or missing X-API-Key");
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "ok":    false,
                "error": "Unauthorized: invalid or missing X-API-Key header",
            })),
        )
            .into_response()
    }
}
