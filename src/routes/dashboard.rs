//! # routes::dashboard
//!
//! Read endpoints for the dashboard frontend.
//!
//! | Method    | Path                       | Description                         |
//! |-----------|----------------------------|-------------------------------------|
//! | GET (WS)  | `/ws/dashboard`            | WebSocket real-time event stream    |
//! | GET       | `/api/dashboard/snapshot`  | Latest full snapshot                |
//! | GET       | `/api/dashboard/arbitrage` | Signal recomputed with live params  |
//! | GET       | `/api/dashboard/storage`   | Per-region YoY outlooks             |
//! | GET       | `/api/dashboard/news`      | Headlines + sentiment               |
//! | GET       | `/api/dashboard/stats`     | refresh_count, uptime               |
//! | GET       | `/api/health`              | Liveness                            |

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::atomic::Ordering;
use tracing::{debug, info};

use crate::error::AppError;
use crate::events::WsEvent;
use crate::refresh::signal_from_quotes;
use crate::state::SharedState;

// ─── WebSocket Handler ────────────────────────────────────────────────────────

/// Upgrade HTTP → WebSocket, send the current snapshot immediately, then
/// relay every broadcast event as a JSON text frame.
pub async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    let mut rx = state.broadcast_tx.subscribe();
    let (mut sender, mut receiver) = socket.split();

    info!("websocket client connected");

    // Send the current snapshot right away so the client has something to
    // render before the next refresh cycle lands.
    let initial = {
        let snapshot = state.snapshot.read().await;
        json!({
            "event":    "SNAPSHOT",
            "snapshot": *snapshot,
        })
        .to_string()
    };

    if sender.send(Message::Text(initial.into())).await.is_err() {
        return; // Client closed before the snapshot went out.
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(json_str) => {
                        if sender.send(Message::Text(json_str.into())).await.is_err() {
                            break; // Client disconnect
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!("ws client lagged, skipped {n} events");
                    }
                    Err(_) => break, // Channel closed
                }
            }

            result = receiver.next() => {
                match result {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    _ => {} // Text/Binary from client — ignored
                }
            }
        }
    }

    info!("websocket client disconnected");
}

// ─── REST Endpoints ───────────────────────────────────────────────────────────

/// GET /api/dashboard/snapshot — the latest full snapshot.
pub async fn get_snapshot(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.snapshot.read().await;
    let snapshot = snapshot
        .as_ref()
        .ok_or_else(|| AppError::NotFound("no snapshot yet — first refresh pending".into()))?;

    Ok(Json(json!({ "ok": true, "snapshot": snapshot })))
}

/// GET /api/dashboard/arbitrage — signal recomputed against the *current*
/// parameters, so a params change reflects here before the next fetch cycle.
pub async fn get_arbitrage(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let params = state.current_params().await;
    let snapshot = state.snapshot.read().await;
    let snapshot = snapshot
        .as_ref()
        .ok_or_else(|| AppError::NotFound("no snapshot yet — first refresh pending".into()))?;

    let signal = signal_from_quotes(&snapshot.quotes, &params);
    Ok(Json(json!({ "ok": true, "params": params, "signal": signal })))
}

/// GET /api/dashboard/storage — per-region outlooks from the latest cycle.
pub async fn get_storage(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.snapshot.read().await;
    let snapshot = snapshot
        .as_ref()
        .ok_or_else(|| AppError::NotFound("no snapshot yet — first refresh pending".into()))?;

    Ok(Json(json!({ "ok": true, "storage": snapshot.storage })))
}

/// GET /api/dashboard/news — headlines with sentiment where available.
pub async fn get_news(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.snapshot.read().await;
    let snapshot = snapshot
        .as_ref()
        .ok_or_else(|| AppError::NotFound("no snapshot yet — first refresh pending".into()))?;

    Ok(Json(json!({ "ok": true, "count": snapshot.news.len(), "news": snapshot.news })))
}

/// GET /api/dashboard/stats — server statistics.
pub async fn get_stats(State(state): State<SharedState>) -> impl IntoResponse {
    let refresh_count = state.refresh_count.load(Ordering::Relaxed);
    let uptime_secs = (chrono::Utc::now() - state.started_at).num_seconds();
    let has_snapshot = state.snapshot.read().await.is_some();

    state.broadcast(&WsEvent::ServerStats { refresh_count, uptime_secs, has_snapshot });

    Json(json!({
        "ok":            true,
        "refresh_count": refresh_count,
        "uptime_secs":   uptime_secs,
        "has_snapshot":  has_snapshot,
    }))
}

/// GET /api/health — liveness probe, exempt from auth.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "ok": true, "service": "netback" }))
}
