//! # routes::params
//!
//! Operator endpoints — cost parameters and manual quote overrides.
//!
//! | Method | Path                               | Description                      |
//! |--------|------------------------------------|----------------------------------|
//! | GET    | `/api/params`                      | Current ArbitrageParameters      |
//! | PUT    | `/api/params`                      | Replace params (validated)       |
//! | POST   | `/api/params/override`             | Set a manual quote override      |
//! | DELETE | `/api/params/override/:instrument` | Clear one override               |

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::error::AppError;
use crate::events::WsEvent;
use crate::models::{ArbitrageParameters, Instrument};
use crate::refresh::signal_from_quotes;
use crate::state::SharedState;

/// GET /api/params — the current cost structure.
pub async fn get_params(State(state): State<SharedState>) -> impl IntoResponse {
    let params = state.current_params().await;
    Json(json!({ "ok": true, "params": params }))
}

/// PUT /api/params — replace the cost structure whole.
///
/// The payload is validated before it is stored, and the signal is
/// recomputed against the latest snapshot immediately so the response (and
/// the broadcast) already reflect the new costs.
pub async fn set_params(
    State(state): State<SharedState>,
    Json(params): Json<ArbitrageParameters>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    {
        let mut guard = state.params.write().await;
        *guard = params;
    }

    info!(?params, "arbitrage parameters updated");
    state.broadcast(&WsEvent::ParamsUpdated { params });

    let signal = {
        let snapshot = state.snapshot.read().await;
        snapshot
            .as_ref()
            .map(|s| signal_from_quotes(&s.quotes, &params))
    };

    Ok(Json(json!({ "ok": true, "params": params, "signal": signal })))
}

// ─── Manual overrides ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OverrideBody {
    /// Instrument code, e.g. `"TTF"` or `"HH"`.
    pub instrument: String,
    /// Substitute price in the instrument's native unit.
    pub value: f64,
}

/// POST /api/params/override — set an operator substitute for a missing
/// market quote. Takes effect on the next refresh cycle and stays tagged as
/// `ManualOverride` end to end.
pub async fn set_override(
    State(state): State<SharedState>,
    Json(body): Json<OverrideBody>,
) -> Result<impl IntoResponse, AppError> {
    let instrument = Instrument::from_code(&body.instrument)
        .ok_or_else(|| AppError::BadRequest(format!("unknown instrument '{}'", body.instrument)))?;

    if !body.value.is_finite() || body.value <= 0.0 {
        return Err(AppError::BadRequest(format!(
            "override value must be a positive price (got {})",
            body.value
        )));
    }

    {
        let mut overrides = state.overrides.write().await;
        overrides.insert(instrument, body.value);
    }

    info!(%instrument, value = body.value, "manual override set");
    state.broadcast(&WsEvent::OverrideChanged {
        instrument: instrument.label().to_string(),
        value: Some(body.value),
    });

    Ok(Json(json!({
        "ok":         true,
        "instrument": instrument,
        "value":      body.value,
        "note":       "applies when the market quote is missing, from the next refresh",
    })))
}

/// DELETE /api/params/override/:instrument — clear one override.
pub async fn clear_override(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let instrument = Instrument::from_code(&code)
        .ok_or_else(|| AppError::BadRequest(format!("unknown instrument '{code}'")))?;

    let removed = {
        let mut overrides = state.overrides.write().await;
        overrides.remove(&instrument)
    };

    if removed.is_none() {
        return Err(AppError::NotFound(format!("no override set for {instrument}")));
    }

    info!(%instrument, "manual override cleared");
    state.broadcast(&WsEvent::OverrideChanged {
        instrument: instrument.label().to_string(),
        value: None,
    });

    Ok(Json(json!({ "ok": true, "instrument": instrument })))
}
