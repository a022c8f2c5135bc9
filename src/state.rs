//! # state
//!
//! Shared application state: latest snapshot, operator parameters, manual
//! quote overrides, WebSocket broadcast channel and the shared HTTP client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};

use crate::config::Config;
use crate::models::{ArbitrageParameters, DashboardSnapshot, Instrument};

// ─── AppState ─────────────────────────────────────────────────────────────────

/// Top-level shared state injected into every axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Service settings, fixed at startup.
    pub config: Arc<Config>,

    /// Latest full-replacement snapshot.
    /// None = the first refresh cycle has not completed yet.
    pub snapshot: Arc<RwLock<Option<DashboardSnapshot>>>,

    /// Current operator-tunable cost structure. Read by every recompute,
    /// replaced whole via PUT /api/params.
    pub params: Arc<RwLock<ArbitrageParameters>>,

    /// Manual quote overrides: instrument → operator-supplied price in the
    /// instrument's native unit. Applied at fetch time as
    /// `QuoteValue::ManualOverride` so reports can tell substitute from data.
    pub overrides: Arc<RwLock<HashMap<Instrument, f64>>>,

    /// Broadcast channel feeding WebSocket clients (pre-serialized JSON).
    pub broadcast_tx: broadcast::Sender<String>,

    /// Shared reqwest client (connection pooling, one per process).
    pub http_client: reqwest::Client,

    /// Completed refresh cycles since startup.
    pub refresh_count: Arc<AtomicU64>,

    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (broadcast_tx, _) = broadcast::channel(64);

        Self {
            config: Arc::new(config),
            snapshot: Arc::new(RwLock::new(None)),
            params: Arc::new(RwLock::new(ArbitrageParameters::default())),
            overrides: Arc::new(RwLock::new(HashMap::new())),
            broadcast_tx,
            http_client: reqwest::Client::new(),
            refresh_count: Arc::new(AtomicU64::new(0)),
            started_at: Utc::now(),
        }
    }

    // ── Helper Methods ────────────────────────────────────────────────────────

    /// Broadcast an event to all WebSocket clients.
    /// Safe with zero listeners (headless mode) — the send error is ignored.
    pub fn broadcast(&self, event: &crate::events::WsEvent) {
        let _ = self.broadcast_tx.send(event.to_json());
    }

    /// Replace the snapshot and bump the cycle counter.
    pub async fn install_snapshot(&self, snapshot: DashboardSnapshot) {
        let mut guard = self.snapshot.write().await;
        *guard = Some(snapshot);
        self.refresh_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Current params, copied out so no lock is held during computation.
    pub async fn current_params(&self) -> ArbitrageParameters {
        *self.params.read().await
    }

    /// Current overrides, cloned out for the same reason.
    pub async fn current_overrides(&self) -> HashMap<Instrument, f64> {
        self.overrides.read().await.clone()
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

pub fn build_state(config: Config) -> SharedState {
    Arc::new(AppState::new(config))
}
