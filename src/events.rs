//! # events
//!
//! Defines [`WsEvent`] — everything the backend broadcasts to connected
//! dashboard WebSocket clients.
//!
//! Events travel through a `tokio::sync::broadcast::Sender<String>` as
//! pre-serialized JSON to avoid Clone constraints on the payload types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ArbitrageParameters, SignalOutcome};

/// Every event shape the dashboard receives in real time.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WsEvent {
    /// A refresh cycle completed; a full replacement snapshot is available.
    SnapshotUpdated {
        snapshot_id: Uuid,
        generated_at: DateTime<Utc>,
        arbitrage: SignalOutcome,
    },

    /// Operator changed the cost parameters; the signal was recomputed.
    ParamsUpdated {
        params: ArbitrageParameters,
    },

    /// Operator set or cleared a manual quote override.
    OverrideChanged {
        instrument: String,
        value: Option<f64>,
    },

    /// A refresh cycle failed outright (all sections degraded).
    RefreshFailed {
        reason: String,
    },

    /// Server stats, sent whenever the stats endpoint is polled.
    ServerStats {
        refresh_count: u64,
        uptime_secs: i64,
        has_snapshot: bool,
    },
}

impl WsEvent {
    /// Serialize for the broadcast channel.
    #[inline]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"event":"SERIALIZATION_ERROR"}"#.to_string())
    }
}
