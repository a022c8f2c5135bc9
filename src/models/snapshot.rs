//! # models::snapshot
//!
//! Defines [`DashboardSnapshot`] — the full-replacement result of one refresh
//! cycle. The frontend never patches a previous snapshot; it always renders
//! the latest one whole ("last computed wins"), so every section carries its
//! own typed success-or-unavailable outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{ArbitrageResult, EngineError, YoyComparison};
use crate::models::quote::{PriceQuote, PriceSeries};
use crate::models::storage::{Region, StorageReading};

// ─── Signal outcome ───────────────────────────────────────────────────────────

/// The arbitrage section of a snapshot: either a computed signal or a typed
/// reason why none could be produced. The engine never fabricates a number;
/// how each failure kind renders ("N/A" vs. error banner) is the frontend's
/// call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalOutcome {
    Computed { result: ArbitrageResult },
    Unavailable { kind: String, reason: String },
}

impl SignalOutcome {
    pub fn from_result(res: Result<ArbitrageResult, EngineError>) -> Self {
        match res {
            Ok(result) => SignalOutcome::Computed { result },
            Err(err) => SignalOutcome::Unavailable {
                kind: err.kind().to_string(),
                reason: err.to_string(),
            },
        }
    }
}

// ─── Storage outlook ──────────────────────────────────────────────────────────

/// Per-region storage section: the latest reading (if any) plus the
/// year-over-year comparison or the typed reason it was refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageOutlook {
    pub region: Region,
    pub latest: Option<StorageReading>,
    pub yoy: YoyOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum YoyOutcome {
    Computed { comparison: YoyComparison },
    Unavailable { kind: String, reason: String },
}

impl YoyOutcome {
    pub fn from_result(res: Result<YoyComparison, EngineError>) -> Self {
        match res {
            Ok(comparison) => YoyOutcome::Computed { comparison },
            Err(err) => YoyOutcome::Unavailable {
                kind: err.kind().to_string(),
                reason: err.to_string(),
            },
        }
    }
}

// ─── News ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

/// Parsed AI read on a single headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSentiment {
    pub sentiment: Sentiment,
    /// Impact score 1–10 as reported by the model.
    pub score: u8,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    /// Publication date as the feed reported it (display only).
    pub published: String,
    /// None when AI analysis is disabled or failed for this headline.
    pub sentiment: Option<NewsSentiment>,
}

// ─── DashboardSnapshot ────────────────────────────────────────────────────────

/// Everything one refresh cycle produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub snapshot_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Latest quote per tracked instrument (one entry each, missing included).
    pub quotes: Vec<PriceQuote>,
    /// 30-day close history per instrument that returned data.
    pub series: Vec<PriceSeries>,
    /// HH → TTF netback signal.
    pub arbitrage: SignalOutcome,
    pub storage: Vec<StorageOutlook>,
    pub news: Vec<NewsItem>,
}
