//! # models::storage
//!
//! Defines [`StorageReading`] — one inventory observation for a regional gas
//! storage system. Readings are fetched fresh each cycle and only ever
//! consumed as a newest-first history slice by the year-over-year comparator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Region ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    /// Lower-48 working gas (EIA weekly survey).
    Us,
    /// EU aggregate fill level (AGSI+ daily).
    Eu,
}

impl Region {
    /// Reporting cadence of this region's source.
    pub fn cadence(&self) -> Cadence {
        match self {
            Region::Us => Cadence::Weekly,
            Region::Eu => Cadence::Daily,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Us => "US Lower 48",
            Region::Eu => "EU aggregate",
        }
    }
}

/// How often the source publishes a reading. Decides which year-ago matching
/// rule the comparator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cadence {
    Weekly,
    Daily,
}

// ─── StorageUnit ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageUnit {
    /// Billion cubic feet (EIA).
    Bcf,
    /// Percent of technical capacity filled (AGSI+).
    PercentFull,
}

impl std::fmt::Display for StorageUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StorageUnit::Bcf => "Bcf",
            StorageUnit::PercentFull => "% full",
        };
        f.write_str(s)
    }
}

// ─── StorageReading ───────────────────────────────────────────────────────────

/// One inventory observation.
///
/// `prior_year_value` is only populated when the source itself reports a
/// year-ago figure; when it is `None` the comparator derives the match from
/// the history slice instead — and refuses entirely if the lookback
/// requirement is not met.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageReading {
    pub region: Region,
    pub current_value: f64,
    /// Previous period's level (last week / yesterday), for the delta widget.
    pub prior_period_value: f64,
    /// Same-period-prior-year level, if the source reports one directly.
    pub prior_year_value: Option<f64>,
    pub unit: StorageUnit,
    /// Human-readable period, e.g. `"Week ending 2026-08-14"`.
    pub period_label: String,
    /// Last calendar day covered by this reading. Drives the daily-cadence
    /// year-ago tolerance match.
    pub period_end: NaiveDate,
}
