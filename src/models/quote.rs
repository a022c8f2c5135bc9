//! # models::quote
//!
//! Defines [`PriceQuote`] — one instrument's latest price as fetched from the
//! quote source, plus the [`QuoteValue`] tagged variant that distinguishes
//! "no data" from "operator-supplied substitute".
//!
//! Quotes are ephemeral: rebuilt from scratch on every refresh cycle,
//! immutable once constructed, discarded when the next snapshot replaces them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Instrument ───────────────────────────────────────────────────────────────

/// The fixed set of benchmark instruments the dashboard tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Instrument {
    /// Henry Hub — US natural gas benchmark, USD/MMBtu.
    HenryHub,
    /// Dutch TTF — EU gas benchmark, EUR/MWh.
    Ttf,
    /// Japan-Korea Marker — Asian LNG spot benchmark, USD/MMBtu.
    Jkm,
    /// Brent crude — oil context only, USD/bbl. Never enters the spread.
    Brent,
}

impl Instrument {
    pub const ALL: [Instrument; 4] = [
        Instrument::HenryHub,
        Instrument::Ttf,
        Instrument::Jkm,
        Instrument::Brent,
    ];

    /// Yahoo Finance ticker for this instrument.
    pub fn ticker(&self) -> &'static str {
        match self {
            Instrument::HenryHub => "NG=F",
            Instrument::Ttf => "TTF=F",
            Instrument::Jkm => "JKM=F",
            Instrument::Brent => "BZ=F",
        }
    }

    /// The unit the quote source publishes this instrument in.
    pub fn native_unit(&self) -> PriceUnit {
        match self {
            Instrument::HenryHub | Instrument::Jkm => PriceUnit::UsdPerMmbtu,
            Instrument::Ttf => PriceUnit::EurPerMwh,
            Instrument::Brent => PriceUnit::UsdPerBbl,
        }
    }

    /// Display label used by the dashboard frontend.
    pub fn label(&self) -> &'static str {
        match self {
            Instrument::HenryHub => "Henry Hub",
            Instrument::Ttf => "Dutch TTF",
            Instrument::Jkm => "JKM",
            Instrument::Brent => "Brent",
        }
    }

    /// Parse the path-segment form used by the override API, e.g. `"TTF"`.
    pub fn from_code(code: &str) -> Option<Instrument> {
        match code.to_ascii_uppercase().as_str() {
            "HH" | "HENRY_HUB" => Some(Instrument::HenryHub),
            "TTF" => Some(Instrument::Ttf),
            "JKM" => Some(Instrument::Jkm),
            "BRENT" => Some(Instrument::Brent),
            _ => None,
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─── PriceUnit ────────────────────────────────────────────────────────────────

/// Quote unit as published by the source market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceUnit {
    UsdPerMmbtu,
    EurPerMwh,
    UsdPerBbl,
}

impl std::fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PriceUnit::UsdPerMmbtu => "USD/MMBtu",
            PriceUnit::EurPerMwh => "EUR/MWh",
            PriceUnit::UsdPerBbl => "USD/bbl",
        };
        f.write_str(s)
    }
}

// ─── QuoteValue ───────────────────────────────────────────────────────────────

/// Where a quote's number came from — or that there is none.
///
/// A missing market quote is `Missing`, never `0.0` or a stale cached value,
/// so downstream arithmetic can refuse to run instead of producing a
/// misleading signal. An operator can substitute a value via the override
/// API; that substitution stays visibly tagged as `ManualOverride` all the
/// way to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteValue {
    Fetched(f64),
    ManualOverride(f64),
    Missing,
}

impl QuoteValue {
    /// The numeric value, if any. `Missing` yields `None`.
    #[inline]
    pub fn numeric(&self) -> Option<f64> {
        match self {
            QuoteValue::Fetched(v) | QuoteValue::ManualOverride(v) => Some(*v),
            QuoteValue::Missing => None,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, QuoteValue::Missing)
    }
}

// ─── PriceQuote ───────────────────────────────────────────────────────────────

/// One instrument's latest quote for a single refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub instrument: Instrument,
    pub value: QuoteValue,
    pub unit: PriceUnit,
    /// Previous close, for the day-over-day delta shown next to the metric.
    pub prev_close: Option<f64>,
    /// UTC timestamp when the source produced this quote.
    pub as_of: DateTime<Utc>,
}

impl PriceQuote {
    pub fn missing(instrument: Instrument) -> Self {
        Self {
            instrument,
            value: QuoteValue::Missing,
            unit: instrument.native_unit(),
            prev_close: None,
            as_of: Utc::now(),
        }
    }

    /// Day-over-day change, when both ends exist.
    pub fn delta(&self) -> Option<f64> {
        Some(self.value.numeric()? - self.prev_close?)
    }
}

// ─── PriceSeries ──────────────────────────────────────────────────────────────

/// Daily close history for the chart widget, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub instrument: Instrument,
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricePoint {
    pub at: DateTime<Utc>,
    pub close: f64,
}
