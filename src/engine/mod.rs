//! # engine
//!
//! The deterministic core: unit normalization, the netback arbitrage signal,
//! and the storage year-over-year comparator.
//!
//! Everything in here is pure, synchronous arithmetic over plain values —
//! no I/O, no shared state, no retries. The fetch layer hands in already
//! resolved quotes and readings; on bad input the engine returns a typed
//! [`EngineError`] instead of fabricating a number.

pub mod arbitrage;
pub mod normalize;
pub mod storage;

pub use arbitrage::{compute_signal, ArbitrageResult, CostBreakdown};
pub use normalize::normalize_to_mmbtu;
pub use storage::{year_over_year, YoyComparison};

use thiserror::Error;

use crate::models::{Instrument, PriceUnit};

// ─── EngineError ──────────────────────────────────────────────────────────────

/// Every way a core computation can refuse to produce a number.
///
/// The engine never catches-and-hides: each failure propagates to the caller
/// as one of these, and each computation is independent — a missing JKM
/// quote must not block the HH/TTF spread.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The normalizer was handed a unit it cannot express in USD/MMBtu.
    /// Callers must not silently default.
    #[error("cannot normalize {0} to USD/MMBtu")]
    UnsupportedUnit(PriceUnit),

    /// A required price input is missing or invalid. The engine refuses to
    /// substitute zero or a stale value.
    #[error("no usable quote for {instrument}")]
    DataUnavailable { instrument: Instrument },

    /// The storage history is too short (or has no entry inside the
    /// tolerance window) for a year-ago match.
    #[error("insufficient history: need {required} periods, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// The year-ago inventory level is zero; the percent change is reported
    /// as an error, not computed as infinity.
    #[error("prior-year value is zero; percent change undefined")]
    DivisionByZero,
}

impl EngineError {
    /// Stable machine-readable tag, used by the API layer so the frontend
    /// can pick a rendering per failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::UnsupportedUnit(_) => "UNSUPPORTED_UNIT",
            EngineError::DataUnavailable { .. } => "DATA_UNAVAILABLE",
            EngineError::InsufficientHistory { .. } => "INSUFFICIENT_HISTORY",
            EngineError::DivisionByZero => "DIVISION_BY_ZERO",
        }
    }
}
