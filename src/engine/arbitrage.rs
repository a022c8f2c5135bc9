//! # engine::arbitrage
//!
//! **Arbitrage Signal Engine** — decides whether moving one MMBtu of gas from
//! the origin hub to the destination market is profitable, and by how much.
//!
//! ## Calculation
//! ```text
//! origin_cost      = origin_price × origin_multiplier + liquefaction + freight
//! destination_net  = normalized_destination_price − sales_discount
//! net_spread       = destination_net − origin_cost
//! is_open          = net_spread > 0        (breakeven counts as CLOSED)
//! ```
//!
//! The full cost breakdown is retained in the result so consumers can explain
//! the number, not just display it.

use serde::{Deserialize, Serialize};

use crate::engine::{normalize_to_mmbtu, EngineError};
use crate::models::{ArbitrageParameters, PriceQuote};

// ─── Result types ─────────────────────────────────────────────────────────────

/// Per-leg cost components, all USD/MMBtu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Freight from origin terminal to destination terminal.
    pub transport: f64,
    /// Liquefaction tolling fee.
    pub processing: f64,
    /// Extra origin cost from the shrinkage multiplier:
    /// `origin_price × (origin_multiplier − 1)`.
    pub origin_premium: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageResult {
    /// Destination netback minus full origin cost, USD/MMBtu.
    pub net_spread: f64,
    /// `net_spread > 0`, strictly — a breakeven spread is not an open window.
    pub is_open: bool,
    pub origin_price_normalized: f64,
    pub destination_price_normalized: f64,
    pub cost_breakdown: CostBreakdown,
}

// ─── Engine ───────────────────────────────────────────────────────────────────

/// Compute the netback signal for one origin/destination quote pair.
///
/// Both quotes must carry a usable value; a `Missing` quote on either side
/// yields [`EngineError::DataUnavailable`] — the engine never substitutes
/// zero or a stale number to keep a widget populated. Pure and deterministic:
/// same inputs, same output, no side effects.
pub fn compute_signal(
    origin: &PriceQuote,
    destination: &PriceQuote,
    params: &ArbitrageParameters,
) -> Result<ArbitrageResult, EngineError> {
    let origin_raw = origin
        .value
        .numeric()
        .ok_or(EngineError::DataUnavailable { instrument: origin.instrument })?;
    let destination_raw = destination
        .value
        .numeric()
        .ok_or(EngineError::DataUnavailable { instrument: destination.instrument })?;

    let origin_price = normalize_to_mmbtu(origin_raw, origin.unit, params)?;
    let destination_price = normalize_to_mmbtu(destination_raw, destination.unit, params)?;

    let origin_premium = origin_price * (params.origin_multiplier - 1.0);
    let origin_cost = origin_price * params.origin_multiplier
        + params.liquefaction_cost
        + params.freight_cost;
    let destination_net = destination_price - params.sales_discount;
    let net_spread = destination_net - origin_cost;

    Ok(ArbitrageResult {
        net_spread,
        is_open: net_spread > 0.0,
        origin_price_normalized: origin_price,
        destination_price_normalized: destination_price,
        cost_breakdown: CostBreakdown {
            transport: params.freight_cost,
            processing: params.liquefaction_cost,
            origin_premium,
        },
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::{Instrument, PriceUnit, QuoteValue};

    fn quote(instrument: Instrument, value: QuoteValue) -> PriceQuote {
        PriceQuote {
            instrument,
            value,
            unit: instrument.native_unit(),
            prev_close: None,
            as_of: Utc::now(),
        }
    }

    fn hh(price: f64) -> PriceQuote {
        quote(Instrument::HenryHub, QuoteValue::Fetched(price))
    }

    fn ttf(price: f64) -> PriceQuote {
        quote(Instrument::Ttf, QuoteValue::Fetched(price))
    }

    fn params() -> ArbitrageParameters {
        // Scenario defaults: freight 0.8, liquefaction 3.0, fx 1.05,
        // factor 1/3.412, discount 1.0, multiplier 1.15.
        ArbitrageParameters::default()
    }

    #[test]
    fn test_open_window() {
        // HH 2.80, TTF 30 EUR/MWh → dest ≈ 9.232, origin cost 7.02,
        // net ≈ 9.232 − 1.0 − 7.02 = 1.212 → open.
        let result = compute_signal(&hh(2.80), &ttf(30.0), &params()).unwrap();
        assert!(result.is_open);
        assert!((result.net_spread - 1.212).abs() < 1e-2);
        assert!((result.origin_price_normalized - 2.80).abs() < 1e-12);
        assert!((result.destination_price_normalized - 9.232).abs() < 1e-3);
    }

    #[test]
    fn test_high_freight_closes_window() {
        // Same as above but freight 3.0 → origin cost 9.22, net ≈ −0.988.
        let p = ArbitrageParameters { freight_cost: 3.0, ..params() };
        let result = compute_signal(&hh(2.80), &ttf(30.0), &p).unwrap();
        assert!(!result.is_open);
        assert!((result.net_spread + 0.988).abs() < 1e-2);
    }

    #[test]
    fn test_missing_origin_is_data_unavailable() {
        let origin = quote(Instrument::HenryHub, QuoteValue::Missing);
        let err = compute_signal(&origin, &ttf(30.0), &params()).unwrap_err();
        assert_eq!(err, EngineError::DataUnavailable { instrument: Instrument::HenryHub });
    }

    #[test]
    fn test_missing_destination_is_data_unavailable() {
        let destination = quote(Instrument::Ttf, QuoteValue::Missing);
        let err = compute_signal(&hh(2.80), &destination, &params()).unwrap_err();
        assert_eq!(err, EngineError::DataUnavailable { instrument: Instrument::Ttf });
    }

    #[test]
    fn test_manual_override_is_usable() {
        let destination = quote(Instrument::Ttf, QuoteValue::ManualOverride(30.0));
        let result = compute_signal(&hh(2.80), &destination, &params()).unwrap();
        assert!(result.is_open);
    }

    #[test]
    fn test_breakeven_classifies_as_closed() {
        // Pick an origin price that makes net_spread exactly zero:
        // dest_net = 30 * 1.05 / 3.412 − 1.0; origin solves
        // origin × 1.15 + 3.8 = dest_net.
        let dest_net = 30.0 * 1.05 / 3.412 - 1.0;
        let breakeven_origin = (dest_net - 3.8) / 1.15;
        let result = compute_signal(&hh(breakeven_origin), &ttf(30.0), &params()).unwrap();
        assert!(result.net_spread.abs() < 1e-12);
        assert!(!result.is_open);
    }

    #[test]
    fn test_is_open_matches_sign_of_spread() {
        // Threshold consistency across a sweep of origin prices.
        for cents in 0..1200 {
            let origin_price = cents as f64 / 100.0;
            let result = compute_signal(&hh(origin_price), &ttf(30.0), &params()).unwrap();
            assert_eq!(result.is_open, result.net_spread > 0.0);
        }
    }

    #[test]
    fn test_spread_decreases_as_origin_rises() {
        let p = params();
        let mut last = f64::INFINITY;
        for step in 0..50 {
            let origin_price = 1.0 + step as f64 * 0.25;
            let spread = compute_signal(&hh(origin_price), &ttf(30.0), &p).unwrap().net_spread;
            assert!(spread < last, "spread must strictly decrease in origin price");
            last = spread;
        }
    }

    #[test]
    fn test_breakdown_reconstructs_spread() {
        let result = compute_signal(&hh(2.80), &ttf(30.0), &params()).unwrap();
        let b = result.cost_breakdown;
        let rebuilt = result.destination_price_normalized
            - params().sales_discount
            - (result.origin_price_normalized + b.origin_premium + b.processing + b.transport);
        assert!((rebuilt - result.net_spread).abs() < 1e-12);
    }

    #[test]
    fn test_brent_destination_is_rejected() {
        // A mis-wired oil quote must error, not produce a bogus gas spread.
        let brent = quote(Instrument::Brent, QuoteValue::Fetched(78.0));
        let err = compute_signal(&hh(2.80), &brent, &params()).unwrap_err();
        assert_eq!(err, EngineError::UnsupportedUnit(PriceUnit::UsdPerBbl));
    }
}
