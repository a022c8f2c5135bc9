//! # engine::normalize
//!
//! Unit normalizer — brings a destination-market price quoted in its local
//! unit onto the origin basis (USD/MMBtu) so that a spread between the two
//! is economically meaningful.
//!
//! ## Convention
//!
//! `conversion_factor` is **MWh per MMBtu** (1 MWh ≈ 3.412 MMBtu, so the
//! factor is 1/3.412 ≈ 0.2931):
//!
//! ```text
//! USD/MMBtu = EUR/MWh × fx_rate (USD per EUR) × conversion_factor (MWh per MMBtu)
//! ```
//!
//! USD/bbl is deliberately not convertible here: an oil barrel is not a gas
//! delivery basis, and Brent exists on the dashboard as context only. Handing
//! it to the normalizer is a wiring bug and surfaces as
//! [`EngineError::UnsupportedUnit`] rather than a silent default.

use crate::engine::EngineError;
use crate::models::{ArbitrageParameters, PriceUnit};

/// Convert `raw` quoted in `unit` into USD/MMBtu.
///
/// Referentially transparent: the result depends only on the three inputs.
pub fn normalize_to_mmbtu(
    raw: f64,
    unit: PriceUnit,
    params: &ArbitrageParameters,
) -> Result<f64, EngineError> {
    match unit {
        PriceUnit::UsdPerMmbtu => Ok(raw),
        PriceUnit::EurPerMwh => Ok(raw * params.fx_rate * params.conversion_factor),
        PriceUnit::UsdPerBbl => Err(EngineError::UnsupportedUnit(unit)),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArbitrageParameters;

    fn params() -> ArbitrageParameters {
        ArbitrageParameters::default()
    }

    #[test]
    fn test_usd_mmbtu_is_identity() {
        let out = normalize_to_mmbtu(2.80, PriceUnit::UsdPerMmbtu, &params()).unwrap();
        assert_eq!(out, 2.80);
    }

    #[test]
    fn test_eur_mwh_conversion() {
        // 30 EUR/MWh at fx 1.05 → 30 * 1.05 / 3.412 ≈ 9.2321 USD/MMBtu
        let out = normalize_to_mmbtu(30.0, PriceUnit::EurPerMwh, &params()).unwrap();
        assert!((out - 30.0 * 1.05 / 3.412).abs() < 1e-12);
        assert!((out - 9.232).abs() < 1e-3);
    }

    #[test]
    fn test_round_trip_recovers_original() {
        // Normalize then invert with the same factors; 1e-9 relative tolerance.
        let p = params();
        let raw = 41.37;
        let normalized = normalize_to_mmbtu(raw, PriceUnit::EurPerMwh, &p).unwrap();
        let recovered = normalized / (p.fx_rate * p.conversion_factor);
        assert!(((recovered - raw) / raw).abs() < 1e-9);
    }

    #[test]
    fn test_usd_bbl_is_unsupported() {
        let err = normalize_to_mmbtu(78.5, PriceUnit::UsdPerBbl, &params()).unwrap_err();
        assert_eq!(err, EngineError::UnsupportedUnit(PriceUnit::UsdPerBbl));
    }
}
