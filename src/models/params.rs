//! # models::params
//!
//! Defines [`ArbitrageParameters`] — the operator-tunable cost structure for
//! the netback calculation.
//!
//! This is an explicit value object passed into every engine call, never a
//! process-wide singleton: the API layer holds the current set in shared
//! state, but the engine only ever sees a borrowed copy, which keeps it
//! trivially testable with arbitrary combinations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cost structure and conversion constants for the HH → TTF netback.
///
/// Unit convention: `conversion_factor` is **MWh per MMBtu** (physically
/// 1 MWh ≈ 3.412 MMBtu, so the factor is 1/3.412 ≈ 0.2931). A destination
/// price in EUR/MWh becomes USD/MMBtu via
/// `raw * fx_rate * conversion_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageParameters {
    /// Shipping cost, USD/MMBtu. Operator slider range 0.2–3.0.
    pub freight_cost: f64,
    /// Liquefaction tolling fee, USD/MMBtu.
    pub liquefaction_cost: f64,
    /// USD per 1 EUR.
    pub fx_rate: f64,
    /// MWh per MMBtu (see struct docs).
    pub conversion_factor: f64,
    /// Basis / handling deduction at the receiving terminal, USD/MMBtu.
    pub sales_discount: f64,
    /// Upstream shrinkage and fuel-use loss factor applied to the origin
    /// purchase price. 1.15 means 15% of the gas is consumed in the process.
    pub origin_multiplier: f64,
}

impl Default for ArbitrageParameters {
    fn default() -> Self {
        Self {
            freight_cost: 0.8,
            liquefaction_cost: 3.0,
            fx_rate: 1.05,
            conversion_factor: 1.0 / 3.412,
            sales_discount: 1.0,
            origin_multiplier: 1.15,
        }
    }
}

// ─── Validation ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("{field} must be non-negative (got {value})")]
    Negative { field: &'static str, value: String },

    #[error("{field} must be strictly positive (got {value})")]
    NotPositive { field: &'static str, value: String },

    #[error("origin_multiplier must be >= 1 (got {value})")]
    MultiplierBelowOne { value: String },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

impl ArbitrageParameters {
    /// Check the invariants: cost terms non-negative, divisors strictly
    /// positive, multiplier at least 1. Called on every API update so a bad
    /// payload can never reach the engine.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let fields = [
            ("freight_cost", self.freight_cost),
            ("liquefaction_cost", self.liquefaction_cost),
            ("fx_rate", self.fx_rate),
            ("conversion_factor", self.conversion_factor),
            ("sales_discount", self.sales_discount),
            ("origin_multiplier", self.origin_multiplier),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite { field });
            }
        }

        for (field, value) in [
            ("freight_cost", self.freight_cost),
            ("liquefaction_cost", self.liquefaction_cost),
            ("sales_discount", self.sales_discount),
        ] {
            if value < 0.0 {
                return Err(ParamsError::Negative { field, value: value.to_string() });
            }
        }

        for (field, value) in [
            ("fx_rate", self.fx_rate),
            ("conversion_factor", self.conversion_factor),
        ] {
            if value <= 0.0 {
                return Err(ParamsError::NotPositive { field, value: value.to_string() });
            }
        }

        if self.origin_multiplier < 1.0 {
            return Err(ParamsError::MultiplierBelowOne {
                value: self.origin_multiplier.to_string(),
            });
        }

        Ok(())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ArbitrageParameters::default().validate().is_ok());
    }

    #[test]
    fn test_negative_freight_rejected() {
        let params = ArbitrageParameters { freight_cost: -0.1, ..Default::default() };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::Negative { field: "freight_cost", .. })
        ));
    }

    #[test]
    fn test_zero_fx_rate_rejected() {
        let params = ArbitrageParameters { fx_rate: 0.0, ..Default::default() };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::NotPositive { field: "fx_rate", .. })
        ));
    }

    #[test]
    fn test_zero_conversion_factor_rejected() {
        let params = ArbitrageParameters { conversion_factor: 0.0, ..Default::default() };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::NotPositive { field: "conversion_factor", .. })
        ));
    }

    #[test]
    fn test_multiplier_below_one_rejected() {
        let params = ArbitrageParameters { origin_multiplier: 0.95, ..Default::default() };
        assert!(matches!(params.validate(), Err(ParamsError::MultiplierBelowOne { .. })));
    }

    #[test]
    fn test_nan_rejected() {
        let params = ArbitrageParameters { fx_rate: f64::NAN, ..Default::default() };
        assert!(matches!(params.validate(), Err(ParamsError::NotFinite { field: "fx_rate" })));
    }
}
