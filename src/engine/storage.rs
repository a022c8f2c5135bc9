//! # engine::storage
//!
//! Storage year-over-year comparator — contextualizes the newest inventory
//! reading against the same point one year earlier.
//!
//! ## Matching rules
//! - **Weekly** series (EIA): the year-ago entry is exactly 52 periods back,
//!   so the history must hold at least 53 entries (52 back + current).
//! - **Daily** series (AGSI+): the year-ago entry must fall within ±3 days of
//!   exactly 365 days before the newest reading. A nearest-available entry
//!   outside that window is refused, never silently substituted.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::engine::EngineError;
use crate::models::{Cadence, StorageReading, StorageUnit};

/// Weekly lookback: 52 periods back plus the current one.
const WEEKLY_REQUIRED: usize = 53;
/// Daily year-ago match tolerance, days either side of −365.
const DAILY_TOLERANCE_DAYS: i64 = 3;

// ─── YoyComparison ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoyComparison {
    pub current: f64,
    pub prior_year: f64,
    pub yoy_absolute_diff: f64,
    /// `yoy_absolute_diff / prior_year × 100`.
    pub yoy_percent_diff: f64,
    pub unit: StorageUnit,
    /// Period label of the matched year-ago reading, for display.
    pub prior_period_label: String,
}

// ─── Comparator ───────────────────────────────────────────────────────────────

/// Compare the newest reading in `history` (newest first) against its
/// year-ago match.
///
/// Returns [`EngineError::InsufficientHistory`] when the lookback requirement
/// is not met, and [`EngineError::DivisionByZero`] when the year-ago level is
/// zero (the percent change is reported as an error, not infinity).
pub fn year_over_year(
    history: &[StorageReading],
    cadence: Cadence,
) -> Result<YoyComparison, EngineError> {
    let current = history.first().ok_or(EngineError::InsufficientHistory {
        required: required_for(cadence),
        available: 0,
    })?;

    let prior = match cadence {
        Cadence::Weekly => {
            if history.len() < WEEKLY_REQUIRED {
                return Err(EngineError::InsufficientHistory {
                    required: WEEKLY_REQUIRED,
                    available: history.len(),
                });
            }
            &history[WEEKLY_REQUIRED - 1]
        }
        Cadence::Daily => {
            let target = current.period_end - Duration::days(365);
            history
                .iter()
                .find(|r| (r.period_end - target).num_days().abs() <= DAILY_TOLERANCE_DAYS)
                .ok_or(EngineError::InsufficientHistory {
                    required: required_for(Cadence::Daily),
                    available: history.len(),
                })?
        }
    };

    if prior.current_value == 0.0 {
        return Err(EngineError::DivisionByZero);
    }

    let yoy_absolute_diff = current.current_value - prior.current_value;
    Ok(YoyComparison {
        current: current.current_value,
        prior_year: prior.current_value,
        yoy_absolute_diff,
        yoy_percent_diff: yoy_absolute_diff / prior.current_value * 100.0,
        unit: current.unit,
        prior_period_label: prior.period_label.clone(),
    })
}

fn required_for(cadence: Cadence) -> usize {
    match cadence {
        Cadence::Weekly => WEEKLY_REQUIRED,
        // Daily series need a full calendar year of coverage plus today.
        Cadence::Daily => 366,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::Region;

    /// Newest-first weekly history of `n` entries, one week apart, with the
    /// newest at `level` and every older entry at `older_level`.
    fn weekly_history(n: usize, level: f64, older_level: f64) -> Vec<StorageReading> {
        let newest = NaiveDate::from_ymd_opt(2026, 8, 14).unwrap();
        (0..n)
            .map(|i| StorageReading {
                region: Region::Us,
                current_value: if i == 0 { level } else { older_level },
                prior_period_value: older_level,
                prior_year_value: None,
                unit: StorageUnit::Bcf,
                period_label: format!("Week ending {}", newest - Duration::weeks(i as i64)),
                period_end: newest - Duration::weeks(i as i64),
            })
            .collect()
    }

    /// Newest-first daily history covering `days` consecutive days.
    fn daily_history(days: usize, level: f64, older_level: f64) -> Vec<StorageReading> {
        let newest = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        (0..days)
            .map(|i| StorageReading {
                region: Region::Eu,
                current_value: if i == 0 { level } else { older_level },
                prior_period_value: older_level,
                prior_year_value: None,
                unit: StorageUnit::PercentFull,
                period_label: (newest - Duration::days(i as i64)).to_string(),
                period_end: newest - Duration::days(i as i64),
            })
            .collect()
    }

    #[test]
    fn test_short_weekly_history_refused() {
        let err = year_over_year(&weekly_history(30, 3000.0, 2400.0), Cadence::Weekly)
            .unwrap_err();
        assert_eq!(err, EngineError::InsufficientHistory { required: 53, available: 30 });
    }

    #[test]
    fn test_empty_history_refused() {
        assert!(matches!(
            year_over_year(&[], Cadence::Weekly),
            Err(EngineError::InsufficientHistory { available: 0, .. })
        ));
    }

    #[test]
    fn test_exactly_53_weeks_compares() {
        let cmp = year_over_year(&weekly_history(53, 3000.0, 2400.0), Cadence::Weekly).unwrap();
        assert_eq!(cmp.current, 3000.0);
        assert_eq!(cmp.prior_year, 2400.0);
        assert_eq!(cmp.yoy_absolute_diff, 600.0);
        assert!((cmp.yoy_percent_diff - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_daily_match_within_tolerance() {
        // 366 consecutive days: the −365d entry exists exactly.
        let cmp = year_over_year(&daily_history(366, 82.0, 91.5), Cadence::Daily).unwrap();
        assert_eq!(cmp.prior_year, 91.5);
        assert!(cmp.yoy_absolute_diff < 0.0);
    }

    #[test]
    fn test_daily_gap_outside_tolerance_refused() {
        // Only 300 days of history — nothing within ±3 days of −365.
        let history = daily_history(300, 82.0, 91.5);
        let err = year_over_year(&history, Cadence::Daily).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientHistory { .. }));
    }

    #[test]
    fn test_zero_prior_year_reports_division_by_zero() {
        let err = year_over_year(&weekly_history(53, 3000.0, 0.0), Cadence::Weekly).unwrap_err();
        assert_eq!(err, EngineError::DivisionByZero);
    }
}
