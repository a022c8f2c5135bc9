//! # sources::storage
//!
//! Storage sources — regional gas inventory histories.
//!
//! - **US**: EIA open-data API, weekly Lower-48 working gas (Bcf).
//! - **EU**: AGSI+ (GIE) API, daily aggregate fill level (% of capacity).
//!
//! Both need an API key; without one the region degrades to an empty history
//! and the comparator reports `InsufficientHistory` downstream. Readings come
//! back newest first, which is the order the comparator expects.

use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::config::Config;
use crate::models::{Region, StorageReading, StorageUnit};

/// Weeks of EIA history to request: enough for the 53-entry lookback plus
/// slack for survey gaps.
const EIA_WEEKS: usize = 60;
/// Days of AGSI history to request: a year plus the match tolerance.
const AGSI_DAYS: usize = 380;

// ─── EIA (US weekly) ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EiaEnvelope {
    response: EiaResponse,
}

#[derive(Debug, Deserialize)]
struct EiaResponse {
    data: Vec<EiaRow>,
}

#[derive(Debug, Deserialize)]
struct EiaRow {
    period: String,
    value: Option<f64>,
}

async fn fetch_us(
    client: &reqwest::Client,
    api_key: &str,
    timeout: Duration,
) -> anyhow::Result<Vec<StorageReading>> {
    let url = format!(
        "https://api.eia.gov/v2/natural-gas/stor/wkly/data/\
         ?api_key={api_key}\
         &frequency=weekly&data[0]=value\
         &facets[series][]=NW2_EPG0_SWO_R48_BCF\
         &sort[0][column]=period&sort[0][direction]=desc\
         &length={EIA_WEEKS}"
    );

    let envelope: EiaEnvelope = client
        .get(&url)
        .timeout(timeout)
        .send()
        .await
        .context("EIA API unreachable")?
        .error_for_status()
        .context("EIA API returned error status")?
        .json()
        .await
        .context("EIA response parse error")?;

    Ok(readings_from_eia(envelope.response.data))
}

fn readings_from_eia(rows: Vec<EiaRow>) -> Vec<StorageReading> {
    let values: Vec<(NaiveDate, f64)> = rows
        .into_iter()
        .filter_map(|row| {
            let date = NaiveDate::parse_from_str(&row.period, "%Y-%m-%d").ok()?;
            Some((date, row.value?))
        })
        .collect();

    values
        .iter()
        .enumerate()
        .map(|(i, &(date, value))| StorageReading {
            region: Region::Us,
            current_value: value,
            prior_period_value: values.get(i + 1).map(|&(_, v)| v).unwrap_or(value),
            prior_year_value: None,
            unit: StorageUnit::Bcf,
            period_label: format!("Week ending {date}"),
            period_end: date,
        })
        .collect()
}

// ─── AGSI+ (EU daily) ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AgsiEnvelope {
    data: Vec<AgsiRow>,
}

#[derive(Debug, Deserialize)]
struct AgsiRow {
    #[serde(rename = "gasDayStart")]
    gas_day_start: String,
    /// AGSI serialises numbers as strings, e.g. `"82.53"`.
    full: String,
}

async fn fetch_eu(
    client: &reqwest::Client,
    api_key: &str,
    timeout: Duration,
) -> anyhow::Result<Vec<StorageReading>> {
    let url = format!("https://agsi.gie.eu/api?country=EU&size={AGSI_DAYS}");

    let envelope: AgsiEnvelope = client
        .get(&url)
        .header("x-key", api_key)
        .timeout(timeout)
        .send()
        .await
        .context("AGSI API unreachable")?
        .error_for_status()
        .context("AGSI API returned error status")?
        .json()
        .await
        .context("AGSI response parse error")?;

    Ok(readings_from_agsi(envelope.data))
}

fn readings_from_agsi(rows: Vec<AgsiRow>) -> Vec<StorageReading> {
    let values: Vec<(NaiveDate, f64)> = rows
        .into_iter()
        .filter_map(|row| {
            let date = NaiveDate::parse_from_str(&row.gas_day_start, "%Y-%m-%d").ok()?;
            let full: f64 = row.full.parse().ok()?;
            Some((date, full))
        })
        .collect();

    values
        .iter()
        .enumerate()
        .map(|(i, &(date, value))| StorageReading {
            region: Region::Eu,
            current_value: value,
            prior_period_value: values.get(i + 1).map(|&(_, v)| v).unwrap_or(value),
            prior_year_value: None,
            unit: StorageUnit::PercentFull,
            period_label: date.to_string(),
            period_end: date,
        })
        .collect()
}

// ─── Entry point ──────────────────────────────────────────────────────────────

/// Fetch one region's history, newest first. Missing key or upstream failure
/// yields an empty history — never a fabricated one.
pub async fn fetch_history(
    client: &reqwest::Client,
    config: &Config,
    region: Region,
) -> Vec<StorageReading> {
    let outcome = match region {
        Region::Us => match &config.eia_api_key {
            Some(key) => fetch_us(client, key, config.fetch_timeout).await,
            None => {
                warn!("EIA_API_KEY not set — US storage unavailable");
                return Vec::new();
            }
        },
        Region::Eu => match &config.agsi_api_key {
            Some(key) => fetch_eu(client, key, config.fetch_timeout).await,
            None => {
                warn!("AGSI_API_KEY not set — EU storage unavailable");
                return Vec::new();
            }
        },
    };

    match outcome {
        Ok(readings) => readings,
        Err(err) => {
            warn!(region = region.label(), error = %err, "storage fetch failed");
            Vec::new()
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eia_rows_to_readings() {
        let rows = vec![
            EiaRow { period: "2026-08-14".into(), value: Some(3245.0) },
            EiaRow { period: "2026-08-07".into(), value: Some(3198.0) },
            EiaRow { period: "bogus".into(), value: Some(1.0) },
            EiaRow { period: "2026-07-31".into(), value: None },
        ];
        let readings = readings_from_eia(rows);

        // Unparseable and null rows dropped; newest first preserved.
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].current_value, 3245.0);
        assert_eq!(readings[0].prior_period_value, 3198.0);
        assert_eq!(readings[0].period_label, "Week ending 2026-08-14");
        // Oldest entry falls back to its own value for the prior period.
        assert_eq!(readings[1].prior_period_value, 3198.0);
    }

    #[test]
    fn test_agsi_string_numbers_parse() {
        let rows = vec![
            AgsiRow { gas_day_start: "2026-08-19".into(), full: "82.53".into() },
            AgsiRow { gas_day_start: "2026-08-18".into(), full: "82.41".into() },
            AgsiRow { gas_day_start: "2026-08-17".into(), full: "not-a-number".into() },
        ];
        let readings = readings_from_agsi(rows);

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].unit, StorageUnit::PercentFull);
        assert!((readings[0].current_value - 82.53).abs() < 1e-12);
        assert!((readings[0].prior_period_value - 82.41).abs() < 1e-12);
    }
}
