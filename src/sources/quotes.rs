//! # sources::quotes
//!
//! Quote source — Yahoo Finance v8 chart API, one call per instrument
//! (NG=F, TTF=F, JKM=F, BZ=F), 1 month of daily closes.
//!
//! Failures are isolated per instrument: a dead TTF ticker yields a
//! `Missing` quote for TTF while Henry Hub still comes back populated. The
//! core decides downstream which computations that blocks.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{Instrument, PricePoint, PriceQuote, PriceSeries, QuoteValue};

// ─── Yahoo chart response ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    close: Vec<Option<f64>>,
}

// ─── Fetch ────────────────────────────────────────────────────────────────────

/// Fetch all tracked instruments concurrently.
///
/// `overrides` supplies operator substitutes: when the market fetch yields no
/// usable value and an override exists, the quote carries it as
/// `ManualOverride` — a fetched value always wins over an override.
pub async fn fetch_all(
    client: &reqwest::Client,
    overrides: &HashMap<Instrument, f64>,
    timeout: Duration,
) -> (Vec<PriceQuote>, Vec<PriceSeries>) {
    let fetches = Instrument::ALL.map(|instrument| fetch_one(client, instrument, timeout));
    let outcomes = join_all(fetches).await;

    let mut quotes = Vec::with_capacity(Instrument::ALL.len());
    let mut series = Vec::new();

    for (instrument, outcome) in Instrument::ALL.into_iter().zip(outcomes) {
        match outcome {
            Ok((quote, history)) => {
                debug!(%instrument, value = ?quote.value, delta = ?quote.delta(), "quote fetched");
                quotes.push(quote);
                if !history.points.is_empty() {
                    series.push(history);
                }
            }
            Err(err) => {
                warn!(%instrument, error = %err, "quote fetch failed");
                quotes.push(PriceQuote::missing(instrument));
            }
        }
    }

    // Substitute overrides only where the market gave us nothing.
    for quote in &mut quotes {
        if !quote.value.is_valid() {
            if let Some(&value) = overrides.get(&quote.instrument) {
                warn!(instrument = %quote.instrument, value, "using manual override for missing quote");
                quote.value = QuoteValue::ManualOverride(value);
            }
        }
    }

    (quotes, series)
}

/// One instrument: latest close + previous close + the 30-day series.
async fn fetch_one(
    client: &reqwest::Client,
    instrument: Instrument,
    timeout: Duration,
) -> anyhow::Result<(PriceQuote, PriceSeries)> {
    let url = format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{}?range=1mo&interval=1d",
        instrument.ticker()
    );

    let envelope: ChartEnvelope = client
        .get(&url)
        .timeout(timeout)
        .send()
        .await
        .context("chart API unreachable")?
        .error_for_status()
        .context("chart API returned error status")?
        .json()
        .await
        .context("chart response parse error")?;

    let result = envelope
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .context("chart response has no result")?;

    Ok(build_quote(instrument, result))
}

/// Pure assembly from the decoded payload, split out for testing.
fn build_quote(instrument: Instrument, result: ChartResult) -> (PriceQuote, PriceSeries) {
    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    // Pair timestamps with closes, dropping the null gaps Yahoo leaves for
    // untraded sessions.
    let points: Vec<PricePoint> = timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(&ts, close)| {
            let close = (*close)?;
            let at = DateTime::<Utc>::from_timestamp(ts, 0)?;
            Some(PricePoint { at, close })
        })
        .collect();

    let value = match points.last() {
        Some(p) => QuoteValue::Fetched(p.close),
        None => QuoteValue::Missing,
    };
    let prev_close = points.len().checked_sub(2).map(|i| points[i].close);
    let as_of = points.last().map(|p| p.at).unwrap_or_else(Utc::now);

    (
        PriceQuote {
            instrument,
            value,
            unit: instrument.native_unit(),
            prev_close,
            as_of,
        },
        PriceSeries { instrument, points },
    )
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "NG=F" },
                "timestamp": [1755561600, 1755648000, 1755734400],
                "indicators": { "quote": [{ "close": [2.75, null, 2.80] }] }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_build_quote_from_chart_payload() {
        let envelope: ChartEnvelope = serde_json::from_str(FIXTURE).unwrap();
        let result = envelope.chart.result.unwrap().remove(0);
        let (quote, series) = build_quote(Instrument::HenryHub, result);

        // Null close dropped; latest 2.80, previous 2.75.
        assert_eq!(quote.value, QuoteValue::Fetched(2.80));
        assert_eq!(quote.prev_close, Some(2.75));
        assert_eq!(series.points.len(), 2);
    }

    #[test]
    fn test_empty_payload_is_missing() {
        let result = ChartResult {
            timestamp: None,
            indicators: Indicators { quote: vec![QuoteBlock { close: vec![] }] },
        };
        let (quote, series) = build_quote(Instrument::Ttf, result);
        assert_eq!(quote.value, QuoteValue::Missing);
        assert!(series.points.is_empty());
    }

    #[test]
    fn test_single_close_has_no_prev() {
        let result = ChartResult {
            timestamp: Some(vec![1755734400]),
            indicators: Indicators { quote: vec![QuoteBlock { close: vec![Some(31.2)] }] },
        };
        let (quote, _) = build_quote(Instrument::Ttf, result);
        assert_eq!(quote.value, QuoteValue::Fetched(31.2));
        assert_eq!(quote.prev_close, None);
    }
}
