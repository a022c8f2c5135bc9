//! # refresh
//!
//! The refresh loop — one full fetch-and-compute cycle per interval.
//!
//! ## Flow
//! ```text
//! loop every REFRESH_INTERVAL_SECS:
//!   1. Fetch quotes (all instruments, failures isolated)
//!   2. Fetch US + EU storage histories
//!   3. Fetch headlines, attach AI sentiment if enabled
//!   4. Run the engine: netback signal + per-region YoY
//!   5. Install the snapshot (full replacement) and broadcast
//! ```
//!
//! A failed section degrades to its typed unavailable form inside the
//! snapshot; the loop itself never exits.

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::engine::{compute_signal, year_over_year};
use crate::events::WsEvent;
use crate::models::{
    ArbitrageParameters, DashboardSnapshot, Instrument, NewsItem, PriceQuote, PriceSeries, Region,
    SignalOutcome, StorageOutlook, StorageReading, YoyOutcome,
};
use crate::sources;
use crate::state::SharedState;

/// Run the refresh loop forever. Spawned once from `main`.
pub async fn run(state: SharedState) {
    let interval = state.config.refresh_interval;

    loop {
        info!("refresh cycle starting");

        match run_cycle(&state).await {
            Ok(snapshot_id) => {
                info!(%snapshot_id, "refresh cycle complete");
            }
            Err(err) => {
                error!(error = %err, "refresh cycle failed — will retry next interval");
                state.broadcast(&WsEvent::RefreshFailed { reason: err.to_string() });
            }
        }

        tokio::time::sleep(interval).await;
    }
}

/// One full cycle: fetch everything, compute, install, broadcast.
pub async fn run_cycle(state: &SharedState) -> anyhow::Result<Uuid> {
    let config = &state.config;
    let client = &state.http_client;

    let overrides = state.current_overrides().await;
    let params = state.current_params().await;

    let (quotes, series) =
        sources::quotes::fetch_all(client, &overrides, config.fetch_timeout).await;

    let (us_history, eu_history) = tokio::join!(
        sources::storage::fetch_history(client, config, Region::Us),
        sources::storage::fetch_history(client, config, Region::Eu),
    );

    let headlines =
        sources::news::fetch_headlines(client, &config.news_feeds, config.fetch_timeout).await;
    let news = crate::ai::analyze_headlines(client, config.ai.as_ref(), headlines).await;

    let snapshot = build_snapshot(
        quotes,
        series,
        vec![(Region::Us, us_history), (Region::Eu, eu_history)],
        news,
        &params,
    );

    let snapshot_id = snapshot.snapshot_id;
    let generated_at = snapshot.generated_at;
    let arbitrage = snapshot.arbitrage.clone();

    // Install before broadcasting so a client reacting to the event always
    // reads the new snapshot.
    state.install_snapshot(snapshot).await;
    state.broadcast(&WsEvent::SnapshotUpdated { snapshot_id, generated_at, arbitrage });

    Ok(snapshot_id)
}

// ─── Snapshot assembly ────────────────────────────────────────────────────────

/// Pure assembly of one cycle's snapshot from fetched inputs.
pub fn build_snapshot(
    quotes: Vec<PriceQuote>,
    series: Vec<PriceSeries>,
    histories: Vec<(Region, Vec<StorageReading>)>,
    news: Vec<NewsItem>,
    params: &ArbitrageParameters,
) -> DashboardSnapshot {
    let arbitrage = signal_from_quotes(&quotes, params);

    let storage = histories
        .into_iter()
        .map(|(region, history)| {
            let yoy = YoyOutcome::from_result(year_over_year(&history, region.cadence()));

            // Mirror the matched year-ago level onto the latest reading so
            // the metric widget is self-contained.
            let latest = history.into_iter().next().map(|mut reading| {
                if let YoyOutcome::Computed { comparison } = &yoy {
                    reading.prior_year_value = Some(comparison.prior_year);
                }
                reading
            });

            StorageOutlook { region, latest, yoy }
        })
        .collect();

    DashboardSnapshot {
        snapshot_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        quotes,
        series,
        arbitrage,
        storage,
        news,
    }
}

/// The HH → TTF netback signal from this cycle's quote set.
pub fn signal_from_quotes(
    quotes: &[PriceQuote],
    params: &ArbitrageParameters,
) -> SignalOutcome {
    let find = |instrument: Instrument| {
        quotes
            .iter()
            .find(|q| q.instrument == instrument)
            .cloned()
            .unwrap_or_else(|| PriceQuote::missing(instrument))
    };

    let origin = find(Instrument::HenryHub);
    let destination = find(Instrument::Ttf);
    SignalOutcome::from_result(compute_signal(&origin, &destination, params))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    use crate::models::{QuoteValue, StorageUnit};

    fn quote(instrument: Instrument, value: QuoteValue) -> PriceQuote {
        PriceQuote {
            instrument,
            value,
            unit: instrument.native_unit(),
            prev_close: None,
            as_of: Utc::now(),
        }
    }

    fn weekly_history(n: usize) -> Vec<StorageReading> {
        let newest = NaiveDate::from_ymd_opt(2026, 8, 14).unwrap();
        (0..n)
            .map(|i| StorageReading {
                region: Region::Us,
                current_value: 3000.0 - i as f64,
                prior_period_value: 3000.0,
                prior_year_value: None,
                unit: StorageUnit::Bcf,
                period_label: format!("Week ending {}", newest - Duration::weeks(i as i64)),
                period_end: newest - Duration::weeks(i as i64),
            })
            .collect()
    }

    #[test]
    fn test_missing_ttf_degrades_signal_only() {
        let quotes = vec![
            quote(Instrument::HenryHub, QuoteValue::Fetched(2.80)),
            quote(Instrument::Ttf, QuoteValue::Missing),
            quote(Instrument::Jkm, QuoteValue::Fetched(11.4)),
            quote(Instrument::Brent, QuoteValue::Fetched(78.0)),
        ];
        let snapshot = build_snapshot(
            quotes,
            Vec::new(),
            vec![(Region::Us, weekly_history(60))],
            Vec::new(),
            &ArbitrageParameters::default(),
        );

        // Arbitrage is unavailable, but quotes and storage still rendered.
        assert!(matches!(
            snapshot.arbitrage,
            SignalOutcome::Unavailable { ref kind, .. } if kind.as_str() == "DATA_UNAVAILABLE"
        ));
        assert_eq!(snapshot.quotes.len(), 4);
        assert!(matches!(snapshot.storage[0].yoy, YoyOutcome::Computed { .. }));
    }

    #[test]
    fn test_open_signal_end_to_end() {
        let quotes = vec![
            quote(Instrument::HenryHub, QuoteValue::Fetched(2.80)),
            quote(Instrument::Ttf, QuoteValue::Fetched(30.0)),
        ];
        let outcome = signal_from_quotes(&quotes, &ArbitrageParameters::default());
        match outcome {
            SignalOutcome::Computed { result } => assert!(result.is_open),
            other => panic!("expected computed signal, got {other:?}"),
        }
    }

    #[test]
    fn test_yoy_mirrored_onto_latest_reading() {
        let snapshot = build_snapshot(
            Vec::new(),
            Vec::new(),
            vec![(Region::Us, weekly_history(60))],
            Vec::new(),
            &ArbitrageParameters::default(),
        );
        let outlook = &snapshot.storage[0];
        let latest = outlook.latest.as_ref().unwrap();
        assert_eq!(latest.prior_year_value, Some(3000.0 - 52.0));
    }

    #[test]
    fn test_empty_history_yields_unavailable_outlook() {
        let snapshot = build_snapshot(
            Vec::new(),
            Vec::new(),
            vec![(Region::Eu, Vec::new())],
            Vec::new(),
            &ArbitrageParameters::default(),
        );
        let outlook = &snapshot.storage[0];
        assert!(outlook.latest.is_none());
        assert!(matches!(
            outlook.yoy,
            YoyOutcome::Unavailable { ref kind, .. } if kind.as_str() == "INSUFFICIENT_HISTORY"
        ));
    }
}
