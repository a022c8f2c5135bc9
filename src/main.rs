//! # Netback — LNG Market Dashboard Backend
//!
//! ```text
//!  ┌──────────────┐   refresh loop (every 5 min)   ┌────────────────────────────┐
//!  │ Yahoo Finance│ ─────────── quotes ──────────▶ │ AppState                   │
//!  │ EIA / AGSI+  │ ─────────── storage ─────────▶ │ ├─ snapshot (last wins)    │
//!  │ RSS feeds    │ ─────────── headlines ───────▶ │ ├─ params ⚙️               │
//!  │ Claude/GPT-4o│ ─────────── sentiment ───────▶ │ ├─ overrides               │
//!  └──────────────┘                                │ └─ broadcast_tx ─────────┐ │
//!                                                  └──────────────────────────┼─┘
//!  ┌──────────────┐  ws://host/ws/dashboard  ◀────────────────────────────────┘
//!  │  Dashboard   │  GET  /api/dashboard/*
//!  └──────────────┘  PUT  /api/params   POST /api/params/override
//! ```

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod ai;
mod auth;
mod config;
mod engine;
mod error;
mod events;
mod models;
mod refresh;
mod routes;
mod sources;
mod state;

use auth::require_api_key;
use config::Config;
use routes::{
    dashboard::{
        get_arbitrage, get_news, get_snapshot, get_stats, get_storage, health_check, ws_dashboard,
    },
    params::{clear_override, get_params, set_override, set_params},
};
use state::build_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("netback=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════════════════╗
  ║            NETBACK — LNG Dashboard Backend            ║
  ║   Quotes · Storage · Arbitrage Signal · News · AI     ║
  ╚═══════════════════════════════════════════════════════╝"#);

    // ── 3. Config & shared state ──────────────────────────────────────────────
    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    info!(
        refresh = ?config.refresh_interval,
        eia     = config.eia_api_key.is_some(),
        agsi    = config.agsi_api_key.is_some(),
        ai      = ?config.ai.as_ref().map(|a| a.provider.to_string()),
        "configuration loaded"
    );

    let state = build_state(config);

    // ── 4. Refresh loop ───────────────────────────────────────────────────────
    tokio::spawn(refresh::run(state.clone()));

    // ── 5. CORS ───────────────────────────────────────────────────────────────
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 6. Router ─────────────────────────────────────────────────────────────
    let app = Router::new()
        // ── Dashboard ─────────────────────────────────────────────────────────
        .route("/ws/dashboard",            get(ws_dashboard))
        .route("/api/dashboard/snapshot",  get(get_snapshot))
        .route("/api/dashboard/arbitrage", get(get_arbitrage))
        .route("/api/dashboard/storage",   get(get_storage))
        .route("/api/dashboard/news",      get(get_news))
        .route("/api/dashboard/stats",     get(get_stats))
        // ── Operator ──────────────────────────────────────────────────────────
        .route("/api/params",              get(get_params))
        .route("/api/params",              put(set_params))
        .route("/api/params/override",     post(set_override))
        .route("/api/params/override/:instrument", delete(clear_override))
        // ── Health ────────────────────────────────────────────────────────────
        .route("/api/health",              get(health_check))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(axum::middleware::from_fn(require_api_key))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // ── 7. Bind & Serve ───────────────────────────────────────────────────────
    let addr: SocketAddr = bind_addr.parse()?;

    info!(?addr, "netback server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
