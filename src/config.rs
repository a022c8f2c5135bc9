//! # config — service settings from environment variables

use std::time::Duration;

use anyhow::{bail, Context};

/// Supported AI providers for news sentiment.
#[derive(Debug, Clone, Copy)]
pub enum AiProvider {
    Claude,
    OpenAi,
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::Claude => write!(f, "Claude"),
            AiProvider::OpenAi => write!(f, "GPT-4o"),
        }
    }
}

/// AI sentiment settings. Absent entirely when no `AI_API_KEY` is set — the
/// dashboard then ships headlines without sentiment instead of failing.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
}

/// Everything the service reads from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the axum server binds, e.g. `0.0.0.0:3000`.
    pub bind_addr: String,
    /// Full refresh cycle period. Default 300s, the original cache TTL.
    pub refresh_interval: Duration,
    /// Per-call timeout for outbound fetches.
    pub fetch_timeout: Duration,
    /// EIA open-data key for US weekly storage. None → section unavailable.
    pub eia_api_key: Option<String>,
    /// AGSI+ key for EU daily storage. None → section unavailable.
    pub agsi_api_key: Option<String>,
    /// News feeds tried in order; first one that yields items wins.
    pub news_feeds: Vec<String>,
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let refresh_secs: u64 = std::env::var("REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .context("REFRESH_INTERVAL_SECS must be a number")?;

        let ai = match std::env::var("AI_API_KEY") {
            Ok(api_key) if !api_key.is_empty() => {
                let provider_str = std::env::var("AI_PROVIDER")
                    .unwrap_or_else(|_| "claude".to_string())
                    .to_lowercase();
                let provider = match provider_str.as_str() {
                    "claude" => AiProvider::Claude,
                    "openai" => AiProvider::OpenAi,
                    other => bail!("Unknown AI_PROVIDER: '{other}'. Use 'claude' or 'openai'"),
                };
                Some(AiConfig { provider, api_key })
            }
            _ => None,
        };

        let news_feeds = std::env::var("NEWS_FEEDS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| {
                vec![
                    "https://oilprice.com/rss/category/energy/natural-gas".to_string(),
                    "http://feeds.reuters.com/reuters/energyNews".to_string(),
                ]
            });

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            refresh_interval: Duration::from_secs(refresh_secs),
            fetch_timeout: Duration::from_secs(10),
            eia_api_key: std::env::var("EIA_API_KEY").ok().filter(|k| !k.is_empty()),
            agsi_api_key: std::env::var("AGSI_API_KEY").ok().filter(|k| !k.is_empty()),
            news_feeds,
            ai,
        })
    }
}
