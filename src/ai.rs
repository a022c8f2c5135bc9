//! # ai — news sentiment analyst
//!
//! Calls Claude or OpenAI (selected via `AI_PROVIDER`) with one prompt per
//! headline and parses the pinned reply format:
//!
//! ```text
//! Sentiment: Bullish | Score: 7 | Reason: Supply disruption tightens EU balance
//! ```
//!
//! Sentiment is advisory commentary, not part of the deterministic core: a
//! failed call marks that one headline `None` and the cycle carries on.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{AiConfig, AiProvider};
use crate::models::{NewsItem, NewsSentiment, Sentiment};
use crate::sources::news::RawHeadline;

// ─── Entry point ──────────────────────────────────────────────────────────────

/// Analyze each headline, attaching sentiment where the call succeeds.
/// `ai = None` (no API key configured) ships the headlines bare.
pub async fn analyze_headlines(
    client: &reqwest::Client,
    ai: Option<&AiConfig>,
    headlines: Vec<RawHeadline>,
) -> Vec<NewsItem> {
    let mut items = Vec::with_capacity(headlines.len());

    for headline in headlines {
        let sentiment = match ai {
            Some(config) => match analyze_one(client, config, &headline.title).await {
                Ok(sentiment) => sentiment,
                Err(err) => {
                    warn!(title = %headline.title, error = %err, "sentiment call failed");
                    None
                }
            },
            None => None,
        };

        items.push(NewsItem {
            title: headline.title,
            link: headline.link,
            published: headline.published,
            sentiment,
        });
    }

    items
}

async fn analyze_one(
    client: &reqwest::Client,
    config: &AiConfig,
    title: &str,
) -> anyhow::Result<Option<NewsSentiment>> {
    let prompt = build_prompt(title);

    let reply = match config.provider {
        AiProvider::Claude => call_claude(client, &config.api_key, &prompt).await?,
        AiProvider::OpenAi => call_openai(client, &config.api_key, &prompt).await?,
    };

    debug!(title, reply = %reply, "sentiment reply");
    Ok(parse_sentiment(&reply))
}

fn build_prompt(title: &str) -> String {
    format!(
        "As a senior LNG trader, analyze this news headline.\n\
         Headline: \"{title}\"\n\n\
         Tasks:\n\
         1. Judge the impact on natural gas prices: Bullish, Bearish or Neutral.\n\
         2. Give an impact score from 1 to 10.\n\
         3. Explain the reason in one sentence.\n\n\
         Reply strictly in this format:\n\
         Sentiment: [Bullish/Bearish/Neutral] | Score: [1-10] | Reason: [your analysis]"
    )
}

// ─── Reply parsing ────────────────────────────────────────────────────────────

/// Parse the pinned `Sentiment: … | Score: … | Reason: …` format. A reply
/// that does not match yields `None` rather than a guessed sentiment.
fn parse_sentiment(reply: &str) -> Option<NewsSentiment> {
    let line = reply.lines().find(|l| l.contains("Sentiment:"))?;

    let mut sentiment = None;
    let mut score = None;
    let mut reason = String::new();

    for part in line.split('|') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("Sentiment:") {
            sentiment = match value.trim().to_ascii_lowercase().as_str() {
                "bullish" => Some(Sentiment::Bullish),
                "bearish" => Some(Sentiment::Bearish),
                "neutral" => Some(Sentiment::Neutral),
                _ => None,
            };
        } else if let Some(value) = part.strip_prefix("Score:") {
            score = value.trim().parse::<u8>().ok().filter(|s| (1..=10).contains(s));
        } else if let Some(value) = part.strip_prefix("Reason:") {
            reason = value.trim().to_string();
        }
    }

    Some(NewsSentiment { sentiment: sentiment?, score: score?, reason })
}

// ─── Anthropic Claude ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ClaudeMessage<'a>>,
}

#[derive(Serialize)]
struct ClaudeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    text: String,
}

async fn call_claude(
    client: &reqwest::Client,
    api_key: &str,
    prompt: &str,
) -> anyhow::Result<String> {
    let body = ClaudeRequest {
        model: "claude-3-5-sonnet-20241022",
        max_tokens: 256,
        messages: vec![ClaudeMessage { role: "user", content: prompt }],
    };

    let resp = client
        .post("https://api.anthropic.com/v1/messages")
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .header("content-type", "application/json")
        .json(&body)
        .timeout(std::time::Duration::from_secs(30))
        .send()
        .await
        .context("Claude API request failed")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("Claude API error {status}: {text}");
    }

    let data: ClaudeResponse = resp.json().await.context("Claude response parse error")?;

    data.content
        .into_iter()
        .next()
        .map(|c| c.text)
        .context("Claude returned empty content")
}

// ─── OpenAI GPT-4o ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
}

#[derive(Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMsg,
}

#[derive(Deserialize)]
struct OpenAiChoiceMsg {
    content: Option<String>,
}

async fn call_openai(
    client: &reqwest::Client,
    api_key: &str,
    prompt: &str,
) -> anyhow::Result<String> {
    let body = OpenAiRequest {
        model: "gpt-4o",
        messages: vec![
            OpenAiMessage {
                role: "system",
                content: "You are a senior LNG market analyst. Always reply in the exact format requested.",
            },
            OpenAiMessage { role: "user", content: prompt },
        ],
    };

    let resp = client
        .post("https://api.openai.com/v1/chat/completions")
        .bearer_auth(api_key)
        .json(&body)
        .timeout(std::time::Duration::from_secs(30))
        .send()
        .await
        .context("OpenAI API request failed")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("OpenAI API error {status}: {text}");
    }

    let data: OpenAiResponse = resp.json().await.context("OpenAI response parse error")?;

    data.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .context("OpenAI returned empty content")
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_reply() {
        let reply = "Sentiment: Bullish | Score: 8 | Reason: Pipeline outage cuts EU supply";
        let parsed = parse_sentiment(reply).unwrap();
        assert_eq!(parsed.sentiment, Sentiment::Bullish);
        assert_eq!(parsed.score, 8);
        assert_eq!(parsed.reason, "Pipeline outage cuts EU supply");
    }

    #[test]
    fn test_parse_skips_preamble_lines() {
        let reply = "Here is my analysis:\nSentiment: Bearish | Score: 3 | Reason: Mild weather";
        let parsed = parse_sentiment(reply).unwrap();
        assert_eq!(parsed.sentiment, Sentiment::Bearish);
        assert_eq!(parsed.score, 3);
    }

    #[test]
    fn test_parse_case_insensitive_sentiment() {
        let reply = "Sentiment: NEUTRAL | Score: 5 | Reason: Offsetting factors";
        assert_eq!(parse_sentiment(reply).unwrap().sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        assert!(parse_sentiment("Sentiment: Bullish | Score: 14 | Reason: x").is_none());
        assert!(parse_sentiment("Sentiment: Bullish | Score: 0 | Reason: x").is_none());
    }

    #[test]
    fn test_unparseable_reply_is_none() {
        assert!(parse_sentiment("The market looks broadly constructive.").is_none());
    }
}
