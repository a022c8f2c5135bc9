//! # sources::news
//!
//! News source — energy headlines from a fallback list of RSS feeds.
//!
//! Feeds are tried in order and the first one yielding any items wins; only
//! the top headlines are kept. The extraction below is deliberately minimal
//! (title / link / pubDate out of `<item>` blocks, CDATA unwrapped) — this is
//! I/O glue feeding the sentiment analyst, not a full RSS parser.

use std::time::Duration;

use anyhow::Context;
use tracing::{debug, warn};

/// Headlines kept per cycle.
const MAX_HEADLINES: usize = 5;

/// A headline before sentiment analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHeadline {
    pub title: String,
    pub link: String,
    pub published: String,
}

/// Try each feed in order; first feed with items wins. All feeds failing is
/// an empty list, not an error — the dashboard renders the section empty.
pub async fn fetch_headlines(
    client: &reqwest::Client,
    feeds: &[String],
    timeout: Duration,
) -> Vec<RawHeadline> {
    for url in feeds {
        match fetch_feed(client, url, timeout).await {
            Ok(items) if !items.is_empty() => {
                debug!(url, count = items.len(), "news feed fetched");
                return items;
            }
            Ok(_) => debug!(url, "feed empty — trying next"),
            Err(err) => warn!(url, error = %err, "feed fetch failed — trying next"),
        }
    }
    Vec::new()
}

async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> anyhow::Result<Vec<RawHeadline>> {
    let body = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .context("feed unreachable")?
        .error_for_status()
        .context("feed returned error status")?
        .text()
        .await
        .context("feed body read error")?;

    Ok(extract_items(&body))
}

// ─── Extraction ───────────────────────────────────────────────────────────────

/// Pull the first few `<item>` blocks out of an RSS body.
fn extract_items(body: &str) -> Vec<RawHeadline> {
    let mut items = Vec::new();
    let mut rest = body;

    while items.len() < MAX_HEADLINES {
        let Some(start) = rest.find("<item") else { break };
        let after = &rest[start..];
        let Some(end) = after.find("</item>") else { break };
        let block = &after[..end];

        let title = tag_text(block, "title");
        let link = tag_text(block, "link");
        if let (Some(title), Some(link)) = (title, link) {
            items.push(RawHeadline {
                title,
                link,
                published: tag_text(block, "pubDate").unwrap_or_default(),
            });
        }

        rest = &after[end + "</item>".len()..];
    }

    items
}

/// Inner text of the first `<tag>…</tag>` in `block`, CDATA unwrapped and
/// whitespace trimmed.
fn tag_text(block: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let start = block.find(&open)?;
    let after_open = &block[start..];
    let content_start = after_open.find('>')? + 1;
    let content = &after_open[content_start..];
    let content = &content[..content.find(&close)?];

    let content = content.trim();
    let content = content
        .strip_prefix("<![CDATA[")
        .and_then(|c| c.strip_suffix("]]>"))
        .unwrap_or(content);

    let text = content.trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
        <rss version="2.0"><channel>
            <title>Natural Gas News</title>
            <item>
                <title><![CDATA[EU gas storage hits 80% ahead of schedule]]></title>
                <link>https://example.com/a</link>
                <pubDate>Tue, 25 Aug 2026 09:00:00 GMT</pubDate>
            </item>
            <item>
                <title>Henry Hub slides on mild weather outlook</title>
                <link>https://example.com/b</link>
            </item>
            <item>
                <title></title>
                <link>https://example.com/ignored</link>
            </item>
        </channel></rss>"#;

    #[test]
    fn test_extracts_items_in_order() {
        let items = extract_items(FEED);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "EU gas storage hits 80% ahead of schedule");
        assert_eq!(items[0].link, "https://example.com/a");
        assert_eq!(items[0].published, "Tue, 25 Aug 2026 09:00:00 GMT");
        // No pubDate → empty string, item still kept.
        assert_eq!(items[1].title, "Henry Hub slides on mild weather outlook");
        assert_eq!(items[1].published, "");
    }

    #[test]
    fn test_channel_title_not_mistaken_for_item() {
        let items = extract_items(FEED);
        assert!(items.iter().all(|i| i.title != "Natural Gas News"));
    }

    #[test]
    fn test_caps_at_five_headlines() {
        let many: String = (0..8)
            .map(|i| {
                format!(
                    "<item><title>headline {i}</title><link>https://example.com/{i}</link></item>"
                )
            })
            .collect();
        let items = extract_items(&format!("<rss><channel>{many}</channel></rss>"));
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn test_garbage_body_yields_nothing() {
        assert!(extract_items("<html>not a feed</html>").is_empty());
    }
}
