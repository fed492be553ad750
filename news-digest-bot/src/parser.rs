use crate::types::{BotError, FeedItem, Result};
use chrono::Utc;
use feed_rs::parser;
use std::collections::HashSet;
use tracing::debug;

pub struct FeedParser;

impl FeedParser {
    /// Parses an RSS/Atom document into items, skipping entries without a
    /// link and repeated links.
    pub fn parse_items(content: &str) -> Result<Vec<FeedItem>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| BotError::Parse(format!("Failed to parse feed: {}", e)))?;

        let mut seen_urls = HashSet::new();
        let mut items = Vec::new();

        for entry in feed.entries {
            let Some(link) = entry.links.first().map(|l| l.href.clone()) else {
                continue;
            };
            if !seen_urls.insert(link.clone()) {
                debug!("Skipping duplicate entry with URL: {}", link);
                continue;
            }

            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string());
            let published_at = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.with_timezone(&Utc));

            items.push(FeedItem {
                title,
                link,
                published_at,
            });
        }

        Ok(items)
    }

    /// Orders items newest first and keeps at most `limit`. Undated items go last.
    pub fn newest(mut items: Vec<FeedItem>, limit: usize) -> Vec<FeedItem> {
        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        items.truncate(limit);
        items
    }
}
