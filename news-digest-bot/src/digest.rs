use crate::traits::NewsSource;
use crate::types::{Article, FeedItem, Result, Topic, MAX_DIGEST_ARTICLES};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-topic request cap: the digest budget spread over the topics, rounded up.
pub fn per_topic_quota(topic_count: usize) -> usize {
    MAX_DIGEST_ARTICLES.div_ceil(topic_count.max(1))
}

/// Collapses one topic's fetch outcome into its items; a failure counts as
/// no items.
fn settle(topic: Topic, outcome: Result<Vec<FeedItem>>) -> Vec<FeedItem> {
    match outcome {
        Ok(items) => items,
        Err(e) => {
            warn!("Skipping topic {}: {}", topic, e);
            Vec::new()
        }
    }
}

/// Builds digests by fanning out one request per topic and merging the
/// answers newest-first.
pub struct DigestFetcher {
    source: Arc<dyn NewsSource>,
}

impl DigestFetcher {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, topics: &[Topic]) -> Vec<Article> {
        if topics.is_empty() {
            return Vec::new();
        }

        let quota = per_topic_quota(topics.len());
        debug!(
            "Fetching {} topics from {} with quota {}",
            topics.len(),
            self.source.source_name(),
            quota
        );

        let outcomes = join_all(topics.iter().map(|&topic| async move {
            (topic, self.source.fetch_topic(topic, quota).await)
        }))
        .await;

        let mut articles: Vec<Article> = outcomes
            .into_iter()
            .flat_map(|(topic, outcome)| {
                settle(topic, outcome)
                    .into_iter()
                    .take(quota)
                    .map(move |item| Article::from_feed_item(topic, item))
            })
            .collect();

        // Stable sort: equal timestamps keep topic order.
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let mut seen_urls = HashSet::new();
        articles.retain(|article| seen_urls.insert(article.url.clone()));
        articles.truncate(MAX_DIGEST_ARTICLES);

        info!("Assembled digest of {} articles for {} topics", articles.len(), topics.len());
        articles
    }
}
