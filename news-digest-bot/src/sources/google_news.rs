use crate::traits::NewsSource;
use crate::types::{FeedItem, FetchConfig, Result, Topic};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::info;
use url::Url;

/// Google News RSS search, one query per topic
pub struct GoogleNewsSource {
    fetcher: Fetcher,
}

impl GoogleNewsSource {
    pub fn new(config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
        })
    }

    pub fn search_url(&self, topic: Topic) -> Result<Url> {
        let config = self.fetcher.config();
        let mut url = Url::parse(&config.base_url)?.join("rss/search")?;
        url.query_pairs_mut()
            .append_pair("q", topic.query())
            .append_pair("hl", &config.language)
            .append_pair("gl", &config.region)
            .append_pair("ceid", &format!("{}:{}", config.region, language_code(&config.language)));
        Ok(url)
    }
}

fn language_code(language: &str) -> &str {
    language.split('-').next().unwrap_or(language)
}

#[async_trait]
impl NewsSource for GoogleNewsSource {
    fn source_name(&self) -> String {
        "Google News".to_string()
    }

    async fn fetch_topic(&self, topic: Topic, limit: usize) -> Result<Vec<FeedItem>> {
        let url = self.search_url(topic)?;
        let content = self.fetcher.fetch_feed(url.as_str()).await?;
        let items = FeedParser::newest(FeedParser::parse_items(&content)?, limit);

        info!("Pulled {} items for topic {}", items.len(), topic);
        Ok(items)
    }
}
