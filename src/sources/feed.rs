use std::time::Duration;

use feed_rs::parser;
use reqwest::blocking::Client;

use crate::domain::{Article, FeedDescriptor};
use crate::errors::{AggregatorError, AggregatorResult};
use crate::sources::traits::FeedSource;

/// Fetches a feed over HTTP and parses it as RSS/Atom/JSON Feed.
pub struct RssFeedSource {
    client: Client,
}

impl RssFeedSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn fetch_and_parse(&self, url: &str) -> AggregatorResult<feed_rs::model::Feed> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;

        parser::parse(&bytes[..]).map_err(|e| AggregatorError::FeedParse(format!("{url}: {e}")))
    }
}

impl FeedSource for RssFeedSource {
    fn fetch_articles(&self, feed: &FeedDescriptor) -> AggregatorResult<Vec<Article>> {
        let parsed = self.fetch_and_parse(&feed.url)?;

        let articles = parsed
            .entries
            .into_iter()
            .map(|entry| {
                // The entry id stands in for feeds that omit links
                let url = entry
                    .links
                    .first()
                    .map(|link| link.href.clone())
                    .unwrap_or(entry.id);
                let title = entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Untitled".to_string());

                Article::new(url, title)
            })
            .collect();

        Ok(articles)
    }
}
