use std::fs;
use std::time::Duration;

use opml::{Outline, OPML};
use reqwest::blocking::Client;

use crate::domain::FeedDescriptor;
use crate::errors::{AggregatorError, AggregatorResult};
use crate::sources::traits::FeedListSource;

/// Reads the feed list as an OPML document, from a local file or an
/// http(s) URL.
pub struct OpmlFeedListSource {
    client: Client,
}

impl OpmlFeedListSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn load(&self, uri: &str) -> AggregatorResult<String> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            let response = self
                .client
                .get(uri)
                .send()
                .and_then(|response| response.error_for_status())
                .map_err(|e| AggregatorError::FeedListFetch(format!("{uri}: {e}")))?;
            response
                .text()
                .map_err(|e| AggregatorError::FeedListFetch(format!("{uri}: {e}")))
        } else {
            fs::read_to_string(uri)
                .map_err(|e| AggregatorError::FeedListFetch(format!("{uri}: {e}")))
        }
    }

    /// Recursively collect every outline carrying a feed URL. The display
    /// title falls back from the `title` attribute to `text`.
    fn collect_feeds(outlines: &[Outline], feeds: &mut Vec<FeedDescriptor>) {
        for outline in outlines {
            if let Some(url) = &outline.xml_url {
                if !url.is_empty() {
                    let title = outline
                        .title
                        .clone()
                        .filter(|title| !title.is_empty())
                        .unwrap_or_else(|| outline.text.clone());
                    feeds.push(FeedDescriptor::new(url.clone(), title));
                }
            }
            Self::collect_feeds(&outline.outlines, feeds);
        }
    }
}

impl FeedListSource for OpmlFeedListSource {
    fn fetch(&self, uri: &str) -> AggregatorResult<Vec<FeedDescriptor>> {
        let content = self.load(uri)?;
        let opml = OPML::from_str(&content)
            .map_err(|e| AggregatorError::FeedListParse(format!("{uri}: {e}")))?;

        let mut feeds = Vec::new();
        Self::collect_feeds(&opml.body.outlines, &mut feeds);
        Ok(feeds)
    }
}
