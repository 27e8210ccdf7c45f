use crate::domain::{Article, FeedDescriptor};
use crate::errors::AggregatorResult;

/// Produces the list of feeds to crawl from a feed-list location.
pub trait FeedListSource: Send + Sync {
    fn fetch(&self, uri: &str) -> AggregatorResult<Vec<FeedDescriptor>>;
}

/// Produces the articles advertised by a single feed.
pub trait FeedSource: Send + Sync {
    fn fetch_articles(&self, feed: &FeedDescriptor) -> AggregatorResult<Vec<Article>>;
}

/// Fetches one article document and reduces it to searchable tokens.
pub trait DocumentSource: Send + Sync {
    fn fetch_tokens(&self, url: &str) -> AggregatorResult<Vec<String>>;
}
