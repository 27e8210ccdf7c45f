use std::sync::Arc;

use log::{error, info, warn};

use crate::config::Config;
use crate::crawler::{ArticleMerger, SeenUrls};
use crate::domain::{url_to_server, Article, FeedDescriptor};
use crate::errors::AggregatorResult;
use crate::index::InvertedIndex;
use crate::pool::{Semaphore, WorkerPool};
use crate::sources::{DocumentSource, FeedListSource, FeedSource};

/// Drives the two-level crawl: a small pool of feed workers fans out into a
/// larger pool of article workers, with URL dedup shared across both levels
/// and near-duplicate articles merged by (server, title).
///
/// Feed workers block on a per-feed fan-in barrier while their articles run
/// on the separate article pool, so the two pools give independent
/// backpressure and a stalled feed never starves article downloads.
pub struct CrawlCoordinator {
    feed_workers: usize,
    article_workers: usize,
    feed_list_source: Arc<dyn FeedListSource>,
    feed_source: Arc<dyn FeedSource>,
    document_source: Arc<dyn DocumentSource>,
}

impl CrawlCoordinator {
    pub fn new(
        config: &Config,
        feed_list_source: Arc<dyn FeedListSource>,
        feed_source: Arc<dyn FeedSource>,
        document_source: Arc<dyn DocumentSource>,
    ) -> Self {
        Self {
            feed_workers: config.feed_workers,
            article_workers: config.article_workers,
            feed_list_source,
            feed_source,
            document_source,
        }
    }

    /// Crawl everything reachable from the feed list at `feed_list_uri` and
    /// build the inverted index from the merged result.
    ///
    /// A feed-list failure is fatal. Individual feed or article failures
    /// are logged and dropped; the index reflects whatever succeeded.
    pub fn crawl(&self, feed_list_uri: &str) -> AggregatorResult<InvertedIndex> {
        let feeds = match self.feed_list_source.fetch(feed_list_uri) {
            Ok(feeds) => feeds,
            Err(e) => {
                error!("feed list {feed_list_uri}: {e}");
                return Err(e);
            }
        };
        info!("feed list {feed_list_uri} loaded, {} feeds", feeds.len());

        let feed_pool = WorkerPool::new(self.feed_workers);
        let article_pool = Arc::new(WorkerPool::new(self.article_workers));
        let seen = Arc::new(SeenUrls::new());
        let merger = Arc::new(ArticleMerger::new());

        for feed in feeds {
            let article_pool = Arc::clone(&article_pool);
            let seen = Arc::clone(&seen);
            let merger = Arc::clone(&merger);
            let feed_source = Arc::clone(&self.feed_source);
            let document_source = Arc::clone(&self.document_source);
            feed_pool.schedule(move || {
                process_feed(
                    feed,
                    &article_pool,
                    &seen,
                    &merger,
                    &feed_source,
                    &document_source,
                );
            });
        }
        info!("all feeds of {feed_list_uri} scheduled");

        // Feed tasks may keep scheduling article tasks until the feed pool
        // quiesces, so the article pool is waited on second.
        feed_pool.wait();
        article_pool.wait();
        info!("all feeds downloaded");

        let mut index = InvertedIndex::new();
        for (article, tokens) in merger.drain() {
            index.add(article, &tokens);
        }
        Ok(index)
    }
}

/// Body of one feed task: admit the feed URL, fetch its articles, fan them
/// out on the article pool, and wait until every one of them has finished.
fn process_feed(
    feed: FeedDescriptor,
    article_pool: &Arc<WorkerPool>,
    seen: &Arc<SeenUrls>,
    merger: &Arc<ArticleMerger>,
    feed_source: &Arc<dyn FeedSource>,
    document_source: &Arc<dyn DocumentSource>,
) {
    if !seen.try_admit(&feed.url) {
        info!("feed {} skipped, URL already seen", feed.url);
        return;
    }

    info!("feed \"{}\" downloading from {}", feed.title, feed.url);
    let articles = match feed_source.fetch_articles(&feed) {
        Ok(articles) => articles,
        Err(e) => {
            warn!("feed {} dropped: {e}", feed.url);
            return;
        }
    };

    // Fan-in barrier: starts at 1 - k, so the single wait below returns
    // exactly when all k article tasks have signaled, and immediately for
    // an empty feed.
    let completed = Arc::new(Semaphore::new(1 - articles.len() as i64));
    for article in articles {
        let completed = Arc::clone(&completed);
        let seen = Arc::clone(seen);
        let merger = Arc::clone(merger);
        let document_source = Arc::clone(document_source);
        article_pool.schedule(move || {
            process_article(article, &seen, &merger, &document_source);
            completed.signal();
        });
    }
    info!("feed {} scheduled all of its articles", feed.url);

    completed.wait();
    info!("feed \"{}\" done", feed.title);
}

/// Body of one article task: admit the article URL, fetch and tokenize the
/// document, and merge the result.
fn process_article(
    article: Article,
    seen: &SeenUrls,
    merger: &ArticleMerger,
    document_source: &Arc<dyn DocumentSource>,
) {
    if !seen.try_admit(&article.url) {
        info!("article \"{}\" skipped, URL already seen", article.title);
        return;
    }

    info!("article \"{}\" downloading from {}", article.title, article.url);
    let tokens = match document_source.fetch_tokens(&article.url) {
        Ok(tokens) => tokens,
        Err(e) => {
            warn!("article {} dropped: {e}", article.url);
            return;
        }
    };

    let server = url_to_server(&article.url);
    let title = article.title.clone();
    merger.merge(server, title, article, tokens);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AggregatorError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Feed list fixed at construction time.
    struct StaticFeedList(Vec<FeedDescriptor>);

    impl FeedListSource for StaticFeedList {
        fn fetch(&self, _uri: &str) -> AggregatorResult<Vec<FeedDescriptor>> {
            Ok(self.0.clone())
        }
    }

    struct FailingFeedList;

    impl FeedListSource for FailingFeedList {
        fn fetch(&self, uri: &str) -> AggregatorResult<Vec<FeedDescriptor>> {
            Err(AggregatorError::FeedListFetch(uri.to_string()))
        }
    }

    /// Maps feed URL to its articles, recording every fetch.
    struct StaticFeeds {
        articles: HashMap<String, Vec<Article>>,
        fetched: Mutex<Vec<String>>,
    }

    impl StaticFeeds {
        fn new(articles: HashMap<String, Vec<Article>>) -> Self {
            Self {
                articles,
                fetched: Mutex::new(Vec::new()),
            }
        }
    }

    impl FeedSource for StaticFeeds {
        fn fetch_articles(&self, feed: &FeedDescriptor) -> AggregatorResult<Vec<Article>> {
            self.fetched.lock().unwrap().push(feed.url.clone());
            match self.articles.get(&feed.url) {
                Some(articles) => Ok(articles.clone()),
                None => Err(AggregatorError::FeedParse(feed.url.clone())),
            }
        }
    }

    /// Maps article URL to its token list, recording every fetch.
    struct StaticDocuments {
        tokens: HashMap<String, Vec<String>>,
        fetched: Mutex<Vec<String>>,
    }

    impl StaticDocuments {
        fn new(tokens: HashMap<String, Vec<String>>) -> Self {
            Self {
                tokens,
                fetched: Mutex::new(Vec::new()),
            }
        }
    }

    impl DocumentSource for StaticDocuments {
        fn fetch_tokens(&self, url: &str) -> AggregatorResult<Vec<String>> {
            self.fetched.lock().unwrap().push(url.to_string());
            match self.tokens.get(url) {
                Some(tokens) => Ok(tokens.clone()),
                None => Err(AggregatorError::DocumentParse(url.to_string())),
            }
        }
    }

    fn config() -> Config {
        Config {
            feed_workers: 2,
            article_workers: 4,
            http_timeout_secs: 1,
        }
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn coordinator(
        feeds: Vec<FeedDescriptor>,
        feed_source: Arc<StaticFeeds>,
        document_source: Arc<StaticDocuments>,
    ) -> CrawlCoordinator {
        CrawlCoordinator::new(
            &config(),
            Arc::new(StaticFeedList(feeds)),
            feed_source,
            document_source,
        )
    }

    #[test]
    fn test_feed_list_failure_is_fatal() {
        let coordinator = CrawlCoordinator::new(
            &config(),
            Arc::new(FailingFeedList),
            Arc::new(StaticFeeds::new(HashMap::new())),
            Arc::new(StaticDocuments::new(HashMap::new())),
        );

        assert!(coordinator.crawl("list.xml").is_err());
    }

    #[test]
    fn test_duplicate_feed_url_is_fetched_once() {
        let article = Article::new("https://example.com/a".into(), "A".into());
        let feed_source = Arc::new(StaticFeeds::new(HashMap::from([(
            "https://example.com/feed.xml".to_string(),
            vec![article.clone()],
        )])));
        let document_source = Arc::new(StaticDocuments::new(HashMap::from([(
            article.url.clone(),
            tokens(&["x"]),
        )])));

        let feeds = vec![
            FeedDescriptor::new("https://example.com/feed.xml".into(), "First".into()),
            FeedDescriptor::new("https://example.com/feed.xml".into(), "Second".into()),
        ];
        coordinator(feeds, feed_source.clone(), document_source)
            .crawl("list.xml")
            .unwrap();

        assert_eq!(feed_source.fetched.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_article_shared_by_two_feeds_is_fetched_once() {
        let article = Article::new("https://example.com/shared".into(), "Shared".into());
        let feed_source = Arc::new(StaticFeeds::new(HashMap::from([
            ("https://one.example.com/feed".to_string(), vec![article.clone()]),
            ("https://two.example.com/feed".to_string(), vec![article.clone()]),
        ])));
        let document_source = Arc::new(StaticDocuments::new(HashMap::from([(
            article.url.clone(),
            tokens(&["x"]),
        )])));

        let feeds = vec![
            FeedDescriptor::new("https://one.example.com/feed".into(), "One".into()),
            FeedDescriptor::new("https://two.example.com/feed".into(), "Two".into()),
        ];
        coordinator(feeds, feed_source, document_source.clone())
            .crawl("list.xml")
            .unwrap();

        assert_eq!(document_source.fetched.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_same_story_under_two_urls_is_merged() {
        let first = Article::new("https://example.com/a".into(), "Story".into());
        let second = Article::new("https://example.com/b".into(), "Story".into());
        let feed_source = Arc::new(StaticFeeds::new(HashMap::from([(
            "https://example.com/feed".to_string(),
            vec![first.clone(), second.clone()],
        )])));
        let document_source = Arc::new(StaticDocuments::new(HashMap::from([
            (first.url.clone(), tokens(&["x", "y", "y", "z"])),
            (second.url.clone(), tokens(&["y", "y", "z", "w"])),
        ])));

        let feeds = vec![FeedDescriptor::new(
            "https://example.com/feed".into(),
            "Feed".into(),
        )];
        let index = coordinator(feeds, feed_source, document_source)
            .crawl("list.xml")
            .unwrap();

        // The canonical article carries the lexicographically smaller URL
        // and the intersected tokens y, y, z
        let matches = index.matching_articles("y");
        assert_eq!(matches, vec![(first.clone(), 2)]);
        assert_eq!(index.matching_articles("z"), vec![(first.clone(), 1)]);
        assert!(index.matching_articles("x").is_empty());
        assert!(index.matching_articles("w").is_empty());
    }

    #[test]
    fn test_empty_feed_still_completes() {
        let feed_source = Arc::new(StaticFeeds::new(HashMap::from([(
            "https://example.com/empty".to_string(),
            Vec::new(),
        )])));
        let document_source = Arc::new(StaticDocuments::new(HashMap::new()));

        let feeds = vec![FeedDescriptor::new(
            "https://example.com/empty".into(),
            "Empty".into(),
        )];
        let index = coordinator(feeds, feed_source, document_source)
            .crawl("list.xml")
            .unwrap();

        assert!(index.matching_articles("anything").is_empty());
    }

    #[test]
    fn test_failing_feed_does_not_sink_the_crawl() {
        let good = Article::new("https://good.example.com/a".into(), "Good".into());
        let feed_source = Arc::new(StaticFeeds::new(HashMap::from([(
            "https://good.example.com/feed".to_string(),
            vec![good.clone()],
        )])));
        let document_source = Arc::new(StaticDocuments::new(HashMap::from([(
            good.url.clone(),
            tokens(&["fine"]),
        )])));

        let feeds = vec![
            FeedDescriptor::new("https://broken.example.com/feed".into(), "Broken".into()),
            FeedDescriptor::new("https://good.example.com/feed".into(), "Good".into()),
        ];
        let index = coordinator(feeds, feed_source, document_source)
            .crawl("list.xml")
            .unwrap();

        assert_eq!(index.matching_articles("fine"), vec![(good, 1)]);
    }

    #[test]
    fn test_failing_article_drops_only_that_article() {
        let good = Article::new("https://example.com/good".into(), "Good".into());
        let broken = Article::new("https://example.com/broken".into(), "Broken".into());
        let feed_source = Arc::new(StaticFeeds::new(HashMap::from([(
            "https://example.com/feed".to_string(),
            vec![broken, good.clone()],
        )])));
        let document_source = Arc::new(StaticDocuments::new(HashMap::from([(
            good.url.clone(),
            tokens(&["fine"]),
        )])));

        let feeds = vec![FeedDescriptor::new(
            "https://example.com/feed".into(),
            "Feed".into(),
        )];
        let index = coordinator(feeds, feed_source, document_source)
            .crawl("list.xml")
            .unwrap();

        assert_eq!(index.matching_articles("fine"), vec![(good, 1)]);
    }

    #[test]
    fn test_many_feeds_many_articles() {
        let mut articles_by_feed = HashMap::new();
        let mut tokens_by_url = HashMap::new();
        let mut feeds = Vec::new();
        for f in 0..6 {
            let feed_url = format!("https://feed{f}.example.com/rss");
            let mut articles = Vec::new();
            for a in 0..10 {
                let url = format!("https://feed{f}.example.com/article/{a}");
                articles.push(Article::new(url.clone(), format!("Story {f}-{a}")));
                tokens_by_url.insert(url, tokens(&["common", "word"]));
            }
            articles_by_feed.insert(feed_url.clone(), articles);
            feeds.push(FeedDescriptor::new(feed_url, format!("Feed {f}")));
        }

        let index = coordinator(
            feeds,
            Arc::new(StaticFeeds::new(articles_by_feed)),
            Arc::new(StaticDocuments::new(tokens_by_url)),
        )
        .crawl("list.xml")
        .unwrap();

        assert_eq!(index.matching_articles("common").len(), 60);
    }
}
