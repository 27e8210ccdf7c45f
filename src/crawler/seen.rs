use std::collections::HashSet;
use std::sync::Mutex;

/// Thread-safe set of URLs already accepted for processing. Insertion-only
/// for the duration of a crawl.
#[derive(Default)]
pub struct SeenUrls {
    urls: Mutex<HashSet<String>>,
}

impl SeenUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically test-and-insert. Returns true iff the URL was freshly
    /// admitted; every later call with the same URL returns false.
    pub fn try_admit(&self, url: &str) -> bool {
        let mut urls = self.urls.lock().unwrap();
        urls.insert(url.to_string())
    }
}
