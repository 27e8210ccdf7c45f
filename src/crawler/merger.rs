use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::Article;

/// Thread-safe map from `(server, title)` to the canonical article for that
/// key plus the multiset intersection of every tokenization seen for it.
///
/// Articles reachable under several URLs on the same server usually differ
/// only in boilerplate; intersecting their token lists keeps the words they
/// all share.
#[derive(Default)]
pub struct ArticleMerger {
    entries: Mutex<HashMap<(String, String), (Article, Vec<String>)>>,
}

impl ArticleMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `(article, tokens)` under `(server, title)`, or fold it into
    /// the existing entry: the canonical article is the one with the
    /// lexicographically smaller URL, and the stored tokens become the
    /// multiset intersection of both token lists.
    pub fn merge(&self, server: String, title: String, article: Article, tokens: Vec<String>) {
        let mut entries = self.entries.lock().unwrap();
        match entries.entry((server, title)) {
            Entry::Vacant(slot) => {
                slot.insert((article, tokens));
            }
            Entry::Occupied(mut slot) => {
                let (current, current_tokens) = slot.get_mut();
                if article.url < current.url {
                    *current = article;
                }
                let prior = std::mem::take(current_tokens);
                *current_tokens = multiset_intersection(prior, tokens);
            }
        }
    }

    /// Yield every merged entry. Only meaningful once no task that could
    /// still call `merge` remains in flight.
    pub fn drain(&self) -> Vec<(Article, Vec<String>)> {
        let mut entries = self.entries.lock().unwrap();
        entries.drain().map(|(_, value)| value).collect()
    }
}

/// Multiset intersection of two token lists: sort both, then walk them in
/// lockstep so a token appearing m and n times survives min(m, n) times.
fn multiset_intersection(mut a: Vec<String>, mut b: Vec<String>) -> Vec<String> {
    a.sort();
    b.sort();

    let mut merged = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                merged.push(a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    merged
}
