use std::collections::HashMap;

use crate::domain::Article;

/// Inverted index mapping tokens to the articles that contain them, with
/// per-article occurrence counts. Filled once the crawl has quiesced.
#[derive(Default)]
pub struct InvertedIndex {
    postings: HashMap<String, HashMap<Article, usize>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every token of `article`.
    pub fn add(&mut self, article: Article, tokens: &[String]) {
        for token in tokens {
            *self
                .postings
                .entry(token.clone())
                .or_default()
                .entry(article.clone())
                .or_insert(0) += 1;
        }
    }

    /// Articles containing `term`, most occurrences first. Lookup is
    /// case-insensitive to match the lowercased tokenizer output; ties are
    /// broken by URL so results are deterministic.
    pub fn matching_articles(&self, term: &str) -> Vec<(Article, usize)> {
        let postings = match self.postings.get(&term.to_lowercase()) {
            Some(postings) => postings,
            None => return Vec::new(),
        };

        let mut matches: Vec<(Article, usize)> = postings
            .iter()
            .map(|(article, count)| (article.clone(), *count))
            .collect();
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.url.cmp(&b.0.url)));
        matches
    }

    /// Number of distinct indexed tokens.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }
}
