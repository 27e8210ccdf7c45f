use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use scraper::Html;

use crate::errors::AggregatorResult;
use crate::sources::traits::DocumentSource;

/// Fetches an article document and tokenizes its visible text.
pub struct HtmlDocumentSource {
    client: Client,
    token_pattern: Regex,
}

impl HtmlDocumentSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            token_pattern: Regex::new(r"[a-z0-9]+").unwrap(),
        }
    }

    /// Extract plain text from an HTML document, skipping script and style
    /// subtrees.
    fn extract_text(html: &str) -> String {
        let document = Html::parse_document(html);
        let mut text = String::new();

        for node in document.root_element().descendants() {
            if let Some(text_node) = node.value().as_text() {
                let in_markup = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .map_or(false, |element| matches!(element.name(), "script" | "style"))
                });
                if !in_markup {
                    text.push_str(text_node);
                    text.push(' ');
                }
            }
        }

        text
    }

    /// Lowercase the text and split it into word tokens, duplicates
    /// preserved in document order.
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_pattern
            .find_iter(&lowered)
            .map(|word| word.as_str().to_string())
            .collect()
    }
}

impl DocumentSource for HtmlDocumentSource {
    fn fetch_tokens(&self, url: &str) -> AggregatorResult<Vec<String>> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let body = response.text()?;

        Ok(self.tokenize(&Self::extract_text(&body)))
    }
}
