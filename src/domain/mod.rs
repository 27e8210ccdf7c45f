pub mod article;
pub mod feed;

pub use article::Article;
pub use feed::FeedDescriptor;

use url::Url;

/// Scheme-and-host prefix of a URL, used to group articles served from the
/// same origin under different paths. A URL that does not parse is its own
/// (degenerate but stable) server key.
pub fn url_to_server(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => format!("{}://{}", parsed.scheme(), parsed.host_str().unwrap_or("")),
        Err(_) => url.to_string(),
    }
}
