use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregatorError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Feed list errors
    #[error("Feed list fetch failed: {0}")]
    FeedListFetch(String),

    #[error("Feed list parsing failed: {0}")]
    FeedListParse(String),

    // Feed errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    // Article document errors
    #[error("Document parsing failed: {0}")]
    DocumentParse(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AggregatorResult<T> = Result<T, AggregatorError>;
