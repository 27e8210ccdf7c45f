use crate::errors::{AggregatorError, AggregatorResult};

/// Worker counts and network settings, overridable through the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub feed_workers: usize,
    pub article_workers: usize,
    pub http_timeout_secs: u64,
}

const DEFAULT_FEED_WORKERS: usize = 8;
const DEFAULT_ARTICLE_WORKERS: usize = 64;
const DEFAULT_HTTP_TIMEOUT_SECS: usize = 30;

impl Config {
    pub fn from_env() -> AggregatorResult<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            feed_workers: read_count("NEWSREEL_FEED_WORKERS", DEFAULT_FEED_WORKERS)?,
            article_workers: read_count("NEWSREEL_ARTICLE_WORKERS", DEFAULT_ARTICLE_WORKERS)?,
            http_timeout_secs: read_count("NEWSREEL_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?
                as u64,
        })
    }
}

fn read_count(name: &str, default: usize) -> AggregatorResult<usize> {
    match std::env::var(name) {
        Ok(raw) => match raw.parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(AggregatorError::Config(format!(
                "{name} must be a positive integer, got \"{raw}\""
            ))),
        },
        Err(_) => Ok(default),
    }
}
