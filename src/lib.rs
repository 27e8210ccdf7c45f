//! Concurrent news-aggregation crawler.
//!
//! Reads a feed list, fetches every feed and every article with two
//! bounded worker pools, merges near-duplicate articles by server and
//! title, and builds an inverted index for interactive term lookup.

pub mod cli;
pub mod config;
pub mod crawler;
pub mod domain;
pub mod errors;
pub mod index;
pub mod logging;
pub mod pool;
pub mod sources;
