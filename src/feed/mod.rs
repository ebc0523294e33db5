//! Retrieval and scanning of individual feeds.
//!
//! - [`fetcher`] - HTTP retrieval with a timeout and a body size cap
//! - [`parser`] - RSS/Atom/JSON Feed parsing via the `feed-rs` crate
//! - [`source`] - the per-source task: fetch, parse, then match each entry
//!
//! # Example
//!
//! ```ignore
//! use feedscan::feed::{scan_source, FeedSource, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new("feedscan", timeout, max_size)?;
//! let source = FeedSource::new("https://blog.rust-lang.org/feed.xml").unwrap();
//! let articles = scan_source(&fetcher, &source, &keywords).await;
//! ```

mod fetcher;
mod parser;
mod source;

pub use fetcher::{FetchError, HttpFetcher, DEFAULT_MAX_FEED_SIZE, DEFAULT_TIMEOUT};
pub use parser::{parse_feed, FeedEntry, ParseError, ParsedFeed};
pub use source::{scan_source, try_scan_source, FeedSource, MatchedArticle, SourceError};

pub(crate) use source::log_source_failure;
