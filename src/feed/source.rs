use std::fmt;
use thiserror::Error;

use crate::feed::fetcher::{FetchError, HttpFetcher};
use crate::feed::parser::{parse_feed, ParseError};
use crate::matcher::{match_entry, KeywordSet};

/// One feed URL, taken literally from the source list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedSource(String);

impl FeedSource {
    /// Returns `None` for a blank string. The URL syntax is not checked.
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        let trimmed = url.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == url.len() {
            Some(Self(url))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A feed entry that contained one of the keywords.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchedArticle {
    pub title: String,
    pub published: String,
    pub link: String,
    /// The keyword that triggered the match
    pub keyword: String,
}

/// Why a source contributed nothing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Fetches, parses and matches one source, surfacing the failure cause.
///
/// Matches are returned in feed order. Entries without a title or link are
/// dropped by the parser and never reach the matcher.
#[tracing::instrument(name = "source", level = "info", skip_all, fields(url = %source))]
pub async fn try_scan_source(
    fetcher: &HttpFetcher,
    source: &FeedSource,
    keywords: &KeywordSet,
) -> Result<Vec<MatchedArticle>, SourceError> {
    let bytes = fetcher.fetch(source.as_str()).await?;
    let parsed = parse_feed(&bytes)?;

    let matched: Vec<MatchedArticle> = parsed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let keyword = match_entry(&entry, keywords)?.to_string();
            Some(MatchedArticle {
                title: entry.title,
                published: entry.published,
                link: entry.link,
                keyword,
            })
        })
        .collect();

    tracing::debug!(
        matched = matched.len(),
        skipped = parsed.skipped,
        "Source scanned"
    );

    Ok(matched)
}

/// Scans one source and never fails: a fetch or parse error is logged as a
/// warning naming the URL and yields no articles.
pub async fn scan_source(
    fetcher: &HttpFetcher,
    source: &FeedSource,
    keywords: &KeywordSet,
) -> Vec<MatchedArticle> {
    match try_scan_source(fetcher, source, keywords).await {
        Ok(matched) => matched,
        Err(e) => {
            log_source_failure(source, &e);
            Vec::new()
        }
    }
}

pub(crate) fn log_source_failure(source: &FeedSource, error: &SourceError) {
    match error {
        SourceError::Fetch(e) => {
            tracing::warn!(url = %source, error = %e, "Failed to fetch feed");
        }
        SourceError::Parse(e) => {
            tracing::warn!(url = %source, error = %e, "Failed to parse feed");
        }
    }
}
