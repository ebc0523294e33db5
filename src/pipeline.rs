//! Fan-out of one source task per feed and fan-in of their matches.
//!
//! Source tasks run as cooperative futures on the calling task, at most
//! [`PipelineOptions::concurrency`] at a time. They suspend only while
//! fetching; parsing and matching run to completion. The coordinating future
//! is the single consumer of their results, so the aggregate is never shared
//! and appends cannot interleave.

use futures::stream::{self, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::instrument;

use crate::feed::{log_source_failure, try_scan_source, FeedSource, HttpFetcher, MatchedArticle};
use crate::matcher::KeywordSet;

/// Default number of sources fetched at once.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// The run cannot start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Source list is empty")]
    NoSources,
    #[error("Keyword list is empty")]
    NoKeywords,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum number of in-flight source tasks (values below 1 are treated as 1)
    pub concurrency: usize,
    /// Global deadline for the whole run. Sources unfinished when it passes
    /// are abandoned and recorded as failed.
    pub deadline: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            deadline: None,
        }
    }
}

/// A source that contributed nothing because it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedSource {
    pub source: FeedSource,
    pub reason: String,
}

/// Every match of one run.
///
/// Articles from one source keep that feed's entry order; blocks from
/// different sources appear in completion order.
#[derive(Debug, Default)]
pub struct ResultAggregate {
    articles: Vec<MatchedArticle>,
    failed: Vec<FailedSource>,
}

impl ResultAggregate {
    fn append(&mut self, matched: Vec<MatchedArticle>) {
        self.articles.extend(matched);
    }

    fn record_failure(&mut self, source: FeedSource, reason: String) {
        self.failed.push(FailedSource { source, reason });
    }

    pub fn articles(&self) -> &[MatchedArticle] {
        &self.articles
    }

    pub fn failed(&self) -> &[FailedSource] {
        &self.failed
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn into_articles(self) -> Vec<MatchedArticle> {
        self.articles
    }
}

impl From<Vec<MatchedArticle>> for ResultAggregate {
    fn from(articles: Vec<MatchedArticle>) -> Self {
        Self {
            articles,
            failed: Vec::new(),
        }
    }
}

enum Settled {
    Scanned(Vec<MatchedArticle>),
    Failed(String),
    DeadlineExceeded,
}

/// Runs one source task per entry of `sources` and merges their matches.
///
/// Waits for every task to settle (or for the deadline) before returning.
/// A failing source never fails the run; it is logged as a warning and
/// listed in [`ResultAggregate::failed`].
///
/// # Errors
///
/// [`PipelineError::NoSources`] or [`PipelineError::NoKeywords`] when either
/// input is empty. Nothing is fetched in that case.
#[instrument(
    name = "pipeline",
    level = "info",
    skip_all,
    fields(sources = sources.len(), concurrency = options.concurrency)
)]
pub async fn run(
    fetcher: &HttpFetcher,
    sources: &[FeedSource],
    keywords: &KeywordSet,
    options: &PipelineOptions,
) -> Result<ResultAggregate, PipelineError> {
    if sources.is_empty() {
        return Err(PipelineError::NoSources);
    }
    if keywords.is_empty() {
        return Err(PipelineError::NoKeywords);
    }

    let total = sources.len();
    let deadline = options.deadline.map(|d| Instant::now() + d);

    let mut settled = stream::iter(sources)
        .map(|source| async move {
            let scan = async {
                match try_scan_source(fetcher, source, keywords).await {
                    Ok(matched) => Settled::Scanned(matched),
                    Err(e) => {
                        log_source_failure(source, &e);
                        Settled::Failed(e.to_string())
                    }
                }
            };
            let outcome = match deadline {
                Some(at) => tokio::time::timeout_at(at, scan).await.unwrap_or_else(|_| {
                    tracing::warn!(url = %source, "Run deadline passed before feed finished");
                    Settled::DeadlineExceeded
                }),
                None => scan.await,
            };
            (source, outcome)
        })
        .buffer_unordered(options.concurrency.max(1));

    let mut aggregate = ResultAggregate::default();
    let mut done = 0usize;

    while let Some((source, outcome)) = settled.next().await {
        done += 1;
        match outcome {
            Settled::Scanned(matched) => {
                tracing::debug!(url = %source, matched = matched.len(), done, total, "Source settled");
                aggregate.append(matched);
            }
            Settled::Failed(reason) => {
                aggregate.record_failure(source.clone(), reason);
            }
            Settled::DeadlineExceeded => {
                aggregate.record_failure(source.clone(), "run deadline exceeded".to_string());
            }
        }
    }

    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{DEFAULT_MAX_FEED_SIZE, DEFAULT_TIMEOUT};
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new("feedscan-test", DEFAULT_TIMEOUT, DEFAULT_MAX_FEED_SIZE).unwrap()
    }

    #[tokio::test]
    async fn test_empty_sources_rejected_without_fetching() {
        let keywords = KeywordSet::from_lines(["rust"]);
        let result = run(&fetcher(), &[], &keywords, &PipelineOptions::default()).await;
        assert_eq!(result.unwrap_err(), PipelineError::NoSources);
    }

    #[tokio::test]
    async fn test_empty_keywords_rejected_without_fetching() {
        let mock_server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let sources = vec![FeedSource::new(mock_server.uri()).unwrap()];
        let keywords = KeywordSet::from_lines(Vec::<String>::new());
        let result = run(&fetcher(), &sources, &keywords, &PipelineOptions::default()).await;
        assert_eq!(result.unwrap_err(), PipelineError::NoKeywords);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let mock_server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let sources = vec![FeedSource::new(mock_server.uri()).unwrap()];
        let keywords = KeywordSet::from_lines(["rust"]);
        let options = PipelineOptions {
            concurrency: 0,
            deadline: None,
        };

        let aggregate = run(&fetcher(), &sources, &keywords, &options).await.unwrap();
        assert!(aggregate.is_empty());
        assert_eq!(aggregate.failed().len(), 1);
        assert!(aggregate.failed()[0].reason.contains("404"));
    }
}
