//! One complete run: input lists → pipeline → console and report sinks.
//!
//! The report is only touched once the pipeline returned, so a run that
//! aborts on its inputs leaves any previous report as it was.

use std::io::Write;
use std::time::Instant;
use thiserror::Error;

use crate::config::Config;
use crate::feed::{FetchError, HttpFetcher};
use crate::lists::{load_keywords, load_sources, ListError};
use crate::pipeline::{self, PipelineError, ResultAggregate};
use crate::report::{ConsoleSink, ReportFile, Sink, SinkError};

/// Why a run stopped before publishing.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Cannot load source list")]
    Sources(#[source] ListError),

    #[error("Cannot load keyword list")]
    Keywords(#[source] ListError),

    #[error("Failed to build HTTP client")]
    Client(#[from] FetchError),

    #[error("Input files are missing or empty")]
    Input(#[from] PipelineError),

    #[error(transparent)]
    Output(#[from] SinkError),
}

/// Runs the whole scan described by `config`.
///
/// Matches go to `console` first, then to the report file. Logs the input
/// sizes at start and the elapsed time at the end.
///
/// # Errors
///
/// Missing list files, an empty source or keyword list, and sink failures.
/// Individual feed failures are not errors; they are listed in
/// [`ResultAggregate::failed`].
pub async fn run<W: Write>(config: &Config, console: W) -> Result<ResultAggregate, RunError> {
    let started = Instant::now();

    let sources = load_sources(&config.sources_path)
        .await
        .map_err(RunError::Sources)?;
    let keywords = load_keywords(&config.keywords_path)
        .await
        .map_err(RunError::Keywords)?;

    tracing::info!(sources = sources.len(), "Feeds to scan");
    tracing::info!(keywords = %keywords, "Keywords in use");

    let fetcher = HttpFetcher::new(
        &config.user_agent,
        config.fetch_timeout(),
        config.max_feed_bytes,
    )?;

    let aggregate =
        pipeline::run(&fetcher, &sources, &keywords, &config.pipeline_options()).await?;

    ConsoleSink::new(console).publish(&aggregate)?;
    ReportFile::new(&config.report_path).publish(&aggregate)?;

    tracing::info!(
        matched = aggregate.len(),
        failed = aggregate.failed().len(),
        "Total run time: {:.2} seconds",
        started.elapsed().as_secs_f64()
    );

    Ok(aggregate)
}
