//! Output sinks for a finished run.
//!
//! Sinks receive the aggregate once, after every source task settled.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::feed::MatchedArticle;
use crate::pipeline::ResultAggregate;
use crate::util::single_line;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write console output: {0}")]
    Console(#[source] io::Error),

    #[error("Failed to write report '{}': {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Consumer of a finished [`ResultAggregate`].
pub trait Sink {
    fn publish(&mut self, aggregate: &ResultAggregate) -> Result<(), SinkError>;
}

/// `[keyword] title (published)`, the link on the next line, then a blank line.
///
/// Each field is folded to one line so the block keeps its shape.
pub fn console_block(article: &MatchedArticle) -> String {
    format!(
        "[{}] {} ({})\n{}\n\n",
        single_line(&article.keyword),
        single_line(&article.title),
        single_line(&article.published),
        single_line(&article.link),
    )
}

/// `title | published | link | keyword`, always a single line.
pub fn report_line(article: &MatchedArticle) -> String {
    format!(
        "{} | {} | {} | {}\n",
        single_line(&article.title),
        single_line(&article.published),
        single_line(&article.link),
        single_line(&article.keyword),
    )
}

/// Writes one block per article to any writer (stdout in the binary).
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn publish(&mut self, aggregate: &ResultAggregate) -> Result<(), SinkError> {
        for article in aggregate.articles() {
            self.out
                .write_all(console_block(article).as_bytes())
                .map_err(SinkError::Console)?;
        }
        self.out.flush().map_err(SinkError::Console)
    }
}

/// Pipe-delimited report file, replaced atomically on every publish.
///
/// The content is written to a temporary sibling file, synced, then renamed
/// over the destination, so readers see either the previous report or the
/// complete new one.
pub struct ReportFile {
    path: PathBuf,
}

impl ReportFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_atomic(&self, aggregate: &ResultAggregate) -> io::Result<()> {
        // Unpredictable temp name, and create_new refuses to follow a planted file
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let temp_path = self.path.with_extension(format!("tmp.{:016x}", suffix));

        let result = write_then_rename(&temp_path, &self.path, aggregate);
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

fn write_then_rename(temp_path: &Path, dest: &Path, aggregate: &ResultAggregate) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)?;
    let mut writer = BufWriter::new(file);
    for article in aggregate.articles() {
        writer.write_all(report_line(article).as_bytes())?;
    }
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);

    // On Windows, rename fails if the destination exists
    #[cfg(windows)]
    if dest.exists() {
        fs::remove_file(dest)?;
    }

    fs::rename(temp_path, dest)
}

impl Sink for ReportFile {
    fn publish(&mut self, aggregate: &ResultAggregate) -> Result<(), SinkError> {
        self.write_atomic(aggregate).map_err(|source| SinkError::Report {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(
            path = %self.path.display(),
            articles = aggregate.len(),
            "Report written"
        );
        Ok(())
    }
}
