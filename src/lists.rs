//! Loading of the two plain-text input lists.
//!
//! Both files hold one item per line. Surrounding whitespace is trimmed and
//! blank lines are ignored. Keywords are additionally lowercased. A missing
//! file is an error; an empty one is not, the caller decides what an empty
//! list means.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::feed::FeedSource;
use crate::matcher::KeywordSet;

#[derive(Debug, Error)]
pub enum ListError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

async fn read_list(path: &Path) -> Result<String, ListError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ListError::NotFound(path.to_path_buf())
        } else {
            ListError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Reads the source list at `path`. URLs are not validated.
pub async fn load_sources(path: &Path) -> Result<Vec<FeedSource>, ListError> {
    let content = read_list(path).await?;
    Ok(parse_sources(&content))
}

/// Reads the keyword list at `path`.
pub async fn load_keywords(path: &Path) -> Result<KeywordSet, ListError> {
    let content = read_list(path).await?;
    Ok(KeywordSet::from_lines(content.lines()))
}

/// Splits source list content into sources, keeping order and duplicates.
pub fn parse_sources(content: &str) -> Vec<FeedSource> {
    content.lines().filter_map(FeedSource::new).collect()
}
