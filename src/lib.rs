//! # feedscan
//!
//! Fetches a list of RSS/Atom feeds concurrently, keeps the entries whose
//! title or description contains one of a set of keywords, and publishes the
//! merged result to the console and a pipe-delimited report file.
//!
//! ```text
//! sources + keywords → pipeline ─┬─ source task (fetch → parse → match)
//!                                ├─ source task
//!                                └─ ...           → ResultAggregate → sinks
//! ```
//!
//! - [`config`]: layered settings (defaults, TOML file, CLI flags)
//! - [`lists`]: loading of the source and keyword list files
//! - [`matcher`]: the keyword match rule
//! - [`feed`]: HTTP fetching, feed parsing and the per-source task
//! - [`pipeline`]: bounded fan-out over all sources and result aggregation
//! - [`report`]: console and report-file sinks
//! - [`run`]: one complete run from the input files to both sinks

mod app;
pub mod config;
pub mod feed;
pub mod lists;
pub mod matcher;
pub mod pipeline;
pub mod report;
pub mod util;

pub use app::{run, RunError};
