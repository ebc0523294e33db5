use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use feed_rs::model::Link;
use feed_rs::parser;
use thiserror::Error;

use crate::util::strip_control_chars;

/// Feed XML (or JSON Feed) could not be parsed.
#[derive(Debug, Error)]
#[error("Parse error: {0}")]
pub struct ParseError(#[from] parser::ParseFeedError);

/// One usable entry of a feed.
///
/// Entries without a title or a link never become a `FeedEntry`; they are
/// counted in [`ParsedFeed::skipped`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    /// Summary text, or the content body when the feed has no summary. Empty if neither.
    pub description: String,
    /// RFC 2822 publish date, or [`FeedEntry::UNKNOWN_DATE`].
    pub published: String,
    pub link: String,
}

impl FeedEntry {
    pub const UNKNOWN_DATE: &'static str = "unknown date";
}

/// Entries of one feed in document order.
#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub entries: Vec<FeedEntry>,
    /// Entries dropped for lacking a title or link
    pub skipped: usize,
}

/// Parses RSS 0.9x/1.0/2.0, Atom or JSON Feed bytes into entries.
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed, ParseError> {
    let feed = parser::Builder::new()
        .timestamp_parser(parse_timestamp)
        .build()
        .parse(bytes)?;

    let mut parsed = ParsedFeed {
        entries: Vec::with_capacity(feed.entries.len()),
        skipped: 0,
    };

    for entry in feed.entries {
        let title = entry
            .title
            .map(|t| strip_control_chars(t.content.trim()).into_owned())
            .filter(|t| !t.is_empty());
        let link = article_link(&entry.links)
            .map(|l| l.href.trim().to_string())
            .filter(|l| !l.is_empty());

        let (Some(title), Some(link)) = (title, link) else {
            parsed.skipped += 1;
            continue;
        };

        let description = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .unwrap_or_default();
        let published = entry
            .published
            .map(format_published)
            .unwrap_or_else(|| FeedEntry::UNKNOWN_DATE.to_string());

        parsed.entries.push(FeedEntry {
            title,
            description,
            published,
            link,
        });
    }

    Ok(parsed)
}

/// The entry's own page: the first link without a `rel` or with
/// `rel="alternate"`, else whatever link comes first.
///
/// Atom entries often list `replies`, `edit` or `self` links before the
/// alternate one.
fn article_link(links: &[Link]) -> Option<&Link> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
}

/// Naive layouts seen in hand-written feeds, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%a, %d %b %Y %H:%M",
    "%A, %d %B %Y %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y", "%B %d, %Y"];

/// RFC 3339 and RFC 2822 first, then a handful of zone-less layouts.
///
/// A date none of these accept renders as [`FeedEntry::UNKNOWN_DATE`].
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    // Trailing zone names chrono's naive parsers do not read
    let text = ["GMT", "UTC", "UT", "Z"]
        .iter()
        .find_map(|zone| text.strip_suffix(zone))
        .map(str::trim_end)
        .unwrap_or(text);

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn format_published(dt: DateTime<Utc>) -> String {
    dt.to_rfc2822()
}
