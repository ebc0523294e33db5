//! Keyword matching for feed entries.
//!
//! A keyword matches when it occurs anywhere in the lowercased title and
//! description, including inside a longer word: `"rust"` matches
//! `"Trust fund grows"`.

use crate::feed::FeedEntry;

/// Ordered, lowercase, non-blank keywords.
///
/// Order is significant: when several keywords occur in one entry, the
/// earliest one in the set is reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Builds a set from raw lines: each line is trimmed and lowercased,
    /// blank lines are dropped. Duplicates are kept as given.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = lines
            .into_iter()
            .filter_map(|line| {
                let trimmed = line.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
            })
            .collect();
        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Returns the first keyword contained in `text`.
    ///
    /// `text` must already be lowercased.
    fn first_in<'k>(&'k self, text: &str) -> Option<&'k str> {
        self.iter().find(|keyword| text.contains(keyword))
    }
}

impl std::fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.keywords.join(", "))
    }
}

/// Returns the first keyword of `keywords` found in the entry's title or
/// description, or `None` when no keyword occurs.
pub fn match_entry<'k>(entry: &FeedEntry, keywords: &'k KeywordSet) -> Option<&'k str> {
    let mut haystack =
        String::with_capacity(entry.title.len() + 1 + entry.description.len());
    haystack.push_str(&entry.title.to_lowercase());
    haystack.push(' ');
    haystack.push_str(&entry.description.to_lowercase());

    keywords.first_in(&haystack)
}
