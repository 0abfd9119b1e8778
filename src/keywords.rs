//! Keyword dictionaries used to give date candidates context.
//!
//! Keywords are plain data: [`Keywords::default`] builds the built-in tables
//! and callers may replace any of them through
//! [`DaterOptionsBuilder::keywords`](crate::DaterOptionsBuilder::keywords).
//! Techniques receive the tables by reference.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Publication keywords
pub const CLASS_PUBLISHED: u8 = 1;
/// Modification keywords
pub const CLASS_MODIFIED: u8 = 2;
/// Generic date words
pub const CLASS_GENERIC: u8 = 3;

/// An ordered keyword list where each entry carries a priority class.
///
/// Order is priority: when several keywords occur in the same string, the
/// one listed first wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTable {
    entries: Vec<(String, u8)>,
}

impl KeywordTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, class)| (k.into().to_lowercase(), class))
                .collect(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u8)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Class of a keyword that equals `word` ignoring case.
    pub fn class_of(&self, word: &str) -> Option<u8> {
        let word = word.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == word)
            .map(|(_, class)| *class)
    }

    /// Highest-priority keyword contained (case-insensitively) in any of `haystacks`.
    pub fn find_in<'k>(&'k self, haystacks: &[&str]) -> Option<(&'k str, u8)> {
        let lowered: Vec<String> = haystacks.iter().map(|h| h.to_lowercase()).collect();
        self.entries
            .iter()
            .find(|(k, _)| lowered.iter().any(|h| h.contains(k.as_str())))
            .map(|(k, class)| (k.as_str(), *class))
    }

    /// Case-insensitive regex matching any keyword as a whole word, longest first.
    pub(crate) fn word_regex(&self) -> Option<Regex> {
        if self.entries.is_empty() {
            return None;
        }
        let mut words: Vec<&str> = self.entries.iter().map(|(k, _)| k.as_str()).collect();
        words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).ok()
    }
}

/// All keyword dictionaries used by the techniques.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keywords {
    /// Response headers carrying dates, in priority order
    pub http_headers: Vec<String>,
    /// `<meta>` names / properties and JSON-LD keys carrying dates
    pub head: KeywordTable,
    /// Attribute names and values marking dates in the body structure
    pub structure: KeywordTable,
    /// Words announcing a date in running text or on a tag's attributes
    pub content: KeywordTable,
}

impl Default for Keywords {
    fn default() -> Self {
        DEFAULT_KEYWORDS.clone()
    }
}

static DEFAULT_KEYWORDS: Lazy<Keywords> = Lazy::new(|| Keywords {
    http_headers: vec!["last-modified".to_string(), "date".to_string()],
    head: KeywordTable::new([
        ("article:published_time", CLASS_PUBLISHED),
        ("og:published_time", CLASS_PUBLISHED),
        ("datepublished", CLASS_PUBLISHED),
        ("pubdate", CLASS_PUBLISHED),
        ("publishdate", CLASS_PUBLISHED),
        ("publish_date", CLASS_PUBLISHED),
        ("publish-date", CLASS_PUBLISHED),
        ("published", CLASS_PUBLISHED),
        ("date_published", CLASS_PUBLISHED),
        ("original-publish-date", CLASS_PUBLISHED),
        ("parsely-pub-date", CLASS_PUBLISHED),
        ("sailthru.date", CLASS_PUBLISHED),
        ("dc.date.issued", CLASS_PUBLISHED),
        ("dcterms.issued", CLASS_PUBLISHED),
        ("dc.date.created", CLASS_PUBLISHED),
        ("dcterms.created", CLASS_PUBLISHED),
        ("datecreated", CLASS_PUBLISHED),
        ("uploaddate", CLASS_PUBLISHED),
        ("created", CLASS_PUBLISHED),
        ("issued", CLASS_PUBLISHED),
        ("article:modified_time", CLASS_MODIFIED),
        ("og:updated_time", CLASS_MODIFIED),
        ("datemodified", CLASS_MODIFIED),
        ("dc.date.modified", CLASS_MODIFIED),
        ("dcterms.modified", CLASS_MODIFIED),
        ("last-modified", CLASS_MODIFIED),
        ("lastmod", CLASS_MODIFIED),
        ("modified", CLASS_MODIFIED),
        ("revised", CLASS_MODIFIED),
        ("date", CLASS_GENERIC),
        ("dc.date", CLASS_GENERIC),
        ("dcterms.date", CLASS_GENERIC),
        ("timestamp", CLASS_GENERIC),
    ]),
    structure: KeywordTable::new([
        ("datepublished", CLASS_PUBLISHED),
        ("published", CLASS_PUBLISHED),
        ("publish", CLASS_PUBLISHED),
        ("pubdate", CLASS_PUBLISHED),
        ("posted", CLASS_PUBLISHED),
        ("released", CLASS_PUBLISHED),
        ("datecreated", CLASS_PUBLISHED),
        ("created", CLASS_PUBLISHED),
        ("datemodified", CLASS_MODIFIED),
        ("modified", CLASS_MODIFIED),
        ("updated", CLASS_MODIFIED),
        ("update", CLASS_MODIFIED),
        ("changed", CLASS_MODIFIED),
        ("revised", CLASS_MODIFIED),
        ("datetime", CLASS_GENERIC),
        ("timestamp", CLASS_GENERIC),
        ("date", CLASS_GENERIC),
        ("time", CLASS_GENERIC),
    ]),
    content: KeywordTable::new([
        ("published", CLASS_PUBLISHED),
        ("publication date", CLASS_PUBLISHED),
        ("posted", CLASS_PUBLISHED),
        ("released", CLASS_PUBLISHED),
        ("created", CLASS_PUBLISHED),
        ("veröffentlicht", CLASS_PUBLISHED),
        ("erstellt", CLASS_PUBLISHED),
        ("pubdate", CLASS_PUBLISHED),
        ("last modified", CLASS_MODIFIED),
        ("last updated", CLASS_MODIFIED),
        ("modified", CLASS_MODIFIED),
        ("updated", CLASS_MODIFIED),
        ("revised", CLASS_MODIFIED),
        ("aktualisiert", CLASS_MODIFIED),
        ("geändert", CLASS_MODIFIED),
        ("date", CLASS_GENERIC),
        ("datum", CLASS_GENERIC),
        ("copyright", CLASS_GENERIC),
    ]),
});
