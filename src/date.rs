//! The partial-date value every technique produces.
//!
//! An [`ExtractedDate`] is a calendar date where any field from year down to
//! second may be unknown, together with where it came from: the raw text,
//! the catalog format that recognized it and a [`DateContext`] describing
//! the technique and its technique-specific details.
//!
//! ## Example
//!
//! ```rust
//! use pagedaters::normalize;
//!
//! let date = normalize("2020-01-01T23:30:00+02:00", "ISO-YMD-T").unwrap();
//! assert_eq!(date.exactness(), 6);
//! assert_eq!(date.normalized_string(), "2020-01-01 21:30:00");
//! ```

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The extraction strategy that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    Url,
    HttpHeader,
    HtmlHead,
    HtmlStructure,
    BodyContent,
    Reference,
    Archive,
}

impl Technique {
    pub fn as_str(&self) -> &'static str {
        match self {
            Technique::Url => "url",
            Technique::HttpHeader => "http_header",
            Technique::HtmlHead => "html_head",
            Technique::HtmlStructure => "html_structure",
            Technique::BodyContent => "body_content",
            Technique::Reference => "reference",
            Technique::Archive => "archive",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named exactness levels, used to compare dates inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Exactness {
    Year = 1,
    Month = 2,
    Day = 3,
    Hour = 4,
    Minute = 5,
    Second = 6,
}

impl Exactness {
    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Where a keyword for a body-content candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordLocation {
    /// On an attribute of the tag that owns the text
    Attribute,
    /// In the text around the date
    Text,
}

/// Numeric features computed for a body-content candidate.
///
/// These are produced by [`score_body_content_candidates`](crate::score_body_content_candidates)
/// and consumed by an external ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFeatures {
    /// `1 / number of body-content candidates`
    pub relative_size: f64,
    /// Rank in document order over candidates with a known position
    pub ordinal_position_percentile: Option<f64>,
    /// Rank in chronological order over all candidates
    pub ordinal_age_percentile: f64,
    /// Equal at day exactness to a head or header date
    pub in_meta_dates: bool,
    /// Equal at day exactness to a URL date
    pub in_url_date: bool,
    /// Share of candidates equal to this one at day exactness
    pub relative_frequency: f64,
    pub distance_to_preceding_in_position: Option<usize>,
    pub distance_to_following_in_position: Option<usize>,
    /// Whole hours to the chronologically preceding candidate
    pub distance_to_preceding_in_age: Option<i64>,
    /// Whole hours to the chronologically following candidate
    pub distance_to_following_in_age: Option<i64>,
    /// `1 / (1 + keyword distance)`, `0.0` without a keyword
    pub keyword_decay: f64,
    pub keyword_class: Option<u8>,
    pub exactness: u8,
    pub is_headline_tag: bool,
}

/// Context recorded for a body-content candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentContext {
    pub keyword: Option<String>,
    /// Priority class of the keyword (1 = publication, 2 = modification, 3 = generic)
    pub keyword_class: Option<u8>,
    pub keyword_location: Option<KeywordLocation>,
    /// Whitespace-separated tokens between keyword and date
    pub keyword_distance: Option<usize>,
    /// Character offset in the rendered body text, `None` when it could not be located
    pub document_offset: Option<usize>,
    pub tag_name: String,
    pub is_headline_tag: bool,
    pub features: Option<ContentFeatures>,
}

/// Technique-specific provenance of a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "technique", rename_all = "snake_case")]
pub enum DateContext {
    /// Freshly normalized, not yet attributed to a technique
    Parsed,
    Url {
        url: String,
    },
    HttpHeader {
        header: String,
    },
    HtmlHead {
        keyword: String,
        tag_name: String,
    },
    HtmlStructure {
        keyword: Option<String>,
        attribute: String,
        tag_name: String,
        structural_depth: usize,
    },
    BodyContent(Box<ContentContext>),
    Reference {
        link: String,
        rate: f64,
    },
    Archive {
        snapshot_url: String,
    },
}

impl DateContext {
    pub fn technique(&self) -> Option<Technique> {
        match self {
            DateContext::Parsed => None,
            DateContext::Url { .. } => Some(Technique::Url),
            DateContext::HttpHeader { .. } => Some(Technique::HttpHeader),
            DateContext::HtmlHead { .. } => Some(Technique::HtmlHead),
            DateContext::HtmlStructure { .. } => Some(Technique::HtmlStructure),
            DateContext::BodyContent(_) => Some(Technique::BodyContent),
            DateContext::Reference { .. } => Some(Technique::Reference),
            DateContext::Archive { .. } => Some(Technique::Archive),
        }
    }
}

/// A date recognized in some part of a page.
///
/// Every field from `year` to `second` is independently optional. A value is
/// built by [`normalize`](crate::normalize), attributed by the technique
/// that found it and is not changed afterwards, except that the scoring
/// stage fills in [`ContentContext::features`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    /// Set only while a UTC offset could not be applied (no full date and hour)
    pub utc_offset_minutes: Option<i32>,
    pub raw_text: String,
    pub format_id: String,
    pub context: DateContext,
}

impl ExtractedDate {
    pub(crate) fn unattributed(raw_text: &str, format_id: &str) -> Self {
        Self {
            year: None,
            month: None,
            day: None,
            hour: None,
            minute: None,
            second: None,
            utc_offset_minutes: None,
            raw_text: raw_text.to_string(),
            format_id: format_id.to_string(),
            context: DateContext::Parsed,
        }
    }

    /// Attach the technique context.
    pub fn with_context(mut self, context: DateContext) -> Self {
        self.context = context;
        self
    }

    pub fn technique(&self) -> Option<Technique> {
        self.context.technique()
    }

    /// Fields from most to least significant.
    pub(crate) fn fields(&self) -> [Option<i64>; 6] {
        [
            self.year.map(i64::from),
            self.month.map(i64::from),
            self.day.map(i64::from),
            self.hour.map(i64::from),
            self.minute.map(i64::from),
            self.second.map(i64::from),
        ]
    }

    /// Number of populated fields counted from the year down, stopping at the first gap.
    pub fn exactness(&self) -> u8 {
        self.fields().iter().take_while(|f| f.is_some()).count() as u8
    }

    pub fn is_full_date(&self) -> bool {
        self.exactness() >= Exactness::Day.level()
    }

    /// `YYYY-MM-DD HH:MM:SS`, cut after the last field before the first gap.
    pub fn normalized_string(&self) -> String {
        self.render(self.exactness())
    }

    /// Like [`normalized_string`](Self::normalized_string), but never more
    /// precise than `exactness`.
    pub fn normalized_at(&self, exactness: Exactness) -> String {
        self.render(self.exactness().min(exactness.level()))
    }

    fn render(&self, depth: u8) -> String {
        let fields = self.fields();
        let mut out = String::new();
        for (i, value) in fields.iter().take(depth as usize).enumerate() {
            let Some(value) = value else { break };
            match i {
                0 => out.push_str(&format!("{:04}", value)),
                1 | 2 => out.push_str(&format!("-{:02}", value)),
                3 => out.push_str(&format!(" {:02}", value)),
                _ => out.push_str(&format!(":{:02}", value)),
            }
        }
        out
    }

    /// Calendar date, when year, month and day are all known.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }

    /// Timestamp with unknown fields filled with their smallest value.
    ///
    /// Returns `None` without a year.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(
            self.year?,
            self.month.unwrap_or(1),
            self.day.unwrap_or(1),
        )?;
        let time = NaiveTime::from_hms_opt(
            self.hour.unwrap_or(0),
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
        )?;
        Some(date.and_time(time))
    }

    pub fn content(&self) -> Option<&ContentContext> {
        match &self.context {
            DateContext::BodyContent(ctx) => Some(ctx),
            _ => None,
        }
    }

    pub(crate) fn content_mut(&mut self) -> Option<&mut ContentContext> {
        match &mut self.context {
            DateContext::BodyContent(ctx) => Some(ctx),
            _ => None,
        }
    }

    pub fn document_offset(&self) -> Option<usize> {
        self.content().and_then(|ctx| ctx.document_offset)
    }

    pub fn features(&self) -> Option<&ContentFeatures> {
        self.content().and_then(|ctx| ctx.features.as_ref())
    }

    /// Keyword recorded by whichever technique produced the date.
    pub fn keyword(&self) -> Option<&str> {
        match &self.context {
            DateContext::HttpHeader { header } => Some(header),
            DateContext::HtmlHead { keyword, .. } => Some(keyword),
            DateContext::HtmlStructure { keyword, .. } => keyword.as_deref(),
            DateContext::BodyContent(ctx) => ctx.keyword.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for ExtractedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized_string())
    }
}
