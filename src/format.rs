//! The catalog of recognized date formats.
//!
//! Each [`DateFormat`] pairs a case-insensitive pattern with the recipe the
//! normalizer uses to turn the matched text into fields. The catalog is
//! ordered from most to least specific; scanning a text with
//! [`FormatCatalog::match_all`] yields non-overlapping matches where earlier
//! formats win.
//!
//! ## Example
//!
//! ```rust
//! use pagedaters::FormatCatalog;
//!
//! let catalog = FormatCatalog::global();
//! let found: Vec<_> = catalog
//!     .match_all("Posted 2012-04-30, updated June 1, 2021")
//!     .map(|m| (m.format_id(), m.as_str()))
//!     .collect();
//! assert_eq!(found, vec![("ISO-YMD", "2012-04-30"), ("USA-MMMM-D-Y", "June 1, 2021")]);
//! ```

use crate::constants::{
    AM_PM_PATTERN, HTTP_MONTH_PATTERN, HTTP_WEEKDAY_LONG_PATTERN, HTTP_WEEKDAY_PATTERN,
    HTTP_ZONE_PATTERN, MONTH_PATTERN, TEXT_ZONE_PATTERN, TIME_PATTERN, ZONE_PATTERN,
};
use crate::date::ExtractedDate;
use crate::error::Result;
use bitflags::bitflags;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

bitflags! {
    /// Input surfaces a format applies to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatGroups: u8 {
        /// Free text: body, head metadata, attributes
        const GENERAL = 1;
        /// URL strings
        const URL = 1 << 1;
        /// HTTP header values
        const HTTP = 1 << 2;
    }
}

/// One field slot of a positional recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Part {
    Year,
    Month,
    Day,
    /// Month given by name
    MonthName,
    /// ISO week number
    Week,
    /// ISO weekday, 1 = Monday
    Weekday,
    /// Day of year
    Ordinal,
}

/// How the normalizer assigns fields for a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Recipe {
    /// Numeric tokens fill the numeric parts in order; a month name fills `MonthName`
    Positional(&'static [Part]),
    /// The digits of the date part are cut into fixed-width fields
    FixedWidth(&'static [(Part, usize)]),
}

/// A named date grammar.
#[derive(Debug)]
pub struct DateFormat {
    id: &'static str,
    groups: FormatGroups,
    regex: Regex,
    pub(crate) recipe: Recipe,
    pub(crate) has_time: bool,
}

impl DateFormat {
    fn new(
        id: &'static str,
        groups: FormatGroups,
        pattern: &str,
        recipe: Recipe,
        has_time: bool,
    ) -> Self {
        Self {
            id,
            groups,
            regex: Regex::new(&format!("(?i){}", pattern)).unwrap(),
            recipe,
            has_time,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn groups(&self) -> FormatGroups {
        self.groups
    }

    /// Whether the format carries a time of day.
    pub fn has_time(&self) -> bool {
        self.has_time
    }

    /// ISO date-times may put a signed offset right after the time.
    pub(crate) fn allows_bare_offset(&self) -> bool {
        self.id.starts_with("ISO-")
    }
}

use Part::*;

const YMD: &[Part] = &[Year, Month, Day];
const DMY: &[Part] = &[Day, Month, Year];
const MDY: &[Part] = &[Month, Day, Year];
const YM: &[Part] = &[Year, Month];
const MY: &[Part] = &[Month, Year];
const D_NAME_Y: &[Part] = &[Day, MonthName, Year];
const NAME_D_Y: &[Part] = &[MonthName, Day, Year];
const Y_NAME_D: &[Part] = &[Year, MonthName, Day];
const NAME_Y: &[Part] = &[MonthName, Year];
const D_NAME: &[Part] = &[Day, MonthName];
const NAME_D: &[Part] = &[MonthName, Day];
const ISO_WEEK_DAY: &[(Part, usize)] = &[(Year, 4), (Week, 2), (Weekday, 1)];
const ISO_WEEK: &[(Part, usize)] = &[(Year, 4), (Week, 2)];
const ISO_ORDINAL: &[(Part, usize)] = &[(Year, 4), (Ordinal, 3)];
const COMPACT_YMD: &[(Part, usize)] = &[(Year, 4), (Month, 2), (Day, 2)];

static CATALOG: Lazy<FormatCatalog> = Lazy::new(FormatCatalog::new);

/// Ordered, immutable collection of [`DateFormat`]s.
#[derive(Debug)]
pub struct FormatCatalog {
    formats: Vec<DateFormat>,
}

impl Default for FormatCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatCatalog {
    /// The shared catalog, built on first use.
    pub fn global() -> &'static FormatCatalog {
        &CATALOG
    }

    pub fn new() -> Self {
        let general = FormatGroups::GENERAL;
        let http = FormatGroups::HTTP | FormatGroups::GENERAL;
        let url = FormatGroups::URL;
        let anywhere = FormatGroups::GENERAL | FormatGroups::URL;

        let ord = r"(?:st|nd|rd|th)?";
        let m = MONTH_PATTERN;
        let t = TIME_PATTERN;
        let z = ZONE_PATTERN;
        let tz = TEXT_ZONE_PATTERN;
        let ampm = AM_PM_PATTERN;
        let year = r"(?:19|20)\d{2}";
        let month = r"(?:0?[1-9]|1[0-2])";

        let positional = Recipe::Positional;
        let fixed = Recipe::FixedWidth;

        let formats = vec![
            // HTTP dates
            DateFormat::new(
                "RFC-1123",
                http,
                &format!(
                    r"\b{wd},\s\d{{1,2}}\s{mon}\s\d{{4}}\s{t}\s?{hz}",
                    wd = HTTP_WEEKDAY_PATTERN,
                    mon = HTTP_MONTH_PATTERN,
                    hz = HTTP_ZONE_PATTERN
                ),
                positional(D_NAME_Y),
                true,
            ),
            DateFormat::new(
                "RFC-1036",
                http,
                &format!(
                    r"\b{wd},\s\d{{1,2}}-{mon}-\d{{2}}\s{t}\s{hz}",
                    wd = HTTP_WEEKDAY_LONG_PATTERN,
                    mon = HTTP_MONTH_PATTERN,
                    hz = HTTP_ZONE_PATTERN
                ),
                positional(D_NAME_Y),
                true,
            ),
            DateFormat::new(
                "ANSI-C-TZ",
                http,
                &format!(
                    r"\b{wd}\s{mon}\s{{1,2}}\d{{1,2}}\s{t}\s{hz}\s\d{{4}}",
                    wd = HTTP_WEEKDAY_PATTERN,
                    mon = HTTP_MONTH_PATTERN,
                    hz = HTTP_ZONE_PATTERN
                ),
                positional(NAME_D_Y),
                true,
            ),
            DateFormat::new(
                "ANSI-C",
                http,
                &format!(
                    r"\b{wd}\s{mon}\s{{1,2}}\d{{1,2}}\s{t}\s\d{{4}}",
                    wd = HTTP_WEEKDAY_PATTERN,
                    mon = HTTP_MONTH_PATTERN
                ),
                positional(NAME_D_Y),
                true,
            ),
            // Date-times
            DateFormat::new(
                "ISO-YMD-T",
                anywhere,
                &format!(r"\d{{4}}-\d{{1,2}}-\d{{1,2}}(?:t|\s){t}{z}"),
                positional(YMD),
                true,
            ),
            DateFormat::new(
                "ISO-YWD-T",
                general,
                &format!(r"\d{{4}}-?w\d{{2}}-?\d(?:t|\s){t}{z}"),
                fixed(ISO_WEEK_DAY),
                true,
            ),
            DateFormat::new(
                "EU-D-MMMM-Y-T",
                general,
                &format!(r"\d{{1,2}}{ord}\.?\s?{m},?\s?\d{{4}},?\s(?:at\s|um\s|-\s)?{t}{ampm}{tz}"),
                positional(D_NAME_Y),
                true,
            ),
            DateFormat::new(
                "USA-MMMM-D-Y-T",
                general,
                &format!(r"{m}\s?\d{{1,2}}{ord},?\s\d{{4}},?\s(?:at\s|-\s)?{t}{ampm}{tz}"),
                positional(NAME_D_Y),
                true,
            ),
            DateFormat::new(
                "EU-D-MM-Y-T",
                general,
                &format!(r"\d{{1,2}}\.\d{{1,2}}\.\d{{4}},?\s(?:um\s|-\s)?{t}{ampm}{tz}"),
                positional(DMY),
                true,
            ),
            DateFormat::new(
                "USA-MM-D-Y-T",
                general,
                &format!(r"\d{{1,2}}/\d{{1,2}}/\d{{4}},?\s(?:at\s|-\s)?{t}{ampm}{tz}"),
                positional(MDY),
                true,
            ),
            // URL path segments
            DateFormat::new(
                "URL-YMD",
                url,
                r"\d{4}[/_.-]\d{1,2}[/_.-]\d{1,2}",
                positional(YMD),
                false,
            ),
            DateFormat::new(
                "URL-Y-MMMM-D",
                url,
                &format!(r"\d{{4}}[/_.-]{m}[/_.-]\d{{1,2}}"),
                positional(Y_NAME_D),
                false,
            ),
            DateFormat::new(
                "URL-YM",
                url,
                &format!(r"{year}[/_.-]{month}\b"),
                positional(YM),
                false,
            ),
            // ISO 8601 dates
            DateFormat::new("ISO-YMD", general, r"\d{4}-\d{1,2}-\d{1,2}", positional(YMD), false),
            DateFormat::new("ISO-YWD", general, r"\d{4}-w\d{2}-\d", fixed(ISO_WEEK_DAY), false),
            DateFormat::new("ISO-YW", general, r"\d{4}-w\d{2}", fixed(ISO_WEEK), false),
            DateFormat::new("ISO-YD", general, r"\d{4}-\d{3}", fixed(ISO_ORDINAL), false),
            DateFormat::new("ISO-YM", general, &format!(r"{year}-{month}"), positional(YM), false),
            DateFormat::new(
                "ISO-YMD-NO",
                anywhere,
                &format!(r"{year}(?:0[1-9]|1[0-2])(?:0[1-9]|[12]\d|3[01])"),
                fixed(COMPACT_YMD),
                false,
            ),
            DateFormat::new(
                "ISO-YWD-NO",
                general,
                &format!(r"{year}w\d{{2}}\d"),
                fixed(ISO_WEEK_DAY),
                false,
            ),
            DateFormat::new(
                "ISO-YW-NO",
                general,
                &format!(r"{year}w\d{{2}}"),
                fixed(ISO_WEEK),
                false,
            ),
            // Textual dates
            DateFormat::new(
                "EU-D-MMMM-Y",
                general,
                &format!(r"\d{{1,2}}{ord}\.?\s?(?:of\s)?{m},?\s?\d{{4}}"),
                positional(D_NAME_Y),
                false,
            ),
            DateFormat::new(
                "USA-MMMM-D-Y",
                general,
                &format!(r"{m}\s?\d{{1,2}}{ord},?\s\d{{4}}"),
                positional(NAME_D_Y),
                false,
            ),
            DateFormat::new(
                "EUSA-YYYY-MMMM-D",
                general,
                &format!(r"\d{{4}}(?:\s|\s?[/-]\s?){m}(?:\s|\s?[/-]\s?)\d{{1,2}}"),
                positional(Y_NAME_D),
                false,
            ),
            DateFormat::new(
                "EUSA-MMMM-Y",
                general,
                &format!(r"{m},?\s?\d{{4}}"),
                positional(NAME_Y),
                false,
            ),
            // Numeric dates
            DateFormat::new(
                "EU-D-MM-Y",
                general,
                r"\d{1,2}\.\s?\d{1,2}\.\s?\d{4}|\d{1,2}-\d{1,2}-\d{4}",
                positional(DMY),
                false,
            ),
            DateFormat::new("USA-MM-D-Y", general, r"\d{1,2}/\d{1,2}/\d{4}", positional(MDY), false),
            DateFormat::new(
                "EU-MM-Y",
                general,
                &format!(r"{month}\.{year}"),
                positional(MY),
                false,
            ),
            DateFormat::new(
                "USA-MM-Y",
                general,
                &format!(r"{month}/{year}"),
                positional(MY),
                false,
            ),
            // Dates without a year
            DateFormat::new(
                "EU-D-MMMM",
                general,
                &format!(r"\d{{1,2}}{ord}\.?\s?(?:of\s)?{m}"),
                positional(D_NAME),
                false,
            ),
            DateFormat::new(
                "USA-MMMM-D",
                general,
                &format!(r"{m}\s?\d{{1,2}}{ord}\b"),
                positional(NAME_D),
                false,
            ),
        ];

        Self { formats }
    }

    pub fn formats(&self) -> &[DateFormat] {
        &self.formats
    }

    pub fn get(&self, id: &str) -> Option<&DateFormat> {
        self.formats.iter().find(|f| f.id == id)
    }

    /// Scan `text` with the general-purpose formats.
    pub fn match_all<'c, 't>(&'c self, text: &'t str) -> Matches<'c, 't> {
        self.find(text, FormatGroups::GENERAL)
    }

    /// Scan `text` with every format belonging to one of `groups`.
    ///
    /// The returned iterator is lazy; calling `find` again re-scans.
    pub fn find<'c, 't>(&'c self, text: &'t str, groups: FormatGroups) -> Matches<'c, 't> {
        Matches {
            catalog: self,
            text,
            groups,
            format_idx: 0,
            pos: 0,
            claimed: Vec::new(),
        }
    }

    /// The first match, in catalog order, that also normalizes.
    pub fn first_date(&self, text: &str, groups: FormatGroups) -> Option<ExtractedDate> {
        self.find(text, groups).find_map(|m| m.normalize().ok())
    }
}

/// A format hit inside a scanned text.
#[derive(Debug, Clone, Copy)]
pub struct FormatMatch<'c, 't> {
    format: &'c DateFormat,
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'c, 't> FormatMatch<'c, 't> {
    pub fn format(&self) -> &'c DateFormat {
        self.format
    }

    pub fn format_id(&self) -> &'static str {
        self.format.id
    }

    pub fn as_str(&self) -> &'t str {
        &self.text[self.start..self.end]
    }

    /// Byte offset of the match start.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset just past the match.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn normalize(&self) -> Result<ExtractedDate> {
        crate::normalizer::normalize_with(self.as_str(), self.format)
    }
}

/// Lazy scan of a text over the catalog. Created by [`FormatCatalog::find`].
#[derive(Debug, Clone)]
pub struct Matches<'c, 't> {
    catalog: &'c FormatCatalog,
    text: &'t str,
    groups: FormatGroups,
    format_idx: usize,
    pos: usize,
    claimed: Vec<Range<usize>>,
}

impl<'c, 't> Iterator for Matches<'c, 't> {
    type Item = FormatMatch<'c, 't>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let format = self.catalog.formats.get(self.format_idx)?;
            if !format.groups.intersects(self.groups) {
                self.next_format();
                continue;
            }

            let Some(found) = format.regex.find_at(self.text, self.pos) else {
                self.next_format();
                continue;
            };

            let range = found.range();
            if touches_digit(self.text, &range) || self.overlaps_claimed(&range) {
                self.pos = next_char_boundary(self.text, range.start);
                continue;
            }

            self.pos = range.end;
            self.claimed.push(range.clone());
            return Some(FormatMatch {
                format,
                text: self.text,
                start: range.start,
                end: range.end,
            });
        }
    }
}

impl Matches<'_, '_> {
    fn next_format(&mut self) {
        self.format_idx += 1;
        self.pos = 0;
    }

    fn overlaps_claimed(&self, range: &Range<usize>) -> bool {
        self.claimed
            .iter()
            .any(|c| c.start < range.end && range.start < c.end)
    }
}

/// A match glued to a digit on either side is part of a longer number.
fn touches_digit(text: &str, range: &Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    before.is_some_and(|c| c.is_ascii_digit()) || after.is_some_and(|c| c.is_ascii_digit())
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    text[index..]
        .chars()
        .next()
        .map(|c| index + c.len_utf8())
        .unwrap_or(text.len())
}
