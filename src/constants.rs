//! Static tables shared by the formats, the normalizer and the techniques.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Month names and abbreviations accepted in textual formats.
///
/// Alternatives sharing a prefix are listed longest first; the regex engine
/// picks the first alternative that matches. Only abbreviations take a
/// trailing dot, so sentence punctuation after a full name is left out.
pub(crate) const MONTH_PATTERN: &str = r"\b(?:(?:january|february|march|april|may|june|july|august|september|october|november|december|januar|februar|märz|maerz|mai|juni|juli|oktober|dezember)\b|(?:jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|okt|nov|dec|dez)\b\.?)";

/// Three-letter month abbreviations used by HTTP dates.
pub(crate) const HTTP_MONTH_PATTERN: &str = r"(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)";

/// Three-letter weekday abbreviations used by HTTP dates.
pub(crate) const HTTP_WEEKDAY_PATTERN: &str = r"(?:mon|tue|wed|thu|fri|sat|sun)";

pub(crate) const HTTP_WEEKDAY_LONG_PATTERN: &str =
    r"(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)";

/// `HH:MM[:SS[.fff]]`
pub(crate) const TIME_PATTERN: &str = r"\d{1,2}:\d{2}(?::\d{2}(?:[.,]\d{1,9})?)?";

pub(crate) const AM_PM_PATTERN: &str = r"(?:\s?[ap]\.?\s?m\b\.?)?";

/// Optional zone of an ISO date-time: letters, or an offset that may follow the time directly.
pub(crate) const ZONE_PATTERN: &str =
    r"(?:\s?(?:(?:utc|gmt)\s?[+-]\d{2}(?::?\d{2})?|z|utc|gmt|ut|[ecmp][sd]t|[+-]\d{2}(?::?\d{2})?)\b)?";

/// Optional zone of a textual or numeric date-time.
///
/// A bare offset needs whitespace before its sign, so `10:00-12:00` stays a
/// time range.
pub(crate) const TEXT_ZONE_PATTERN: &str =
    r"(?:\s?(?:(?:utc|gmt)\s?[+-]\d{2}(?::?\d{2})?|z|utc|gmt|ut|[ecmp][sd]t)\b|\s[+-]\d{2}(?::?\d{2})?\b)?";

/// Zone required by RFC 1123 / RFC 1036 dates.
pub(crate) const HTTP_ZONE_PATTERN: &str = r"(?:gmt|utc|ut|z|[ecmp][sd]t|[+-]\d{4})\b";

/// Hour, minute, second and AM/PM letter, captured as groups 1 to 4.
const TIME_CAPTURE: &str = r"(?i)(\d{1,2}):(\d{2})(?::(\d{2})(?:[.,]\d+)?)?(?:\s?([ap])\.?\s?m\b\.?)?";

pub(crate) struct RegExps {
    /// Time of day inside a textual, numeric or HTTP date-time; the zone is
    /// group 5, or group 6 for a bare offset after whitespace
    pub time: Regex,
    /// Time of day inside an ISO date-time; the zone is group 5
    pub iso_time: Regex,
    /// Field tokens of the date part
    pub token: Regex,
}

pub(crate) static REGEXPS: Lazy<RegExps> = Lazy::new(|| RegExps {
    time: Regex::new(&format!(
        r"{}(?:\s?((?:utc|gmt)\s?[+-]\d{{2}}(?::?\d{{2}})?|z|utc|gmt|ut|[ecmp][sd]t)\b|\s([+-]\d{{2}}(?::?\d{{2}})?)\b)?",
        TIME_CAPTURE
    ))
    .unwrap(),
    iso_time: Regex::new(&format!(
        r"{}(?:\s?((?:utc|gmt)\s?[+-]\d{{2}}(?::?\d{{2}})?|z|utc|gmt|ut|[ecmp][sd]t|[+-]\d{{2}}(?::?\d{{2}})?)\b)?",
        TIME_CAPTURE
    ))
    .unwrap(),
    token: Regex::new(r"\p{L}+|\d+").unwrap(),
});

static MONTHS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let names: [(&str, u32); 35] = [
        ("january", 1),
        ("jan", 1),
        ("januar", 1),
        ("february", 2),
        ("feb", 2),
        ("februar", 2),
        ("march", 3),
        ("mar", 3),
        ("märz", 3),
        ("maerz", 3),
        ("april", 4),
        ("apr", 4),
        ("may", 5),
        ("mai", 5),
        ("june", 6),
        ("jun", 6),
        ("juni", 6),
        ("july", 7),
        ("jul", 7),
        ("juli", 7),
        ("august", 8),
        ("aug", 8),
        ("september", 9),
        ("sept", 9),
        ("sep", 9),
        ("october", 10),
        ("oct", 10),
        ("oktober", 10),
        ("okt", 10),
        ("november", 11),
        ("nov", 11),
        ("december", 12),
        ("dec", 12),
        ("dezember", 12),
        ("dez", 12),
    ];
    names.into_iter().collect()
});

/// Month number for a name or abbreviation, ignoring case and a trailing dot.
pub(crate) fn month_number(name: &str) -> Option<u32> {
    let key = name.trim_end_matches('.').to_lowercase();
    MONTHS.get(key.as_str()).copied()
}

/// Letter tokens that may appear inside a matched date without being a month.
const FILLER_WORDS: [&str; 39] = [
    "st", "nd", "rd", "th", "of", "the", "at", "um", "t", "w", "am", "pm", "a", "p", "m", "mon",
    "tue", "tues", "wed", "thu", "thur", "thurs", "fri", "sat", "sun", "monday", "tuesday",
    "wednesday", "thursday", "friday", "saturday", "sunday", "montag", "dienstag", "mittwoch",
    "donnerstag", "freitag", "samstag", "sonntag",
];

pub(crate) fn is_filler_word(token: &str) -> bool {
    FILLER_WORDS.contains(&token.to_lowercase().as_str())
}

/// Offset in minutes east of UTC for a zone token (`Z`, `GMT`, `EST`, `+02:00`, `-0530`, `+02`).
pub(crate) fn zone_offset_minutes(token: &str) -> Option<i32> {
    let lower = token.trim().to_lowercase();
    match lower.as_str() {
        "z" | "ut" | "utc" | "gmt" => return Some(0),
        "edt" => return Some(-4 * 60),
        "est" | "cdt" => return Some(-5 * 60),
        "cst" | "mdt" => return Some(-6 * 60),
        "mst" | "pdt" => return Some(-7 * 60),
        "pst" => return Some(-8 * 60),
        _ => {}
    }

    let token = ["utc", "gmt"]
        .iter()
        .find_map(|prefix| lower.strip_prefix(prefix))
        .unwrap_or(lower.as_str())
        .trim_start();
    let sign = match token.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let digits: String = token[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

/// Tags whose text is never scanned for dates.
pub(crate) const UNRENDERED_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Tags skipped by the structure walk.
pub(crate) const STRUCTURE_SKIPPED_TAGS: [&str; 2] = ["script", "img"];

pub(crate) const HEADLINE_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Block-level tags that end a line in rendered text.
pub(crate) const BLOCK_TAGS: [&str; 28] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "p", "section", "tr",
];

/// Attributes checked for keywords on ancestors of a text node.
pub(crate) const KEYWORD_ATTRIBUTES: [&str; 6] = ["class", "id", "itemprop", "name", "title", "rel"];

/// Ancestor levels searched for a keyword tag above a text node.
pub(crate) const KEYWORD_TAG_DEPTH: usize = 3;

pub(crate) const DEFAULT_ARCHIVE_URL_TEMPLATE: &str = "https://web.archive.org/web/*/{url}";
