//! Dates in the visible body text.
//!
//! The body is rendered to plain text once. Every text node is then scanned
//! on its own (long nodes in bounded chunks) and each date found is given
//! context:
//!
//! - a keyword taken from the class, id or similar attributes of the owning
//!   tag or one of its closest ancestors, or failing that the nearest
//!   content keyword in the rendered text within the keyword window;
//! - its character offset in the rendered text;
//! - the owning tag and whether it sits inside a headline.

use crate::constants::{HEADLINE_TAGS, KEYWORD_ATTRIBUTES, KEYWORD_TAG_DEPTH, UNRENDERED_TAGS};
use crate::date::{ContentContext, DateContext, ExtractedDate, KeywordLocation};
use crate::dom_utils::{
    collapse_whitespace, has_tag, render_text, tag_name, walk, Located, TextLocator, Visit,
};
use crate::format::FormatCatalog;
use crate::keywords::KeywordTable;
use crate::options::DaterOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

fn unrendered(element: &ElementRef) -> bool {
    has_tag(element, &UNRENDERED_TAGS)
}

struct KeywordHit {
    keyword: String,
    class: Option<u8>,
    location: KeywordLocation,
    distance: usize,
}

/// Collect every date in the rendered body text.
///
/// ## Example
///
/// ```rust
/// use pagedaters::{content_dates, DaterOptions};
/// use scraper::Html;
///
/// let document = Html::parse_document("<html><body><p>Published June 1, 2021</p></body></html>");
/// let dates = content_dates::extract(&document, &DaterOptions::default());
/// assert_eq!(dates[0].normalized_string(), "2021-06-01");
/// assert_eq!(dates[0].keyword(), Some("published"));
/// ```
pub fn extract(document: &Html, options: &DaterOptions) -> Vec<ExtractedDate> {
    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());
    let rendered = render_text(root, &unrendered);
    let table = &options.keywords.content;
    let keyword_regex = table.word_regex();
    let catalog = FormatCatalog::global();

    let mut locator = TextLocator::new(&rendered);
    let mut dates = Vec::new();

    for visit in walk(root, unrendered) {
        let Visit::Text { text, parent } = visit else {
            continue;
        };
        let text = collapse_whitespace(text);
        if text.is_empty() {
            continue;
        }
        let located = locator.locate(&text);
        let tag_keyword = attribute_keyword(parent, table);
        let is_headline_tag = in_headline(parent);

        for (chunk_start, chunk) in chunks(&text, options.max_chunk_chars) {
            for found in catalog.match_all(chunk) {
                let date = match found.normalize() {
                    Ok(date) => date,
                    Err(err) => {
                        trace!(raw = found.as_str(), format = found.format_id(), %err, "dropped content date");
                        continue;
                    }
                };

                let start = chunk_start + found.start();
                let end = chunk_start + found.end();
                let offset_in_node = text[..start].chars().count();

                let hit = match (&tag_keyword, &keyword_regex) {
                    (Some((keyword, class)), _) => Some(KeywordHit {
                        keyword: keyword.to_string(),
                        class: Some(*class),
                        location: KeywordLocation::Attribute,
                        distance: 0,
                    }),
                    (None, Some(regex)) => {
                        let (haystack, base) = match located {
                            Some(Located { bytes, .. }) => (rendered.as_str(), bytes),
                            None => (text.as_str(), 0),
                        };
                        nearest_keyword(
                            haystack,
                            base + start,
                            base + end,
                            options.keyword_window,
                            regex,
                            table,
                        )
                    }
                    (None, None) => None,
                };

                let context = ContentContext {
                    keyword: hit.as_ref().map(|h| h.keyword.clone()),
                    keyword_class: hit.as_ref().and_then(|h| h.class),
                    keyword_location: hit.as_ref().map(|h| h.location),
                    keyword_distance: hit.as_ref().map(|h| h.distance),
                    document_offset: located.map(|l| l.chars + offset_in_node),
                    tag_name: tag_name(&parent).to_string(),
                    is_headline_tag,
                    features: None,
                };
                dates.push(date.with_context(DateContext::BodyContent(Box::new(context))));
            }
        }
    }

    debug!(count = dates.len(), "body content dates");
    dates
}

/// Keyword on the attributes of `parent` or its nearest ancestors.
fn attribute_keyword<'k>(parent: ElementRef, table: &'k KeywordTable) -> Option<(&'k str, u8)> {
    let mut current = Some(parent);
    let mut depth = 0;

    while let Some(el) = current {
        if depth >= KEYWORD_TAG_DEPTH {
            break;
        }
        let values: Vec<&str> = KEYWORD_ATTRIBUTES
            .iter()
            .filter_map(|attr| el.value().attr(attr))
            .collect();
        if let Some(found) = table.find_in(&values) {
            return Some(found);
        }
        depth += 1;
        current = el.parent().and_then(ElementRef::wrap);
    }

    None
}

fn in_headline(parent: ElementRef) -> bool {
    std::iter::successors(Some(parent), |el| el.parent().and_then(ElementRef::wrap))
        .take(KEYWORD_TAG_DEPTH)
        .any(|el| has_tag(&el, &HEADLINE_TAGS))
}

/// Nearest keyword within `window` characters of the date at `start..end`.
///
/// On equal distance the keyword before the date wins.
fn nearest_keyword(
    text: &str,
    start: usize,
    end: usize,
    window: usize,
    regex: &Regex,
    table: &KeywordTable,
) -> Option<KeywordHit> {
    let lo = text[..start]
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let hi = text[end..]
        .char_indices()
        .nth(window)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    // (distance in chars, keyword before the date, keyword range)
    let mut best: Option<(usize, bool, usize, usize)> = None;
    let mut pos = lo;
    while let Some(m) = regex.find_at(text, pos) {
        if m.end() > hi {
            break;
        }
        pos = m.end();
        let candidate = if m.end() <= start {
            (text[m.end()..start].chars().count(), true)
        } else if m.start() >= end {
            (text[end..m.start()].chars().count(), false)
        } else {
            continue;
        };
        let better = match best {
            None => true,
            Some((distance, before, _, _)) => {
                candidate.0 < distance || (candidate.0 == distance && candidate.1 && !before)
            }
        };
        if better {
            best = Some((candidate.0, candidate.1, m.start(), m.end()));
        }
    }

    let (_, before, kw_start, kw_end) = best?;
    let keyword = collapse_whitespace(&text[kw_start..kw_end]).to_lowercase();
    let between = if before {
        &text[kw_end..start]
    } else {
        &text[end..kw_start]
    };
    Some(KeywordHit {
        class: table.class_of(&keyword),
        keyword,
        location: KeywordLocation::Text,
        distance: between.split_whitespace().count(),
    })
}

/// Split `text` into pieces of at most `max_chars` characters, preferring to
/// break after a space, else after a character that cannot belong to a
/// numeric date. Returns each piece with its byte offset.
fn chunks(text: &str, max_chars: usize) -> Vec<(usize, &str)> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let rest = &text[start..];
        let cut = match rest.char_indices().nth(max_chars) {
            None => rest.len(),
            Some((limit, _)) => rest[..limit]
                .rfind(' ')
                .filter(|&i| i > 0)
                .map(|i| i + 1)
                .or_else(|| {
                    rest[..limit]
                        .char_indices()
                        .rev()
                        .find(|&(_, c)| !(c.is_ascii_digit() || matches!(c, '-' | '.' | '/' | ':')))
                        .map(|(i, c)| i + c.len_utf8())
                })
                .unwrap_or(limit),
        };
        pieces.push((start, &rest[..cut]));
        start += cut;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::Technique;

    fn content(html: &str) -> Vec<ExtractedDate> {
        extract(&Html::parse_document(html), &DaterOptions::default())
    }

    fn ctx(date: &ExtractedDate) -> &ContentContext {
        date.content().unwrap()
    }

    #[test]
    fn test_keyword_in_text_before_date() {
        let dates = content("<html><body><h1>My story</h1><p>Published June 1, 2021</p></body></html>");
        assert_eq!(dates.len(), 1);
        let date = &dates[0];
        assert_eq!(date.technique(), Some(Technique::BodyContent));
        assert_eq!(date.normalized_string(), "2021-06-01");
        let c = ctx(date);
        assert_eq!(c.keyword.as_deref(), Some("published"));
        assert_eq!(c.keyword_class, Some(1));
        assert_eq!(c.keyword_location, Some(KeywordLocation::Text));
        assert_eq!(c.keyword_distance, Some(0));
        assert_eq!(c.document_offset, Some(19));
        assert_eq!(c.tag_name, "p");
        assert!(!c.is_headline_tag);
    }

    #[test]
    fn test_keyword_across_inline_tags() {
        let dates = content(
            "<html><body><p>Posted by <a href='/a'>Jane Doe</a> on <time>March 3, 2020</time></p></body></html>",
        );
        let c = ctx(&dates[0]);
        assert_eq!(c.keyword.as_deref(), Some("posted"));
        assert_eq!(c.keyword_distance, Some(4));
        assert_eq!(c.tag_name, "time");
        assert_eq!(c.document_offset, Some(22));
    }

    #[test]
    fn test_attribute_keyword_wins() {
        let dates = content(
            r#"<html><body><div class="post-date"><span>12.03.2020</span></div></body></html>"#,
        );
        let c = ctx(&dates[0]);
        assert_eq!(dates[0].normalized_string(), "2020-03-12");
        assert_eq!(c.keyword.as_deref(), Some("date"));
        assert_eq!(c.keyword_location, Some(KeywordLocation::Attribute));
        assert_eq!(c.keyword_distance, Some(0));
    }

    #[test]
    fn test_nearer_keyword_wins_and_before_breaks_ties() {
        let dates = content("<html><body><p>Posted on the site at 2020-01-01 modified</p></body></html>");
        assert_eq!(ctx(&dates[0]).keyword.as_deref(), Some("modified"));
        assert_eq!(ctx(&dates[0]).keyword_class, Some(2));

        let dates = content("<html><body><p>updated 2020-01-01 published</p></body></html>");
        assert_eq!(ctx(&dates[0]).keyword.as_deref(), Some("updated"));
    }

    #[test]
    fn test_keyword_outside_window_is_ignored() {
        let filler = "lorem ".repeat(40);
        let html = format!("<html><body><p>published {}2020-01-01</p></body></html>", filler);
        let dates = content(&html);
        assert_eq!(dates.len(), 1);
        assert_eq!(ctx(&dates[0]).keyword, None);
        assert_eq!(ctx(&dates[0]).keyword_distance, None);
    }

    #[test]
    fn test_scripts_and_styles_are_not_scanned() {
        let dates = content(
            "<html><head><title>2019-01-01</title></head><body><script>var d = '2018-01-01';</script>\
             <style>/* 2017-01-01 */</style><!-- 2016-01-01 --><h2>March 3, 2020</h2></body></html>",
        );
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].normalized_string(), "2020-03-03");
        assert!(ctx(&dates[0]).is_headline_tag);
        assert_eq!(ctx(&dates[0]).tag_name, "h2");
        assert_eq!(ctx(&dates[0]).document_offset, Some(0));
    }

    #[test]
    fn test_long_text_is_chunked() {
        let options = DaterOptions::builder().max_chunk_chars(20).build();
        let document = Html::parse_document(
            "<html><body><p>aaaa 2020-01-01 bbbb 2021-02-02 cccc</p></body></html>",
        );
        let dates = extract(&document, &options);
        let found: Vec<_> = dates
            .iter()
            .map(|d| (d.normalized_string(), d.document_offset()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("2020-01-01".to_string(), Some(5)),
                ("2021-02-02".to_string(), Some(21)),
            ]
        );
    }

    #[test]
    fn test_chunks_prefer_spaces() {
        let pieces = chunks("aaaa 2020-01-01 bbbb 2021-02-02 cccc", 20);
        assert_eq!(pieces, vec![(0, "aaaa 2020-01-01 "), (16, "bbbb 2021-02-02 cccc")]);
        assert_eq!(chunks("abcdef", 4), vec![(0, "abcd"), (4, "ef")]);
    }

    #[test]
    fn test_chunks_keep_digit_runs_whole() {
        assert_eq!(
            chunks("ab2020-01-01cd2021-02-02", 16),
            vec![(0, "ab2020-01-01cd"), (14, "2021-02-02")]
        );
        assert_eq!(
            chunks("1234567890", 4),
            vec![(0, "1234"), (4, "5678"), (8, "90")]
        );
    }

    #[test]
    fn test_date_at_chunk_boundary_is_found() {
        let options = DaterOptions::builder().max_chunk_chars(16).build();
        let document = Html::parse_document("<html><body><p>ab2020-01-01cd2021-02-02</p></body></html>");
        let dates = extract(&document, &options);
        let found: Vec<_> = dates
            .iter()
            .map(|d| (d.normalized_string(), d.document_offset()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("2020-01-01".to_string(), Some(2)),
                ("2021-02-02".to_string(), Some(14)),
            ]
        );
    }
}
