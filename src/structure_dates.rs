//! Dates held in attributes of body elements (`<time datetime>`, `data-*`, microdata).

use crate::constants::STRUCTURE_SKIPPED_TAGS;
use crate::date::{DateContext, ExtractedDate};
use crate::dom_utils::{has_tag, tag_name, walk, Visit};
use crate::format::{FormatCatalog, FormatGroups};
use crate::keywords::Keywords;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Walk the body and take, per element, the first attribute value that parses as a date.
///
/// `href` values are never read. The keyword is searched for in the other
/// attributes' values and in the date attribute's own name.
pub fn extract(document: &Html, keywords: &Keywords) -> Vec<ExtractedDate> {
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return Vec::new();
    };

    let dates: Vec<ExtractedDate> = walk(body, |el: &ElementRef| {
        has_tag(el, &STRUCTURE_SKIPPED_TAGS)
    })
    .filter_map(|visit| match visit {
        Visit::Element { element, depth } => element_date(element, depth, keywords),
        Visit::Text { .. } => None,
    })
    .collect();

    debug!(count = dates.len(), "html structure dates");
    dates
}

fn element_date(element: ElementRef, depth: usize, keywords: &Keywords) -> Option<ExtractedDate> {
    let catalog = FormatCatalog::global();
    let attrs: Vec<(&str, &str)> = element
        .value()
        .attrs()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("href"))
        .collect();

    let (index, date) = attrs.iter().enumerate().find_map(|(i, (_, value))| {
        catalog
            .first_date(value, FormatGroups::GENERAL)
            .map(|date| (i, date))
    })?;
    let attribute = attrs[index].0;

    let mut haystacks: Vec<&str> = attrs
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, (_, value))| *value)
        .collect();
    haystacks.push(attribute);
    let keyword = keywords
        .structure
        .find_in(&haystacks)
        .map(|(keyword, _)| keyword.to_string());

    Some(date.with_context(DateContext::HtmlStructure {
        keyword,
        attribute: attribute.to_string(),
        tag_name: tag_name(&element).to_string(),
        structural_depth: depth,
    }))
}
