//! Dates of pages the document links to.
//!
//! A page cannot predate the pages it cites, so the oldest date of each
//! outgoing link gives a lower bound on the publication date.

use crate::compare::oldest;
use crate::date::{DateContext, ExtractedDate};
use crate::error::Result;
use crate::page_dater::{fetch_dates, PageDater};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Absolute `http(s)` links of the document in document order.
///
/// Links are resolved against `base_url`, lose their fragment and appear
/// once; links back to the page itself are left out.
pub fn outgoing_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut own = base_url.clone();
    own.set_fragment(None);

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in document.select(&LINK_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(mut link) = base_url.join(href.trim()) else {
            continue;
        };
        if !matches!(link.scheme(), "http" | "https") {
            continue;
        }
        link.set_fragment(None);
        if link == own {
            continue;
        }
        let link = link.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }
    links
}

/// Date up to `max_links` links through `page_dater`, keeping the oldest date per link.
///
/// # Errors
///
/// A failing `page_dater` aborts the technique with [`DateError::Fetch`](crate::DateError::Fetch).
pub fn extract<D>(links: &[String], page_dater: &D, max_links: usize) -> Result<Vec<ExtractedDate>>
where
    D: PageDater + ?Sized,
{
    let mut dates = Vec::new();

    for link in links.iter().take(max_links) {
        let rated = fetch_dates(page_dater, link)?;
        let Some(best) = oldest(rated.iter().map(|r| &r.date)) else {
            continue;
        };
        let rate = rated
            .iter()
            .find(|r| std::ptr::eq(&r.date, best))
            .map(|r| r.rate)
            .unwrap_or_default();
        dates.push(best.clone().with_context(DateContext::Reference {
            link: link.clone(),
            rate,
        }));
    }

    debug!(count = dates.len(), "reference dates");
    Ok(dates)
}
