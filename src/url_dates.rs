//! Dates embedded in a page URL.

use crate::date::{DateContext, ExtractedDate};
use crate::format::{FormatCatalog, FormatGroups};
use tracing::{debug, trace};
use url::Url;

/// Scan the URL's path and query with the URL-shaped formats.
///
/// The host is left out so digits in domain names never produce dates.
/// Strings that do not parse as absolute URLs are scanned whole.
///
/// ## Example
///
/// ```rust
/// use pagedaters::url_dates;
///
/// let dates = url_dates::extract("https://example.com/2021/06/01/article.html");
/// assert_eq!(dates.len(), 1);
/// assert_eq!(dates[0].normalized_string(), "2021-06-01");
/// ```
pub fn extract(url: &str) -> Vec<ExtractedDate> {
    let scanned = match Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        Err(_) => url.to_string(),
    };

    let dates: Vec<ExtractedDate> = FormatCatalog::global()
        .find(&scanned, FormatGroups::URL)
        .filter_map(|m| match m.normalize() {
            Ok(date) => Some(date.with_context(DateContext::Url {
                url: url.to_string(),
            })),
            Err(err) => {
                trace!(raw = m.as_str(), format = m.format_id(), %err, "dropped url date");
                None
            }
        })
        .collect();

    debug!(count = dates.len(), "url dates");
    dates
}
