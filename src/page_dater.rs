//! The injected collaborator that dates other pages.
//!
//! The Reference and Archive techniques need the dates of pages this crate
//! never fetches itself. Hosts plug in a [`PageDater`] that downloads the
//! page however they like (and with whatever timeout, retry and concurrency
//! policy they choose) and returns the dates found there.

use crate::date::ExtractedDate;
use crate::error::{BoxError, DateError, Result};
use serde::{Deserialize, Serialize};

/// A date for another page, with the confidence the host assigns to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedDate {
    pub date: ExtractedDate,
    pub rate: f64,
}

impl RatedDate {
    pub fn new(date: ExtractedDate, rate: f64) -> Self {
        Self { date, rate }
    }
}

/// Produces dates for the page at a URL.
///
/// Closures `Fn(&str) -> Result<Vec<RatedDate>, BoxError>` implement this
/// trait, which is usually all a test or a small host needs.
///
/// ## Example
///
/// ```rust
/// use pagedaters::{normalize, PageDater, RatedDate};
///
/// let dater = |_url: &str| -> Result<Vec<RatedDate>, pagedaters::BoxError> {
///     Ok(vec![RatedDate::new(normalize("2020-01-01", "ISO-YMD")?, 0.9)])
/// };
/// assert_eq!(dater.dates_for("https://example.com/").unwrap().len(), 1);
/// ```
pub trait PageDater {
    fn dates_for(&self, url: &str) -> std::result::Result<Vec<RatedDate>, BoxError>;
}

impl<F> PageDater for F
where
    F: Fn(&str) -> std::result::Result<Vec<RatedDate>, BoxError>,
{
    fn dates_for(&self, url: &str) -> std::result::Result<Vec<RatedDate>, BoxError> {
        self(url)
    }
}

/// Call `page_dater`, turning its failure into [`DateError::Fetch`].
pub(crate) fn fetch_dates<D>(page_dater: &D, url: &str) -> Result<Vec<RatedDate>>
where
    D: PageDater + ?Sized,
{
    page_dater.dates_for(url).map_err(|source| DateError::Fetch {
        url: url.to_string(),
        source,
    })
}
