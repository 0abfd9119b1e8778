//! The first archived snapshot of a page.

use crate::compare::oldest;
use crate::date::{DateContext, ExtractedDate};
use crate::error::Result;
use crate::page_dater::{fetch_dates, PageDater};
use tracing::debug;

/// Archive lookup URL for `url`, substituting the `{url}` placeholder of `template`.
pub fn snapshot_url(template: &str, url: &str) -> String {
    template.replace("{url}", url)
}

/// Ask `page_dater` for the dates of the archive listing of `url` and keep
/// the oldest one known at least to the day.
///
/// Returns at most one candidate.
///
/// # Errors
///
/// A failing `page_dater` aborts the technique with [`DateError::Fetch`](crate::DateError::Fetch).
pub fn extract<D>(url: &str, template: &str, page_dater: &D) -> Result<Vec<ExtractedDate>>
where
    D: PageDater + ?Sized,
{
    let snapshot = snapshot_url(template, url);
    let rated = fetch_dates(page_dater, &snapshot)?;

    let full_dates = rated.iter().map(|r| &r.date).filter(|d| d.is_full_date());
    let dates: Vec<ExtractedDate> = oldest(full_dates)
        .map(|date| {
            date.clone().with_context(DateContext::Archive {
                snapshot_url: snapshot.clone(),
            })
        })
        .into_iter()
        .collect();

    debug!(count = dates.len(), snapshot = %snapshot, "archive dates");
    Ok(dates)
}
