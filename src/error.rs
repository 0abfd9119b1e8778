//! Error types for the date extraction library.

use thiserror::Error;

/// Result type alias for date extraction operations
pub type Result<T> = std::result::Result<T, DateError>;

/// Boxed error returned by injected page fetchers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while extracting or normalizing dates.
///
/// Most variants describe why a single candidate was rejected. Techniques
/// catch those locally and drop the candidate; only [`DateError::Fetch`]
/// ever reaches the caller of a technique.
#[derive(Error, Debug)]
pub enum DateError {
    /// Invalid page URL provided
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A token in month position is not a known month name
    #[error("Unrecognized month name: {0}")]
    UnrecognizedMonthName(String),

    /// A numeric field could not be parsed or is out of range
    #[error("Malformed {field} field: {value:?}")]
    MalformedField {
        field: &'static str,
        value: String,
    },

    /// The fields parse but do not name a real calendar date
    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    /// The format id is not part of the catalog
    #[error("Unknown date format: {0}")]
    UnknownFormat(String),

    /// An injected page fetcher failed
    #[error("Fetching dates for {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BoxError,
    },
}

impl DateError {
    pub(crate) fn malformed(field: &'static str, value: impl Into<String>) -> Self {
        DateError::MalformedField {
            field,
            value: value.into(),
        }
    }
}
