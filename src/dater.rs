//! The one-page pipeline.
//!
//! [`Dater`] holds a parsed page and runs the enabled techniques over it,
//! then scores the body-content candidates against the page's head, header
//! and URL dates.
//!
//! ## Example
//!
//! ```rust
//! use pagedaters::{Dater, HttpResponse, Technique};
//!
//! let html = r#"<html><head><meta name="date" content="2021-06-01"></head>
//!     <body><p>Published June 1, 2021</p></body></html>"#;
//! let url = "https://example.com/2021/06/01/article.html";
//!
//! let dater = Dater::new(html, url, None)?
//!     .with_response(HttpResponse::new(url).with_header("Last-Modified", "Wed, 02 Jun 2021 10:00:00 GMT"));
//! let dates = dater.extract();
//!
//! assert_eq!(dates.by_technique(Technique::HttpHeader)[0].to_string(), "2021-06-02 10:00:00");
//! let body = &dates.body_content[0];
//! assert!(body.features().unwrap().in_meta_dates);
//! # Ok::<(), pagedaters::DateError>(())
//! ```

use crate::archive_dates;
use crate::content_dates;
use crate::date::ExtractedDate;
use crate::error::{DateError, Result};
use crate::head_dates;
use crate::header_dates::{self, HttpResponse};
use crate::options::{DaterOptions, Techniques};
use crate::page_dater::PageDater;
use crate::page_dates::PageDates;
use crate::reference_dates;
use crate::scoring::score_body_content_candidates;
use crate::structure_dates;
use crate::url_dates;
use scraper::Html;
use tracing::{debug, debug_span};
use url::Url;

/// Dates one page.
///
/// ## Lifecycle
///
/// Build a `Dater` with [`Dater::new()`], optionally attach the HTTP
/// response with [`with_response()`](Dater::with_response), then call
/// [`extract()`](Dater::extract) for the offline techniques or
/// [`extract_with()`](Dater::extract_with) to also date linked and
/// archived pages through a [`PageDater`].
pub struct Dater {
    document: Html,
    url: Url,
    response: Option<HttpResponse>,
    options: DaterOptions,
}

impl Dater {
    /// Create a new Dater
    ///
    /// # Arguments
    /// * `html` - The page's HTML
    /// * `url` - The page's absolute URL
    /// * `options` - Optional configuration options
    ///
    /// # Errors
    /// [`DateError::InvalidUrl`] when `url` is not an absolute URL.
    pub fn new(html: &str, url: &str, options: Option<DaterOptions>) -> Result<Self> {
        let url = Url::parse(url.trim()).map_err(|_| DateError::InvalidUrl(url.to_string()))?;

        Ok(Self {
            document: Html::parse_document(html),
            url,
            response: None,
            options: options.unwrap_or_default(),
        })
    }

    /// Attach the HTTP response the page came with.
    pub fn with_response(mut self, response: HttpResponse) -> Self {
        self.response = Some(response);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn options(&self) -> &DaterOptions {
        &self.options
    }

    /// Outgoing links the Reference technique would follow, uncapped.
    pub fn outgoing_links(&self) -> Vec<String> {
        reference_dates::outgoing_links(&self.document, &self.url)
    }

    /// Run the enabled offline techniques and score the body-content candidates.
    ///
    /// `REFERENCE` and `ARCHIVE` are ignored here.
    pub fn extract(&self) -> PageDates {
        let _span = debug_span!("extract", url = %self.url).entered();
        let techniques = self.options.techniques;
        let mut dates = PageDates::default();

        if techniques.contains(Techniques::URL) {
            dates.url = url_dates::extract(self.url.as_str());
        }
        if techniques.contains(Techniques::HTTP_HEADER) {
            if let Some(response) = &self.response {
                dates.http_header = header_dates::extract(response, &self.options.keywords);
            }
        }
        if techniques.contains(Techniques::HTML_HEAD) {
            dates.html_head = head_dates::extract(&self.document, &self.options);
        }
        if techniques.contains(Techniques::HTML_STRUCTURE) {
            dates.html_structure = structure_dates::extract(&self.document, &self.options.keywords);
        }
        if techniques.contains(Techniques::BODY_CONTENT) {
            let body = content_dates::extract(&self.document, &self.options);
            let meta: Vec<ExtractedDate> = dates.meta().cloned().collect();
            dates.body_content = score_body_content_candidates(body, &meta, &dates.url);
        }

        debug!(count = dates.len(), "page dated");
        dates
    }

    /// Like [`extract`](Self::extract), then run Reference and Archive when
    /// enabled, dating other pages through `page_dater`.
    ///
    /// # Errors
    /// [`DateError::Fetch`] when `page_dater` fails.
    pub fn extract_with<D>(&self, page_dater: &D) -> Result<PageDates>
    where
        D: PageDater + ?Sized,
    {
        let mut dates = self.extract();
        let techniques = self.options.techniques;

        if techniques.contains(Techniques::REFERENCE) {
            let links = self.outgoing_links();
            dates.reference =
                reference_dates::extract(&links, page_dater, self.options.max_reference_links)?;
        }
        if techniques.contains(Techniques::ARCHIVE) {
            dates.archive = archive_dates::extract(
                self.url.as_str(),
                &self.options.archive_url_template,
                page_dater,
            )?;
        }
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::normalize;
    use crate::page_dater::RatedDate;

    const PAGE: &str = r#"<html><head><meta name="date" content="2021-06-01"></head>
        <body><p>Published June 1, 2021</p><a href="https://other.example/cited">cited</a></body></html>"#;
    const URL: &str = "https://example.com/2021/06/01/article.html";

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            Dater::new(PAGE, "not a url", None),
            Err(DateError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_disabled_techniques_stay_empty() {
        let options = DaterOptions::builder().techniques(Techniques::URL).build();
        let dates = Dater::new(PAGE, URL, Some(options)).unwrap().extract();
        assert_eq!(dates.url.len(), 1);
        assert!(dates.html_head.is_empty());
        assert!(dates.body_content.is_empty());
    }

    #[test]
    fn test_extract_with_runs_reference_and_archive() {
        let page_dater = |url: &str| -> std::result::Result<Vec<RatedDate>, BoxError> {
            let raw = if url.starts_with("https://web.archive.org/") {
                "2021-06-02"
            } else {
                "2020-12-24"
            };
            Ok(vec![RatedDate::new(normalize(raw, "ISO-YMD")?, 0.5)])
        };
        let options = DaterOptions::builder().techniques(Techniques::all()).build();
        let dates = Dater::new(PAGE, URL, Some(options))
            .unwrap()
            .extract_with(&page_dater)
            .unwrap();

        assert_eq!(dates.reference.len(), 1);
        assert_eq!(dates.reference[0].normalized_string(), "2020-12-24");
        assert_eq!(dates.archive.len(), 1);
        assert_eq!(dates.archive[0].normalized_string(), "2021-06-02");
    }

    #[test]
    fn test_offline_extract_ignores_fetching_techniques() {
        let options = DaterOptions::builder().techniques(Techniques::all()).build();
        let dates = Dater::new(PAGE, URL, Some(options)).unwrap().extract();
        assert!(dates.reference.is_empty());
        assert!(dates.archive.is_empty());
    }
}
