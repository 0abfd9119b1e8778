//! # PageDateRS
//!
//! Publication-date inference for web pages.
//!
//! ## Overview
//!
//! PageDateRS collects every date a page exposes, from its URL, HTTP
//! headers, `<head>` metadata, element attributes, running text, linked pages
//! and web archive snapshots. Each candidate is normalized to a partial
//! calendar date and carries the context it was found in. Body-text
//! candidates are additionally scored with a feature bundle meant for a
//! downstream classifier picking the publication date.
//!
//! ## Key Features
//!
//! - **Format Catalog**: Recognizes ISO, numeric, month-name, URL and HTTP date formats
//! - **Partial Dates**: Keeps exactly the fields a text states (year only, month and day, ...)
//! - **Seven Techniques**: URL, HTTP header, HTML head, HTML structure, body content, reference, archive
//! - **Keyword Context**: Finds words like "published" or "updated" around body dates
//! - **Feature Scoring**: Position, age, frequency and agreement features per body date
//! - **Customizable Options**: Choose techniques and tune keyword dictionaries
//!
//! ## Basic Usage
//!
//! ```rust
//! use pagedaters::Dater;
//!
//! let html = r#"<html><head><meta property="article:published_time" content="2021-06-01T09:00:00Z"></head>
//!     <body><p>Published June 1, 2021</p></body></html>"#;
//! let url = "https://example.com/2021/06/01/article.html";
//!
//! let dates = Dater::new(html, url, None).unwrap().extract();
//!
//! assert_eq!(dates.url[0].normalized_string(), "2021-06-01");
//! assert_eq!(dates.html_head[0].normalized_string(), "2021-06-01 09:00:00");
//! let body = &dates.body_content[0];
//! assert_eq!(body.keyword(), Some("published"));
//! assert!(body.features().unwrap().in_meta_dates);
//! ```
//!
//! ## Advanced Usage
//!
//! ### Linked and Archived Pages
//!
//! The Reference and Archive techniques date other pages. Fetching is left
//! to the caller through the [`PageDater`] trait, which closures implement:
//!
//! ```rust,no_run
//! use pagedaters::{BoxError, Dater, DaterOptions, RatedDate, Techniques};
//!
//! fn date_remote_page(url: &str) -> Result<Vec<RatedDate>, BoxError> {
//!     // fetch `url` and date it, e.g. with another `Dater`
//!     Ok(Vec::new())
//! }
//!
//! let options = DaterOptions::builder().techniques(Techniques::all()).build();
//! let dater = Dater::new("<html>...</html>", "https://example.com/post", Some(options)).unwrap();
//! let dates = dater.extract_with(&date_remote_page).unwrap();
//! println!("{} candidates", dates.len());
//! ```
//!
//! ### Matching and Normalizing Text
//!
//! ```rust
//! use pagedaters::{FormatCatalog, FormatGroups};
//!
//! let catalog = FormatCatalog::global();
//! let date = catalog
//!     .first_date("Last updated on 12 March 2019, 14:05", FormatGroups::GENERAL)
//!     .unwrap();
//! assert_eq!(date.normalized_string(), "2019-03-12 14:05");
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use pagedaters::{Dater, DateError};
//!
//! match Dater::new("<html></html>", "not a valid url", None) {
//!     Ok(dater) => println!("{} candidates", dater.extract().len()),
//!     Err(DateError::InvalidUrl(url)) => eprintln!("Invalid URL: {}", url),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! ## Logging
//!
//! The pipeline reports through [`tracing`]: per-technique counts at `debug`,
//! skipped values at `trace`. Install any subscriber to see them.

pub mod archive_dates;
pub mod compare;
mod constants;
pub mod content_dates;
mod date;
mod dater;
mod dom_utils;
mod error;
mod format;
pub mod head_dates;
pub mod header_dates;
mod keywords;
mod normalizer;
mod options;
mod page_dater;
mod page_dates;
pub mod reference_dates;
mod scoring;
pub mod structure_dates;
pub mod url_dates;

// Public exports
pub use compare::{
    compare_chronologically, compare_positionally, newest, oldest, same_at, sort_chronologically,
    sort_positionally,
};
pub use date::{
    ContentContext, ContentFeatures, DateContext, Exactness, ExtractedDate, KeywordLocation,
    Technique,
};
pub use dater::Dater;
pub use error::{BoxError, DateError, Result};
pub use format::{DateFormat, FormatCatalog, FormatGroups, FormatMatch, Matches};
pub use header_dates::HttpResponse;
pub use keywords::{KeywordTable, Keywords, CLASS_GENERIC, CLASS_MODIFIED, CLASS_PUBLISHED};
pub use normalizer::normalize;
pub use options::{DaterOptions, DaterOptionsBuilder, Techniques};
pub use page_dater::{PageDater, RatedDate};
pub use page_dates::PageDates;
pub use scoring::score_body_content_candidates;
