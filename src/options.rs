//! Configuration options for page dating.
//!
//! This module provides [`DaterOptions`] and [`DaterOptionsBuilder`]
//! for configuring which techniques run and how the body text is searched.
//!
//! ## Example
//!
//! ```rust
//! use pagedaters::{Dater, DaterOptions, Techniques};
//!
//! let html = "<html><body><p>Posted 2021-06-01</p></body></html>";
//!
//! // Using default options
//! let dater = Dater::new(html, "https://example.com/post", None).unwrap();
//!
//! // Using builder for custom options
//! let options = DaterOptions::builder()
//!     .techniques(Techniques::URL | Techniques::BODY_CONTENT)
//!     .keyword_window(80)
//!     .build();
//!
//! let dater = Dater::new(html, "https://example.com/post", Some(options)).unwrap();
//! ```

use crate::constants::DEFAULT_ARCHIVE_URL_TEMPLATE;
use crate::keywords::Keywords;
use bitflags::bitflags;

bitflags! {
    /// Techniques a [`Dater`](crate::Dater) runs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Techniques: u8 {
        const URL = 1;
        const HTTP_HEADER = 1 << 1;
        const HTML_HEAD = 1 << 2;
        const HTML_STRUCTURE = 1 << 3;
        const BODY_CONTENT = 1 << 4;
        /// Needs a [`PageDater`](crate::PageDater)
        const REFERENCE = 1 << 5;
        /// Needs a [`PageDater`](crate::PageDater)
        const ARCHIVE = 1 << 6;

        /// Everything that works on the page alone
        const OFFLINE = Self::URL.bits()
            | Self::HTTP_HEADER.bits()
            | Self::HTML_HEAD.bits()
            | Self::HTML_STRUCTURE.bits()
            | Self::BODY_CONTENT.bits();
    }
}

/// Configuration options for a [`Dater`](crate::Dater).
///
/// ## Creating Options
///
/// ### Using Default
///
/// ```rust
/// use pagedaters::DaterOptions;
///
/// let options = DaterOptions::default();
/// assert_eq!(options.keyword_window, 150);
/// ```
///
/// ### Using Builder
///
/// ```rust
/// use pagedaters::{DaterOptions, Techniques};
///
/// let options = DaterOptions::builder()
///     .techniques(Techniques::all())
///     .max_reference_links(10)
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DaterOptions {
    /// Techniques to run.
    ///
    /// `REFERENCE` and `ARCHIVE` only run through
    /// [`Dater::extract_with`](crate::Dater::extract_with).
    ///
    /// Default: [`Techniques::OFFLINE`]
    pub techniques: Techniques,

    /// Characters searched on each side of a body date for a keyword.
    ///
    /// Default: `150`
    pub keyword_window: usize,

    /// Longest piece of a text node handed to the format matcher at once.
    ///
    /// Text nodes above this length are split, preferably at a space.
    ///
    /// Default: `10_000`
    pub max_chunk_chars: usize,

    /// Outgoing links dated by the Reference technique.
    ///
    /// Default: `5`
    pub max_reference_links: usize,

    /// Read JSON-LD blocks as part of the head technique.
    ///
    /// Default: `true`
    pub parse_json_ld: bool,

    /// Keyword dictionaries.
    ///
    /// Default: [`Keywords::default`]
    pub keywords: Keywords,

    /// Archive listing URL; `{url}` is replaced by the page URL.
    ///
    /// Default: `https://web.archive.org/web/*/{url}`
    pub archive_url_template: String,
}

impl Default for DaterOptions {
    fn default() -> Self {
        Self {
            techniques: Techniques::OFFLINE,
            keyword_window: 150,
            max_chunk_chars: 10_000,
            max_reference_links: 5,
            parse_json_ld: true,
            keywords: Keywords::default(),
            archive_url_template: DEFAULT_ARCHIVE_URL_TEMPLATE.to_string(),
        }
    }
}

impl DaterOptions {
    /// Creates a new builder for DaterOptions
    pub fn builder() -> DaterOptionsBuilder {
        DaterOptionsBuilder::default()
    }
}

/// Builder for [`DaterOptions`].
///
/// Unset fields fall back to their defaults.
#[derive(Default)]
pub struct DaterOptionsBuilder {
    techniques: Option<Techniques>,
    keyword_window: Option<usize>,
    max_chunk_chars: Option<usize>,
    max_reference_links: Option<usize>,
    parse_json_ld: Option<bool>,
    keywords: Option<Keywords>,
    archive_url_template: Option<String>,
}

impl DaterOptionsBuilder {
    pub fn techniques(mut self, techniques: Techniques) -> Self {
        self.techniques = Some(techniques);
        self
    }

    pub fn keyword_window(mut self, chars: usize) -> Self {
        self.keyword_window = Some(chars);
        self
    }

    pub fn max_chunk_chars(mut self, chars: usize) -> Self {
        self.max_chunk_chars = Some(chars);
        self
    }

    pub fn max_reference_links(mut self, links: usize) -> Self {
        self.max_reference_links = Some(links);
        self
    }

    pub fn parse_json_ld(mut self, parse: bool) -> Self {
        self.parse_json_ld = Some(parse);
        self
    }

    pub fn keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = Some(keywords);
        self
    }

    /// Set the archive URL template (must contain `{url}`)
    pub fn archive_url_template(mut self, template: impl Into<String>) -> Self {
        self.archive_url_template = Some(template.into());
        self
    }

    /// Build the DaterOptions
    pub fn build(self) -> DaterOptions {
        let defaults = DaterOptions::default();
        DaterOptions {
            techniques: self.techniques.unwrap_or(defaults.techniques),
            keyword_window: self.keyword_window.unwrap_or(defaults.keyword_window),
            max_chunk_chars: self.max_chunk_chars.unwrap_or(defaults.max_chunk_chars),
            max_reference_links: self
                .max_reference_links
                .unwrap_or(defaults.max_reference_links),
            parse_json_ld: self.parse_json_ld.unwrap_or(defaults.parse_json_ld),
            keywords: self.keywords.unwrap_or(defaults.keywords),
            archive_url_template: self
                .archive_url_template
                .unwrap_or(defaults.archive_url_template),
        }
    }
}
