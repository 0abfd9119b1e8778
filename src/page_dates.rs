//! The candidates found on one page.
//!
//! ## Example
//!
//! ```rust
//! use pagedaters::Dater;
//!
//! let html = r#"<html><head><meta name="date" content="2021-06-01"></head>
//!     <body><p>Published June 1, 2021</p></body></html>"#;
//! let dates = Dater::new(html, "https://example.com/2021/06/01/story.html", None)
//!     .unwrap()
//!     .extract();
//!
//! for date in dates.all() {
//!     println!("{:>15} {}", date.technique().unwrap(), date);
//! }
//!
//! // Persist the candidates, features included
//! let json = serde_json::to_string_pretty(&dates).unwrap();
//! assert!(json.contains("relative_frequency"));
//! ```

use crate::date::{ExtractedDate, Technique};
use serde::{Deserialize, Serialize};

/// Candidates of a page, one list per technique.
///
/// Lists keep the order their technique produced them in. Techniques that
/// did not run leave their list empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDates {
    pub url: Vec<ExtractedDate>,
    pub http_header: Vec<ExtractedDate>,
    pub html_head: Vec<ExtractedDate>,
    pub html_structure: Vec<ExtractedDate>,
    /// Body-content candidates, with features once scored
    pub body_content: Vec<ExtractedDate>,
    pub reference: Vec<ExtractedDate>,
    pub archive: Vec<ExtractedDate>,
}

impl PageDates {
    pub fn by_technique(&self, technique: Technique) -> &[ExtractedDate] {
        match technique {
            Technique::Url => &self.url,
            Technique::HttpHeader => &self.http_header,
            Technique::HtmlHead => &self.html_head,
            Technique::HtmlStructure => &self.html_structure,
            Technique::BodyContent => &self.body_content,
            Technique::Reference => &self.reference,
            Technique::Archive => &self.archive,
        }
    }

    /// Every candidate, technique by technique.
    pub fn all(&self) -> impl Iterator<Item = &ExtractedDate> {
        self.url
            .iter()
            .chain(&self.http_header)
            .chain(&self.html_head)
            .chain(&self.html_structure)
            .chain(&self.body_content)
            .chain(&self.reference)
            .chain(&self.archive)
    }

    /// Head and header candidates, the page's declared dates.
    pub fn meta(&self) -> impl Iterator<Item = &ExtractedDate> {
        self.html_head.iter().chain(&self.http_header)
    }

    pub fn len(&self) -> usize {
        self.all().count()
    }

    pub fn is_empty(&self) -> bool {
        self.all().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateContext;
    use crate::normalize;

    fn dated(raw: &str, context: DateContext) -> ExtractedDate {
        normalize(raw, "ISO-YMD").unwrap().with_context(context)
    }

    #[test]
    fn test_accessors() {
        let dates = PageDates {
            url: vec![dated("2021-06-01", DateContext::Url { url: "u".to_string() })],
            http_header: vec![dated(
                "2021-06-03",
                DateContext::HttpHeader {
                    header: "date".to_string(),
                },
            )],
            html_head: vec![dated(
                "2021-06-02",
                DateContext::HtmlHead {
                    keyword: "date".to_string(),
                    tag_name: "meta".to_string(),
                },
            )],
            ..PageDates::default()
        };

        assert_eq!(dates.len(), 3);
        let meta: Vec<_> = dates.meta().map(|d| d.normalized_string()).collect();
        assert_eq!(meta, vec!["2021-06-02", "2021-06-03"]);
        assert_eq!(dates.by_technique(Technique::Url).len(), 1);
        assert!(dates.by_technique(Technique::Archive).is_empty());
        assert!(PageDates::default().is_empty());
    }
}
