//! Dates carried by HTTP response headers.

use crate::date::{DateContext, ExtractedDate};
use crate::format::{FormatCatalog, FormatGroups};
use crate::keywords::Keywords;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// The parts of an HTTP response the dater reads.
///
/// Header names compare case-insensitively and may repeat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// Final URL of the response, after redirects
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// All values of header `name`, in received order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.trim().eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Read the keyword headers, in keyword order, with the HTTP-date formats.
///
/// Each value yields at most one candidate, tagged with the header name.
pub fn extract(response: &HttpResponse, keywords: &Keywords) -> Vec<ExtractedDate> {
    let catalog = FormatCatalog::global();
    let mut dates = Vec::new();

    for header in &keywords.http_headers {
        for value in response.header_values(header) {
            match catalog.first_date(value, FormatGroups::HTTP) {
                Some(date) => dates.push(date.with_context(DateContext::HttpHeader {
                    header: header.to_lowercase(),
                })),
                None => trace!(header = %header, value, "header value is not an http date"),
            }
        }
    }

    debug!(count = dates.len(), "http header dates");
    dates
}
