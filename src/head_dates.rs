//! Dates declared in the document head: `<meta>` tags and JSON-LD.

use crate::date::{DateContext, ExtractedDate};
use crate::format::{FormatCatalog, FormatGroups};
use crate::keywords::KeywordTable;
use crate::options::DaterOptions;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, trace};

static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("head meta").unwrap());
static JSON_LD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type='application/ld+json']").unwrap());

/// Attributes naming a `<meta>` tag, in lookup order.
const META_NAME_ATTRIBUTES: [&str; 4] = ["name", "property", "http-equiv", "itemprop"];

/// JSON-LD properties holding dates.
const JSON_LD_DATE_KEYS: [&str; 4] = ["datePublished", "dateCreated", "dateModified", "uploadDate"];

/// Collect head candidates: `<meta>` tags first, in document order, then JSON-LD.
pub fn extract(document: &Html, options: &DaterOptions) -> Vec<ExtractedDate> {
    let mut dates = meta_dates(document, &options.keywords.head);
    if options.parse_json_ld {
        dates.extend(json_ld_dates(document));
    }
    debug!(count = dates.len(), "html head dates");
    dates
}

fn meta_dates(document: &Html, table: &KeywordTable) -> Vec<ExtractedDate> {
    let catalog = FormatCatalog::global();
    let mut dates = Vec::new();

    for meta in document.select(&META_SELECTOR) {
        let element = meta.value();
        let Some(name) = META_NAME_ATTRIBUTES
            .iter()
            .filter_map(|attr| element.attr(attr))
            .find(|name| table.class_of(name.trim()).is_some())
        else {
            continue;
        };
        let Some(content) = element.attr("content") else {
            continue;
        };

        match catalog.first_date(content, FormatGroups::GENERAL) {
            Some(date) => dates.push(date.with_context(DateContext::HtmlHead {
                keyword: name.trim().to_lowercase(),
                tag_name: "meta".to_string(),
            })),
            None => trace!(name, content, "meta content is not a date"),
        }
    }
    dates
}

fn json_ld_dates(document: &Html) -> Vec<ExtractedDate> {
    let mut dates = Vec::new();

    for script in document.select(&JSON_LD_SELECTOR) {
        let content = script.text().collect::<String>();
        let content = content
            .trim()
            .trim_start_matches("<![CDATA[")
            .trim_end_matches("]]>")
            .trim();

        match serde_json::from_str::<Value>(content) {
            Ok(parsed) => collect_json_ld(&parsed, &mut dates),
            Err(err) => trace!(%err, "unparsable json-ld block"),
        }
    }
    dates
}

/// Walk top-level arrays and `@graph` lists, reading date properties of every object.
fn collect_json_ld(value: &Value, dates: &mut Vec<ExtractedDate>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_json_ld(item, dates);
            }
        }
        Value::Object(object) => {
            for key in JSON_LD_DATE_KEYS {
                let Some(raw) = object.get(key).and_then(Value::as_str) else {
                    continue;
                };
                match FormatCatalog::global().first_date(raw, FormatGroups::GENERAL) {
                    Some(date) => dates.push(date.with_context(DateContext::HtmlHead {
                        keyword: key.to_string(),
                        tag_name: "script".to_string(),
                    })),
                    None => trace!(key, raw, "json-ld value is not a date"),
                }
            }
            if let Some(graph) = object.get("@graph") {
                collect_json_ld(graph, dates);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::Technique;

    fn head(html: &str) -> Vec<ExtractedDate> {
        extract(&Html::parse_document(html), &DaterOptions::default())
    }

    #[test]
    fn test_meta_tags() {
        let dates = head(
            r#"<html><head>
                <meta name="description" content="Posted 2020-01-01">
                <meta property="article:published_time" content="2021-06-01T08:00:00+02:00">
                <meta name="DC.date.issued" content="2021-05-30">
                <meta http-equiv="last-modified" content="Tue, 15 Nov 1994 08:12:31 GMT">
            </head><body></body></html>"#,
        );
        let found: Vec<_> = dates
            .iter()
            .map(|d| (d.keyword().unwrap().to_string(), d.normalized_string()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("article:published_time".to_string(), "2021-06-01 06:00:00".to_string()),
                ("dc.date.issued".to_string(), "2021-05-30".to_string()),
                ("last-modified".to_string(), "1994-11-15 08:12:31".to_string()),
            ]
        );
        assert!(dates.iter().all(|d| d.technique() == Some(Technique::HtmlHead)));
    }

    #[test]
    fn test_json_ld_objects_arrays_and_graphs() {
        let dates = head(
            r#"<html><head>
            <script type="application/ld+json">
                {"@context": "https://schema.org", "@type": "NewsArticle",
                 "datePublished": "2021-06-01", "dateModified": "2021-06-03T10:00:00Z"}
            </script>
            <script type="application/ld+json">
                [{"@type": "VideoObject", "uploadDate": "2020-02-02"}]
            </script>
            <script type="application/ld+json">
                {"@context": "https://schema.org",
                 "@graph": [{"@type": "WebPage"}, {"@type": "Article", "dateCreated": "2019-09-09"}]}
            </script>
            <script type="application/ld+json">{ not json </script>
            </head><body></body></html>"#,
        );
        let found: Vec<_> = dates
            .iter()
            .map(|d| (d.keyword().unwrap(), d.normalized_string()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("datePublished", "2021-06-01".to_string()),
                ("dateModified", "2021-06-03 10:00:00".to_string()),
                ("uploadDate", "2020-02-02".to_string()),
                ("dateCreated", "2019-09-09".to_string()),
            ]
        );
    }

    #[test]
    fn test_json_ld_can_be_disabled() {
        let html = r#"<html><head><script type="application/ld+json">
            {"datePublished": "2021-06-01"}</script></head><body></body></html>"#;
        let options = DaterOptions::builder().parse_json_ld(false).build();
        assert!(extract(&Html::parse_document(html), &options).is_empty());
    }

    #[test]
    fn test_body_meta_tags_are_ignored() {
        let dates = head(
            r#"<html><head></head><body><div><meta name="date" content="2021-06-01"></div></body></html>"#,
        );
        assert!(dates.is_empty());
    }
}
