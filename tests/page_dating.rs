//! Integration tests over the fixture pages in tests/test-pages/
//!
//! Each case directory holds the page (`source.html`), how it was served
//! (`page.json`) and the normalized dates expected per technique
//! (`expected-dates.json`). Techniques missing from the expectations are not
//! checked.

use pagedaters::{
    BoxError, DateError, Dater, DaterOptions, HttpResponse, PageDates, RatedDate, Technique,
    Techniques,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const TECHNIQUES: [Technique; 7] = [
    Technique::Url,
    Technique::HttpHeader,
    Technique::HtmlHead,
    Technique::HtmlStructure,
    Technique::BodyContent,
    Technique::Reference,
    Technique::Archive,
];

/// How a fixture page was served
#[derive(Debug, Deserialize)]
struct PageInfo {
    url: String,
    #[serde(default)]
    headers: Vec<(String, String)>,
}

/// A single fixture case
struct TestCase {
    name: String,
    source_html: String,
    page: PageInfo,
    expected: BTreeMap<String, Vec<String>>,
}

impl TestCase {
    fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("Invalid test case name")?
            .to_string();

        let source_html = fs::read_to_string(path.join("source.html"))?;
        let page = serde_json::from_str(&fs::read_to_string(path.join("page.json"))?)?;
        let expected =
            serde_json::from_str(&fs::read_to_string(path.join("expected-dates.json"))?)?;

        Ok(TestCase {
            name,
            source_html,
            page,
            expected,
        })
    }

    fn date(&self) -> Result<PageDates, DateError> {
        let mut response = HttpResponse::new(&self.page.url);
        for (name, value) in &self.page.headers {
            response = response.with_header(name, value);
        }
        Ok(Dater::new(&self.source_html, &self.page.url, None)?
            .with_response(response)
            .extract())
    }
}

fn load_test_cases() -> Vec<TestCase> {
    let test_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/test-pages");

    let mut test_cases = Vec::new();
    if let Ok(entries) = fs::read_dir(&test_dir) {
        for entry in entries.flatten() {
            if entry.path().is_dir() {
                match TestCase::load(&entry.path()) {
                    Ok(test_case) => test_cases.push(test_case),
                    Err(e) => panic!("Failed to load test case {:?}: {}", entry.path(), e),
                }
            }
        }
    }

    test_cases.sort_by(|a, b| a.name.cmp(&b.name));
    test_cases
}

#[test]
fn test_fixture_pages() {
    let test_cases = load_test_cases();
    assert!(!test_cases.is_empty(), "no fixture pages found");

    let mut failures = Vec::new();
    for test_case in &test_cases {
        let dates = match test_case.date() {
            Ok(dates) => dates,
            Err(e) => {
                failures.push(format!("{}: {}", test_case.name, e));
                continue;
            }
        };

        for technique in TECHNIQUES {
            let Some(expected) = test_case.expected.get(technique.as_str()) else {
                continue;
            };
            let actual: Vec<String> = dates
                .by_technique(technique)
                .iter()
                .map(|d| d.normalized_string())
                .collect();
            if &actual != expected {
                failures.push(format!(
                    "{} / {}: expected {:?}, got {:?}",
                    test_case.name, technique, expected, actual
                ));
            }
        }
    }

    assert!(failures.is_empty(), "fixture mismatches:\n{}", failures.join("\n"));
}

#[test]
fn test_every_candidate_carries_its_technique() {
    for test_case in load_test_cases() {
        let dates = test_case.date().unwrap();
        for technique in TECHNIQUES {
            assert!(dates
                .by_technique(technique)
                .iter()
                .all(|d| d.technique() == Some(technique)));
        }
    }
}

#[test]
fn test_article_scenario() {
    let html = r#"<html><head><meta name="date" content="2021-06-01"></head>
        <body><p>Published June 1, 2021</p></body></html>"#;
    let dates = Dater::new(html, "https://example.com/2021/06/01/article.html", None)
        .unwrap()
        .extract();

    assert_eq!(dates.url.len(), 1);
    assert_eq!(dates.url[0].normalized_string(), "2021-06-01");
    assert_eq!(dates.html_head.len(), 1);
    assert_eq!(dates.html_head[0].keyword(), Some("date"));

    assert_eq!(dates.body_content.len(), 1);
    let body = &dates.body_content[0];
    assert_eq!(body.normalized_string(), "2021-06-01");
    assert_eq!(body.keyword(), Some("published"));
    assert_eq!(body.document_offset(), Some(10));

    let features = body.features().unwrap();
    assert!(features.in_meta_dates);
    assert!(features.in_url_date);
    assert_eq!(features.relative_size, 1.0);
    assert_eq!(features.relative_frequency, 1.0);
    assert_eq!(features.ordinal_position_percentile, Some(1.0));
    assert_eq!(features.keyword_decay, 1.0);
    assert_eq!(features.exactness, 3);
    assert!(!features.is_headline_tag);
}

#[test]
fn test_headline_date() {
    let html = r#"<html><body><h1>Review of 2020, <span>December 31, 2020</span></h1>
        <p>Nothing else.</p></body></html>"#;
    let dates = Dater::new(html, "https://example.com/review", None)
        .unwrap()
        .extract();

    assert_eq!(dates.body_content.len(), 1);
    assert!(dates.body_content[0].features().unwrap().is_headline_tag);
}

#[test]
fn test_serialized_dates() {
    let html = r#"<html><body><p>Updated 2020-02-29</p></body></html>"#;
    let dates = Dater::new(html, "https://example.com/", None)
        .unwrap()
        .extract();

    let json: serde_json::Value = serde_json::to_value(&dates).unwrap();
    let body = &json["body_content"][0];
    assert_eq!(body["year"], 2020);
    assert_eq!(body["month"], 2);
    assert_eq!(body["day"], 29);
    assert_eq!(body["format_id"], "ISO-YMD");
    assert_eq!(body["context"]["technique"], "body_content");

    let back: PageDates = serde_json::from_value(json).unwrap();
    assert_eq!(back, dates);
}

#[test]
fn test_reference_and_archive_with_page_dater() {
    let html = r#"<html><body>
        <p>See <a href="/2019/cited.html">the earlier post</a>
        and <a href="https://elsewhere.example/report">a report</a>.</p>
    </body></html>"#;

    let page_dater = |url: &str| -> Result<Vec<RatedDate>, BoxError> {
        let dates = match url {
            "https://example.com/2019/cited.html" => vec![("2019-04-01", 0.9), ("2019-03-01", 0.4)],
            "https://elsewhere.example/report" => vec![],
            _ if url.starts_with("https://web.archive.org/") => vec![("2020-08-17", 1.0)],
            _ => return Err(format!("unexpected request for {}", url).into()),
        };
        dates
            .into_iter()
            .map(|(raw, rate)| -> Result<RatedDate, BoxError> {
                Ok(RatedDate::new(pagedaters::normalize(raw, "ISO-YMD")?, rate))
            })
            .collect()
    };

    let options = DaterOptions::builder().techniques(Techniques::all()).build();
    let dates = Dater::new(html, "https://example.com/post", Some(options))
        .unwrap()
        .extract_with(&page_dater)
        .unwrap();

    assert_eq!(dates.reference.len(), 1);
    assert_eq!(dates.reference[0].normalized_string(), "2019-03-01");
    assert_eq!(dates.archive.len(), 1);
    assert_eq!(dates.archive[0].normalized_string(), "2020-08-17");
}

#[test]
fn test_failing_page_dater() {
    let html = r#"<html><body><a href="https://elsewhere.example/">x</a></body></html>"#;
    let page_dater =
        |_: &str| -> Result<Vec<RatedDate>, BoxError> { Err("connection refused".into()) };

    let options = DaterOptions::builder()
        .techniques(Techniques::REFERENCE)
        .build();
    let result = Dater::new(html, "https://example.com/post", Some(options))
        .unwrap()
        .extract_with(&page_dater);

    assert!(matches!(result, Err(DateError::Fetch { .. })));
}
