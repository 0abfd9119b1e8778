use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pagedaters::{Dater, FormatCatalog, FormatGroups, HttpResponse};
use std::fs;
use std::path::Path;

fn load_test_case(name: &str) -> Option<(String, String)> {
    let dir = Path::new("tests/test-pages").join(name);
    let html = fs::read_to_string(dir.join("source.html")).ok()?;
    let page: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("page.json")).ok()?).ok()?;
    let url = page["url"].as_str()?.to_string();
    Some((html, url))
}

/// Running text with a date every few sentences.
fn dated_text(paragraphs: usize) -> String {
    let paragraph = "The committee met again on March 3, 2020 to review the findings. \
        A follow-up was scheduled for 2020-04-15 and the report went out 12.05.2020, \
        three weeks after the previous draft from 04/21/2020. ";
    paragraph.repeat(paragraphs)
}

fn bench_format_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("match");
    let catalog = FormatCatalog::global();

    for paragraphs in [1, 10, 100] {
        let text = dated_text(paragraphs);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("text", paragraphs), &text, |b, text| {
            b.iter(|| {
                catalog
                    .find(std::hint::black_box(text), FormatGroups::GENERAL)
                    .filter_map(|m| m.normalize().ok())
                    .count()
            });
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for name in ["news-article", "blog-json-ld", "http-header-only"] {
        let (html, url) = match load_test_case(name) {
            Some(case) => case,
            None => continue,
        };

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("page", name), &html, |b, html| {
            b.iter(|| {
                let dater = Dater::new(std::hint::black_box(html), &url, None)
                    .unwrap()
                    .with_response(HttpResponse::new(url.as_str()));
                std::hint::black_box(dater.extract())
            });
        });
    }

    let long_page = format!(
        "<html><body><article><p>{}</p></article></body></html>",
        dated_text(200)
    );
    group.throughput(Throughput::Bytes(long_page.len() as u64));
    group.bench_function("long_body", |b| {
        b.iter(|| {
            let dater =
                Dater::new(std::hint::black_box(&long_page), "https://example.com/", None).unwrap();
            std::hint::black_box(dater.extract())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_format_matching, bench_pipeline);
criterion_main!(benches);
