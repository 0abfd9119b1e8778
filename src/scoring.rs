//! Feature computation for body-content candidates.
//!
//! Every candidate of a page receives a [`ContentFeatures`] bundle built from
//! its place in two orderings (document position and age), from agreement
//! with the page's head/header and URL dates and from its own keyword
//! context. Candidates keep their input order; only `features` is written.
//!
//! Ranks are 1-based competition ranks: candidates that compare equal share
//! the rank of the first of their group.

use crate::compare::{compare_chronologically, hours_between, same_at};
use crate::date::{ContentFeatures, Exactness, ExtractedDate};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Annotate `body` with features, using `meta` (head and header dates) and
/// `url` dates of the same page as side inputs.
///
/// ## Example
///
/// ```rust
/// use pagedaters::{content_dates, score_body_content_candidates, url_dates, DaterOptions};
/// use scraper::Html;
///
/// let document = Html::parse_document("<html><body><p>Published June 1, 2021</p></body></html>");
/// let body = content_dates::extract(&document, &DaterOptions::default());
/// let url = url_dates::extract("https://example.com/2021/06/01/story.html");
///
/// let scored = score_body_content_candidates(body, &[], &url);
/// let features = scored[0].features().unwrap();
/// assert!(features.in_url_date);
/// assert_eq!(features.relative_frequency, 1.0);
/// ```
pub fn score_body_content_candidates(
    mut body: Vec<ExtractedDate>,
    meta: &[ExtractedDate],
    url: &[ExtractedDate],
) -> Vec<ExtractedDate> {
    let total = body.len();
    if total == 0 {
        return body;
    }

    let positional = position_order(&body);
    let position_ranks = competition_ranks(&positional, |a, b| {
        body[a].document_offset() == body[b].document_offset()
    });
    let age = age_order(&body);
    let age_ranks = competition_ranks(&age, |a, b| {
        compare_chronologically(&body[a], &body[b]) == Ordering::Equal
    });

    let mut features: Vec<ContentFeatures> = (0..total)
        .map(|i| base_features(&body, i, meta, url))
        .collect();

    let known = positional.len();
    for (slot, &i) in positional.iter().enumerate() {
        let offset = body[i].document_offset();
        let f = &mut features[i];
        f.ordinal_position_percentile = Some(round3(position_ranks[slot] as f64 / known as f64));
        f.distance_to_preceding_in_position = slot
            .checked_sub(1)
            .and_then(|prev| distance(body[positional[prev]].document_offset(), offset));
        f.distance_to_following_in_position = positional
            .get(slot + 1)
            .and_then(|&next| distance(offset, body[next].document_offset()));
    }

    for (slot, &i) in age.iter().enumerate() {
        let f = &mut features[i];
        f.ordinal_age_percentile = age_ranks[slot] as f64 / total as f64;
        f.distance_to_preceding_in_age = slot
            .checked_sub(1)
            .and_then(|prev| hours_between(&body[age[prev]], &body[i]));
        f.distance_to_following_in_age = age
            .get(slot + 1)
            .and_then(|&next| hours_between(&body[i], &body[next]));
    }

    for (date, features) in body.iter_mut().zip(features) {
        match date.content_mut() {
            Some(ctx) => ctx.features = Some(features),
            None => trace!(date = %date, "not a body-content candidate, features skipped"),
        }
    }

    debug!(count = total, "scored body content candidates");
    body
}

fn base_features(
    body: &[ExtractedDate],
    i: usize,
    meta: &[ExtractedDate],
    url: &[ExtractedDate],
) -> ContentFeatures {
    let total = body.len() as f64;
    let date = &body[i];
    let same_day = |other: &ExtractedDate| same_at(date, other, Exactness::Day);
    let others = body
        .iter()
        .enumerate()
        .filter(|(j, other)| *j != i && same_day(*other))
        .count();
    let content = date.content();
    let keyword_distance = content.and_then(|c| c.keyword.as_ref().and(c.keyword_distance));

    ContentFeatures {
        relative_size: 1.0 / total,
        ordinal_position_percentile: None,
        ordinal_age_percentile: 0.0,
        in_meta_dates: meta.iter().any(same_day),
        in_url_date: url.iter().any(same_day),
        relative_frequency: (others + 1) as f64 / total,
        distance_to_preceding_in_position: None,
        distance_to_following_in_position: None,
        distance_to_preceding_in_age: None,
        distance_to_following_in_age: None,
        keyword_decay: keyword_distance.map_or(0.0, |d| 1.0 / (1.0 + d as f64)),
        keyword_class: content.and_then(|c| c.keyword_class),
        exactness: date.exactness(),
        is_headline_tag: content.is_some_and(|c| c.is_headline_tag),
    }
}

/// Indices of candidates with a known offset, in document order.
fn position_order(body: &[ExtractedDate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..body.len())
        .filter(|&i| body[i].document_offset().is_some())
        .collect();
    order.sort_by_key(|&i| body[i].document_offset());
    order
}

/// Indices of all candidates, oldest first, stable.
fn age_order(body: &[ExtractedDate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..body.len()).collect();
    for k in 1..order.len() {
        let mut j = k;
        while j > 0
            && compare_chronologically(&body[order[j]], &body[order[j - 1]]) == Ordering::Less
        {
            order.swap(j, j - 1);
            j -= 1;
        }
    }
    order
}

fn competition_ranks<F>(order: &[usize], equal: F) -> Vec<usize>
where
    F: Fn(usize, usize) -> bool,
{
    let mut ranks: Vec<usize> = Vec::with_capacity(order.len());
    for slot in 0..order.len() {
        let rank = match slot.checked_sub(1) {
            Some(prev) if equal(order[prev], order[slot]) => ranks[prev],
            _ => slot + 1,
        };
        ranks.push(rank);
    }
    ranks
}

fn distance(from: Option<usize>, to: Option<usize>) -> Option<usize> {
    Some(to?.abs_diff(from?))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
