//! Orderings over candidates.
//!
//! The chronological ordering treats a field that is unknown on either side
//! as a wildcard: it neither precedes nor follows the other value, and the
//! comparison moves on to the next field. That makes it a preorder rather
//! than a total order, so sorting here never goes through `slice::sort_by`
//! (which may panic on an inconsistent order) but through a stable insertion.

use crate::date::{Exactness, ExtractedDate};
use std::cmp::Ordering;

/// Compare field by field from year down to second, skipping fields unknown on either side.
pub fn compare_chronologically(a: &ExtractedDate, b: &ExtractedDate) -> Ordering {
    a.fields()
        .iter()
        .zip(b.fields().iter())
        .find_map(|pair| match pair {
            (Some(x), Some(y)) if x != y => Some(x.cmp(y)),
            _ => None,
        })
        .unwrap_or(Ordering::Equal)
}

/// Order by document offset; candidates without one sort last.
pub fn compare_positionally(a: &ExtractedDate, b: &ExtractedDate) -> Ordering {
    match (a.document_offset(), b.document_offset()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The chronologically smallest date; the first one seen wins a tie.
pub fn oldest<'a, I>(dates: I) -> Option<&'a ExtractedDate>
where
    I: IntoIterator<Item = &'a ExtractedDate>,
{
    dates.into_iter().fold(None, |best, date| match best {
        Some(b) if compare_chronologically(date, b) != Ordering::Less => Some(b),
        _ => Some(date),
    })
}

/// The chronologically largest date; the first one seen wins a tie.
pub fn newest<'a, I>(dates: I) -> Option<&'a ExtractedDate>
where
    I: IntoIterator<Item = &'a ExtractedDate>,
{
    dates.into_iter().fold(None, |best, date| match best {
        Some(b) if compare_chronologically(date, b) != Ordering::Greater => Some(b),
        _ => Some(date),
    })
}

/// Stable chronological sort.
pub fn sort_chronologically(dates: &mut [ExtractedDate]) {
    for i in 1..dates.len() {
        let mut j = i;
        while j > 0 && compare_chronologically(&dates[j], &dates[j - 1]) == Ordering::Less {
            dates.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Stable sort by document offset, unknown offsets last.
pub fn sort_positionally(dates: &mut [ExtractedDate]) {
    dates.sort_by(compare_positionally);
}

/// Whether both dates are known down to `exactness` and agree on every field up to it.
///
/// Dates missing one of those fields, a year-less "1 May" for instance,
/// never compare equal.
pub fn same_at(a: &ExtractedDate, b: &ExtractedDate, exactness: Exactness) -> bool {
    let level = exactness.level();
    a.exactness() >= level
        && b.exactness() >= level
        && a.normalized_at(exactness) == b.normalized_at(exactness)
}

/// Absolute distance in whole hours, when both dates have a year.
pub(crate) fn hours_between(a: &ExtractedDate, b: &ExtractedDate) -> Option<i64> {
    let (a, b) = (a.to_naive_datetime()?, b.to_naive_datetime()?);
    Some((a - b).num_hours().abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::{ContentContext, DateContext};
    use crate::normalize;

    fn iso(raw: &str) -> ExtractedDate {
        let format = match raw.len() {
            4 => return year_only(raw),
            7 => "ISO-YM",
            10 => "ISO-YMD",
            _ => "ISO-YMD-T",
        };
        normalize(raw, format).unwrap()
    }

    fn year_only(raw: &str) -> ExtractedDate {
        let mut date = normalize(&format!("{}-01", raw), "ISO-YM").unwrap();
        date.month = None;
        date
    }

    fn at_offset(raw: &str, offset: Option<usize>) -> ExtractedDate {
        iso(raw).with_context(DateContext::BodyContent(Box::new(ContentContext {
            keyword: None,
            keyword_class: None,
            keyword_location: None,
            keyword_distance: None,
            document_offset: offset,
            tag_name: "p".to_string(),
            is_headline_tag: false,
            features: None,
        })))
    }

    #[test]
    fn test_unknown_fields_are_wildcards() {
        assert_eq!(
            compare_chronologically(&iso("2020"), &iso("2020-05-01")),
            Ordering::Equal
        );
        assert_eq!(
            compare_chronologically(&iso("2019-12"), &iso("2020-01-01")),
            Ordering::Less
        );
        assert_eq!(
            compare_chronologically(&iso("2020-05-02"), &iso("2020-05-01T23:00")),
            Ordering::Greater
        );
    }

    #[test]
    fn test_oldest_picks_first_of_ties() {
        let dates = vec![iso("2020-05-01"), iso("2019-12-31"), iso("2019-12-31")];
        let found = oldest(&dates).unwrap();
        assert!(std::ptr::eq(found, &dates[1]));
        assert_eq!(found.normalized_string(), "2019-12-31");
    }

    #[test]
    fn test_newest_picks_first_of_ties() {
        let dates = vec![iso("2019-12-31"), iso("2020-05-01"), iso("2020-05-01")];
        assert!(std::ptr::eq(newest(&dates).unwrap(), &dates[1]));
        assert!(oldest(Vec::<ExtractedDate>::new().iter()).is_none());
    }

    #[test]
    fn test_chronological_preorder_is_transitive() {
        let a = iso("2019-03-01");
        let b = iso("2019-07");
        let c = iso("2019-07-04T12:00");
        assert_ne!(compare_chronologically(&a, &b), Ordering::Greater);
        assert_ne!(compare_chronologically(&b, &c), Ordering::Greater);
        assert_ne!(compare_chronologically(&a, &c), Ordering::Greater);
    }

    #[test]
    fn test_sort_chronologically_is_stable() {
        let mut dates = vec![
            iso("2021-01-01"),
            iso("2019-06-01"),
            iso("2020-02-02"),
            iso("2019-06-01T10:00"),
        ];
        sort_chronologically(&mut dates);
        let rendered: Vec<_> = dates.iter().map(|d| d.normalized_string()).collect();
        assert_eq!(
            rendered,
            vec!["2019-06-01", "2019-06-01 10:00", "2020-02-02", "2021-01-01"]
        );
    }

    #[test]
    fn test_unknown_positions_sort_last_in_input_order() {
        let mut dates = vec![
            at_offset("2001-01-01", None),
            at_offset("2002-01-01", Some(40)),
            at_offset("2003-01-01", None),
            at_offset("2004-01-01", Some(3)),
        ];
        sort_positionally(&mut dates);
        let years: Vec<_> = dates.iter().map(|d| d.year.unwrap()).collect();
        assert_eq!(years, vec![2004, 2002, 2001, 2003]);
    }

    #[test]
    fn test_same_at_day_exactness() {
        assert!(same_at(&iso("2021-06-01"), &iso("2021-06-01T10:00"), Exactness::Day));
        assert!(!same_at(&iso("2021-06-01"), &iso("2021-06"), Exactness::Day));
        assert!(same_at(&iso("2021-06-01"), &iso("2021-06"), Exactness::Month));
    }

    #[test]
    fn test_same_at_needs_every_field() {
        let april = normalize("30 April", "EU-D-MMMM").unwrap();
        let may = normalize("1 May", "EU-D-MMMM").unwrap();
        assert!(!same_at(&april, &may, Exactness::Day));
        assert!(!same_at(&april, &april.clone(), Exactness::Day));
        assert!(!same_at(&iso("2021"), &iso("2021"), Exactness::Month));
        assert!(same_at(&iso("2021"), &iso("2021-06"), Exactness::Year));
    }

    #[test]
    fn test_hours_between() {
        assert_eq!(
            hours_between(&iso("2021-06-01"), &iso("2021-06-02T06:30")),
            Some(30)
        );
    }
}
