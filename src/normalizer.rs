//! Turns a matched date string into the fields of an [`ExtractedDate`].
//!
//! The format's recipe says how the date part is read: positional recipes
//! assign numeric tokens (and a month name) in a fixed order, fixed-width
//! recipes cut the digits into ISO week, ordinal or compact fields. A time
//! of day is read separately, AM/PM folded into a 24-hour value and a
//! trailing zone turned into a UTC offset, which is then applied when the
//! date is complete down to the hour.

use crate::constants::{is_filler_word, month_number, zone_offset_minutes, REGEXPS};
use crate::date::ExtractedDate;
use crate::error::{DateError, Result};
use crate::format::{DateFormat, FormatCatalog, Part, Recipe};
use chrono::{Datelike, Duration, NaiveDate, Timelike, Weekday};
use regex::Captures;
use std::borrow::Cow;

/// Normalize `raw_text` with the catalog format named `format_id`.
///
/// # Errors
///
/// Returns an error when the format is unknown or the text does not yield
/// a valid date under that format. Techniques treat any such error as
/// "no candidate here".
///
/// ## Example
///
/// ```rust
/// use pagedaters::normalize;
///
/// let date = normalize("2009-W01-4", "ISO-YWD").unwrap();
/// assert_eq!(date.normalized_string(), "2009-01-01");
///
/// let date = normalize("04/30/2012", "USA-MM-D-Y").unwrap();
/// assert_eq!(date.normalized_string(), "2012-04-30");
/// ```
pub fn normalize(raw_text: &str, format_id: &str) -> Result<ExtractedDate> {
    let format = FormatCatalog::global()
        .get(format_id)
        .ok_or_else(|| DateError::UnknownFormat(format_id.to_string()))?;
    normalize_with(raw_text, format)
}

pub(crate) fn normalize_with(raw_text: &str, format: &DateFormat) -> Result<ExtractedDate> {
    let raw = raw_text.trim();
    let mut date = ExtractedDate::unattributed(raw, format.id());

    let mut date_part = Cow::Borrowed(raw);
    if format.has_time {
        let time = if format.allows_bare_offset() {
            &REGEXPS.iso_time
        } else {
            &REGEXPS.time
        };
        let caps = time
            .captures(raw)
            .ok_or_else(|| DateError::malformed("time", raw))?;
        apply_time(&mut date, &caps)?;
        if let Some(span) = caps.get(0) {
            date_part = Cow::Owned(format!("{} {}", &raw[..span.start()], &raw[span.end()..]));
        }
    }

    match format.recipe {
        Recipe::Positional(parts) => assign_positional(&mut date, &date_part, parts)?,
        Recipe::FixedWidth(widths) => assign_fixed_width(&mut date, &date_part, widths)?,
    }

    validate(&date)?;
    apply_offset(&mut date);
    Ok(date)
}

fn apply_time(date: &mut ExtractedDate, caps: &Captures) -> Result<()> {
    let mut hour = number_field("hour", caps.get(1).map(|m| m.as_str()))?;
    let minute = number_field("minute", caps.get(2).map(|m| m.as_str()))?;
    let second = caps
        .get(3)
        .map(|m| number_field("second", Some(m.as_str())))
        .transpose()?;

    if let Some(marker) = caps.get(4) {
        if hour == 0 || hour > 12 {
            return Err(DateError::malformed("hour", &caps[0]));
        }
        let pm = marker.as_str().eq_ignore_ascii_case("p");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    if hour > 23 {
        return Err(DateError::malformed("hour", &caps[0]));
    }
    if minute > 59 {
        return Err(DateError::malformed("minute", &caps[0]));
    }
    if second.is_some_and(|s| s > 59) {
        return Err(DateError::malformed("second", &caps[0]));
    }

    date.hour = Some(hour);
    date.minute = Some(minute);
    date.second = second;

    if let Some(zone) = caps.get(5).or_else(|| caps.get(6)) {
        let offset = zone_offset_minutes(zone.as_str())
            .ok_or_else(|| DateError::malformed("offset", zone.as_str()))?;
        date.utc_offset_minutes = Some(offset);
    }
    Ok(())
}

fn assign_positional(date: &mut ExtractedDate, date_part: &str, parts: &[Part]) -> Result<()> {
    let (numbers, words): (Vec<&str>, Vec<&str>) = REGEXPS
        .token
        .find_iter(date_part)
        .map(|m| m.as_str())
        .partition(|t| t.starts_with(|c: char| c.is_ascii_digit()));
    let mut numbers = numbers.into_iter();
    let mut words = words.into_iter().filter(|w| !is_filler_word(w));

    for part in parts {
        match part {
            Part::Year => date.year = Some(year_field(numbers.next(), date_part)?),
            Part::Month => date.month = Some(number_field("month", numbers.next())?),
            Part::Day => date.day = Some(number_field("day", numbers.next())?),
            Part::MonthName => {
                let word = words
                    .next()
                    .ok_or_else(|| DateError::malformed("month", date_part))?;
                let month = month_number(word)
                    .ok_or_else(|| DateError::UnrecognizedMonthName(word.to_string()))?;
                date.month = Some(month);
            }
            Part::Week | Part::Weekday | Part::Ordinal => {
                return Err(DateError::malformed("date", date_part));
            }
        }
    }

    if numbers.next().is_some() {
        return Err(DateError::malformed("date", date_part));
    }
    Ok(())
}

fn assign_fixed_width(
    date: &mut ExtractedDate,
    date_part: &str,
    widths: &[(Part, usize)],
) -> Result<()> {
    let digits: String = date_part.chars().filter(|c| c.is_ascii_digit()).collect();
    let mut pos = 0;
    let (mut week, mut weekday, mut ordinal) = (None, None, None);

    for (part, width) in widths {
        let chunk = digits
            .get(pos..pos + width)
            .ok_or_else(|| DateError::malformed("date", date_part))?;
        pos += width;
        let value = number_field("date", Some(chunk))?;
        match part {
            Part::Year => date.year = Some(value as i32),
            Part::Month => date.month = Some(value),
            Part::Day => date.day = Some(value),
            Part::Week => week = Some(value),
            Part::Weekday => weekday = Some(value),
            Part::Ordinal => ordinal = Some(value),
            Part::MonthName => return Err(DateError::malformed("date", date_part)),
        }
    }
    if pos != digits.len() {
        return Err(DateError::malformed("date", date_part));
    }

    let calendar = match (date.year, week, ordinal) {
        (Some(year), Some(week), _) => {
            let weekday = iso_weekday(weekday.unwrap_or(1))
                .ok_or_else(|| DateError::malformed("weekday", date_part))?;
            Some(
                NaiveDate::from_isoywd_opt(year, week, weekday)
                    .ok_or_else(|| DateError::InvalidDate(date_part.trim().to_string()))?,
            )
        }
        (Some(year), None, Some(ordinal)) => Some(
            NaiveDate::from_yo_opt(year, ordinal)
                .ok_or_else(|| DateError::InvalidDate(date_part.trim().to_string()))?,
        ),
        _ => None,
    };

    if let Some(day) = calendar {
        date.year = Some(day.year());
        date.month = Some(day.month());
        date.day = Some(day.day());
    }
    Ok(())
}

fn iso_weekday(n: u32) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

fn number_field(field: &'static str, token: Option<&str>) -> Result<u32> {
    let token = token.ok_or_else(|| DateError::malformed(field, ""))?;
    token
        .parse::<u32>()
        .map_err(|_| DateError::malformed(field, token))
}

/// Four-digit years are taken as is; two-digit years pivot at 50.
fn year_field(token: Option<&str>, date_part: &str) -> Result<i32> {
    let token = token.ok_or_else(|| DateError::malformed("year", date_part))?;
    let value = number_field("year", Some(token))? as i32;
    match token.len() {
        4 => Ok(value),
        1 | 2 if value < 50 => Ok(2000 + value),
        1 | 2 => Ok(1900 + value),
        _ => Err(DateError::malformed("year", token)),
    }
}

fn validate(date: &ExtractedDate) -> Result<()> {
    if let Some(month) = date.month {
        if !(1..=12).contains(&month) {
            return Err(DateError::malformed("month", month.to_string()));
        }
    }
    if let Some(day) = date.day {
        if !(1..=31).contains(&day) {
            return Err(DateError::malformed("day", day.to_string()));
        }
    }
    // A leap year stands in when the year is unknown so 29 February survives.
    let year = date.year.unwrap_or(2000);
    if let (Some(month), Some(day)) = (date.month, date.day) {
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(DateError::InvalidDate(date.raw_text.clone()));
        }
    }
    Ok(())
}

/// Shift to UTC when year, month, day and hour are known; otherwise leave the offset pending.
pub(crate) fn apply_offset(date: &mut ExtractedDate) {
    let Some(offset) = date.utc_offset_minutes else {
        return;
    };
    let (Some(year), Some(month), Some(day), Some(hour)) =
        (date.year, date.month, date.day, date.hour)
    else {
        return;
    };
    let Some(local) = NaiveDate::from_ymd_opt(year, month, day).and_then(|d| {
        d.and_hms_opt(hour, date.minute.unwrap_or(0), date.second.unwrap_or(0))
    }) else {
        return;
    };

    let utc = local - Duration::minutes(i64::from(offset));
    date.year = Some(utc.year());
    date.month = Some(utc.month());
    date.day = Some(utc.day());
    date.hour = Some(utc.hour());
    if date.minute.is_some() {
        date.minute = Some(utc.minute());
    }
    if date.second.is_some() {
        date.second = Some(utc.second());
    }
    date.utc_offset_minutes = None;
}
