use chrono::{Datelike, Days, NaiveDate};

use crate::patterns::{DateCapture, DATE_FORMATS, DATE_PATTERNS};

const ISO_DATE: &str = "%Y-%m-%d";

/// Parses `value` against [`DATE_FORMATS`] in order; the first format that
/// accepts the whole string wins. Years must have four digits.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .find(|date| date.year() >= 1000)
}

/// Re-renders any supported date string as `YYYY-MM-DD`.
#[must_use]
pub fn normalize_date(value: &str) -> Option<String> {
    parse_date(value).map(|date| date.format(ISO_DATE).to_string())
}

/// Posting date as `YYYY-MM-DD`.
///
/// Only the first pattern that matches is considered: if its capture does
/// not parse, the field is empty. Relative captures (`N days ago`) are
/// resolved against `today`.
#[must_use]
pub fn extract_date_posted(text: &str, today: NaiveDate) -> Option<String> {
    let (capture, value) = DATE_PATTERNS.iter().find_map(|(capture, pattern)| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| (*capture, m.as_str()))
    })?;

    let date = match capture {
        DateCapture::Literal => parse_date(value),
        DateCapture::DaysAgo => value
            .parse::<u64>()
            .ok()
            .and_then(|days| today.checked_sub_days(Days::new(days))),
    };

    if date.is_none() {
        tracing::debug!("Unparseable posting date '{}'", value);
    }

    date.map(|d| d.format(ISO_DATE).to_string())
}
