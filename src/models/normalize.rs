//! Field normalizers for Evently models
//!
//! Each normalizer rewrites one field into its single stored form: slugs
//! from titles, ISO dates, 24-hour times and lowercase tags.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

use super::error::{EventError, EventResult};

static SLUG_STRIP_REGEX: OnceLock<Regex> = OnceLock::new();
static SLUG_SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();
static TIME_REGEX: OnceLock<Regex> = OnceLock::new();

/// Characters that never survive into a slug
fn slug_strip_regex() -> &'static Regex {
    SLUG_STRIP_REGEX
        .get_or_init(|| Regex::new(r"[^a-z0-9\s-]").expect("Invalid slug strip regex pattern"))
}

/// Runs of whitespace, non-word characters or hyphens
fn slug_separator_regex() -> &'static Regex {
    SLUG_SEPARATOR_REGEX
        .get_or_init(|| Regex::new(r"[\s\W-]+").expect("Invalid slug separator regex pattern"))
}

/// `H:MM` or `HH:MM`, optionally followed by AM/PM in any case
fn time_regex() -> &'static Regex {
    TIME_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^([0-9]{1,2}):([0-9]{2})(?:\s*(AM|PM))?$")
            .expect("Invalid time regex pattern")
    })
}

/// Derive a URL-safe slug from an event title
///
/// Lowercases and trims, drops everything but ASCII letters, digits,
/// whitespace and hyphens, then joins the remaining words with single
/// hyphens. The result may be empty when the title has no usable
/// characters.
pub fn derive_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = slug_strip_regex().replace_all(lowered.trim(), "");
    let hyphenated = slug_separator_regex().replace_all(&stripped, "-");
    hyphenated.trim_matches('-').to_string()
}

/// Date-time layouts tried after RFC 3339 and RFC 2822
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Calendar date layouts, most specific first
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
    "%A %B %d %Y",
    "%a %b %d %Y",
];

/// Normalize a date to `YYYY-MM-DD`
///
/// Accepts RFC 3339 and RFC 2822 timestamps (taken in UTC), ISO date-times
/// without offset, plain dates in ISO, slash and month-name layouts, and
/// the partial forms `YYYY-MM` and `YYYY` (first day of the period). The
/// time of day is discarded.
pub fn normalize_date(input: &str) -> EventResult<String> {
    parse_date(input.trim())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or(EventError::InvalidDate)
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Some(date);
        }
    }

    parse_partial_date(input)
}

/// `YYYY-MM` and `YYYY`
fn parse_partial_date(input: &str) -> Option<NaiveDate> {
    let mut parts = input.splitn(2, '-');
    let year = parts.next().filter(|y| y.len() == 4)?;
    let month = parts.next().unwrap_or("01");

    if !year.bytes().all(|b| b.is_ascii_digit()) || month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Normalize a 12- or 24-hour clock time to zero-padded `HH:MM`
pub fn normalize_time(input: &str) -> EventResult<String> {
    let captures = time_regex()
        .captures(input.trim())
        .ok_or(EventError::InvalidTimeFormat)?;

    // Both groups are ASCII digits of bounded width, so parsing cannot fail.
    let mut hours: u32 = captures[1].parse().map_err(|_| EventError::InvalidTimeFormat)?;
    let minutes: u32 = captures[2].parse().map_err(|_| EventError::InvalidTimeFormat)?;

    if let Some(period) = captures.get(3) {
        let pm = period.as_str().eq_ignore_ascii_case("PM");
        if pm && hours != 12 {
            hours += 12;
        } else if !pm && hours == 12 {
            hours = 0;
        }
    }

    if hours > 23 || minutes > 59 {
        return Err(EventError::InvalidTimeValues);
    }

    Ok(format!("{:02}:{:02}", hours, minutes))
}

/// Lowercase and trim every tag, keeping order
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter().map(|tag| tag.to_lowercase().trim().to_string()).collect()
}
