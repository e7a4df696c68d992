//! Page title normalization
//!
//! Roam titles become both file names and link targets, so they are cleaned
//! of characters that break either. Daily-note titles such as
//! `March 3rd, 2023` are renamed to their ISO form `2023-03-03`.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Long-form calendar date as Roam writes daily-note titles.
///
/// Capture groups: month name, day, year.
pub const LONG_DATE_PATTERN: &str = r"(January|February|March|April|May|June|July|August|September|October|November|December) ([0-9]+)[a-z]{2}, ([0-9]{4})";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static LONG_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}$", LONG_DATE_PATTERN)).expect("long date regex")
});

/// A title after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTitle {
    pub title: String,
    /// The title was a calendar date and has been rewritten to `YYYY-MM-DD`
    pub is_daily: bool,
}

/// Normalize a raw page title.
///
/// Characters that are illegal in file names are handled first, then the
/// result is checked against the long-form date pattern. The empty string is a
/// valid result; callers skip pages whose title normalizes to nothing.
pub fn normalize_title(raw: &str) -> NormalizedTitle {
    let title = sanitize_title(raw);

    match parse_long_date(&title) {
        Some(date) => NormalizedTitle {
            title: iso_date(date),
            is_daily: true,
        },
        None => NormalizedTitle {
            title,
            is_daily: false,
        },
    }
}

/// Strip characters that cannot appear in a file name.
///
/// Colons become ` -` so `Project: Alpha` stays readable.
pub fn sanitize_title(raw: &str) -> String {
    raw.replace(':', " -").replace(['"', '^', '\\'], "")
}

/// Parse a string that is exactly a long-form date (`March 3rd, 2023`).
///
/// Returns `None` when the pattern does not match or the date does not exist
/// in the calendar.
pub fn parse_long_date(s: &str) -> Option<NaiveDate> {
    let caps = LONG_DATE_REGEX.captures(s)?;

    let month = MONTH_NAMES.iter().position(|name| *name == &caps[1])? as u32 + 1;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Format a date the way daily notes are named
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
