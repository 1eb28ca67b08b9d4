//! Normalization of Indonesian news-site date strings.
//!
//! Listing pages print dates such as `"Senin, 17 Agu 2024 10:30 WIB"` or
//! `"17 Agustus 2024"`. [`normalize`] reduces them to a [`CalendarDate`].
//!
//! Parsing never fails: empty or malformed input falls back to today's date,
//! and an unknown month name falls back to January. Callers get a
//! well-formed date that is not necessarily accurate.

use crate::models::CalendarDate;
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static TIMEZONE_TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(WIB|WITA|WIT)\b").expect("timezone regex"));

/// Three-letter month prefixes. Keys are case-sensitive.
const MONTHS: &[(&str, &str)] = &[
    ("Jan", "01"),
    ("Feb", "02"),
    ("Mar", "03"),
    ("Apr", "04"),
    ("Mei", "05"),
    ("May", "05"),
    ("Jun", "06"),
    ("Jul", "07"),
    ("Agu", "08"),
    ("Agt", "08"),
    ("Aug", "08"),
    ("Sep", "09"),
    ("Okt", "10"),
    ("Oct", "10"),
    ("Nov", "11"),
    ("Des", "12"),
    ("Dec", "12"),
];

fn month_number(token: &str) -> &'static str {
    let prefix: String = token.chars().take(3).collect();
    MONTHS
        .iter()
        .find(|(key, _)| *key == prefix)
        .map(|(_, number)| *number)
        .unwrap_or("01")
}

/// Normalize a raw date string, falling back to the local current date.
pub fn normalize(raw: &str) -> CalendarDate {
    normalize_at(raw, Local::now().date_naive())
}

/// Normalize a raw date string, falling back to `today` on failure.
pub fn normalize_at(raw: &str, today: NaiveDate) -> CalendarDate {
    match parse(raw) {
        Some(date) => date,
        None => {
            debug!(raw, "Unparseable date; using today");
            CalendarDate::from_naive(today)
        }
    }
}

fn parse(raw: &str) -> Option<CalendarDate> {
    let stripped = TIMEZONE_TOKENS.replace_all(raw, "");
    let stripped = stripped.trim();

    let rest = match stripped.split_once(',') {
        Some((_, after)) => after,
        None => stripped,
    };

    let mut tokens = rest.split_whitespace();
    let day = tokens.next()?;
    let month = tokens.next()?;
    let year = tokens.next()?;

    Some(CalendarDate::new(year, month_number(month), &format!("{day:0>2}")))
}
