//! Data models for crawled articles.
//!
//! This module defines the core data structures passed through the pipeline:
//! - [`ArticleStub`]: A candidate article parsed from a search listing page
//! - [`ArticleRecord`]: A fully processed article ready for export
//! - [`RelevanceLevel`]: The categorical keyword relevance of a record
//! - [`CalendarDate`]: A `YYYY-MM-DD` date produced by the date normalizer
//!
//! Records serialize with the column names used in the exported dataset
//! (`Website`, `Keyword`, `Level`, `Tanggal`, `Judul`, `Context`, `URL`,
//! `Full_Text`), hence the `#[serde(rename)]` attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate article as listed on a site's search results page.
///
/// Stubs are cheap and short-lived. They are only deduplicated against the
/// records already collected in the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleStub {
    /// Absolute URL of the article detail page.
    pub url: String,
    /// Headline as shown in the listing. May be empty for some sites.
    pub title: String,
    /// Site-specific date text, e.g. `"Senin, 17 Agu 2024 10:00 WIB"`.
    pub raw_date: String,
}

/// Categorical keyword relevance of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum RelevanceLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RelevanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RelevanceLevel::Low => "Low",
            RelevanceLevel::Medium => "Medium",
            RelevanceLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// A calendar date in `YYYY-MM-DD` form.
///
/// The normalizer does not validate the calendar, so values such as
/// `2024-01-35` are representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CalendarDate(String);

impl CalendarDate {
    pub fn new(year: &str, month: &str, day: &str) -> Self {
        CalendarDate(format!("{year}-{month}-{day}"))
    }

    pub fn from_naive(date: chrono::NaiveDate) -> Self {
        CalendarDate(date.format("%Y-%m-%d").to_string())
    }

    /// The leading year field, if it parses as an integer.
    pub fn year(&self) -> Option<i32> {
        self.as_str().split('-').next()?.trim().parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A finished article entry.
///
/// Created only after the detail page was fetched, the body passed the
/// minimum length check, and the date passed the year filter. The `url` is
/// unique within one run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Display name of the site the article came from.
    #[serde(rename = "Website")]
    pub site: String,
    /// The keyword the run searched for.
    #[serde(rename = "Keyword")]
    pub keyword: String,
    #[serde(rename = "Level")]
    pub level: RelevanceLevel,
    /// Normalized publication date.
    #[serde(rename = "Tanggal")]
    pub date: CalendarDate,
    #[serde(rename = "Judul")]
    pub title: String,
    /// Keyword-bearing sentences joined by `" | "`.
    #[serde(rename = "Context")]
    pub context: String,
    #[serde(rename = "URL")]
    pub url: String,
    /// Article body, capped to the configured number of characters.
    #[serde(rename = "Full_Text")]
    pub full_text: String,
}
