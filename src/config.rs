//! Run parameters and crawler settings.
//!
//! [`CrawlConfig`] holds the per-run inputs (keyword, year filter, target,
//! output directory). [`Settings`] holds tunables that rarely change between
//! runs and can be loaded from a YAML file:
//!
//! ```yaml
//! request_timeout_secs: 15
//! delay_min_ms: 1000
//! delay_max_ms: 3000
//! max_empty_pages: 5
//! sites: [detik, cnn, liputan6, suara]
//! headers:
//!   User-Agent: "Mozilla/5.0 ..."
//! ```

use crate::error::{CrawlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

pub const MAX_TARGET: usize = 1000;

/// Validated, immutable parameters of a single crawl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    pub keyword: String,
    pub min_year: i32,
    pub target_count: usize,
    pub output_dir: PathBuf,
}

impl CrawlConfig {
    /// Validate and build the parameters of one run.
    ///
    /// # Arguments
    ///
    /// * `keyword` - Search term; surrounding whitespace is trimmed.
    /// * `min_year` - Articles dated before this year are skipped.
    /// * `target_count` - Number of articles to collect, `1..=MAX_TARGET`.
    /// * `output_dir` - Directory result files are written to.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Config`] for an empty keyword or an out-of-range
    /// target.
    pub fn new(
        keyword: &str,
        min_year: i32,
        target_count: usize,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(CrawlError::Config("keyword must not be empty".into()));
        }
        if target_count == 0 || target_count > MAX_TARGET {
            return Err(CrawlError::Config(format!(
                "target count must be between 1 and {MAX_TARGET}, got {target_count}"
            )));
        }
        Ok(Self {
            keyword: keyword.to_string(),
            min_year,
            target_count,
            output_dir: output_dir.into(),
        })
    }
}

/// Crawler tunables. Every field has a default, so a partial YAML file works.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub request_timeout_secs: u64,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    /// Consecutive pages without a new record before a site is abandoned.
    pub max_empty_pages: u32,
    /// Article bodies shorter than this (in characters) are discarded.
    pub min_content_chars: usize,
    /// Characters of body text kept in each record.
    pub full_text_cap: usize,
    pub headers: BTreeMap<String, String>,
    /// Site adapters to crawl, in priority order.
    pub sites: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let headers = [
            (
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
            ),
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
            ("Accept-Language", "id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            request_timeout_secs: 15,
            delay_min_ms: 1000,
            delay_max_ms: 3000,
            max_empty_pages: 5,
            min_content_chars: 150,
            full_text_cap: 3000,
            headers,
            sites: ["detik", "cnn", "liputan6", "suara"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file and validate them.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).await?;
        let settings: Settings = serde_yaml::from_str(&raw)?;
        settings.validate()?;
        info!(sites = ?settings.sites, "Loaded settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.delay_min_ms > self.delay_max_ms {
            return Err(CrawlError::Config(format!(
                "delay_min_ms ({}) exceeds delay_max_ms ({})",
                self.delay_min_ms, self.delay_max_ms
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CrawlError::Config("request_timeout_secs must be positive".into()));
        }
        if self.max_empty_pages == 0 {
            return Err(CrawlError::Config("max_empty_pages must be positive".into()));
        }
        if self.sites.is_empty() {
            return Err(CrawlError::Config("at least one site is required".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.delay_min_ms),
            Duration::from_millis(self.delay_max_ms),
        )
    }
}
