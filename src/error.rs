//! Crate-wide error type.
//!
//! Only startup and persistence paths surface these to the user. Inside a
//! crawl run every fetch or parse failure is logged and skipped.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings file error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
