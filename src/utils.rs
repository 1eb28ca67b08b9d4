//! Utility functions for string truncation and file system checks.

use crate::error::Result;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// The first `max` characters of `s`, never splitting a UTF-8 sequence.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` characters are cut and suffixed with `"..."`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("Banjir Jakarta", 6), "Banjir...");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{head}...")
    }
}

/// Name of the scratch file used to test that a directory accepts writes.
const WRITE_CHECK_FILE: &str = ".berita_crawler_write_check";

/// Create `path` if needed and confirm a file can be written inside it.
///
/// Called once at startup so an unusable output directory is reported
/// before any network traffic, not after a long crawl.
///
/// # Arguments
///
/// * `path` - The directory result files will be written to.
///
/// # Errors
///
/// Returns [`CrawlError::Io`](crate::error::CrawlError::Io) when the directory cannot be created or the
/// scratch file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    let scratch = path.join(WRITE_CHECK_FILE);
    fs::write(&scratch, b"").await?;
    if let Err(e) = fs::remove_file(&scratch).await {
        warn!(error = %e, "Could not remove write-check file");
    }
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrawlError;

    #[test]
    fn test_truncate_chars_ascii() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("café ☕ pagi", 6), "café ☕");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 50);
        assert_eq!(result, format!("{}...", "a".repeat(50)));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("csv");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join(WRITE_CHECK_FILE).exists());
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_rejects_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bukan_folder");
        std::fs::write(&file, "x").unwrap();
        let err = ensure_writable_dir(&file).await.unwrap_err();
        assert!(matches!(err, CrawlError::Io(_)), "{err:?}");
    }
}
