//! Result file writers.
//!
//! # Submodules
//!
//! - [`csv`]: Spreadsheet-friendly CSV with a UTF-8 byte order mark
//! - [`json`]: Pretty-printed JSON array of the same records
//!
//! Both write `Result_<keyword>_<YYYYmmdd_HHMM>.<ext>` into the output
//! directory. The keyword is used verbatim.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::models::ArticleRecord;
use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};

pub mod csv;
pub mod json;

/// File name for a run's results.
pub fn result_filename<Tz: TimeZone>(keyword: &str, at: &DateTime<Tz>, extension: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Result_{keyword}_{}.{extension}", at.format("%Y%m%d_%H%M"))
}

/// Write `records` in `format` and return the path of the new file.
///
/// # Arguments
///
/// * `format` - CSV or JSON.
/// * `records` - Collected records, written in collection order.
/// * `output_dir` - Existing directory to create the file in.
/// * `keyword` - Used verbatim in the file name, see [`result_filename`].
///
/// # Errors
///
/// Propagates serialization and I/O failures. Nothing is retried.
pub async fn persist(
    format: OutputFormat,
    records: &[ArticleRecord],
    output_dir: &Path,
    keyword: &str,
) -> Result<PathBuf> {
    let now = Local::now();
    match format {
        OutputFormat::Csv => {
            let path = output_dir.join(result_filename(keyword, &now, "csv"));
            csv::write_records(records, &path).await?;
            Ok(path)
        }
        OutputFormat::Json => {
            let path = output_dir.join(result_filename(keyword, &now, "json"));
            json::write_records(records, &path).await?;
            Ok(path)
        }
    }
}
