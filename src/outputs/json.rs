//! JSON output.
//!
//! Writes the records as a pretty-printed array. Keys match the CSV column
//! names so both formats load into the same tooling.

use crate::error::Result;
use crate::models::ArticleRecord;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write records to `path` as a JSON array.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_records(records: &[ArticleRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;

    if let Err(e) = fs::write(path, json).await {
        error!(error = %e, "Failed to write JSON results");
        return Err(e.into());
    }
    info!("Wrote JSON results");
    Ok(())
}
