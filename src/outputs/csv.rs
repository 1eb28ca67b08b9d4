//! CSV output.
//!
//! Columns follow [`ArticleRecord`]'s serialized names:
//! `Website, Keyword, Level, Tanggal, Judul, Context, URL, Full_Text`.
//! The file starts with a UTF-8 byte order mark so spreadsheet tools keep
//! Indonesian and other non-ASCII text intact.

use crate::error::Result;
use crate::models::ArticleRecord;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Serialize records to CSV bytes, header row included.
pub fn to_csv_bytes(records: &[ArticleRecord]) -> Result<Vec<u8>> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(UTF8_BOM.to_vec());
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| e.into_error().into())
}

/// Write records to `path` as CSV.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_records(records: &[ArticleRecord], path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(records)?;
    fs::write(path, bytes).await?;
    info!("Wrote CSV results");
    Ok(())
}
