//! Ingest pipeline: file → raw table → sanitized rows → keyed batch → store.

pub mod identity;
pub mod sanitize;
pub mod table;

use crate::delimited;
use crate::error::{Result, TennisDataError};
use crate::store::{load, LoadMode, Store};
use crate::xlsx;
use std::path::Path;

pub use identity::{assign_keys, derive_key, KeyedBatch, KeyedRow};
pub use sanitize::{sanitize, SanitizedRow};
pub use table::{RawTable, RawValue};

/// Sanitize, key and load an already-read table
pub fn import_table(store: &Store, table: RawTable, mode: LoadMode) -> Result<usize> {
    let rows = sanitize(table)?;
    let batch = assign_keys(rows)?;
    if !batch.collisions.is_empty() {
        log::warn!("{} rows replaced an earlier row with the same key", batch.collisions.len());
    }
    load(store, &batch, mode)
}

/// Import a spreadsheet (xlsx, xls or ods) held in memory
pub fn import_workbook(store: &Store, bytes: &[u8], mode: LoadMode) -> Result<usize> {
    let table = xlsx::read_workbook(bytes)?;
    import_table(store, table, mode)
}

/// Import a CSV export of the same sheet
pub fn import_csv(store: &Store, bytes: &[u8], mode: LoadMode) -> Result<usize> {
    let table = delimited::read_csv(bytes)?;
    import_table(store, table, mode)
}

/// Import a file, choosing the reader from its extension
pub fn import_path(store: &Store, path: &Path, mode: LoadMode) -> Result<usize> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let bytes = std::fs::read(path)?;

    log::info!("importing {} ({:?})", path.display(), mode);
    match ext.as_str() {
        "csv" => import_csv(store, &bytes, mode),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => import_workbook(store, &bytes, mode),
        _ => Err(TennisDataError::InvalidWorkbook(format!(
            "unsupported file type: {}",
            path.display()
        ))),
    }
}
