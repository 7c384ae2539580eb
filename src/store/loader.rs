use super::{column_names, Store, TABLE};
use crate::error::{Result, TennisDataError};
use crate::import::identity::KeyedBatch;
use rusqlite::{params_from_iter, ToSql, TransactionBehavior};
use std::sync::PoisonError;

/// What happens to existing matches when a batch is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Discard every stored match; the batch becomes the only contents
    #[default]
    Replace,
    /// Add to the stored matches; a key that is already stored fails the load
    Append,
}

impl LoadMode {
    pub fn from_replace_flag(replace: bool) -> Self {
        if replace {
            LoadMode::Replace
        } else {
            LoadMode::Append
        }
    }
}

fn insert_sql() -> String {
    let columns = column_names();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        TABLE,
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Write a keyed batch in one transaction and return the number of rows written.
///
/// Either the whole batch is committed or nothing changes: a failed replace
/// leaves the previous generation in place, a failed append adds nothing.
pub fn load(store: &Store, batch: &KeyedBatch, mode: LoadMode) -> Result<usize> {
    let _guard = store
        .write_lock()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    let mut conn = store.connect()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if mode == LoadMode::Replace {
        let removed = tx.execute(&format!("DELETE FROM {}", TABLE), [])?;
        log::debug!("replace: removing {} stored matches", removed);
    }

    let mut written = 0;
    {
        let mut stmt = tx.prepare(&insert_sql())?;
        for row in &batch.rows {
            let params = std::iter::once(&row.key as &dyn ToSql)
                .chain(row.cells.iter().map(|cell| cell as &dyn ToSql));
            match stmt.execute(params_from_iter(params)) {
                Ok(n) => written += n,
                Err(e) if is_primary_key_violation(&e) => {
                    log::debug!("row {}: key {} is already stored", row.line, row.key);
                    return Err(TennisDataError::DuplicateKey { key: row.key.clone() });
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    if mode == LoadMode::Replace {
        tx.execute("UPDATE store_meta SET generation = generation + 1 WHERE id = 1", [])?;
    }
    tx.commit()?;

    log::info!("{:?} load wrote {} matches", mode, written);
    Ok(written)
}
