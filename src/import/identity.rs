//! Match keys.
//!
//! A key is `{YYYYMMDD}_{winner}_{loser}` with every space and period removed,
//! e.g. `20230105_NadalR_FedererR` for `Nadal R.` beating `Federer R.` on
//! 2023-01-05. The key depends on nothing else in the row.
//!
//! Two matches on the same day with the same winner and loser get the same
//! key. The data is assumed never to contain such a pair; if a batch does, the
//! later row replaces the earlier one and a warning names the key.

use super::sanitize::SanitizedRow;
use crate::error::{CoercionFailure, Result, TennisDataError};
use crate::model::{ColumnType, Value};
use chrono::NaiveDate;
use std::collections::HashMap;

/// A sanitized row with its derived key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRow {
    pub key: String,
    pub line: usize,
    pub cells: Vec<Value>,
}

/// Keyed rows ready to load, one per distinct key, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedBatch {
    pub rows: Vec<KeyedRow>,
    /// Keys that appeared more than once in the input
    pub collisions: Vec<String>,
}

impl KeyedBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Derive the key for one match
pub fn derive_key(date: NaiveDate, winner: &str, loser: &str) -> String {
    format!("{}_{}_{}", date.format("%Y%m%d"), winner, loser)
        .chars()
        .filter(|c| *c != ' ' && *c != '.')
        .collect()
}

fn missing(row: &SanitizedRow, column: &str) -> CoercionFailure {
    CoercionFailure {
        row: row.line,
        column: column.to_string(),
        value: String::new(),
        expected: ColumnType::Text,
    }
}

/// Key every row. Rows without a winner or loser cannot be keyed and reject
/// the batch.
pub fn assign_keys(rows: Vec<SanitizedRow>) -> Result<KeyedBatch> {
    let mut failures = Vec::new();
    let mut batch = KeyedBatch::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let (date, winner, loser) = match (row.date(), row.winner(), row.loser()) {
            (Some(date), Some(winner), Some(loser)) => (date, winner, loser),
            (date, winner, loser) => {
                if date.is_none() {
                    failures.push(CoercionFailure { expected: ColumnType::Date, ..missing(&row, "Date") });
                }
                if winner.is_none() {
                    failures.push(missing(&row, "Winner"));
                }
                if loser.is_none() {
                    failures.push(missing(&row, "Loser"));
                }
                continue;
            }
        };

        let key = derive_key(date, winner, loser);
        let keyed = KeyedRow { key: key.clone(), line: row.line, cells: row.cells };

        match index.get(&key) {
            Some(&existing) => {
                log::warn!(
                    "Row {}: key {} already used by row {}; keeping the later row",
                    keyed.line,
                    key,
                    batch.rows[existing].line
                );
                batch.rows[existing] = keyed;
                batch.collisions.push(key);
            }
            None => {
                index.insert(key, batch.rows.len());
                batch.rows.push(keyed);
            }
        }
    }

    if !failures.is_empty() {
        return Err(TennisDataError::DataCoercion(failures));
    }
    Ok(batch)
}
