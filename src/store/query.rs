use super::{column_names, Store, TABLE};
use crate::error::{Result, TennisDataError};
use crate::model::{MatchFilter, MatchRecord, Page, Value};
use crate::schema::COLUMNS;
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params_from_iter, OptionalExtension, Row};

fn select_sql() -> String {
    format!("SELECT {} FROM {}", column_names().join(", "), TABLE)
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<MatchRecord> {
    let id: String = row.get(0)?;
    let cells = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| Value::from_sql_row(row, i + 1, c.kind))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    MatchRecord::from_cells(id, cells)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(0, "id".to_string(), Type::Null))
}

/// Look up one match by key
pub fn get_match(store: &Store, key: &str) -> Result<MatchRecord> {
    let conn = store.connect()?;
    let sql = format!("{} WHERE id = ?1", select_sql());
    conn.query_row(&sql, [key], read_record)
        .optional()?
        .ok_or_else(|| TennisDataError::NotFound { key: key.to_string() })
}

/// Matches equal to every set filter field, in storage order
pub fn list_matches(store: &Store, filter: &MatchFilter, page: Page) -> Result<Vec<MatchRecord>> {
    let conditions = filter.conditions();
    let mut sql = select_sql();
    let mut params: Vec<SqlValue> = Vec::with_capacity(conditions.len() + 2);

    if !conditions.is_empty() {
        let clauses: Vec<String> = conditions
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    params.extend(conditions.into_iter().map(|(_, value)| value));

    let n = params.len();
    sql.push_str(&format!(" ORDER BY rowid LIMIT ?{} OFFSET ?{}", n + 1, n + 2));
    params.push(SqlValue::Integer(i64::try_from(page.limit).unwrap_or(i64::MAX)));
    params.push(SqlValue::Integer(i64::try_from(page.skip).unwrap_or(i64::MAX)));

    let conn = store.connect()?;
    let mut stmt = conn.prepare(&sql)?;
    let records = stmt
        .query_map(params_from_iter(params), read_record)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

/// Every stored match, in storage order
pub fn scan_matches(store: &Store) -> Result<Vec<MatchRecord>> {
    let conn = store.connect()?;
    let mut stmt = conn.prepare(&format!("{} ORDER BY rowid", select_sql()))?;
    let records = stmt
        .query_map([], read_record)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}
