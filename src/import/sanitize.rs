//! Row sanitizer: validate a raw table against the column registry and coerce
//! every cell to its declared type.
//!
//! The steps run in a fixed order:
//! 1. the header set must equal the registry's header set (order ignored),
//! 2. missing integer cells are filled with 0,
//! 3. every cell is coerced to its column type.
//!
//! Any failure rejects the whole table. Coercion failures are collected across
//! all rows before the table is rejected.

use super::table::{RawTable, RawValue};
use crate::error::{CoercionFailure, Result, TennisDataError};
use crate::model::{ColumnType, Value};
use crate::schema::{self, COLUMNS, DATE_INDEX, LOSER_INDEX, WINNER_INDEX};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use std::collections::HashMap;

/// Text date layouts accepted in date columns
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Largest serial Excel can represent (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// A fully typed row, cells in registry order
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedRow {
    /// Row number in the source file, as a spreadsheet shows it
    pub line: usize,
    pub cells: Vec<Value>,
}

impl SanitizedRow {
    pub fn date(&self) -> Option<NaiveDate> {
        self.cells.get(DATE_INDEX).and_then(Value::as_date)
    }

    pub fn winner(&self) -> Option<&str> {
        self.cells.get(WINNER_INDEX).and_then(Value::as_text)
    }

    pub fn loser(&self) -> Option<&str> {
        self.cells.get(LOSER_INDEX).and_then(Value::as_text)
    }

    /// Cell by internal field name
    pub fn get(&self, internal: &str) -> Option<&Value> {
        COLUMNS
            .iter()
            .position(|c| c.internal == internal)
            .and_then(|i| self.cells.get(i))
    }
}

/// Check the header set and map each registry column to its header position
pub fn check_columns(headers: &[String]) -> Result<Vec<usize>> {
    let expected = schema::expected_headers();

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut unexpected = Vec::new();
    for (pos, header) in headers.iter().enumerate() {
        if !expected.contains(header.as_str()) || seen.contains_key(header.as_str()) {
            unexpected.push(header.clone());
        } else {
            seen.insert(header.as_str(), pos);
        }
    }

    let missing: Vec<String> = expected
        .iter()
        .filter(|h| !seen.contains_key(*h))
        .map(|h| h.to_string())
        .collect();

    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(TennisDataError::SchemaMismatch {
            observed: headers.to_vec(),
            expected: expected.iter().map(|h| h.to_string()).collect(),
            missing,
            unexpected,
        });
    }

    Ok(COLUMNS.iter().map(|c| seen[c.external]).collect())
}

/// Cells past the last header have no column to go to
fn check_row_widths(table: &RawTable) -> Result<()> {
    let width = table.headers.len();
    match table.rows.iter().position(|row| row.len() > width) {
        Some(index) => Err(TennisDataError::InvalidWorkbook(format!(
            "row {} has {} cells but the header has {} columns",
            table.line(index),
            table.rows[index].len(),
            width
        ))),
        None => Ok(()),
    }
}

/// Replace missing cells in integer columns with 0
fn fill_missing_integers(table: &mut RawTable, positions: &[usize]) {
    let width = table.headers.len();
    let int_positions: Vec<usize> = COLUMNS
        .iter()
        .zip(positions)
        .filter(|(c, _)| c.kind == ColumnType::Integer)
        .map(|(_, &pos)| pos)
        .collect();

    for row in &mut table.rows {
        if row.len() < width {
            row.resize(width, RawValue::Empty);
        }
        for &pos in &int_positions {
            if row[pos].is_missing() {
                row[pos] = RawValue::Int(0);
            }
        }
    }
}

/// Convert an Excel serial day number to a date (1900 date system).
///
/// Excel counts a 29 February 1900 that never existed as serial 60, so
/// serials before it are one day off the usual 1899-12-30 epoch and 60 itself
/// is not a date.
pub fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let days = serial.floor() as i64;
    let epoch = match days {
        1..=59 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        60 => return None,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    epoch.checked_add_signed(Duration::days(days))
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

fn float_to_int(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_real(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Coerce one cell to `kind`. `None` means the value cannot be represented.
pub fn coerce(value: &RawValue, kind: ColumnType) -> Option<Value> {
    match kind {
        ColumnType::Integer => match value {
            RawValue::Int(i) => Some(*i),
            RawValue::Bool(b) => Some(i64::from(*b)),
            RawValue::Float(f) => float_to_int(*f),
            RawValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| parse_real(s).and_then(float_to_int))
            }
            RawValue::Empty | RawValue::Date(_) => None,
        }
        .map(Value::Integer),

        ColumnType::Real => {
            if value.is_missing() {
                return Some(Value::Real(None));
            }
            match value {
                RawValue::Int(i) => Some(*i as f64),
                RawValue::Float(f) => Some(*f).filter(|f| f.is_finite()),
                RawValue::Text(s) => parse_real(s),
                _ => None,
            }
            .map(|f| Value::Real(Some(f)))
        }

        ColumnType::Text => {
            if value.is_missing() {
                Some(Value::Text(None))
            } else {
                Some(Value::Text(Some(value.to_string())))
            }
        }

        ColumnType::Date => match value {
            RawValue::Date(d) => Some(*d),
            RawValue::Float(f) => excel_serial_date(*f),
            RawValue::Int(i) => excel_serial_date(*i as f64),
            RawValue::Text(s) => parse_date_text(s),
            RawValue::Empty | RawValue::Bool(_) => None,
        }
        .map(Value::Date),
    }
}

fn coerce_row(
    table: &RawTable,
    index: usize,
    positions: &[usize],
) -> std::result::Result<SanitizedRow, Vec<CoercionFailure>> {
    let line = table.line(index);
    let mut cells = Vec::with_capacity(COLUMNS.len());
    let mut failures = Vec::new();

    for (column, &pos) in COLUMNS.iter().zip(positions) {
        let raw = table.cell(index, pos);
        match coerce(raw, column.kind) {
            Some(value) => cells.push(value),
            None => failures.push(CoercionFailure {
                row: line,
                column: column.external.to_string(),
                value: raw.to_string(),
                expected: column.kind,
            }),
        }
    }

    if failures.is_empty() {
        Ok(SanitizedRow { line, cells })
    } else {
        Err(failures)
    }
}

/// Validate and type a raw table. No rows are dropped or reordered.
pub fn sanitize(mut table: RawTable) -> Result<Vec<SanitizedRow>> {
    let positions = check_columns(&table.headers)?;
    check_row_widths(&table)?;
    fill_missing_integers(&mut table, &positions);

    let results: Vec<_> = (0..table.len())
        .into_par_iter()
        .map(|i| coerce_row(&table, i, &positions))
        .collect();

    let mut rows = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(row) => rows.push(row),
            Err(mut errs) => failures.append(&mut errs),
        }
    }

    if !failures.is_empty() {
        log::debug!("rejecting table: {} cells failed coercion", failures.len());
        return Err(TennisDataError::DataCoercion(failures));
    }

    log::debug!("sanitized {} rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn headers() -> Vec<String> {
        COLUMNS.iter().map(|c| c.external.to_string()).collect()
    }

    /// A complete raw row in registry order
    pub(crate) fn raw_row(date: &str, winner: &str, loser: &str) -> Vec<RawValue> {
        COLUMNS
            .iter()
            .map(|c| match c.external {
                "Date" => RawValue::Text(date.to_string()),
                "Winner" => RawValue::Text(winner.to_string()),
                "Loser" => RawValue::Text(loser.to_string()),
                "Best of" => RawValue::Int(3),
                _ => match c.kind {
                    ColumnType::Integer => RawValue::Float(1.0),
                    ColumnType::Real => RawValue::Float(1.5),
                    ColumnType::Text => RawValue::Text(format!("{} value", c.external)),
                    ColumnType::Date => RawValue::Empty,
                },
            })
            .collect()
    }

    pub(crate) fn raw_table(rows: Vec<Vec<RawValue>>) -> RawTable {
        RawTable { headers: headers(), rows, lines: Vec::new() }
    }

    fn set(row: &mut [RawValue], external: &str, value: RawValue) {
        let pos = schema::position(external).unwrap();
        row[pos] = value;
    }

    #[test]
    fn test_valid_table_sanitizes() {
        let table = raw_table(vec![
            raw_row("2023-01-05", "Nadal R.", "Federer R."),
            raw_row("06/01/2023", "Murray A.", "Djokovic N."),
        ]);
        let rows = sanitize(table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].date(), NaiveDate::from_ymd_opt(2023, 1, 5));
        assert_eq!(rows[1].date(), NaiveDate::from_ymd_opt(2023, 1, 6));
        assert_eq!(rows[1].winner(), Some("Murray A."));
        assert_eq!(rows[0].get("best_of"), Some(&Value::Integer(3)));
        assert_eq!(rows[0].get("b365_w"), Some(&Value::Real(Some(1.5))));
        for row in &rows {
            assert_eq!(row.cells.len(), COLUMNS.len());
            for (cell, column) in row.cells.iter().zip(COLUMNS.iter()) {
                assert_eq!(cell.kind(), column.kind);
            }
        }
    }

    #[test]
    fn test_column_order_is_ignored() {
        let mut table = raw_table(vec![raw_row("2023-01-05", "Nadal R.", "Federer R.")]);
        table.headers.reverse();
        table.rows[0].reverse();
        let rows = sanitize(table).unwrap();
        assert_eq!(rows[0].winner(), Some("Nadal R."));
        assert_eq!(rows[0].get("best_of"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_missing_column_is_named() {
        let mut table = raw_table(vec![raw_row("2023-01-05", "Nadal R.", "Federer R.")]);
        let pos = schema::position("Surface").unwrap();
        table.headers.remove(pos);
        table.rows[0].remove(pos);

        match sanitize(table) {
            Err(TennisDataError::SchemaMismatch { missing, unexpected, expected, .. }) => {
                assert_eq!(missing, vec!["Surface".to_string()]);
                assert!(unexpected.is_empty());
                assert_eq!(expected.len(), COLUMNS.len());
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_and_renamed_columns_rejected() {
        let mut headers = headers();
        headers.push("Extra".to_string());
        match check_columns(&headers) {
            Err(TennisDataError::SchemaMismatch { unexpected, missing, .. }) => {
                assert_eq!(unexpected, vec!["Extra".to_string()]);
                assert!(missing.is_empty());
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }

        let mut renamed = super::tests::headers();
        renamed[0] = "atp".to_string();
        match check_columns(&renamed) {
            Err(TennisDataError::SchemaMismatch { unexpected, missing, .. }) => {
                assert_eq!(unexpected, vec!["atp".to_string()]);
                assert_eq!(missing, vec!["ATP".to_string()]);
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let mut headers = headers();
        headers.push("Winner".to_string());
        assert!(matches!(
            check_columns(&headers),
            Err(TennisDataError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_integers_become_zero() {
        let mut row = raw_row("2023-01-05", "Nadal R.", "Federer R.");
        set(&mut row, "W4", RawValue::Empty);
        set(&mut row, "L4", RawValue::Text(String::new()));
        set(&mut row, "LRank", RawValue::Float(f64::NAN));
        set(&mut row, "B365W", RawValue::Empty);
        set(&mut row, "Comment", RawValue::Empty);

        let rows = sanitize(raw_table(vec![row])).unwrap();
        assert_eq!(rows[0].get("w4"), Some(&Value::Integer(0)));
        assert_eq!(rows[0].get("l4"), Some(&Value::Integer(0)));
        assert_eq!(rows[0].get("l_rank"), Some(&Value::Integer(0)));
        assert_eq!(rows[0].get("b365_w"), Some(&Value::Real(None)));
        assert_eq!(rows[0].get("comment"), Some(&Value::Text(None)));
    }

    #[test]
    fn test_short_row_is_filled() {
        // AvgL is the last column; a trailing blank cell may be absent
        let mut row = raw_row("2023-01-05", "Nadal R.", "Federer R.");
        assert_eq!(schema::position("AvgL"), Some(row.len() - 1));
        row.pop();
        let mut table = raw_table(vec![]);
        table.push_row(row);

        let rows = sanitize(table).unwrap();
        assert_eq!(rows[0].get("avg_l"), Some(&Value::Real(None)));
    }

    #[test]
    fn test_coercion_failures_are_aggregated() {
        let mut bad = raw_row("2023-01-05", "Nadal R.", "Federer R.");
        set(&mut bad, "WRank", RawValue::Text("NR".to_string()));
        set(&mut bad, "PSW", RawValue::Text("n/a".to_string()));
        let mut bad_date = raw_row("not a date", "A", "B");
        set(&mut bad_date, "W1", RawValue::Float(6.5));

        let table = raw_table(vec![
            raw_row("2023-01-04", "C", "D"),
            bad,
            bad_date,
        ]);

        match sanitize(table) {
            Err(TennisDataError::DataCoercion(failures)) => {
                assert_eq!(failures.len(), 4);
                assert_eq!(failures[0].row, 3);
                assert_eq!(failures[0].column, "WRank");
                assert_eq!(failures[0].value, "NR");
                assert_eq!(failures[0].expected, ColumnType::Integer);
                assert!(failures.iter().any(|f| f.row == 4 && f.column == "Date"));
                assert!(failures.iter().any(|f| f.row == 4 && f.column == "W1"));
            }
            other => panic!("expected coercion error, got {:?}", other),
        }
    }

    #[test]
    fn test_failures_name_source_lines() {
        let mut bad = raw_row("2023-01-05", "Nadal R.", "Federer R.");
        set(&mut bad, "WRank", RawValue::Text("NR".to_string()));
        // A blank line 3 was dropped by the reader
        let mut table = raw_table(vec![]);
        table.push_row_at(2, raw_row("2023-01-04", "C", "D"));
        table.push_row_at(4, bad);

        match sanitize(table) {
            Err(TennisDataError::DataCoercion(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].row, 4);
            }
            other => panic!("expected coercion error, got {:?}", other),
        }
    }

    #[test]
    fn test_wide_row_rejected() {
        let mut row = raw_row("2023-01-05", "Nadal R.", "Federer R.");
        row.push(RawValue::Text("stray".to_string()));
        let table = raw_table(vec![raw_row("2023-01-04", "C", "D"), row]);

        match sanitize(table) {
            Err(TennisDataError::InvalidWorkbook(msg)) => assert!(msg.starts_with("row 3 ")),
            other => panic!("expected invalid workbook, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table() {
        let rows = sanitize(raw_table(vec![])).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce(&RawValue::Int(4), ColumnType::Integer), Some(Value::Integer(4)));
        assert_eq!(coerce(&RawValue::Float(6.0), ColumnType::Integer), Some(Value::Integer(6)));
        assert_eq!(
            coerce(&RawValue::Text(" 1200 ".to_string()), ColumnType::Integer),
            Some(Value::Integer(1200))
        );
        assert_eq!(
            coerce(&RawValue::Text("7.0".to_string()), ColumnType::Integer),
            Some(Value::Integer(7))
        );
        assert_eq!(coerce(&RawValue::Float(1.5), ColumnType::Integer), None);
        assert_eq!(coerce(&RawValue::Text("NR".to_string()), ColumnType::Integer), None);
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(
            coerce(&RawValue::Float(250.0), ColumnType::Text),
            Some(Value::Text(Some("250".to_string())))
        );
        assert_eq!(coerce(&RawValue::Empty, ColumnType::Text), Some(Value::Text(None)));
    }

    #[test]
    fn test_coerce_date() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 5).map(Value::Date);
        assert_eq!(coerce(&RawValue::Float(44931.0), ColumnType::Date), expected);
        assert_eq!(coerce(&RawValue::Int(44931), ColumnType::Date), expected);
        assert_eq!(
            coerce(&RawValue::Text("2023-01-05 00:00:00".to_string()), ColumnType::Date),
            expected
        );
        assert_eq!(
            coerce(&RawValue::Text("05/01/2023".to_string()), ColumnType::Date),
            expected
        );
        assert_eq!(coerce(&RawValue::Empty, ColumnType::Date), None);
        assert_eq!(coerce(&RawValue::Float(-3.0), ColumnType::Date), None);
    }

    #[test]
    fn test_excel_serial_date() {
        assert_eq!(excel_serial_date(1.0), NaiveDate::from_ymd_opt(1900, 1, 1));
        assert_eq!(excel_serial_date(59.0), NaiveDate::from_ymd_opt(1900, 2, 28));
        assert_eq!(excel_serial_date(60.0), None);
        assert_eq!(excel_serial_date(61.0), NaiveDate::from_ymd_opt(1900, 3, 1));
        assert_eq!(excel_serial_date(45000.75), NaiveDate::from_ymd_opt(2023, 3, 15));
        assert_eq!(excel_serial_date(f64::NAN), None);
    }
}
