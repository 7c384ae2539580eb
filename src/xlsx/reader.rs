use crate::error::{Result, TennisDataError};
use crate::import::sanitize::excel_serial_date;
use crate::import::table::{RawTable, RawValue};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

fn raw_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Empty,
        Data::Int(i) => RawValue::Int(*i),
        Data::Float(f) => RawValue::Float(*f),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::String(s) => RawValue::Text(s.clone()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            match excel_serial_date(serial) {
                Some(date) => RawValue::Date(date),
                None => RawValue::Float(serial),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
    }
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Read the first worksheet of a workbook (xlsx, xlsm, xls or ods).
///
/// The first row is the header; fully blank rows are skipped.
pub fn read_workbook(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| TennisDataError::InvalidWorkbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TennisDataError::InvalidWorkbook("workbook has no worksheets".to_string()))?
        .map_err(|e| TennisDataError::InvalidWorkbook(e.to_string()))?;

    // Sheet row (1-based) of the header; the range starts at the first used cell
    let header_line = range.start().map_or(1, |(row, _)| row as usize + 1);

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(row) => row.iter().map(header_name).collect(),
        None => return Err(TennisDataError::InvalidWorkbook("worksheet is empty".to_string())),
    };

    let mut table = RawTable::new(headers);
    for (offset, row) in rows.enumerate() {
        let values: Vec<RawValue> = row.iter().map(raw_value).collect();
        if values.iter().all(RawValue::is_missing) {
            continue;
        }
        table.push_row_at(header_line + offset + 1, values);
    }

    log::debug!(
        "read worksheet: {} columns, {} rows",
        table.headers.len(),
        table.len()
    );
    Ok(table)
}
