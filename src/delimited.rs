//! CSV input and output.
//!
//! tennis-data.co.uk publishes the same sheets as CSV; those can be imported
//! directly. Every CSV cell is read as text and typed by the sanitizer.

use crate::error::Result;
use crate::import::table::{RawTable, RawValue};
use crate::model::MatchRecord;
use crate::schema::COLUMNS;
use std::io::{Read, Write};

/// Read a CSV file with a header row
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.iter().map(String::from).collect();
    let mut table = RawTable::new(headers);

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line() as usize);
        let values: Vec<RawValue> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    RawValue::Empty
                } else {
                    RawValue::Text(field.to_string())
                }
            })
            .collect();
        if values.iter().all(RawValue::is_missing) {
            continue;
        }
        match line {
            Some(line) => table.push_row_at(line, values),
            None => table.push_row(values),
        }
    }

    Ok(table)
}

/// Write matches with the sheet's own headers, so the output can be imported
pub fn write_matches_csv<W: Write>(records: &[MatchRecord], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(COLUMNS.iter().map(|c| c.external))?;
    for record in records {
        writer.write_record(record.to_cells().iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write full records, key included, using the internal field names
pub fn write_records_csv<W: Write>(records: &[MatchRecord], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
