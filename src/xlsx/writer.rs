use crate::error::Result;
use crate::model::{MatchRecord, Value};
use crate::schema::COLUMNS;
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

/// Write matches to an Excel file that can be imported again
pub fn write_matches_to_xlsx(records: &[MatchRecord], path: &Path) -> Result<()> {
    let mut workbook = build_workbook(records)?;
    workbook.save(path)?;
    Ok(())
}

/// Same as [`write_matches_to_xlsx`] but returns the file contents
pub fn write_matches_to_buffer(records: &[MatchRecord]) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(records)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(records: &[MatchRecord]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_matches_sheet(worksheet, records)?;
    Ok(workbook)
}

/// Excel serial day number for a date (1900 date system)
fn excel_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    let days = (date - epoch).num_days();
    // Excel's phantom 1900-02-29 shifts nothing before March 1900
    if days <= 60 {
        (days - 1) as f64
    } else {
        days as f64
    }
}

fn column_width(external: &str) -> f64 {
    match external {
        "Location" | "Tournament" | "Winner" | "Loser" => 20.0,
        "Series" | "Round" | "Comment" => 14.0,
        "Date" => 11.0,
        _ => 8.0,
    }
}

fn write_matches_sheet(sheet: &mut Worksheet, records: &[MatchRecord]) -> Result<()> {
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (col, column) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, column_width(column.external))?;
        sheet.write_string_with_format(0, col, column.external, &header_format)?;
    }

    for (row_idx, record) in records.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, value) in record.to_cells().iter().enumerate() {
            let col = col as u16;
            match value {
                Value::Integer(v) => {
                    sheet.write_number(row, col, *v as f64)?;
                }
                Value::Real(Some(v)) => {
                    sheet.write_number(row, col, *v)?;
                }
                Value::Text(Some(s)) => {
                    sheet.write_string(row, col, s)?;
                }
                Value::Date(d) => {
                    sheet.write_number_with_format(row, col, excel_serial(*d), &date_format)?;
                }
                Value::Real(None) | Value::Text(None) => {}
            }
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.set_name("Matches")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::sanitize::excel_serial_date;

    #[test]
    fn test_excel_serial() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(excel_serial(date), 44931.0);
        assert_eq!(excel_serial_date(excel_serial(date)), Some(date));

        for (y, m, d, serial) in [(1900, 1, 1, 1.0), (1900, 2, 28, 59.0), (1900, 3, 1, 61.0)] {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            assert_eq!(excel_serial(date), serial);
            assert_eq!(excel_serial_date(serial), Some(date));
        }
    }

    #[test]
    fn test_empty_export_has_header() {
        let bytes = write_matches_to_buffer(&[]).unwrap();
        let table = crate::xlsx::reader::read_workbook(&bytes).unwrap();
        assert_eq!(table.headers.len(), COLUMNS.len());
        assert!(table.is_empty());
    }
}
