use chrono::NaiveDate;
use std::fmt;

/// An untyped cell as read from a spreadsheet or CSV file
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl RawValue {
    /// Blank text counts as missing
    pub fn is_missing(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Empty => Ok(()),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::Float(v) => write!(f, "{}", v),
            RawValue::Text(s) => write!(f, "{}", s),
            RawValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// A header row plus data rows, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
    /// Source line of each row (header is line 1). Rows without a recorded
    /// line are numbered as if they directly followed the header.
    pub lines: Vec<usize>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        RawTable { headers, rows: Vec::new(), lines: Vec::new() }
    }

    /// Append a row that directly follows the previous one
    pub fn push_row(&mut self, row: Vec<RawValue>) {
        let line = match self.rows.len() {
            0 => 2,
            n => self.line(n - 1) + 1,
        };
        self.push_row_at(line, row);
    }

    /// Append a row read from source line `line`
    pub fn push_row_at(&mut self, line: usize, row: Vec<RawValue>) {
        self.lines.resize(self.rows.len(), 0);
        self.lines.push(line);
        self.rows.push(row);
    }

    /// Source line of row `index`
    pub fn line(&self, index: usize) -> usize {
        match self.lines.get(index) {
            Some(&line) if line > 0 => line,
            _ => index + 2,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row`, `col`; short rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &RawValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&RawValue::Empty)
    }
}
