use std::fmt;

use thiserror::Error;

use crate::model::ColumnType;

/// A single cell that could not be coerced to its declared type
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionFailure {
    /// Row number in the source file, as a spreadsheet shows it
    pub row: usize,
    /// External column name
    pub column: String,
    /// The raw value as read from the file
    pub value: String,
    pub expected: ColumnType,
}

impl fmt::Display for CoercionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}, column '{}': cannot read {:?} as {}",
            self.row, self.column, self.value, self.expected
        )
    }
}

fn describe_failures(failures: &[CoercionFailure]) -> String {
    let mut lines: Vec<String> = failures.iter().take(5).map(|f| f.to_string()).collect();
    if failures.len() > 5 {
        lines.push(format!("... and {} more", failures.len() - 5));
    }
    lines.join("; ")
}

#[derive(Error, Debug)]
pub enum TennisDataError {
    #[error("Column mismatch: missing {missing:?}, unexpected {unexpected:?}")]
    SchemaMismatch {
        observed: Vec<String>,
        expected: Vec<String>,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("Invalid data in file: {}", describe_failures(.0))]
    DataCoercion(Vec<CoercionFailure>),

    #[error("Duplicate match key: {key}")]
    DuplicateKey { key: String },

    #[error("Match not found: {key}")]
    NotFound { key: String },

    #[error("Invalid spreadsheet: {0}")]
    InvalidWorkbook(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

/// How an outer surface should report an error to its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input: wrong columns, bad cell values, malformed file, key clash
    Client,
    NotFound,
    /// Storage or internal failure
    Server,
}

impl TennisDataError {
    pub fn class(&self) -> ErrorClass {
        match self {
            TennisDataError::SchemaMismatch { .. }
            | TennisDataError::DataCoercion(_)
            | TennisDataError::DuplicateKey { .. }
            | TennisDataError::InvalidWorkbook(_)
            | TennisDataError::Csv(_) => ErrorClass::Client,
            TennisDataError::NotFound { .. } => ErrorClass::NotFound,
            TennisDataError::Storage(_) | TennisDataError::Io(_) | TennisDataError::Excel(_) => {
                ErrorClass::Server
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TennisDataError>;
