use chrono::NaiveDate;
use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;
use std::fmt;

/// Declared scalar type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Date,
}

impl ColumnType {
    /// SQLite column affinity used for storage
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER NOT NULL",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Date => "TEXT NOT NULL",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Real => write!(f, "real"),
            ColumnType::Text => write!(f, "text"),
            ColumnType::Date => write!(f, "date"),
        }
    }
}

/// A typed cell of a sanitized row.
///
/// Integer and date cells are never absent; real and text cells may be.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(Option<f64>),
    Text(Option<String>),
    Date(NaiveDate),
}

impl Value {
    pub fn kind(&self) -> ColumnType {
        match self {
            Value::Integer(_) => ColumnType::Integer,
            Value::Real(_) => ColumnType::Real,
            Value::Text(_) => ColumnType::Text,
            Value::Date(_) => ColumnType::Date,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(Some(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Read a stored cell back according to its declared type
    pub(crate) fn from_sql_row(
        row: &rusqlite::Row<'_>,
        idx: usize,
        kind: ColumnType,
    ) -> rusqlite::Result<Self> {
        Ok(match kind {
            ColumnType::Integer => Value::Integer(row.get(idx)?),
            ColumnType::Real => Value::Real(row.get(idx)?),
            ColumnType::Text => Value::Text(row.get(idx)?),
            ColumnType::Date => Value::Date(row.get(idx)?),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(Some(v)) => write!(f, "{}", v),
            Value::Text(Some(v)) => write!(f, "{}", v),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Real(None) | Value::Text(None) => Ok(()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Integer(v) => v.to_sql(),
            Value::Real(v) => v.to_sql(),
            Value::Text(v) => v.to_sql(),
            Value::Date(v) => v.to_sql(),
        }
    }
}
