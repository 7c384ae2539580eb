//! Column registry for tennis-data.co.uk match sheets.
//!
//! Every column of the source sheet has an external (header) name, the
//! internal field name it is stored under, and a declared type. The table
//! below is the whole schema; the order is the canonical field order used by
//! sanitized rows and by the storage table.
//!
//! Column notes: <http://www.tennis-data.co.uk/notes.txt>

use crate::model::ColumnType;
use crate::model::ColumnType::{Date, Integer, Real, Text};
use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap};

/// One registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub external: &'static str,
    pub internal: &'static str,
    pub kind: ColumnType,
}

const fn col(external: &'static str, internal: &'static str, kind: ColumnType) -> Column {
    Column { external, internal, kind }
}

pub const COLUMNS: [Column; 42] = [
    col("ATP", "atp", Integer),
    col("Location", "location", Text),
    col("Tournament", "tournament", Text),
    col("Date", "date", Date),
    col("Series", "series", Text),
    col("Court", "court", Text),
    col("Surface", "surface", Text),
    col("Round", "round", Text),
    col("Best of", "best_of", Integer),
    col("Winner", "winner", Text),
    col("Loser", "loser", Text),
    col("WRank", "w_rank", Integer),
    col("LRank", "l_rank", Integer),
    col("WPts", "w_pts", Integer),
    col("LPts", "l_pts", Integer),
    col("W1", "w1", Integer),
    col("L1", "l1", Integer),
    col("W2", "w2", Integer),
    col("L2", "l2", Integer),
    col("W3", "w3", Integer),
    col("L3", "l3", Integer),
    col("W4", "w4", Integer),
    col("L4", "l4", Integer),
    col("W5", "w5", Integer),
    col("L5", "l5", Integer),
    col("Wsets", "w_sets", Integer),
    col("Lsets", "l_sets", Integer),
    col("Comment", "comment", Text),
    col("B365W", "b365_w", Real),
    col("B365L", "b365_l", Real),
    col("EXW", "ex_w", Real),
    col("EXL", "ex_l", Real),
    col("LBW", "lb_w", Real),
    col("LBL", "lb_l", Real),
    col("PSW", "ps_w", Real),
    col("PSL", "ps_l", Real),
    col("SJW", "sj_w", Real),
    col("SJL", "sj_l", Real),
    col("MaxW", "max_w", Real),
    col("MaxL", "max_l", Real),
    col("AvgW", "avg_w", Real),
    col("AvgL", "avg_l", Real),
];

/// Positions of the columns the match key is derived from
pub const DATE_INDEX: usize = 3;
pub const WINNER_INDEX: usize = 9;
pub const LOSER_INDEX: usize = 10;

/// Internal names that can be used as exact-match filters, besides the key
pub const FILTERABLE: [&str; 10] = [
    "atp",
    "location",
    "tournament",
    "date",
    "series",
    "court",
    "surface",
    "round",
    "winner",
    "loser",
];

lazy_static! {
    static ref BY_EXTERNAL: HashMap<&'static str, usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| (c.external, i))
        .collect();
    static ref BY_INTERNAL: HashMap<&'static str, usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| (c.internal, i))
        .collect();
    static ref EXPECTED: BTreeSet<&'static str> = COLUMNS.iter().map(|c| c.external).collect();
}

/// Internal field name for a sheet header
pub fn internal_name(external: &str) -> Option<&'static str> {
    BY_EXTERNAL.get(external).map(|&i| COLUMNS[i].internal)
}

/// Declared type of an internal field
pub fn column_type(internal: &str) -> Option<ColumnType> {
    BY_INTERNAL.get(internal).map(|&i| COLUMNS[i].kind)
}

/// Canonical position of a sheet header
pub fn position(external: &str) -> Option<usize> {
    BY_EXTERNAL.get(external).copied()
}

/// The full set of headers a sheet must carry
pub fn expected_headers() -> &'static BTreeSet<&'static str> {
    &EXPECTED
}
