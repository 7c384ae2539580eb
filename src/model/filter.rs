use chrono::NaiveDate;
use rusqlite::types::Value as SqlValue;

/// Page size used when the caller does not ask for one
pub const DEFAULT_LIMIT: usize = 10;

/// Exact-match filters for listing matches. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilter {
    pub id: Option<String>,
    pub atp: Option<i64>,
    pub location: Option<String>,
    pub tournament: Option<String>,
    pub date: Option<NaiveDate>,
    pub series: Option<String>,
    pub court: Option<String>,
    pub surface: Option<String>,
    pub round: Option<String>,
    pub winner: Option<String>,
    pub loser: Option<String>,
}

impl MatchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_winner(mut self, winner: impl Into<String>) -> Self {
        self.winner = Some(winner.into());
        self
    }

    pub fn with_loser(mut self, loser: impl Into<String>) -> Self {
        self.loser = Some(loser.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_tournament(mut self, tournament: impl Into<String>) -> Self {
        self.tournament = Some(tournament.into());
        self
    }

    /// Set conditions as (column, value) pairs
    pub(crate) fn conditions(&self) -> Vec<(&'static str, SqlValue)> {
        let text = |v: &Option<String>| v.clone().map(SqlValue::Text);
        [
            ("id", text(&self.id)),
            ("atp", self.atp.map(SqlValue::Integer)),
            ("location", text(&self.location)),
            ("tournament", text(&self.tournament)),
            (
                "date",
                self.date.map(|d| SqlValue::Text(d.format("%Y-%m-%d").to_string())),
            ),
            ("series", text(&self.series)),
            ("court", text(&self.court)),
            ("surface", text(&self.surface)),
            ("round", text(&self.round)),
            ("winner", text(&self.winner)),
            ("loser", text(&self.loser)),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
        .collect()
    }
}

/// Offset pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(skip: usize, limit: usize) -> Self {
        Page { skip, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page { skip: 0, limit: DEFAULT_LIMIT }
    }
}
