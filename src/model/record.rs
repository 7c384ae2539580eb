use super::value::Value;
use chrono::NaiveDate;
use serde::Serialize;

/// One stored tennis match, keyed by its derived id.
///
/// Field meanings follow <http://www.tennis-data.co.uk/notes.txt>.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub id: String,
    pub atp: i64,
    pub location: Option<String>,
    pub tournament: Option<String>,
    pub date: NaiveDate,
    pub series: Option<String>,
    pub court: Option<String>,
    pub surface: Option<String>,
    pub round: Option<String>,
    pub best_of: i64,
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub w_rank: i64,
    pub l_rank: i64,
    pub w_pts: i64,
    pub l_pts: i64,
    pub w1: i64,
    pub l1: i64,
    pub w2: i64,
    pub l2: i64,
    pub w3: i64,
    pub l3: i64,
    pub w4: i64,
    pub l4: i64,
    pub w5: i64,
    pub l5: i64,
    pub w_sets: i64,
    pub l_sets: i64,
    pub comment: Option<String>,
    pub b365_w: Option<f64>,
    pub b365_l: Option<f64>,
    pub ex_w: Option<f64>,
    pub ex_l: Option<f64>,
    pub lb_w: Option<f64>,
    pub lb_l: Option<f64>,
    pub ps_w: Option<f64>,
    pub ps_l: Option<f64>,
    pub sj_w: Option<f64>,
    pub sj_l: Option<f64>,
    pub max_w: Option<f64>,
    pub max_l: Option<f64>,
    pub avg_w: Option<f64>,
    pub avg_l: Option<f64>,
}

/// Walks cells in registry order, checking each one's type
struct Cells<I> {
    inner: I,
}

impl<I: Iterator<Item = Value>> Cells<I> {
    fn int(&mut self) -> Option<i64> {
        match self.inner.next()? {
            Value::Integer(v) => Some(v),
            _ => None,
        }
    }

    fn real(&mut self) -> Option<Option<f64>> {
        match self.inner.next()? {
            Value::Real(v) => Some(v),
            _ => None,
        }
    }

    fn text(&mut self) -> Option<Option<String>> {
        match self.inner.next()? {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    fn date(&mut self) -> Option<NaiveDate> {
        match self.inner.next()? {
            Value::Date(v) => Some(v),
            _ => None,
        }
    }
}

impl MatchRecord {
    /// Build a record from cells in registry order.
    ///
    /// Returns `None` if a cell is missing or has the wrong type.
    pub fn from_cells(id: String, cells: Vec<Value>) -> Option<Self> {
        let mut c = Cells { inner: cells.into_iter() };
        Some(MatchRecord {
            id,
            atp: c.int()?,
            location: c.text()?,
            tournament: c.text()?,
            date: c.date()?,
            series: c.text()?,
            court: c.text()?,
            surface: c.text()?,
            round: c.text()?,
            best_of: c.int()?,
            winner: c.text()?,
            loser: c.text()?,
            w_rank: c.int()?,
            l_rank: c.int()?,
            w_pts: c.int()?,
            l_pts: c.int()?,
            w1: c.int()?,
            l1: c.int()?,
            w2: c.int()?,
            l2: c.int()?,
            w3: c.int()?,
            l3: c.int()?,
            w4: c.int()?,
            l4: c.int()?,
            w5: c.int()?,
            l5: c.int()?,
            w_sets: c.int()?,
            l_sets: c.int()?,
            comment: c.text()?,
            b365_w: c.real()?,
            b365_l: c.real()?,
            ex_w: c.real()?,
            ex_l: c.real()?,
            lb_w: c.real()?,
            lb_l: c.real()?,
            ps_w: c.real()?,
            ps_l: c.real()?,
            sj_w: c.real()?,
            sj_l: c.real()?,
            max_w: c.real()?,
            max_l: c.real()?,
            avg_w: c.real()?,
            avg_l: c.real()?,
        })
    }

    /// Cells in registry order (without the id)
    pub fn to_cells(&self) -> Vec<Value> {
        let text = |v: &Option<String>| Value::Text(v.clone());
        vec![
            Value::Integer(self.atp),
            text(&self.location),
            text(&self.tournament),
            Value::Date(self.date),
            text(&self.series),
            text(&self.court),
            text(&self.surface),
            text(&self.round),
            Value::Integer(self.best_of),
            text(&self.winner),
            text(&self.loser),
            Value::Integer(self.w_rank),
            Value::Integer(self.l_rank),
            Value::Integer(self.w_pts),
            Value::Integer(self.l_pts),
            Value::Integer(self.w1),
            Value::Integer(self.l1),
            Value::Integer(self.w2),
            Value::Integer(self.l2),
            Value::Integer(self.w3),
            Value::Integer(self.l3),
            Value::Integer(self.w4),
            Value::Integer(self.l4),
            Value::Integer(self.w5),
            Value::Integer(self.l5),
            Value::Integer(self.w_sets),
            Value::Integer(self.l_sets),
            text(&self.comment),
            Value::Real(self.b365_w),
            Value::Real(self.b365_l),
            Value::Real(self.ex_w),
            Value::Real(self.ex_l),
            Value::Real(self.lb_w),
            Value::Real(self.lb_l),
            Value::Real(self.ps_w),
            Value::Real(self.ps_l),
            Value::Real(self.sj_w),
            Value::Real(self.sj_l),
            Value::Real(self.max_w),
            Value::Real(self.max_l),
            Value::Real(self.avg_w),
            Value::Real(self.avg_l),
        ]
    }
}
