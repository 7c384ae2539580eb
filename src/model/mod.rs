pub mod filter;
pub mod record;
pub mod value;

pub use filter::{MatchFilter, Page, DEFAULT_LIMIT};
pub use record::MatchRecord;
pub use value::{ColumnType, Value};
