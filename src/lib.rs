pub mod delimited;
pub mod error;
pub mod import;
pub mod model;
pub mod schema;
pub mod store;
pub mod xlsx;

pub use error::{CoercionFailure, ErrorClass, Result, TennisDataError};
pub use import::{import_csv, import_path, import_table, import_workbook};
pub use model::*;
pub use store::{get_match, list_matches, scan_matches, LoadMode, Store, StoreConfig};
