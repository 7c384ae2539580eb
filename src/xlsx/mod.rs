pub mod reader;
pub mod writer;

pub use reader::read_workbook;
pub use writer::{write_matches_to_buffer, write_matches_to_xlsx};
