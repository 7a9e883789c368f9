//! Built-in record codecs, one per supported file family.

mod delimited;
mod json;
mod spreadsheet;

pub use delimited::CsvCodec;
pub use json::JsonCodec;
pub use spreadsheet::SpreadsheetCodec;
