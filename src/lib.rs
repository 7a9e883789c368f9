//! # rusty-sieve
//!
//! Batch threshold filter for tabular records.
//!
//! A run reads a YAML or JSON config naming an input file, an output file and
//! an integer threshold, loads the input (CSV, JSON or Excel), keeps the rows
//! whose `value` field is an integer strictly greater than the threshold, and
//! writes them out in the format implied by the output extension.
//!
//! ## Example
//!
//! ```
//! use rusty_sieve::{process_data, Record, RecordSet};
//!
//! let rows = RecordSet::new(vec![
//!     Record::new().with("id", "1").with("value", "5"),
//!     Record::new().with("id", "2").with("value", "15"),
//!     Record::new().with("id", "3").with("value", "abc"),
//! ]);
//!
//! let kept = process_data(&rows, 10);
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept.records()[0].get("id").unwrap().to_text(), "2");
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;

pub use config::{load_config, Config, ThresholdPolicy, DEFAULT_THRESHOLD};
pub use data::filter::{filter_records, process_data, FilterOptions, FilterStats, Projection};
pub use data::format::{CodecRegistry, ReadOptions, RecordCodec};
pub use data::loader::{load_data, load_data_with};
pub use data::model::{CellValue, Record, RecordSet};
pub use data::writer::{save_result, save_result_with, WriteOutcome};
pub use error::{CodecError, ErrorKind, FileRole, SieveError};
pub use pipeline::{run, run_with, Pipeline, RunOptions, RunSummary, Stage};
