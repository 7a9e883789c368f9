/// Data layer: record model, format codecs, loading, filtering and writing.
///
/// Architecture:
/// ```text
///  .csv / .json / .xlsx / .xls
///        │
///        ▼
///   ┌──────────┐   ┌───────────────┐
///   │  loader  │──▶│ CodecRegistry │  extension → codec (bytes ↔ records)
///   └──────────┘   └───────────────┘
///        │                 ▲
///        ▼                 │
///   ┌───────────┐          │
///   │ RecordSet │  Vec<Record>, field order kept
///   └───────────┘          │
///        │                 │
///        ▼                 │
///   ┌──────────┐           │
///   │  filter  │  value > threshold → RecordSet
///   └──────────┘           │
///        │                 │
///        ▼                 │
///   ┌──────────┐           │
///   │  writer  │───────────┘  dry run / empty / encode + replace
///   └──────────┘
/// ```

pub mod codecs;
pub mod filter;
pub mod format;
pub mod loader;
pub mod model;
pub mod writer;
