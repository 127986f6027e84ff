/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Workbook (sheets of cells)
///   └──────────┘
///        │  cached per path (cache)
///        ▼
///   ┌──────────┐
///   │  schema   │  required columns, coercion, coordinate checks
///   └──────────┘
///        │  Terminal / Deal / Definition / TrendTable
///        ▼
///   ┌───────────────────┐
///   │ filter / aggregate │  selections → indices, country roles, reshape
///   └───────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  map markers, time series, no-match / unavailable
///   └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
pub mod views;
