//! `hx-output`: result writers for the heat-exposure pipeline.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend  | Files created                                                     |
//! |-----------|----------|-------------------------------------------------------------------|
//! | *(none)*  | CSV      | `agents.csv`, `activities.csv`, `legs.csv`, `events.csv`, `links.csv` |
//! | `sqlite`  | SQLite   | `results.db`                                                      |
//! | `parquet` | Parquet  | the five tables as `.parquet` files                               |
//!
//! All backends implement [`OutputWriter`] and are driven by [`export`],
//! which flattens a [`Population`](hx_trajectory::Population) and a
//! [`LinkExposureStore`](hx_exposure::LinkExposureStore) into rows.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hx_output::{CsvWriter, DEFAULT_BATCH, export};
//!
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! export(&mut writer, &population, &index, &links, DEFAULT_BATCH)?;
//! ```

pub mod csv;
pub mod error;
pub mod export;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use export::{DEFAULT_BATCH, ExportCounts, RowBatch, export, link_rows};
pub use row::{ActivityRow, AgentRow, EventRow, LegRow, LinkRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
