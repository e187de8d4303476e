//! The `OutputWriter` trait implemented by all backend writers.

use crate::{ActivityRow, AgentRow, EventRow, LegRow, LinkRow, OutputResult};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Each `write_*` call appends a batch; callers may call them any number of
/// times and in any order before [`finish`](OutputWriter::finish).
pub trait OutputWriter {
    fn write_agents(&mut self, rows: &[AgentRow]) -> OutputResult<()>;

    fn write_activities(&mut self, rows: &[ActivityRow]) -> OutputResult<()>;

    fn write_legs(&mut self, rows: &[LegRow]) -> OutputResult<()>;

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    fn write_links(&mut self, rows: &[LinkRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
