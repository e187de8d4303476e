//! Parquet output backend (feature `parquet`).
//!
//! Creates `agents.parquet`, `activities.parquet`, `legs.parquet`,
//! `events.parquet` and `links.parquet` in the configured output directory.
//! Undefined values are Parquet nulls.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder, UInt32Builder,
    UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{ActivityRow, AgentRow, EventRow, LegRow, LinkRow, OutputResult};

fn agent_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("agent_id", DataType::Utf8,    false),
        Field::new("segments", DataType::UInt32,  false),
        Field::new("aborted",  DataType::Boolean, false),
        Field::new("air",      DataType::Float64, true),
        Field::new("radiant",  DataType::Float64, true),
    ]))
}

fn activity_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("activity_id", DataType::UInt64,  false),
        Field::new("agent_id",    DataType::Utf8,    false),
        Field::new("idx",         DataType::UInt32,  false),
        Field::new("act_type",    DataType::Utf8,    false),
        Field::new("parcel_id",   DataType::Utf8,    false),
        Field::new("start",       DataType::Int64,   false),
        Field::new("end",         DataType::Int64,   true),
        Field::new("duration",    DataType::Int64,   true),
        Field::new("air",         DataType::Float64, true),
    ]))
}

fn leg_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("leg_id",   DataType::UInt64,  false),
        Field::new("agent_id", DataType::Utf8,    false),
        Field::new("idx",      DataType::UInt32,  false),
        Field::new("mode",     DataType::Utf8,    false),
        Field::new("start",    DataType::Int64,   false),
        Field::new("end",      DataType::Int64,   true),
        Field::new("duration", DataType::Int64,   true),
        Field::new("air",      DataType::Float64, true),
        Field::new("radiant",  DataType::Float64, true),
    ]))
}

fn event_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("agent_id", DataType::Utf8,    false),
        Field::new("leg_idx",  DataType::UInt32,  false),
        Field::new("link_id",  DataType::Utf8,    false),
        Field::new("entry",    DataType::Int64,   false),
        Field::new("exit",     DataType::Int64,   false),
        Field::new("air",      DataType::Float64, true),
        Field::new("radiant",  DataType::Float64, true),
    ]))
}

fn link_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("link_id",    DataType::Utf8,    false),
        Field::new("traversals", DataType::UInt64,  false),
        Field::new("air",        DataType::Float64, false),
        Field::new("radiant",    DataType::Float64, true),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// One Parquet file and its schema.  `writer` is `None` once closed.
struct Table {
    writer: Option<ArrowWriter<File>>,
    schema: Arc<Schema>,
}

impl Table {
    fn create(path: &Path, schema: Arc<Schema>) -> OutputResult<Self> {
        let file = File::create(path)?;
        let writer = ArrowWriter::try_new(file, Arc::clone(&schema), Some(snappy_props()))?;
        Ok(Self { writer: Some(writer), schema })
    }

    fn write(&mut self, columns: Vec<ArrayRef>) -> OutputResult<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        let batch = RecordBatch::try_new(Arc::clone(&self.schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn close(&mut self) -> OutputResult<()> {
        if let Some(w) = self.writer.take() {
            w.close()?;
        }
        Ok(())
    }
}

/// Writes results to five Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    agents:     Table,
    activities: Table,
    legs:       Table,
    events:     Table,
    links:      Table,
}

impl ParquetWriter {
    /// Create the Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Ok(Self {
            agents:     Table::create(&dir.join("agents.parquet"), agent_schema())?,
            activities: Table::create(&dir.join("activities.parquet"), activity_schema())?,
            legs:       Table::create(&dir.join("legs.parquet"), leg_schema())?,
            events:     Table::create(&dir.join("events.parquet"), event_schema())?,
            links:      Table::create(&dir.join("links.parquet"), link_schema())?,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_agents(&mut self, rows: &[AgentRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ids      = StringBuilder::new();
        let mut segments = UInt32Builder::new();
        let mut aborted  = BooleanBuilder::new();
        let mut air      = Float64Builder::new();
        let mut radiant  = Float64Builder::new();

        for row in rows {
            ids.append_value(&row.agent_id);
            segments.append_value(row.segments);
            aborted.append_value(row.aborted);
            air.append_option(row.air);
            radiant.append_option(row.radiant);
        }

        self.agents.write(vec![
            Arc::new(ids.finish()),
            Arc::new(segments.finish()),
            Arc::new(aborted.finish()),
            Arc::new(air.finish()),
            Arc::new(radiant.finish()),
        ])
    }

    fn write_activities(&mut self, rows: &[ActivityRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ids       = UInt64Builder::new();
        let mut agents    = StringBuilder::new();
        let mut idx       = UInt32Builder::new();
        let mut act_types = StringBuilder::new();
        let mut parcels   = StringBuilder::new();
        let mut starts    = Int64Builder::new();
        let mut ends      = Int64Builder::new();
        let mut durations = Int64Builder::new();
        let mut air       = Float64Builder::new();

        for row in rows {
            ids.append_value(row.activity_id);
            agents.append_value(&row.agent_id);
            idx.append_value(row.index);
            act_types.append_value(&row.act_type);
            parcels.append_value(&row.parcel_id);
            starts.append_value(row.start);
            ends.append_option(row.end);
            durations.append_option(row.duration);
            air.append_option(row.air);
        }

        self.activities.write(vec![
            Arc::new(ids.finish()),
            Arc::new(agents.finish()),
            Arc::new(idx.finish()),
            Arc::new(act_types.finish()),
            Arc::new(parcels.finish()),
            Arc::new(starts.finish()),
            Arc::new(ends.finish()),
            Arc::new(durations.finish()),
            Arc::new(air.finish()),
        ])
    }

    fn write_legs(&mut self, rows: &[LegRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ids       = UInt64Builder::new();
        let mut agents    = StringBuilder::new();
        let mut idx       = UInt32Builder::new();
        let mut modes     = StringBuilder::new();
        let mut starts    = Int64Builder::new();
        let mut ends      = Int64Builder::new();
        let mut durations = Int64Builder::new();
        let mut air       = Float64Builder::new();
        let mut radiant   = Float64Builder::new();

        for row in rows {
            ids.append_value(row.leg_id);
            agents.append_value(&row.agent_id);
            idx.append_value(row.index);
            modes.append_value(&row.mode);
            starts.append_value(row.start);
            ends.append_option(row.end);
            durations.append_option(row.duration);
            air.append_option(row.air);
            radiant.append_option(row.radiant);
        }

        self.legs.write(vec![
            Arc::new(ids.finish()),
            Arc::new(agents.finish()),
            Arc::new(idx.finish()),
            Arc::new(modes.finish()),
            Arc::new(starts.finish()),
            Arc::new(ends.finish()),
            Arc::new(durations.finish()),
            Arc::new(air.finish()),
            Arc::new(radiant.finish()),
        ])
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut agents  = StringBuilder::new();
        let mut legs    = UInt32Builder::new();
        let mut links   = StringBuilder::new();
        let mut entries = Int64Builder::new();
        let mut exits   = Int64Builder::new();
        let mut air     = Float64Builder::new();
        let mut radiant = Float64Builder::new();

        for row in rows {
            agents.append_value(&row.agent_id);
            legs.append_value(row.leg_index);
            links.append_value(&row.link_id);
            entries.append_value(row.entry);
            exits.append_value(row.exit);
            air.append_option(row.air);
            radiant.append_option(row.radiant);
        }

        self.events.write(vec![
            Arc::new(agents.finish()),
            Arc::new(legs.finish()),
            Arc::new(links.finish()),
            Arc::new(entries.finish()),
            Arc::new(exits.finish()),
            Arc::new(air.finish()),
            Arc::new(radiant.finish()),
        ])
    }

    fn write_links(&mut self, rows: &[LinkRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ids        = StringBuilder::new();
        let mut traversals = UInt64Builder::new();
        let mut air        = Float64Builder::new();
        let mut radiant    = Float64Builder::new();

        for row in rows {
            ids.append_value(&row.link_id);
            traversals.append_value(row.traversals);
            air.append_value(row.air);
            radiant.append_option(row.radiant);
        }

        self.links.write(vec![
            Arc::new(ids.finish()),
            Arc::new(traversals.finish()),
            Arc::new(air.finish()),
            Arc::new(radiant.finish()),
        ])
    }

    fn finish(&mut self) -> OutputResult<()> {
        for t in [&mut self.agents, &mut self.activities, &mut self.legs, &mut self.events, &mut self.links] {
            t.close()?;
        }
        Ok(())
    }
}
