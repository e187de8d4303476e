//! CSV output backend.
//!
//! Creates five files in the configured output directory: `agents.csv`,
//! `activities.csv`, `legs.csv`, `events.csv` and `links.csv`.  Undefined
//! values are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{ActivityRow, AgentRow, EventRow, LegRow, LinkRow, OutputResult};

pub(crate) const AGENT_COLUMNS: [&str; 5] = ["agent_id", "segments", "aborted", "air", "radiant"];
pub(crate) const ACTIVITY_COLUMNS: [&str; 9] =
    ["activity_id", "agent_id", "idx", "act_type", "parcel_id", "start", "end", "duration", "air"];
pub(crate) const LEG_COLUMNS: [&str; 9] =
    ["leg_id", "agent_id", "idx", "mode", "start", "end", "duration", "air", "radiant"];
pub(crate) const EVENT_COLUMNS: [&str; 7] =
    ["agent_id", "leg_idx", "link_id", "entry", "exit", "air", "radiant"];
pub(crate) const LINK_COLUMNS: [&str; 4] = ["link_id", "traversals", "air", "radiant"];

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Writes results to five CSV files.
pub struct CsvWriter {
    agents:     Writer<File>,
    activities: Writer<File>,
    legs:       Writer<File>,
    events:     Writer<File>,
    links:      Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let open = |name: &str, header: &[&str]| -> OutputResult<Writer<File>> {
            let mut w = Writer::from_path(dir.join(name))?;
            w.write_record(header)?;
            Ok(w)
        };
        Ok(Self {
            agents:     open("agents.csv", &AGENT_COLUMNS)?,
            activities: open("activities.csv", &ACTIVITY_COLUMNS)?,
            legs:       open("legs.csv", &LEG_COLUMNS)?,
            events:     open("events.csv", &EVENT_COLUMNS)?,
            links:      open("links.csv", &LINK_COLUMNS)?,
            finished:   false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_agents(&mut self, rows: &[AgentRow]) -> OutputResult<()> {
        for row in rows {
            self.agents.write_record(&[
                row.agent_id.clone(),
                row.segments.to_string(),
                (row.aborted as u8).to_string(),
                opt(row.air),
                opt(row.radiant),
            ])?;
        }
        Ok(())
    }

    fn write_activities(&mut self, rows: &[ActivityRow]) -> OutputResult<()> {
        for row in rows {
            self.activities.write_record(&[
                row.activity_id.to_string(),
                row.agent_id.clone(),
                row.index.to_string(),
                row.act_type.clone(),
                row.parcel_id.clone(),
                row.start.to_string(),
                opt(row.end),
                opt(row.duration),
                opt(row.air),
            ])?;
        }
        Ok(())
    }

    fn write_legs(&mut self, rows: &[LegRow]) -> OutputResult<()> {
        for row in rows {
            self.legs.write_record(&[
                row.leg_id.to_string(),
                row.agent_id.clone(),
                row.index.to_string(),
                row.mode.clone(),
                row.start.to_string(),
                opt(row.end),
                opt(row.duration),
                opt(row.air),
                opt(row.radiant),
            ])?;
        }
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.agent_id.clone(),
                row.leg_index.to_string(),
                row.link_id.clone(),
                row.entry.to_string(),
                row.exit.to_string(),
                opt(row.air),
                opt(row.radiant),
            ])?;
        }
        Ok(())
    }

    fn write_links(&mut self, rows: &[LinkRow]) -> OutputResult<()> {
        for row in rows {
            self.links.write_record(&[
                row.link_id.clone(),
                row.traversals.to_string(),
                row.air.to_string(),
                opt(row.radiant),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        for w in [&mut self.agents, &mut self.activities, &mut self.legs, &mut self.events, &mut self.links] {
            w.flush()?;
        }
        Ok(())
    }
}
