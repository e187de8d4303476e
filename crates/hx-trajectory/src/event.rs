//! Event-log reader.
//!
//! # CSV format
//!
//! One row per simulator event, in simulation order.  Columns not used by a
//! given type may be empty; columns absent from the header are treated as
//! empty throughout.
//!
//! ```csv
//! time,type,person,link,actType,legMode
//! 28800,actend,17,l12,home,
//! 28800,departure,17,l12,,walk
//! 28800,PersonEntersVehicle,17,,,
//! 29400,travelled,17,,,walk
//! 29400,arrival,17,l40,,walk
//! 29400,actstart,17,l40,work,
//! ```
//!
//! `time` is seconds (any fractional part is truncated) or `HH:MM:SS`.
//! Types other than `actstart`, `actend`, `departure`, `arrival`,
//! `travelled` and `stuckAndAbort` are passed through as
//! [`EventKind::Other`] and ignored by the reconstructor.
//!
//! The reader is a lazy, single-pass iterator: a second pass needs a fresh
//! reader over a reopened source.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use hx_core::parse_secs;

use crate::{TrajectoryError, TrajectoryResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct EventRecord {
    time:     String,
    #[serde(rename = "type")]
    kind:     String,
    #[serde(default)]
    person:   Option<String>,
    #[serde(default)]
    link:     Option<String>,
    #[serde(rename = "actType", default)]
    act_type: Option<String>,
    #[serde(rename = "legMode", default)]
    leg_mode: Option<String>,
}

// ── Parsed events ─────────────────────────────────────────────────────────────

/// One record of the event log.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEvent {
    pub time:   i64,
    /// External person id; empty for records without one.
    pub person: String,
    pub kind:   EventKind,
}

/// Type-specific payload of a [`LogEvent`].  Link ids stay external here;
/// the reconstructor resolves them against the network.
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    ActStart { link: String, act_type: String },
    ActEnd { link: String, act_type: String },
    /// `mode` is the `legMode` tag as logged.
    Departure { link: String, mode: String },
    Arrival { link: String, mode: String },
    Travelled { mode: Option<String> },
    StuckAndAbort,
    /// Vehicle and driver markers and anything else.
    Other(String),
}

impl EventKind {
    /// Record type tag as it appears in the log.
    pub fn tag(&self) -> &str {
        match self {
            EventKind::Other(t) => t,
            k => k.static_tag(),
        }
    }

    /// Like [`tag`](Self::tag), with `"other"` for unrecognised types.
    pub fn static_tag(&self) -> &'static str {
        match self {
            EventKind::ActStart { .. } => "actstart",
            EventKind::ActEnd { .. } => "actend",
            EventKind::Departure { .. } => "departure",
            EventKind::Arrival { .. } => "arrival",
            EventKind::Travelled { .. } => "travelled",
            EventKind::StuckAndAbort => "stuckAndAbort",
            EventKind::Other(_) => "other",
        }
    }
}

// ── Reader ────────────────────────────────────────────────────────────────────

/// Lazy iterator over a CSV event log.
pub struct EventReader<R: Read> {
    rows: csv::DeserializeRecordsIntoIter<R, EventRecord>,
    line: u64,
}

/// Open an event log file.
pub fn open_event_log(path: &Path) -> TrajectoryResult<EventReader<File>> {
    Ok(event_reader(File::open(path)?))
}

/// Like [`open_event_log`] but accepts any `Read` source.
pub fn event_reader<R: Read>(reader: R) -> EventReader<R> {
    EventReader {
        rows: csv::Reader::from_reader(reader).into_deserialize(),
        line: 1,
    }
}

impl<R: Read> Iterator for EventReader<R> {
    type Item = TrajectoryResult<LogEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        self.line += 1;
        Some(
            row.map_err(|e| TrajectoryError::Parse(e.to_string()))
                .and_then(|r| parse_record(r, self.line)),
        )
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

fn parse_record(r: EventRecord, line: u64) -> TrajectoryResult<LogEvent> {
    let time = parse_secs(&r.time)?;
    let kind_tag = r.kind.trim().to_owned();
    let person = non_empty(r.person).unwrap_or_default();
    let link = non_empty(r.link);
    let act_type = non_empty(r.act_type);
    let mode = non_empty(r.leg_mode);

    let need = |v: Option<String>, field: &'static str| {
        v.ok_or_else(|| TrajectoryError::MissingField { kind: kind_tag.clone(), field, line })
    };

    let kind = match kind_tag.as_str() {
        "actstart" => EventKind::ActStart { link: need(link, "link")?, act_type: need(act_type, "actType")? },
        "actend" => EventKind::ActEnd { link: need(link, "link")?, act_type: need(act_type, "actType")? },
        "departure" => EventKind::Departure { link: need(link, "link")?, mode: need(mode, "legMode")? },
        "arrival" => EventKind::Arrival { link: need(link, "link")?, mode: need(mode, "legMode")? },
        "travelled" => EventKind::Travelled { mode },
        "stuckAndAbort" => EventKind::StuckAndAbort,
        _ => EventKind::Other(kind_tag.clone()),
    };

    match kind {
        EventKind::Other(_) => {}
        _ if person.is_empty() => {
            return Err(TrajectoryError::MissingField { kind: kind_tag, field: "person", line });
        }
        _ => {}
    }
    Ok(LogEvent { time, person, kind })
}
