//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `results.db` file in the configured output directory
//! with five tables: `agents`, `activities`, `legs`, `events` and `links`.
//! Undefined values are stored as `NULL`.

use std::path::Path;

use rusqlite::{Connection, Statement};

use crate::writer::OutputWriter;
use crate::{ActivityRow, AgentRow, EventRow, LegRow, LinkRow, OutputResult};

/// Writes results to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `results.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("results.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agents (
                 agent_id TEXT PRIMARY KEY,
                 segments INTEGER NOT NULL,
                 aborted  INTEGER NOT NULL,
                 air      REAL,
                 radiant  REAL
             );
             CREATE TABLE IF NOT EXISTS activities (
                 activity_id INTEGER PRIMARY KEY,
                 agent_id    TEXT    NOT NULL,
                 idx         INTEGER NOT NULL,
                 act_type    TEXT    NOT NULL,
                 parcel_id   TEXT    NOT NULL,
                 start       INTEGER NOT NULL,
                 \"end\"     INTEGER,
                 duration    INTEGER,
                 air         REAL
             );
             CREATE TABLE IF NOT EXISTS legs (
                 leg_id   INTEGER PRIMARY KEY,
                 agent_id TEXT    NOT NULL,
                 idx      INTEGER NOT NULL,
                 mode     TEXT    NOT NULL,
                 start    INTEGER NOT NULL,
                 \"end\"  INTEGER,
                 duration INTEGER,
                 air      REAL,
                 radiant  REAL
             );
             CREATE TABLE IF NOT EXISTS events (
                 agent_id TEXT    NOT NULL,
                 leg_idx  INTEGER NOT NULL,
                 link_id  TEXT    NOT NULL,
                 entry    INTEGER NOT NULL,
                 exit     INTEGER NOT NULL,
                 air      REAL,
                 radiant  REAL
             );
             CREATE TABLE IF NOT EXISTS links (
                 link_id    TEXT PRIMARY KEY,
                 traversals INTEGER NOT NULL,
                 air        REAL    NOT NULL,
                 radiant    REAL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }

    /// Insert `rows` inside one transaction.
    fn insert<T>(
        &mut self,
        sql:  &str,
        rows: &[T],
        exec: impl Fn(&mut Statement<'_>, &T) -> rusqlite::Result<usize>,
    ) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(sql)?;
            for row in rows {
                exec(&mut *stmt, row)?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl OutputWriter for SqliteWriter {
    fn write_agents(&mut self, rows: &[AgentRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO agents (agent_id, segments, aborted, air, radiant) VALUES (?1, ?2, ?3, ?4, ?5)",
            rows,
            |s, r| s.execute(rusqlite::params![r.agent_id, r.segments, r.aborted as i64, r.air, r.radiant]),
        )
    }

    fn write_activities(&mut self, rows: &[ActivityRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO activities \
             (activity_id, agent_id, idx, act_type, parcel_id, start, \"end\", duration, air) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rows,
            |s, r| {
                s.execute(rusqlite::params![
                    r.activity_id as i64,
                    r.agent_id,
                    r.index,
                    r.act_type,
                    r.parcel_id,
                    r.start,
                    r.end,
                    r.duration,
                    r.air,
                ])
            },
        )
    }

    fn write_legs(&mut self, rows: &[LegRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO legs (leg_id, agent_id, idx, mode, start, \"end\", duration, air, radiant) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rows,
            |s, r| {
                s.execute(rusqlite::params![
                    r.leg_id as i64,
                    r.agent_id,
                    r.index,
                    r.mode,
                    r.start,
                    r.end,
                    r.duration,
                    r.air,
                    r.radiant,
                ])
            },
        )
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO events (agent_id, leg_idx, link_id, entry, exit, air, radiant) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rows,
            |s, r| s.execute(rusqlite::params![r.agent_id, r.leg_index, r.link_id, r.entry, r.exit, r.air, r.radiant]),
        )
    }

    fn write_links(&mut self, rows: &[LinkRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO links (link_id, traversals, air, radiant) VALUES (?1, ?2, ?3, ?4)",
            rows,
            |s, r| s.execute(rusqlite::params![r.link_id, r.traversals as i64, r.air, r.radiant]),
        )
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
