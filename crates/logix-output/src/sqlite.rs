//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `events` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{EventRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn: Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS events (
                 tick            INTEGER NOT NULL,
                 kind            TEXT    NOT NULL,
                 agent_id        INTEGER NOT NULL,
                 other_agent_id  INTEGER NOT NULL,
                 package_id      INTEGER NOT NULL,
                 from_row        INTEGER NOT NULL,
                 from_col        INTEGER NOT NULL,
                 to_row          INTEGER NOT NULL,
                 to_col          INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick               INTEGER PRIMARY KEY,
                 moves              INTEGER NOT NULL,
                 blocked            INTEGER NOT NULL,
                 pickups            INTEGER NOT NULL,
                 dropoffs           INTEGER NOT NULL,
                 yields             INTEGER NOT NULL,
                 retreats           INTEGER NOT NULL,
                 emergencies        INTEGER NOT NULL,
                 deadlocks_resolved INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events \
                 (tick, kind, agent_id, other_agent_id, package_id, from_row, from_col, to_row, to_col) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.kind,
                    row.agent_id,
                    row.other_agent_id,
                    row.package_id,
                    row.from_row,
                    row.from_col,
                    row.to_row,
                    row.to_col,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, moves, blocked, pickups, dropoffs, yields, retreats, emergencies, deadlocks_resolved) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                row.tick,
                row.moves,
                row.blocked,
                row.pickups,
                row.dropoffs,
                row.yields,
                row.retreats,
                row.emergencies,
                row.deadlocks_resolved,
            ],
        )?;
        Ok(())
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
