//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `events.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EventRow, OutputResult, TickSummaryRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    events: Writer<File>,
    summaries: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record([
            "tick",
            "kind",
            "agent_id",
            "other_agent_id",
            "package_id",
            "from_row",
            "from_col",
            "to_row",
            "to_col",
        ])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "tick",
            "moves",
            "blocked",
            "pickups",
            "dropoffs",
            "yields",
            "retreats",
            "emergencies",
            "deadlocks_resolved",
        ])?;

        Ok(Self { events, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.kind.to_string(),
                row.agent_id.to_string(),
                row.other_agent_id.to_string(),
                row.package_id.to_string(),
                row.from_row.to_string(),
                row.from_col.to_string(),
                row.to_row.to_string(),
                row.to_col.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.moves.to_string(),
            row.blocked.to_string(),
            row.pickups.to_string(),
            row.dropoffs.to_string(),
            row.yields.to_string(),
            row.retreats.to_string(),
            row.emergencies.to_string(),
            row.deadlocks_resolved.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
