//! Integration tests for `logix-output`.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use logix_core::Tick;
    use logix_engine::{DomainEvent, SimObserver};

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;
    use crate::row::{EventRow, TickSummaryRow, NONE};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn move_event(agent: u32, tick: u64) -> DomainEvent {
        DomainEvent::Move {
            agent: logix_core::AgentId(agent),
            from: (0, 0),
            to: (0, 1),
            tick: Tick(tick),
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("events.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            ["tick", "kind", "agent_id", "other_agent_id", "package_id", "from_row", "from_col", "to_row", "to_col"]
        );

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers2,
            ["tick", "moves", "blocked", "pickups", "dropoffs", "yields", "retreats", "emergencies", "deadlocks_resolved"]
        );
    }

    #[test]
    fn csv_event_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = vec![
            EventRow {
                tick: 5,
                kind: "move",
                agent_id: 0,
                other_agent_id: NONE,
                package_id: NONE,
                from_row: 0,
                from_col: 0,
                to_row: 0,
                to_col: 1,
            },
            EventRow {
                tick: 5,
                kind: "pickup",
                agent_id: 1,
                other_agent_id: NONE,
                package_id: 3,
                from_row: 2,
                from_col: 2,
                to_row: NONE,
                to_col: NONE,
            },
        ];
        w.write_events(&rows).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 2);
        assert_eq!(&read_rows[0][1], "move");
        assert_eq!(&read_rows[1][1], "pickup");
        assert_eq!(&read_rows[1][4], "3"); // package_id
    }

    #[test]
    fn csv_tick_summary_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow { tick: 3, moves: 2, blocked: 1, ..TickSummaryRow::default() }).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 1);
        assert_eq!(&read_rows[0][0], "3"); // tick
        assert_eq!(&read_rows[0][1], "2"); // moves
        assert_eq!(&read_rows[0][2], "1"); // blocked
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // second call should not panic
    }

    #[test]
    fn csv_empty_events_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_events(&[]).unwrap(); // should return Ok(())
    }

    #[test]
    fn observer_tallies_one_summary_row_per_tick() {
        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);

        obs.on_tick_end(Tick(0), &[move_event(0, 0), move_event(1, 0)]);
        obs.on_tick_end(Tick(1), &[]);
        obs.on_sim_end(Tick(1));
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let event_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(event_rows.len(), 2, "only tick 0's two moves should be logged");

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let summary_rows: Vec<_> = rdr2.records().map(|r| r.unwrap()).collect();
        assert_eq!(summary_rows.len(), 2, "both ticks get a summary row, even an empty one");
        assert_eq!(&summary_rows[0][1], "2"); // moves at tick 0
        assert_eq!(&summary_rows[1][1], "0"); // moves at tick 1
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{EventRow, TickSummaryRow, NONE};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn event_row(tick: u64, agent_id: i64, kind: &'static str) -> EventRow {
        EventRow {
            tick,
            kind,
            agent_id,
            other_agent_id: NONE,
            package_id: NONE,
            from_row: 0,
            from_col: 0,
            to_row: 0,
            to_col: 1,
        }
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_event_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let rows = vec![event_row(1, 0, "move"), event_row(1, 1, "blocked"), event_row(1, 2, "move")];
        w.write_events(&rows).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_none_sentinel_stored() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_events(&[event_row(0, 0, "retreat")]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let package_id: i64 = conn
            .query_row("SELECT package_id FROM events WHERE agent_id = 0", [], |r| r.get(0))
            .unwrap();
        assert_eq!(package_id, NONE);
    }

    #[test]
    fn sqlite_tick_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow { tick: 7, pickups: 2, dropoffs: 1, ..TickSummaryRow::default() }).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (tick, pickups, dropoffs): (i64, i64, i64) = conn
            .query_row(
                "SELECT tick, pickups, dropoffs FROM tick_summaries WHERE tick = 7",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(tick, 7);
        assert_eq!(pickups, 2);
        assert_eq!(dropoffs, 1);
    }
}
