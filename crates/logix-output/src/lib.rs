//! `logix-output` — CSV and SQLite export for the logistics simulation engine.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                            |
//! |-----------|-------------|--------------------------------------------|
//! | *(none)*  | CSV         | `events.csv`, `tick_summaries.csv`       |
//! | `sqlite`  | SQLite      | `output.db`                               |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements [`logix_engine::SimObserver`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use logix_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{event_row, EventRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
