//! CSV output backend.
//!
//! Creates `events.csv` in the configured output directory.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use st_station::EventLogEntry;

use crate::OutputResult;
use crate::row::EventRow;
use crate::writer::EventWriter;

/// Writes the event log to one CSV file, one row per entry.
pub struct CsvEventWriter {
    events:   Writer<File>,
    rows:     u64,
    finished: bool,
}

impl CsvEventWriter {
    /// Open (or create) `events.csv` in `dir` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(EventRow::HEADER)?;

        Ok(Self {
            events,
            rows: 0,
            finished: false,
        })
    }

    /// Data rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows
    }
}

impl EventWriter for CsvEventWriter {
    fn write_events(&mut self, entries: &[EventLogEntry]) -> OutputResult<()> {
        for entry in entries {
            let row = EventRow::from_entry(entry);
            self.events.write_record(&[
                row.time.to_string(),
                row.train_id,
                row.direction.to_owned(),
                row.event.to_owned(),
                row.details,
            ])?;
            self.rows += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        Ok(())
    }
}
