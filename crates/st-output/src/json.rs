//! JSON output backend.
//!
//! Entries are buffered and written as a single array to `events.json` on
//! [`finish`](EventWriter::finish), using `EventLogEntry`'s serde form:
//!
//! ```json
//! {"time": 0.0, "train_id": "N1", "direction": "north",
//!  "event": "points_set", "details": {"points": ["P1", "P2"], "state": "reverse"}}
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use st_station::EventLogEntry;

use crate::OutputResult;
use crate::writer::EventWriter;

pub struct JsonEventWriter {
    path:     PathBuf,
    buffered: Vec<EventLogEntry>,
    finished: bool,
}

impl JsonEventWriter {
    /// Target `events.json` in `dir`.  The file is created on `finish`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path:     dir.join("events.json"),
            buffered: Vec::new(),
            finished: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventWriter for JsonEventWriter {
    fn write_events(&mut self, entries: &[EventLogEntry]) -> OutputResult<()> {
        self.buffered.extend_from_slice(entries);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let mut out = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut out, &self.buffered)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}
