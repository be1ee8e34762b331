//! `EventOutputObserver<W>` — bridges `StationObserver` to an `EventWriter`.

use st_core::SimTime;
use st_station::{EventLogEntry, StationObserver};
use tracing::debug;

use crate::writer::EventWriter;
use crate::{OutputError, OutputResult};

/// A [`StationObserver`] that streams log entries to any [`EventWriter`]
/// backend.
///
/// Entries are buffered while the station runs and written as one batch
/// each time it goes idle.  Errors from the writer are stored internally
/// because `StationObserver` methods have no return value; check them with
/// [`take_error`][Self::take_error] or [`finish`][Self::finish].
pub struct EventOutputObserver<W: EventWriter> {
    writer:     W,
    pending:    Vec<EventLogEntry>,
    written:    u64,
    last_error: Option<OutputError>,
}

impl<W: EventWriter> EventOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::new(),
            written:    0,
            last_error: None,
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Entries handed to the writer so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Write anything still buffered and finish the writer.
    ///
    /// Returns the first error seen over the observer's lifetime.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.flush_pending();
        let result = self.writer.finish();
        self.store_err(result);
        match self.last_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);
        let result = self.writer.write_events(&batch);
        if result.is_ok() {
            self.written += batch.len() as u64;
        }
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: EventWriter> StationObserver for EventOutputObserver<W> {
    fn on_event(&mut self, entry: &EventLogEntry) {
        self.pending.push(entry.clone());
    }

    fn on_idle(&mut self, now: SimTime) {
        debug!(%now, entries = self.pending.len(), "writing event batch");
        self.flush_pending();
    }
}
