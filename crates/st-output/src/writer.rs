//! The `EventWriter` trait implemented by all backend writers.

use st_station::EventLogEntry;

use crate::OutputResult;

/// Trait implemented by the CSV and JSON writers.
pub trait EventWriter {
    /// Write a batch of log entries, in log order.
    fn write_events(&mut self, entries: &[EventLogEntry]) -> OutputResult<()>;

    /// Flush and close the output.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
