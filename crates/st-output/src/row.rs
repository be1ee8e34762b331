//! Flat row form of an event-log entry.

use st_station::EventLogEntry;

/// One log entry flattened to text columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub time:      f64,
    pub train_id:  String,
    pub direction: &'static str,
    pub event:     &'static str,
    /// `key=value` details, empty for `finished`.
    pub details:   String,
}

impl EventRow {
    pub const HEADER: [&'static str; 5] = ["time", "train_id", "direction", "event", "details"];

    pub fn from_entry(entry: &EventLogEntry) -> Self {
        Self {
            time:      entry.time.as_f64(),
            train_id:  entry.train_id.clone(),
            direction: entry.direction.as_str(),
            event:     entry.kind().as_str(),
            details:   entry.event.to_string(),
        }
    }
}
