//! Append-only event log.
//!
//! Entries are stored in commit order, which is the clock's dispatch order.
//! Nothing is ever re-sorted, so `time` is non-decreasing by construction.
//!
//! Drivers usually read the log incrementally: submit a train, run the
//! station until idle, then call [`EventLog::take_new`] for the entries that
//! run produced.

use std::fmt;

use serde::{Deserialize, Serialize};
use st_core::{Direction, SimTime, Train};
use tracing::info;

use crate::topology::{PointPosition, SwitchId, TrackId};

/// Discriminant of a [`TrainEvent`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Spawned,
    PointsSet,
    EnterTrack,
    Finished,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Spawned => "spawned",
            EventKind::PointsSet => "points_set",
            EventKind::EnterTrack => "enter_track",
            EventKind::Finished => "finished",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened, with its details.
///
/// Serialized adjacently tagged, so a flattened entry reads
/// `"event": "points_set", "details": {"points": ["P1", "P2"], "state": "reverse"}`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "details", rename_all = "snake_case")]
pub enum TrainEvent {
    /// The train process started.  `route` is the route text as submitted,
    /// recognized or not.
    Spawned { route: String },
    PointsSet {
        #[serde(rename = "points")]
        switches: Vec<SwitchId>,
        #[serde(rename = "state")]
        position: PointPosition,
    },
    EnterTrack { track: TrackId },
    /// Braced so its details serialize as `{}`.
    Finished {},
}

impl TrainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TrainEvent::Spawned { .. } => EventKind::Spawned,
            TrainEvent::PointsSet { .. } => EventKind::PointsSet,
            TrainEvent::EnterTrack { .. } => EventKind::EnterTrack,
            TrainEvent::Finished {} => EventKind::Finished,
        }
    }
}

impl fmt::Display for TrainEvent {
    /// Compact `key=value` rendering of the details, empty for `Finished`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainEvent::Spawned { route } => write!(f, "route={route}"),
            TrainEvent::PointsSet { switches, position } => {
                let names: Vec<&str> = switches.iter().map(|s| s.as_str()).collect();
                write!(f, "points={} state={position}", names.join("+"))
            }
            TrainEvent::EnterTrack { track } => write!(f, "track={track}"),
            TrainEvent::Finished {} => Ok(()),
        }
    }
}

/// One immutable log record.
///
/// The serde form is the export format:
/// `{"time", "train_id", "direction", "event", "details"}`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub time:      SimTime,
    pub train_id:  String,
    pub direction: Direction,
    #[serde(flatten)]
    pub event:     TrainEvent,
}

impl EventLogEntry {
    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}

#[derive(Default, Debug)]
pub struct EventLog {
    entries: Vec<EventLogEntry>,
    /// Index of the first entry not yet returned by `take_new`.
    read_cursor: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry for `train` at `time`.
    pub fn record(&mut self, time: SimTime, train: &Train, event: TrainEvent) {
        info!(
            "LOG | {time} | Train {} | {} | {event}",
            train.id,
            event.kind()
        );
        self.entries.push(EventLogEntry {
            time,
            train_id: train.id.clone(),
            direction: train.direction,
            event,
        });
    }

    pub fn entries(&self) -> &[EventLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries appended since the previous call (or since creation).
    pub fn take_new(&mut self) -> &[EventLogEntry] {
        let start = self.read_cursor;
        self.read_cursor = self.entries.len();
        &self.entries[start..]
    }

    /// Entries from index `mark` onwards.
    pub fn since(&self, mark: usize) -> &[EventLogEntry] {
        &self.entries[mark.min(self.entries.len())..]
    }

    /// All entries for one train, in log order.
    pub fn for_train<'a>(&'a self, train_id: &'a str) -> impl Iterator<Item = &'a EventLogEntry> {
        self.entries.iter().filter(move |e| e.train_id == train_id)
    }
}
