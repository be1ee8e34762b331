//! Train identity as seen by the simulator.
//!
//! A `Train` is transient: it lives inside its train process for the length
//! of one journey and afterwards only survives as event-log entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Travel direction.  North-bound trains use the UP lines, south-bound the
/// DOWN lines.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "north" => Ok(Direction::North),
            "south" => Ok(Direction::South),
            other => Err(CoreError::Parse(format!(
                "invalid direction {other:?}: expected \"north\" or \"south\""
            ))),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "high" => Ok(Priority::High),
            "low" => Ok(Priority::Low),
            other => Err(CoreError::Parse(format!(
                "invalid priority {other:?}: expected \"high\" or \"low\""
            ))),
        }
    }
}

/// One train's identity for the duration of its journey.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Train {
    pub id:        String,
    pub direction: Direction,
    pub priority:  Priority,
}

impl Train {
    pub fn new(id: impl Into<String>, direction: Direction, priority: Priority) -> Self {
        Self {
            id: id.into(),
            direction,
            priority,
        }
    }
}

impl fmt::Display for Train {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.id, self.direction, self.priority)
    }
}
