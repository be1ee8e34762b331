//! `st-station` — the five-line station built on the `st-kernel` primitives.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`topology`] | `TrackId`, `SwitchId`, `PointPosition`, `Route`, `Step`, `StationTopology` |
//! | [`process`]  | `TrainProcess`, `ProcessState` — per-train state machine         |
//! | [`log`]      | `EventLog`, `EventLogEntry`, `TrainEvent`, `EventKind`           |
//! | [`station`]  | `Station`, `TrainRequest`, `RoutePolicy`                         |
//! | [`builder`]  | `StationBuilder`                                                 |
//! | [`observer`] | `StationObserver`, `NoopObserver`                                |
//! | [`error`]    | `StationError`, `StationResult<T>`                               |
//!
//! # Driver loop
//!
//! ```text
//! for each scheduled train:
//!   route = policy(train)                 // outside this crate
//!   station.submit(TrainRequest{train, route})
//!   station.run_until_idle()
//!   events = station.take_new_events()    // spawned … finished
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use st_core::{Direction, Priority, StationConfig};
//! use st_station::{Station, TrainRequest};
//!
//! let mut station = Station::new(StationConfig::default());
//! station.submit(TrainRequest::new("N1", Direction::North, Priority::Low, "UP_PLATFORM"))?;
//! station.run_until_idle()?;
//! for entry in station.take_new_events() {
//!     println!("{} {} {}", entry.time, entry.kind(), entry.event);
//! }
//! ```

pub mod builder;
pub mod error;
pub mod log;
pub mod observer;
pub mod process;
pub mod station;
pub mod topology;

#[cfg(test)]
mod tests;

pub use builder::StationBuilder;
pub use error::{StationError, StationResult};
pub use log::{EventKind, EventLog, EventLogEntry, TrainEvent};
pub use observer::{NoopObserver, StationObserver};
pub use process::{ProcessState, TrainProcess};
pub use station::{RoutePolicy, Station, TrainRequest};
pub use topology::{PointPosition, Route, StationTopology, Step, SwitchId, TrackId};
