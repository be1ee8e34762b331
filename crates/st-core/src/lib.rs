//! `st-core` — foundational types for the `station_twin` simulator.
//!
//! This crate is a dependency of every other `st-*` crate.  It has no `st-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module     | Contents                                     |
//! |------------|----------------------------------------------|
//! | [`ids`]    | `ProcessId`, `ResourceId`                    |
//! | [`time`]   | `SimTime`                                    |
//! | [`train`]  | `Train`, `Direction`, `Priority`             |
//! | [`config`] | `StationConfig` (durations, JSON loading)    |
//! | [`error`]  | `CoreError`, `CoreResult`                    |

pub mod config;
pub mod error;
pub mod ids;
pub mod time;
pub mod train;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::StationConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{ProcessId, ResourceId};
pub use time::SimTime;
pub use train::{Direction, Priority, Train};
