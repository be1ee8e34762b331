//! `st-output` — event-log export for the station_twin simulator.
//!
//! | Backend                | File          |
//! |------------------------|---------------|
//! | [`CsvEventWriter`]     | `events.csv`  |
//! | [`JsonEventWriter`]    | `events.json` |
//!
//! Both implement [`EventWriter`] and can be driven by
//! [`EventOutputObserver`], which implements `st_station::StationObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use st_output::{CsvEventWriter, EventOutputObserver};
//!
//! let writer = CsvEventWriter::new(Path::new("./output"))?;
//! let mut obs = EventOutputObserver::new(writer);
//! station.run_until_idle_with(&mut obs)?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvEventWriter;
pub use error::{OutputError, OutputResult};
pub use json::JsonEventWriter;
pub use observer::EventOutputObserver;
pub use row::EventRow;
pub use writer::EventWriter;
