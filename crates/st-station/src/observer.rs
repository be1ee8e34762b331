//! Station observer trait for progress reporting and data collection.

use st_core::SimTime;

use crate::EventLogEntry;

/// Callbacks invoked by
/// [`Station::run_until_idle_with`][crate::Station::run_until_idle_with].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — live printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl StationObserver for Printer {
///     fn on_event(&mut self, entry: &EventLogEntry) {
///         println!("{} {} {}", entry.time, entry.train_id, entry.event);
///     }
/// }
/// ```
pub trait StationObserver {
    /// Called for every log entry, right after the resumption that
    /// appended it.
    fn on_event(&mut self, _entry: &EventLogEntry) {}

    /// Called once the clock has nothing left to dispatch.
    fn on_idle(&mut self, _now: SimTime) {}
}

/// A [`StationObserver`] that does nothing.
pub struct NoopObserver;

impl StationObserver for NoopObserver {}
