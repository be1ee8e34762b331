//! The `Station` struct and its run loop.

use std::collections::BTreeMap;

use st_core::{Direction, Priority, ProcessId, ResourceId, SimTime, StationConfig, Train};
use st_kernel::{Clock, ResourceTable};
use tracing::{debug, error, trace, warn};

use crate::log::{EventLog, EventLogEntry};
use crate::process::{ProcessCtx, ProcessState, TrainProcess};
use crate::topology::{PointPosition, Route, StationTopology, SwitchId};
use crate::{NoopObserver, StationBuilder, StationError, StationObserver, StationResult};

/// What to do with a train whose route text names no known route.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum RoutePolicy {
    /// `submit` fails with [`StationError::UnrecognizedRoute`]; nothing is
    /// logged.
    #[default]
    Reject,
    /// Accept the train and run an empty journey: `spawned` then `finished`,
    /// no points set, no track entered.
    NoOpJourney,
}

/// One train as handed to the station by a driver.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TrainRequest {
    pub train: Train,
    /// Route text, e.g. `"UP_PLATFORM"`.  Parsed on submission.
    pub route: String,
}

impl TrainRequest {
    pub fn new(
        id: impl Into<String>,
        direction: Direction,
        priority: Priority,
        route: impl Into<String>,
    ) -> Self {
        Self {
            train: Train::new(id, direction, priority),
            route: route.into(),
        }
    }
}

// ── Station ───────────────────────────────────────────────────────────────────

/// The simulated station.
///
/// Owns the clock, every resource, the switch positions, the live train
/// processes and the event log for one run.  A process is dropped as soon
/// as it reaches `Finished`; after that the train survives only in the log.  Drivers interact through
/// [`submit`](Self::submit) / [`run_until_idle`](Self::run_until_idle) and
/// read results from [`log`](Self::log) or [`take_new_events`](Self::take_new_events).
///
/// Create via [`StationBuilder`] or [`Station::new`].
pub struct Station {
    pub(crate) topology:  StationTopology,
    pub(crate) policy:    RoutePolicy,
    pub(crate) clock:     Clock<ProcessId>,
    pub(crate) resources: ResourceTable,
    pub(crate) points:    [PointPosition; SwitchId::COUNT],
    pub(crate) processes: BTreeMap<ProcessId, TrainProcess>,
    /// Next id to hand out.  Ids are never reused within one station.
    pub(crate) next_process: u32,
    pub(crate) log:       EventLog,
}

impl Station {
    /// A station with the standard layout, `config`'s durations and the
    /// default [`RoutePolicy::Reject`].
    pub fn new(config: StationConfig) -> Self {
        StationBuilder::new(config).build()
    }

    // ── Driver API ────────────────────────────────────────────────────────

    /// Submit a train to start at the current virtual time.
    pub fn submit(&mut self, request: TrainRequest) -> StationResult<ProcessId> {
        self.submit_after(0.0, request)
    }

    /// Submit a train to start `delay` time units from now.
    pub fn submit_after(&mut self, delay: f64, request: TrainRequest) -> StationResult<ProcessId> {
        let TrainRequest { train, route: label } = request;
        let route = match label.parse::<Route>() {
            Ok(route) => Some(route),
            Err(err) => match self.policy {
                RoutePolicy::Reject => {
                    warn!(train = %train.id, route = %label, "rejected train");
                    return Err(err);
                }
                RoutePolicy::NoOpJourney => None,
            },
        };

        let id = ProcessId(self.next_process);
        if id == ProcessId::INVALID {
            return Err(StationError::ProcessLimit);
        }
        self.clock.after(delay, id)?;
        self.next_process += 1;
        debug!(process = %id, train = %train, route = %label, delay, "submitted");
        self.processes.insert(id, TrainProcess::new(id, train, route, label));
        Ok(id)
    }

    /// Dispatch resumptions until nothing is pending.
    ///
    /// Returns the number of resumptions dispatched.
    pub fn run_until_idle(&mut self) -> StationResult<u64> {
        self.run_until_idle_with(&mut NoopObserver)
    }

    /// Like [`run_until_idle`](Self::run_until_idle), reporting every new
    /// log entry and the final idle point to `observer`.
    ///
    /// A kernel error tears the failing process down (its resources are
    /// released, its waits withdrawn and its `finished` entry logged) and
    /// aborts the run with that error.
    pub fn run_until_idle_with<O: StationObserver>(&mut self, observer: &mut O) -> StationResult<u64> {
        self.drive(None, observer)
    }

    /// Dispatch every resumption due at or before `limit`, leaving later ones
    /// queued.  Virtual time ends at `limit` (or later, if it already was).
    pub fn run_until(&mut self, limit: SimTime) -> StationResult<u64> {
        self.drive(Some(limit), &mut NoopObserver)
    }

    fn drive<O: StationObserver>(&mut self, limit: Option<SimTime>, observer: &mut O) -> StationResult<u64> {
        // Explicit field borrows so the closure below sees disjoint access.
        let Station { topology, clock, resources, points, processes, log, .. } = self;
        let mut forwarded = log.len();

        let handler = |clock: &mut Clock<ProcessId>, id: ProcessId| -> StationResult<()> {
            let process = processes
                .get_mut(&id)
                .ok_or(StationError::UnknownProcess(id))?;

            let mut ctx = ProcessCtx {
                clock:     &mut *clock,
                resources: &mut *resources,
                points:    &mut *points,
                topology:  &*topology,
                log:       &mut *log,
            };
            let outcome = process.resume(&mut ctx);

            if let Err(err) = &outcome {
                error!(process = %id, train = %process.train().id, %err, "process failed; tearing down");
                for waiter in resources.abandon(id) {
                    clock.schedule_now(waiter);
                }
                process.abort(clock.now(), &mut *log);
            }
            let finished = process.is_finished();

            for entry in log.since(forwarded) {
                observer.on_event(entry);
            }
            forwarded = log.len();

            if finished {
                processes.remove(&id);
                trace!(process = %id, "retired");
            }
            outcome.map_err(StationError::from)
        };

        let dispatched = match limit {
            Some(limit) => clock.run_until(limit, handler)?,
            None => clock.run_until_idle(handler)?,
        };

        if clock.is_empty() {
            observer.on_idle(clock.now());
        }
        Ok(dispatched)
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn topology(&self) -> &StationTopology {
        &self.topology
    }

    pub fn route_policy(&self) -> RoutePolicy {
        self.policy
    }

    pub fn switch_position(&self, switch: SwitchId) -> PointPosition {
        self.points[switch.index()]
    }

    /// Train id currently holding `resource`, if any.
    pub fn holder(&self, resource: ResourceId) -> Option<&str> {
        self.resources
            .holder(resource)
            .and_then(|id| self.processes.get(&id))
            .map(|p| p.train().id.as_str())
    }

    /// Trains queued on `resource`.
    pub fn queue_len(&self, resource: ResourceId) -> usize {
        self.resources.queue_len(resource)
    }

    /// `(grants, releases)` recorded for `resource`.
    pub fn resource_counters(&self, resource: ResourceId) -> (u64, u64) {
        self.resources.counters(resource)
    }

    /// State of a live process.  `None` once it has finished and been
    /// retired, or if `id` was never handed out.
    pub fn process_state(&self, id: ProcessId) -> Option<ProcessState> {
        self.processes.get(&id).map(|p| p.state())
    }

    /// Number of submitted processes that have not finished yet.
    pub fn live_processes(&self) -> usize {
        self.processes.len()
    }

    /// Whether every submitted process has reached `Finished`.
    pub fn all_finished(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Log entries appended since the last call.
    pub fn take_new_events(&mut self) -> &[EventLogEntry] {
        self.log.take_new()
    }
}
