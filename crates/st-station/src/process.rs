//! `TrainProcess` — one train's journey as a resumable state machine.
//!
//! ```text
//! Spawned ──► ConfiguringSwitches(i) ──► Traversing(j) ──► … ──► Finished
//!    │                                                            ▲
//!    └──────────── unrecognized route (no-op journey) ───────────┘
//! ```
//!
//! The clock resumes a process by id; [`TrainProcess::resume`] then runs
//! until the next suspension point: a queued resource request or a timed
//! dwell.  When the process is resumed again it picks up exactly where it
//! stopped, recorded in `wait`.

use st_core::{ProcessId, ResourceId, SimTime, Train};
use st_kernel::{Clock, Grant, KernelResult, ResourceTable};
use tracing::{debug, warn};

use crate::log::{EventLog, TrainEvent};
use crate::topology::{PointPosition, Route, Step, StationTopology, SwitchId, TrackId};

/// Externally visible lifecycle state.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ProcessState {
    Spawned,
    /// Waiting for, or just granted, the switch set of step `step`.
    ConfiguringSwitches { step: usize },
    /// Waiting for, or occupying, the track of step `step`.
    Traversing { step: usize },
    Finished,
}

/// Where a suspended process resumes.
#[derive(Copy, Clone, Debug)]
enum Wait {
    /// Queued on a switch set.
    Points { step: usize },
    /// Queued on a track segment.
    Track { step: usize },
    /// Dwelling on a track segment.
    Dwell { step: usize },
}

/// Mutable station state a process may touch while it runs.
pub(crate) struct ProcessCtx<'a> {
    pub clock:     &'a mut Clock<ProcessId>,
    pub resources: &'a mut ResourceTable,
    pub points:    &'a mut [PointPosition; SwitchId::COUNT],
    pub topology:  &'a StationTopology,
    pub log:       &'a mut EventLog,
}

impl ProcessCtx<'_> {
    fn now(&self) -> SimTime {
        self.clock.now()
    }

    fn wake(&mut self, woken: impl IntoIterator<Item = ProcessId>) {
        for process in woken {
            self.clock.schedule_now(process);
        }
    }
}

pub struct TrainProcess {
    id:          ProcessId,
    train:       Train,
    /// `None` for an unrecognized route accepted in no-op mode.
    route:       Option<Route>,
    /// Route text as submitted, for the `spawned` entry.
    route_label: String,
    state:       ProcessState,
    cursor:      usize,
    wait:        Option<Wait>,
    held_points: Vec<ResourceId>,
}

impl TrainProcess {
    pub(crate) fn new(
        id: ProcessId,
        train: Train,
        route: Option<Route>,
        route_label: String,
    ) -> Self {
        Self {
            id,
            train,
            route,
            route_label,
            state: ProcessState::Spawned,
            cursor: 0,
            wait: None,
            held_points: Vec::new(),
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn train(&self) -> &Train {
        &self.train
    }

    pub fn route(&self) -> Option<Route> {
        self.route
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == ProcessState::Finished
    }

    /// Run until the next suspension point or the end of the journey.
    pub(crate) fn resume(&mut self, ctx: &mut ProcessCtx<'_>) -> KernelResult<()> {
        if self.state == ProcessState::Finished {
            return Ok(());
        }

        if self.state == ProcessState::Spawned {
            let now = ctx.now();
            ctx.log.record(now, &self.train, TrainEvent::Spawned { route: self.route_label.clone() });
            if self.route.is_none() {
                warn!(
                    train = %self.train.id,
                    route = %self.route_label,
                    "unknown route decision; finishing without moving"
                );
                return self.finish(ctx);
            }
        }

        let Some(route) = self.route else {
            return self.finish(ctx);
        };
        let topology = ctx.topology;
        let steps = topology.steps(route);

        if let Some(wait) = self.wait.take() {
            match (wait, &steps[wait_step(wait)]) {
                (Wait::Points { .. }, Step::SetPoints { switches, position }) => {
                    self.points_granted(switches, *position, ctx);
                }
                (Wait::Track { step }, Step::Traverse { track, dwell }) => {
                    return self.enter_track(step, *track, *dwell, ctx);
                }
                (Wait::Dwell { .. }, Step::Traverse { track, .. }) => {
                    let woken = ctx.resources.release(self.id, track.resource_id())?;
                    ctx.wake(woken);
                    self.cursor += 1;
                }
                (wait, step) => {
                    unreachable!("{wait:?} does not match route step {step:?}")
                }
            }
        }

        while let Some(step) = steps.get(self.cursor) {
            match step {
                Step::SetPoints { switches, position } => {
                    self.state = ProcessState::ConfiguringSwitches { step: self.cursor };
                    let ids: Vec<ResourceId> = switches.iter().map(|s| s.resource_id()).collect();
                    match ctx.resources.acquire_all(self.id, &ids)? {
                        Grant::Granted => self.points_granted(switches, *position, ctx),
                        Grant::Queued => {
                            debug!(train = %self.train.id, ?switches, "waiting for points");
                            self.wait = Some(Wait::Points { step: self.cursor });
                            return Ok(());
                        }
                    }
                }
                Step::Traverse { track, dwell } => {
                    self.state = ProcessState::Traversing { step: self.cursor };
                    match ctx.resources.acquire(self.id, track.resource_id())? {
                        Grant::Granted => {
                            return self.enter_track(self.cursor, *track, *dwell, ctx);
                        }
                        Grant::Queued => {
                            debug!(train = %self.train.id, %track, "waiting for track");
                            self.wait = Some(Wait::Track { step: self.cursor });
                            return Ok(());
                        }
                    }
                }
            }
        }

        self.finish(ctx)
    }

    /// End a process whose resources were already dropped by the station,
    /// logging its `finished` entry at `now`.
    pub(crate) fn abort(&mut self, now: SimTime, log: &mut EventLog) {
        self.wait = None;
        self.held_points.clear();
        if self.state != ProcessState::Finished {
            log.record(now, &self.train, TrainEvent::Finished {});
            self.state = ProcessState::Finished;
        }
    }

    // ── Steps ─────────────────────────────────────────────────────────────

    fn points_granted(
        &mut self,
        switches: &[SwitchId],
        position: PointPosition,
        ctx: &mut ProcessCtx<'_>,
    ) {
        for switch in switches {
            ctx.points[switch.index()] = position;
            self.held_points.push(switch.resource_id());
        }
        let now = ctx.now();
        ctx.log.record(now, &self.train, TrainEvent::PointsSet { switches: switches.to_vec(), position });
        self.cursor += 1;
    }

    fn enter_track(
        &mut self,
        step: usize,
        track: TrackId,
        dwell: f64,
        ctx: &mut ProcessCtx<'_>,
    ) -> KernelResult<()> {
        let now = ctx.now();
        ctx.log.record(now, &self.train, TrainEvent::EnterTrack { track });
        ctx.clock.after(dwell, self.id)?;
        self.wait = Some(Wait::Dwell { step });
        Ok(())
    }

    fn finish(&mut self, ctx: &mut ProcessCtx<'_>) -> KernelResult<()> {
        let held = std::mem::take(&mut self.held_points);
        let woken = ctx.resources.release_all(self.id, &held)?;
        ctx.wake(woken);
        let now = ctx.now();
        ctx.log.record(now, &self.train, TrainEvent::Finished {});
        self.state = ProcessState::Finished;
        Ok(())
    }
}

fn wait_step(wait: Wait) -> usize {
    match wait {
        Wait::Points { step } | Wait::Track { step } | Wait::Dwell { step } => step,
    }
}
