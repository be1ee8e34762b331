//! Fluent builder for constructing a [`Station`].

use std::collections::BTreeMap;

use st_core::StationConfig;
use st_kernel::{Clock, ResourceTable};

use crate::log::EventLog;
use crate::topology::{PointPosition, StationTopology, SwitchId};
use crate::{RoutePolicy, Station};

/// Fluent builder for [`Station`].
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                  |
/// |----------------------|------------------------------------------|
/// | `.route_policy(p)`   | [`RoutePolicy::Reject`]                  |
/// | `.topology(t)`       | `StationTopology::new(config)`           |
///
/// # Example
///
/// ```rust,ignore
/// let mut station = StationBuilder::new(StationConfig::default())
///     .route_policy(RoutePolicy::NoOpJourney)
///     .build();
/// station.submit(TrainRequest::new("N1", Direction::North, Priority::Low, "UP_MAIN"))?;
/// station.run_until_idle()?;
/// ```
pub struct StationBuilder {
    config:   StationConfig,
    policy:   RoutePolicy,
    topology: Option<StationTopology>,
}

impl StationBuilder {
    pub fn new(config: StationConfig) -> Self {
        Self {
            config,
            policy:   RoutePolicy::default(),
            topology: None,
        }
    }

    /// How unrecognized route text is handled on submission.
    pub fn route_policy(mut self, policy: RoutePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a pre-built topology instead of deriving one from the config.
    /// The topology's own config wins.
    pub fn topology(mut self, topology: StationTopology) -> Self {
        self.topology = Some(topology);
        self
    }

    /// Build a station at virtual time zero with every resource free and
    /// every switch `normal`.
    pub fn build(self) -> Station {
        let topology = self
            .topology
            .unwrap_or_else(|| StationTopology::new(self.config));
        let resources = ResourceTable::new(topology.resource_count());

        Station {
            topology,
            policy: self.policy,
            clock: Clock::new(),
            resources,
            points: [PointPosition::Normal; SwitchId::COUNT],
            processes: BTreeMap::new(),
            next_process: 0,
            log: EventLog::new(),
        }
    }
}
