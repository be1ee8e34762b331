//! The station's fixed track layout and its five routes.
//!
//! # Layout
//!
//! ```text
//!  UP    L2_Approach ──P1══P2── L2_Exit            (P1/P2 reverse → L1_Platform_2)
//!  DOWN  L3_Approach ──P3══P4── L3_Exit            (P3/P4 reverse → L4_Platform_1)
//!                             └─P5── L5_Siding     (via L4_Platform_1)
//!  PX1/PX2: mainline crossover points, modelled but not used by any route.
//! ```
//!
//! Track segments occupy `ResourceId`s `0..7`, switches `7..14`.  That
//! numbering is also the global order joint acquisition sorts by.
//!
//! Each route starts with a single points step.  The switch set stays held
//! until the train finishes; every track segment is released before the next
//! one is requested.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use st_core::{Direction, ResourceId, StationConfig};

use crate::StationError;

// ── Tracks ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum TrackId {
    #[serde(rename = "L1_Platform_2")]
    L1Platform2,
    #[serde(rename = "L2_Approach")]
    L2Approach,
    #[serde(rename = "L2_Exit")]
    L2Exit,
    #[serde(rename = "L3_Approach")]
    L3Approach,
    #[serde(rename = "L3_Exit")]
    L3Exit,
    #[serde(rename = "L4_Platform_1")]
    L4Platform1,
    #[serde(rename = "L5_Siding")]
    L5Siding,
}

impl TrackId {
    pub const COUNT: usize = 7;

    pub const ALL: [TrackId; Self::COUNT] = [
        TrackId::L1Platform2,
        TrackId::L2Approach,
        TrackId::L2Exit,
        TrackId::L3Approach,
        TrackId::L3Exit,
        TrackId::L4Platform1,
        TrackId::L5Siding,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrackId::L1Platform2 => "L1_Platform_2",
            TrackId::L2Approach => "L2_Approach",
            TrackId::L2Exit => "L2_Exit",
            TrackId::L3Approach => "L3_Approach",
            TrackId::L3Exit => "L3_Exit",
            TrackId::L4Platform1 => "L4_Platform_1",
            TrackId::L5Siding => "L5_Siding",
        }
    }

    #[inline]
    pub fn resource_id(self) -> ResourceId {
        ResourceId(self as u16)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Switches ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum SwitchId {
    P1,
    P2,
    P3,
    P4,
    PX1,
    PX2,
    P5,
}

impl SwitchId {
    pub const COUNT: usize = 7;

    pub const ALL: [SwitchId; Self::COUNT] = [
        SwitchId::P1,
        SwitchId::P2,
        SwitchId::P3,
        SwitchId::P4,
        SwitchId::PX1,
        SwitchId::PX2,
        SwitchId::P5,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SwitchId::P1 => "P1",
            SwitchId::P2 => "P2",
            SwitchId::P3 => "P3",
            SwitchId::P4 => "P4",
            SwitchId::PX1 => "PX1",
            SwitchId::PX2 => "PX2",
            SwitchId::P5 => "P5",
        }
    }

    /// Position of this switch in a `[_; SwitchId::COUNT]` array.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn resource_id(self) -> ResourceId {
        ResourceId((TrackId::COUNT + self.index()) as u16)
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Switch position.  Carries no exclusivity of its own.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointPosition {
    #[default]
    Normal,
    Reverse,
}

impl PointPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            PointPosition::Normal => "normal",
            PointPosition::Reverse => "reverse",
        }
    }
}

impl fmt::Display for PointPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Routes ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Route {
    UpMain,
    UpPlatform,
    DownMain,
    DownPlatform,
    DownSiding,
}

impl Route {
    pub const COUNT: usize = 5;

    pub const ALL: [Route; Self::COUNT] = [
        Route::UpMain,
        Route::UpPlatform,
        Route::DownMain,
        Route::DownPlatform,
        Route::DownSiding,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Route::UpMain => "UP_MAIN",
            Route::UpPlatform => "UP_PLATFORM",
            Route::DownMain => "DOWN_MAIN",
            Route::DownPlatform => "DOWN_PLATFORM",
            Route::DownSiding => "DOWN_SIDING",
        }
    }

    /// Whether a train heading `direction` would normally be sent this way.
    ///
    /// Advisory only: the station executes any route it is given.
    pub fn is_valid_for(self, direction: Direction) -> bool {
        match direction {
            Direction::North => matches!(self, Route::UpMain | Route::UpPlatform),
            Direction::South => {
                matches!(self, Route::DownMain | Route::DownPlatform | Route::DownSiding)
            }
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = StationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| StationError::UnrecognizedRoute(s.to_owned()))
    }
}

/// One instruction of a route.
#[derive(Clone, PartialEq, Debug)]
pub enum Step {
    /// Jointly acquire `switches` and throw them all to `position`.  Held
    /// until the journey ends.
    SetPoints {
        switches: Vec<SwitchId>,
        position: PointPosition,
    },
    /// Acquire `track`, occupy it for `dwell`, then release it.
    Traverse { track: TrackId, dwell: f64 },
}

// ── StationTopology ───────────────────────────────────────────────────────────

/// Read-only description of the station: resources plus route steps with
/// durations resolved from a [`StationConfig`].
#[derive(Clone, Debug)]
pub struct StationTopology {
    config: StationConfig,
    routes: [Vec<Step>; Route::COUNT],
}

impl StationTopology {
    /// Build the five routes using `config`'s durations as given.
    ///
    /// No validation happens here; see [`StationConfig::validate`].
    pub fn new(config: StationConfig) -> Self {
        use PointPosition::{Normal, Reverse};
        use SwitchId::{P1, P2, P3, P4, P5};
        use TrackId::*;

        let main = config.main_segment;
        let segment = config.platform_segment;
        let dwell = config.platform_dwell;
        let crossover = config.crossover;

        let points = |switches: &[SwitchId], position| Step::SetPoints {
            switches: switches.to_vec(),
            position,
        };
        let run = |track, time| Step::Traverse { track, dwell: time };

        let routes = [
            // UP_MAIN
            vec![points(&[P1, P2], Normal), run(L2Approach, main), run(L2Exit, main)],
            // UP_PLATFORM
            vec![points(&[P1, P2], Reverse), run(L2Approach, crossover), run(L1Platform2, dwell)],
            // DOWN_MAIN
            vec![points(&[P3, P4], Normal), run(L3Approach, main), run(L3Exit, main)],
            // DOWN_PLATFORM
            vec![points(&[P3, P4], Reverse), run(L3Approach, crossover), run(L4Platform1, dwell)],
            // DOWN_SIDING
            vec![
                points(&[P3, P4, P5], Reverse),
                run(L3Approach, crossover),
                run(L4Platform1, segment),
                run(L5Siding, dwell),
            ],
        ];

        Self { config, routes }
    }

    /// Replace one route's steps.  Lets tests exercise contention patterns
    /// the real layout cannot produce.
    #[cfg(test)]
    pub(crate) fn with_steps(mut self, route: Route, steps: Vec<Step>) -> Self {
        self.routes[route.index()] = steps;
        self
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn steps(&self, route: Route) -> &[Step] {
        &self.routes[route.index()]
    }

    /// Total number of mutually-exclusive resources (tracks + switches).
    pub fn resource_count(&self) -> usize {
        TrackId::COUNT + SwitchId::COUNT
    }

    pub fn tracks(&self) -> &'static [TrackId] {
        &TrackId::ALL
    }

    pub fn switches(&self) -> &'static [SwitchId] {
        &SwitchId::ALL
    }

    /// Human-readable name of any resource id.
    pub fn resource_name(&self, id: ResourceId) -> Option<&'static str> {
        let i = id.index();
        if i < TrackId::COUNT {
            Some(TrackId::ALL[i].as_str())
        } else {
            SwitchId::ALL.get(i - TrackId::COUNT).map(|s| s.as_str())
        }
    }
}

impl Default for StationTopology {
    fn default() -> Self {
        Self::new(StationConfig::default())
    }
}
