//! Integration tests for st-station.

use st_core::{Direction, Priority, SimTime, StationConfig};
use st_kernel::KernelError;

use crate::{
    EventKind, EventLogEntry, PointPosition, ProcessState, Route, RoutePolicy, Station,
    StationBuilder, StationError, StationObserver, StationTopology, Step, SwitchId, TrackId,
    TrainEvent, TrainRequest,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn north(id: &str, route: &str) -> TrainRequest {
    TrainRequest::new(id, Direction::North, Priority::Low, route)
}

fn south(id: &str, route: &str) -> TrainRequest {
    TrainRequest::new(id, Direction::South, Priority::Low, route)
}

/// `(time, train, kind)` triples, the shape most assertions care about.
fn timeline(entries: &[EventLogEntry]) -> Vec<(f64, String, EventKind)> {
    entries
        .iter()
        .map(|e| (e.time.as_f64(), e.train_id.clone(), e.kind()))
        .collect()
}

fn t(time: f64, train: &str, kind: EventKind) -> (f64, String, EventKind) {
    (time, train.to_owned(), kind)
}

/// The four-train staggered run: N1 platform at 0, N2 main at 5,
/// S1 platform at 15, S2 siding at 30.
fn staggered_station() -> Station {
    let mut station = Station::new(StationConfig::default());
    station.submit_after(0.0, north("N1", "UP_PLATFORM")).unwrap();
    station.submit_after(5.0, north("N2", "UP_MAIN")).unwrap();
    station.submit_after(15.0, south("S1", "DOWN_PLATFORM")).unwrap();
    station.submit_after(30.0, south("S2", "DOWN_SIDING")).unwrap();
    station.run_until_idle().unwrap();
    station
}

use EventKind::{EnterTrack, Finished, PointsSet, Spawned};

// ── Topology ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod topology {
    use super::*;

    #[test]
    fn resource_ids_are_distinct_and_dense() {
        let topo = StationTopology::default();
        let mut ids: Vec<usize> = topo
            .tracks()
            .iter()
            .map(|t| t.resource_id().index())
            .chain(topo.switches().iter().map(|s| s.resource_id().index()))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..topo.resource_count()).collect::<Vec<_>>());
    }

    #[test]
    fn resource_names() {
        let topo = StationTopology::default();
        assert_eq!(topo.resource_name(TrackId::L1Platform2.resource_id()), Some("L1_Platform_2"));
        assert_eq!(topo.resource_name(SwitchId::P5.resource_id()), Some("P5"));
        assert_eq!(topo.resource_name(st_core::ResourceId(14)), None);
    }

    #[test]
    fn route_durations_follow_config() {
        let config = StationConfig {
            main_segment:     7.0,
            platform_segment: 8.0,
            platform_dwell:   9.0,
            crossover:        1.5,
        };
        let topo = StationTopology::new(config);
        assert_eq!(
            topo.steps(Route::DownSiding),
            &[
                Step::SetPoints {
                    switches: vec![SwitchId::P3, SwitchId::P4, SwitchId::P5],
                    position: PointPosition::Reverse,
                },
                Step::Traverse { track: TrackId::L3Approach, dwell: 1.5 },
                Step::Traverse { track: TrackId::L4Platform1, dwell: 8.0 },
                Step::Traverse { track: TrackId::L5Siding, dwell: 9.0 },
            ]
        );
        assert_eq!(
            topo.steps(Route::UpMain)[1..],
            [
                Step::Traverse { track: TrackId::L2Approach, dwell: 7.0 },
                Step::Traverse { track: TrackId::L2Exit, dwell: 7.0 },
            ]
        );
    }

    #[test]
    fn crossover_points_are_never_requested() {
        let topo = StationTopology::default();
        for route in Route::ALL {
            for step in topo.steps(route) {
                if let Step::SetPoints { switches, .. } = step {
                    assert!(!switches.contains(&SwitchId::PX1));
                    assert!(!switches.contains(&SwitchId::PX2));
                }
            }
        }
    }

    #[test]
    fn route_parsing() {
        assert_eq!("UP_PLATFORM".parse::<Route>().unwrap(), Route::UpPlatform);
        assert_eq!("DOWN_SIDING".parse::<Route>().unwrap(), Route::DownSiding);
        let err = "up_main".parse::<Route>().unwrap_err();
        assert!(matches!(err, StationError::UnrecognizedRoute(ref s) if s == "up_main"));
    }

    #[test]
    fn route_direction_advice() {
        assert!(Route::UpMain.is_valid_for(Direction::North));
        assert!(!Route::UpMain.is_valid_for(Direction::South));
        assert!(Route::DownSiding.is_valid_for(Direction::South));
        assert!(!Route::DownPlatform.is_valid_for(Direction::North));
    }
}

// ── Single-train journeys ─────────────────────────────────────────────────────

#[cfg(test)]
mod journeys {
    use super::*;

    #[test]
    fn up_platform_alone() {
        let mut station = Station::new(StationConfig::default());
        station.submit(north("N1", "UP_PLATFORM")).unwrap();
        station.run_until_idle().unwrap();

        let entries = station.log().entries();
        assert_eq!(
            timeline(entries),
            vec![
                t(0.0, "N1", Spawned),
                t(0.0, "N1", PointsSet),
                t(0.0, "N1", EnterTrack),
                t(10.0, "N1", EnterTrack),
                t(60.0, "N1", Finished),
            ]
        );
        assert_eq!(entries[0].event, TrainEvent::Spawned { route: "UP_PLATFORM".into() });
        assert_eq!(
            entries[1].event,
            TrainEvent::PointsSet {
                switches: vec![SwitchId::P1, SwitchId::P2],
                position: PointPosition::Reverse,
            }
        );
        assert_eq!(entries[2].event, TrainEvent::EnterTrack { track: TrackId::L2Approach });
        assert_eq!(entries[3].event, TrainEvent::EnterTrack { track: TrackId::L1Platform2 });
        assert_eq!(entries[0].direction, Direction::North);
    }

    #[test]
    fn down_siding_alone() {
        let mut station = Station::new(StationConfig::default());
        station.submit(south("S2", "DOWN_SIDING")).unwrap();
        station.run_until_idle().unwrap();

        let tracks: Vec<(f64, TrackId)> = station
            .log()
            .entries()
            .iter()
            .filter_map(|e| match e.event {
                TrainEvent::EnterTrack { track } => Some((e.time.as_f64(), track)),
                _ => None,
            })
            .collect();
        assert_eq!(
            tracks,
            vec![
                (0.0, TrackId::L3Approach),
                (10.0, TrackId::L4Platform1),
                (50.0, TrackId::L5Siding),
            ]
        );
        assert_eq!(station.log().entries().last().unwrap().time, SimTime(100.0));
    }

    #[test]
    fn switch_positions_persist_after_release() {
        let mut station = Station::new(StationConfig::default());
        station.submit(south("S1", "DOWN_PLATFORM")).unwrap();
        station.run_until_idle().unwrap();

        assert_eq!(station.switch_position(SwitchId::P3), PointPosition::Reverse);
        assert_eq!(station.switch_position(SwitchId::P4), PointPosition::Reverse);
        assert_eq!(station.switch_position(SwitchId::P1), PointPosition::Normal);
        assert_eq!(station.holder(SwitchId::P3.resource_id()), None);
    }

    #[test]
    fn everything_released_at_idle() {
        let station = staggered_station();
        let topo = station.topology();
        for i in 0..topo.resource_count() {
            let id = st_core::ResourceId(i as u16);
            assert_eq!(station.holder(id), None, "{:?} still held", topo.resource_name(id));
            assert_eq!(station.queue_len(id), 0);
        }
        assert!(station.all_finished());
    }

    #[test]
    fn process_retired_once_finished() {
        let mut station = Station::new(StationConfig::default());
        let id = station.submit_after(3.0, north("N1", "UP_MAIN")).unwrap();
        assert_eq!(station.process_state(id), Some(ProcessState::Spawned));
        assert_eq!(station.live_processes(), 1);
        station.run_until(SimTime(10.0)).unwrap();
        assert_eq!(station.process_state(id), Some(ProcessState::Traversing { step: 1 }));
        station.run_until_idle().unwrap();
        assert_eq!(station.process_state(id), None);
        assert_eq!(station.live_processes(), 0);
    }

    #[test]
    fn long_driver_loop_keeps_no_finished_trains() {
        let mut station = Station::new(StationConfig::default());
        let mut last = None;
        for i in 0..1000 {
            let id = station.submit(north(&format!("N{i}"), "UP_MAIN")).unwrap();
            if let Some(prev) = last {
                assert!(id > prev, "ids must be fresh");
            }
            last = Some(id);
            station.run_until_idle().unwrap();
            assert_eq!(station.live_processes(), 0);
        }
        assert_eq!(station.log().len(), 5000);
        assert!(station.all_finished());
    }

    #[test]
    fn id_space_exhaustion_is_an_error() {
        let mut station = Station::new(StationConfig::default());
        station.next_process = u32::MAX - 1;
        let last = station.submit(north("N1", "UP_MAIN")).unwrap();
        assert_eq!(last, st_core::ProcessId(u32::MAX - 1));
        let err = station.submit(north("N2", "UP_MAIN")).unwrap_err();
        assert!(matches!(err, StationError::ProcessLimit));

        // The accepted train still runs normally.
        station.run_until_idle().unwrap();
        assert_eq!(station.log().for_train("N1").last().unwrap().kind(), Finished);
    }
}

// ── Contention ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod contention {
    use super::*;

    #[test]
    fn second_train_waits_for_track() {
        // A single-track route so only the track itself is contended.
        let topo = StationTopology::default().with_steps(
            Route::UpMain,
            vec![Step::Traverse { track: TrackId::L2Approach, dwell: 25.0 }],
        );
        let mut station = StationBuilder::new(StationConfig::default()).topology(topo).build();
        station.submit(north("A", "UP_MAIN")).unwrap();
        station.submit_after(5.0, north("B", "UP_MAIN")).unwrap();

        station.run_until(SimTime(10.0)).unwrap();
        assert_eq!(station.holder(TrackId::L2Approach.resource_id()), Some("A"));
        assert_eq!(station.queue_len(TrackId::L2Approach.resource_id()), 1);

        station.run_until_idle().unwrap();
        assert_eq!(
            timeline(station.log().entries()),
            vec![
                t(0.0, "A", Spawned),
                t(0.0, "A", EnterTrack),
                t(5.0, "B", Spawned),
                t(25.0, "A", Finished),
                t(25.0, "B", EnterTrack),
                t(50.0, "B", Finished),
            ]
        );
    }

    #[test]
    fn second_train_waits_for_switch_set() {
        let mut station = Station::new(StationConfig::default());
        station.submit(north("A", "UP_MAIN")).unwrap();
        station.submit_after(5.0, north("B", "UP_PLATFORM")).unwrap();
        station.run_until_idle().unwrap();

        let b: Vec<(f64, EventKind)> = station
            .log()
            .for_train("B")
            .map(|e| (e.time.as_f64(), e.kind()))
            .collect();
        assert_eq!(
            b,
            vec![
                (5.0, Spawned),
                (50.0, PointsSet),
                (50.0, EnterTrack),
                (60.0, EnterTrack),
                (110.0, Finished),
            ]
        );
        assert_eq!(station.switch_position(SwitchId::P1), PointPosition::Reverse);
    }

    #[test]
    fn siding_waits_for_whole_switch_set() {
        let mut station = Station::new(StationConfig::default());
        station.submit(south("S1", "DOWN_MAIN")).unwrap();
        station.submit_after(5.0, south("S2", "DOWN_SIDING")).unwrap();

        station.run_until(SimTime(20.0)).unwrap();
        // P5 is free, but S2 may not take it while P3/P4 are busy.
        assert_eq!(station.holder(SwitchId::P3.resource_id()), Some("S1"));
        assert_eq!(station.holder(SwitchId::P5.resource_id()), None);
        assert_eq!(station.queue_len(SwitchId::P5.resource_id()), 1);
        assert_eq!(station.log().for_train("S2").count(), 1);

        station.run_until_idle().unwrap();
        let points_set = station
            .log()
            .for_train("S2")
            .find(|e| e.kind() == PointsSet)
            .unwrap();
        assert_eq!(points_set.time, SimTime(50.0));
        assert_eq!(station.switch_position(SwitchId::P5), PointPosition::Reverse);
    }

    #[test]
    fn staggered_four_train_timeline() {
        let station = staggered_station();
        assert_eq!(
            timeline(station.log().entries()),
            vec![
                t(0.0, "N1", Spawned),
                t(0.0, "N1", PointsSet),
                t(0.0, "N1", EnterTrack),
                t(5.0, "N2", Spawned),
                t(10.0, "N1", EnterTrack),
                t(15.0, "S1", Spawned),
                t(15.0, "S1", PointsSet),
                t(15.0, "S1", EnterTrack),
                t(25.0, "S1", EnterTrack),
                t(30.0, "S2", Spawned),
                t(60.0, "N1", Finished),
                t(60.0, "N2", PointsSet),
                t(60.0, "N2", EnterTrack),
                t(75.0, "S1", Finished),
                t(75.0, "S2", PointsSet),
                t(75.0, "S2", EnterTrack),
                t(85.0, "N2", EnterTrack),
                t(85.0, "S2", EnterTrack),
                t(110.0, "N2", Finished),
                t(125.0, "S2", EnterTrack),
                t(175.0, "S2", Finished),
            ]
        );
        assert_eq!(station.switch_position(SwitchId::P1), PointPosition::Normal);
        assert_eq!(station.switch_position(SwitchId::P5), PointPosition::Reverse);
    }

    #[test]
    fn switch_counters_match_journeys() {
        let station = staggered_station();
        assert_eq!(station.resource_counters(SwitchId::P1.resource_id()), (2, 2));
        assert_eq!(station.resource_counters(SwitchId::P3.resource_id()), (2, 2));
        assert_eq!(station.resource_counters(SwitchId::P5.resource_id()), (1, 1));
        assert_eq!(station.resource_counters(SwitchId::PX1.resource_id()), (0, 0));
    }
}

// ── Log properties ────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use super::*;

    #[test]
    fn times_never_decrease() {
        let station = staggered_station();
        let entries = station.log().entries();
        assert!(entries.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn per_train_event_shape() {
        let station = staggered_station();
        for id in ["N1", "N2", "S1", "S2"] {
            let kinds: Vec<EventKind> = station.log().for_train(id).map(|e| e.kind()).collect();
            assert_eq!(kinds.first(), Some(&Spawned), "{id}");
            assert_eq!(kinds.get(1), Some(&PointsSet), "{id}");
            assert_eq!(kinds.last(), Some(&Finished), "{id}");
            assert!(kinds[2..kinds.len() - 1].iter().all(|k| *k == EnterTrack), "{id}");
        }
    }

    #[test]
    fn identical_inputs_give_identical_logs() {
        let a = staggered_station();
        let b = staggered_station();
        assert_eq!(a.log().entries(), b.log().entries());
    }

    #[test]
    fn take_new_events_is_incremental() {
        let mut station = Station::new(StationConfig::default());
        station.submit(north("N1", "UP_MAIN")).unwrap();
        station.run_until_idle().unwrap();
        assert_eq!(station.take_new_events().len(), 5);
        assert!(station.take_new_events().is_empty());

        station.submit(south("S1", "DOWN_MAIN")).unwrap();
        station.run_until_idle().unwrap();
        let new = station.take_new_events();
        assert_eq!(new.len(), 5);
        assert!(new.iter().all(|e| e.train_id == "S1"));
        // Second train starts at the time the first one finished.
        assert_eq!(new[0].time, SimTime(50.0));
    }
}

// ── Unrecognized routes and failures ──────────────────────────────────────────

#[cfg(test)]
mod failures {
    use super::*;

    #[test]
    fn unknown_route_rejected_by_default() {
        let mut station = Station::new(StationConfig::default());
        let err = station.submit(north("X1", "UP_SIDEWAYS")).unwrap_err();
        assert!(matches!(err, StationError::UnrecognizedRoute(ref r) if r == "UP_SIDEWAYS"));
        station.run_until_idle().unwrap();
        assert!(station.log().is_empty());
    }

    #[test]
    fn unknown_route_runs_empty_journey_when_allowed() {
        let mut station = StationBuilder::new(StationConfig::default())
            .route_policy(RoutePolicy::NoOpJourney)
            .build();
        station.submit(north("X1", "UP_SIDEWAYS")).unwrap();
        station.run_until_idle().unwrap();

        let entries = station.log().entries();
        assert_eq!(timeline(entries), vec![t(0.0, "X1", Spawned), t(0.0, "X1", Finished)]);
        assert_eq!(entries[0].event, TrainEvent::Spawned { route: "UP_SIDEWAYS".into() });
        assert_eq!(station.resource_counters(SwitchId::P1.resource_id()), (0, 0));
    }

    #[test]
    fn invalid_duration_tears_process_down() {
        // Unvalidated config: the crossover dwell cannot be scheduled.
        let config = StationConfig { crossover: -1.0, ..StationConfig::default() };
        let mut station = Station::new(config);
        let n1 = station.submit(north("N1", "UP_PLATFORM")).unwrap();
        station.submit(north("N2", "UP_MAIN")).unwrap();

        let err = station.run_until_idle().unwrap_err();
        assert!(matches!(
            err,
            StationError::Kernel(KernelError::InvalidDuration { duration }) if duration == -1.0
        ));
        assert_eq!(station.process_state(n1), None);
        assert_eq!(station.holder(SwitchId::P1.resource_id()), None);
        assert_eq!(station.holder(TrackId::L2Approach.resource_id()), None);

        // The failed train still closes its journey in the log.
        let n1_kinds: Vec<EventKind> = station.log().for_train("N1").map(|e| e.kind()).collect();
        assert_eq!(n1_kinds, vec![Spawned, PointsSet, EnterTrack, Finished]);
        assert_eq!(station.log().entries().last().unwrap().time, SimTime(0.0));

        // The rest of the station keeps running.
        station.run_until_idle().unwrap();
        assert!(station.all_finished());
        assert_eq!(station.log().for_train("N2").last().unwrap().kind(), Finished);
        let n1_finished = station.log().for_train("N1").filter(|e| e.kind() == Finished).count();
        assert_eq!(n1_finished, 1);
    }

    #[test]
    fn observer_sees_teardown_finished() {
        let config = StationConfig { platform_dwell: -5.0, ..StationConfig::default() };
        let mut station = Station::new(config);
        station.submit(south("S1", "DOWN_PLATFORM")).unwrap();

        let mut seen = Vec::new();
        struct Kinds<'a>(&'a mut Vec<EventKind>);
        impl StationObserver for Kinds<'_> {
            fn on_event(&mut self, entry: &EventLogEntry) {
                self.0.push(entry.kind());
            }
        }
        assert!(station.run_until_idle_with(&mut Kinds(&mut seen)).is_err());
        // Torn down entering the platform at 10.
        assert_eq!(seen, vec![Spawned, PointsSet, EnterTrack, EnterTrack, Finished]);
        assert_eq!(station.log().entries().last().unwrap().time, SimTime(10.0));
        assert_eq!(station.live_processes(), 0);
    }

    #[test]
    fn negative_submit_delay_rejected() {
        let mut station = Station::new(StationConfig::default());
        let err = station.submit_after(-2.0, north("N1", "UP_MAIN")).unwrap_err();
        assert!(matches!(err, StationError::Kernel(KernelError::InvalidDuration { .. })));
        station.run_until_idle().unwrap();
        assert!(station.log().is_empty());
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<EventLogEntry>,
        idle:   Vec<SimTime>,
    }

    impl StationObserver for Recorder {
        fn on_event(&mut self, entry: &EventLogEntry) {
            self.events.push(entry.clone());
        }

        fn on_idle(&mut self, now: SimTime) {
            self.idle.push(now);
        }
    }

    #[test]
    fn observer_sees_every_entry_once() {
        let mut station = Station::new(StationConfig::default());
        station.submit(north("N1", "UP_PLATFORM")).unwrap();
        station.submit_after(5.0, north("N2", "UP_MAIN")).unwrap();

        let mut rec = Recorder::default();
        station.run_until_idle_with(&mut rec).unwrap();
        assert_eq!(rec.events, station.log().entries());
        assert_eq!(rec.idle, vec![SimTime(110.0)]);
    }

    #[test]
    fn partial_run_does_not_report_idle() {
        let mut station = Station::new(StationConfig::default());
        station.submit(north("N1", "UP_MAIN")).unwrap();
        station.run_until(SimTime(30.0)).unwrap();

        let mut rec = Recorder::default();
        station.run_until_idle_with(&mut rec).unwrap();
        // Only the entries produced by the second call are forwarded.
        assert_eq!(timeline(&rec.events), vec![t(50.0, "N1", Finished)]);
        assert_eq!(rec.idle.len(), 1);
    }
}
