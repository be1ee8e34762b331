//! station_demo — drives the station_twin kernel end to end.
//!
//! 1. The staggered four-train run: N1 and S1 to the platforms, N2 on the
//!    through line, S2 into the siding, arriving at 0, 5, 15 and 30.
//! 2. A seeded synthetic timetable handled one train at a time with a
//!    rule-based route policy: submit, run until idle, read the new events.
//! 3. Both logs exported as CSV and JSON under `./output`.
//!
//! Usage: `station_demo [config.json]`.  Logging follows `RUST_LOG`
//! (default `info`; `debug` shows every grant and wait).

mod policy;
mod timetable;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use st_core::{Direction, Priority, StationConfig};
use st_output::{CsvEventWriter, EventOutputObserver, EventWriter, JsonEventWriter};
use st_station::{Station, TrainRequest};

// ── Constants ─────────────────────────────────────────────────────────────────

const TRAIN_COUNT: usize = 12;
const HIGH_SHARE:  f64   = 0.3;
const SEED:        u64   = 42;
const OUTPUT_DIR:  &str  = "output";

// ── Parts ─────────────────────────────────────────────────────────────────────

/// N1/N2/S1/S2 staggered inside one run, streamed to `events.csv`.
fn staggered(config: &StationConfig, dir: &Path) -> Result<Station> {
    let mut station = Station::new(config.clone());
    let arrivals = [
        (0.0, TrainRequest::new("N1", Direction::North, Priority::Low, "UP_PLATFORM")),
        (5.0, TrainRequest::new("N2", Direction::North, Priority::High, "UP_MAIN")),
        (15.0, TrainRequest::new("S1", Direction::South, Priority::Low, "DOWN_PLATFORM")),
        (30.0, TrainRequest::new("S2", Direction::South, Priority::Low, "DOWN_SIDING")),
    ];
    for (delay, request) in arrivals {
        station.submit_after(delay, request)?;
    }

    let mut obs = EventOutputObserver::new(CsvEventWriter::new(dir)?);
    let dispatched = station.run_until_idle_with(&mut obs)?;
    obs.finish().context("writing events.csv")?;
    info!(dispatched, entries = station.log().len(), end = %station.now(), "staggered run done");
    Ok(station)
}

/// One train at a time: route by rule, run to idle, read the increment.
fn timetable_run(config: &StationConfig) -> Result<(Station, i32)> {
    let mut station = Station::new(config.clone());
    let mut total_score = 0;

    for train in timetable::synthetic(TRAIN_COUNT, HIGH_SHARE, SEED) {
        let route = policy::choose_route(&train);
        total_score += policy::score(&train, route);
        let label = train.to_string();

        station.submit(TrainRequest { train, route: route.to_string() })?;
        station.run_until_idle()?;

        let new = station.take_new_events();
        let (Some(first), Some(last)) = (new.first(), new.last()) else {
            warn!(train = %label, "no events for train");
            continue;
        };
        println!(
            "  {label:<16} {:<14} {:>8} → {:>8}  ({} events)",
            route.as_str(),
            first.time.to_string(),
            last.time.to_string(),
            new.len()
        );
    }
    Ok((station, total_score))
}

/// Whole log as `events.json` in `dir`.
fn export_json(station: &Station, dir: &Path) -> Result<()> {
    let mut writer = JsonEventWriter::new(dir);
    writer.write_events(station.log().entries())?;
    writer.finish()?;
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => StationConfig::load_json(Path::new(&path))
            .with_context(|| format!("loading station config from {path}"))?,
        None => StationConfig::default(),
    };
    println!("=== station_demo — station_twin ===");
    println!(
        "main {}  |  platform segment {}  |  dwell {}  |  crossover {}",
        config.main_segment, config.platform_segment, config.platform_dwell, config.crossover
    );
    println!();

    // 1. Staggered scenario.
    let staggered_dir = PathBuf::from(OUTPUT_DIR).join("staggered");
    std::fs::create_dir_all(&staggered_dir)?;
    let station = staggered(&config, &staggered_dir)?;
    for entry in station.log().entries() {
        println!("  {:<8} {:<3} {:<12} {}", entry.time.to_string(), entry.train_id, entry.kind().as_str(), entry.event);
    }
    export_json(&station, &staggered_dir)?;
    println!();

    // 2. Per-train driver loop.
    println!("Timetable: {TRAIN_COUNT} trains, seed {SEED}");
    let (station, score) = timetable_run(&config)?;
    println!("Route score: {score}  |  finished at {}", station.now());

    // 3. Export.
    let timetable_dir = PathBuf::from(OUTPUT_DIR).join("timetable");
    std::fs::create_dir_all(&timetable_dir)?;
    let mut csv = CsvEventWriter::new(&timetable_dir)?;
    csv.write_events(station.log().entries())?;
    csv.finish()?;
    export_json(&station, &timetable_dir)?;

    let summary = serde_json::json!({
        "trains": TRAIN_COUNT,
        "entries": station.log().len(),
        "end_time": station.now().as_f64(),
        "score": score,
    });
    std::fs::write(timetable_dir.join("summary.json"), serde_json::to_string_pretty(&summary)?)?;

    println!();
    println!("Output written to {OUTPUT_DIR}/");
    Ok(())
}
