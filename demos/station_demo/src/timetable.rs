//! Synthetic timetable generation.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use st_core::{Direction, Priority, Train};

/// `count` trains with seeded random direction and priority.
///
/// Ids are numbered per direction (`N1`, `N2`, …, `S1`, …), like a
/// hand-written timetable.
pub fn synthetic(count: usize, high_share: f64, seed: u64) -> Vec<Train> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let (mut north, mut south) = (0u32, 0u32);

    (0..count)
        .map(|_| {
            let direction = if rng.gen_bool(0.5) { Direction::North } else { Direction::South };
            let priority = if rng.gen_bool(high_share) { Priority::High } else { Priority::Low };
            let id = match direction {
                Direction::North => {
                    north += 1;
                    format!("N{north}")
                }
                Direction::South => {
                    south += 1;
                    format!("S{south}")
                }
            };
            Train::new(id, direction, priority)
        })
        .collect()
}
