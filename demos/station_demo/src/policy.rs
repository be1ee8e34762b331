//! Rule-based route choice and a simple score for route decisions.

use st_core::{Direction, Priority, Train};
use st_station::Route;

/// High priority takes the through line, everything else the platform.
pub fn choose_route(train: &Train) -> Route {
    match (train.direction, train.priority) {
        (Direction::North, Priority::High) => Route::UpMain,
        (Direction::North, Priority::Low) => Route::UpPlatform,
        (Direction::South, Priority::High) => Route::DownMain,
        (Direction::South, Priority::Low) => Route::DownPlatform,
    }
}

/// +1 for a route that matches the direction, +2 more for a high-priority
/// train on a main line, -5 for a route in the wrong direction.
pub fn score(train: &Train, route: Route) -> i32 {
    if !route.is_valid_for(train.direction) {
        return -5;
    }
    let main = matches!(route, Route::UpMain | Route::DownMain);
    if train.priority == Priority::High && main { 3 } else { 1 }
}
