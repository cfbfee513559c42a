//! Pairing a new request with one already waiting: proximity, path-overlap
//! and detour gates, then a claim on the first idle driver.

use std::collections::HashSet;

use crate::ecs::RideRequest;
use crate::graph::RoadGraph;
use crate::routing::{Route, RoutePlanner};

use super::types::{DriverView, WaitingPoolOutcome, WaitingPoolPlan};
use super::{MAX_DETOUR_RATIO, MIN_BASE_DISTANCE, MIN_PATH_OVERLAP, PICKUP_PROXIMITY_DEG};

/// Fraction of unique path nodes shared by two routes, relative to the
/// shorter route. Denominator floored at one.
fn path_overlap(r1: &Route, r2: &Route) -> f64 {
    let s1: HashSet<&str> = r1.path.iter().map(String::as_str).collect();
    let s2: HashSet<&str> = r2.path.iter().map(String::as_str).collect();
    let shared = s1.intersection(&s2).count();
    shared as f64 / s1.len().min(s2.len()).max(1) as f64
}

/// Scan the pending queue, in queue order, for a rider to share a car with.
///
/// Gates, applied in order per candidate: the two sources must be within
/// [`PICKUP_PROXIMITY_DEG`] in coordinate space, both direct routes must be
/// reachable, their paths must overlap by at least [`MIN_PATH_OVERLAP`],
/// and the merged itinerary (`request.source`, `other.destination`,
/// `request.destination`) must stay within [`MAX_DETOUR_RATIO`] over the
/// longer direct route.
///
/// The first candidate passing every gate wins. If that candidate cannot be
/// served because no driver is idle, the scan stops with
/// [`WaitingPoolOutcome::NoIdleDriver`] instead of trying later entries.
pub fn pair_with_waiting(
    request: &RideRequest,
    queue: &[RideRequest],
    drivers: &[DriverView],
    graph: &RoadGraph,
    planner: &RoutePlanner,
) -> WaitingPoolOutcome {
    for (index, other) in queue.iter().enumerate() {
        let close = graph
            .coordinate_distance(&request.source, &other.source)
            .is_some_and(|d| d <= PICKUP_PROXIMITY_DEG);
        if !close {
            continue;
        }

        let r1 = planner.shortest_path(graph, &request.source, &request.destination);
        let r2 = planner.shortest_path(graph, &other.source, &other.destination);
        if r1.is_unreachable() || r2.is_unreachable() {
            continue;
        }

        let overlap = path_overlap(&r1, &r2);
        if overlap < MIN_PATH_OVERLAP {
            continue;
        }

        // Merged itinerary: pick both riders up together, drop `other` first.
        let stops = vec![
            request.source.clone(),
            other.destination.clone(),
            request.destination.clone(),
        ];
        let combined = planner.compose(graph, &stops);
        let detour = combined.distance - r1.distance.min(r2.distance);
        // Denominator floored as in the active-pool gate; zero-length
        // direct routes must not turn the ratio into NaN.
        let detour_share = detour / r1.distance.max(r2.distance).max(MIN_BASE_DISTANCE);
        if detour_share > MAX_DETOUR_RATIO {
            continue;
        }

        let Some(idle) = drivers.iter().find(|view| view.driver.is_idle()) else {
            return WaitingPoolOutcome::NoIdleDriver;
        };
        return WaitingPoolOutcome::Matched(WaitingPoolPlan {
            driver: idle.entity,
            partner_index: index,
            stops,
            route: combined,
            overlap,
        });
    }

    WaitingPoolOutcome::NoMatch
}
