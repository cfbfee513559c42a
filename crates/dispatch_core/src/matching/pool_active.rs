//! Pooling into an active driver: bounded brute-force search over
//! pickup/drop-off orderings.

use crate::ecs::RideRequest;
use crate::graph::{NodeId, RoadGraph};
use crate::routing::RoutePlanner;

use super::types::{DriverView, PoolPlan};
use super::{MAX_DETOUR_RATIO, MIN_BASE_DISTANCE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaypointKind {
    Pickup,
    DropOff,
}

/// One pickup or drop-off of one passenger, tagged for ordering validity.
#[derive(Debug, Clone)]
struct Waypoint {
    node: NodeId,
    passenger: usize,
    kind: WaypointKind,
}

/// Try to pool `request` into one of the en-route drivers with a spare seat.
///
/// For each candidate, every ordering of the combined passengers'
/// pickup/drop-off waypoints is enumerated (a drop-off never precedes its
/// own pickup), priced with the driver's location prepended, and admitted
/// when the detour over the driver's committed route stays within
/// [`MAX_DETOUR_RATIO`]. The cheapest admitted ordering across all
/// candidates wins; ties keep the first one found.
///
/// The enumeration is factorial in the passenger count, at most
/// `(2 * (SEAT_CAPACITY + 1))!` raw orderings. That is only viable because
/// `SEAT_CAPACITY` is small; scaling it up means replacing this search
/// (branch-and-bound, or DP over pickup/drop subsets), not tuning it.
pub fn find_best_pool(
    request: &RideRequest,
    drivers: &[DriverView],
    graph: &RoadGraph,
    planner: &RoutePlanner,
) -> Option<PoolPlan> {
    let mut best: Option<PoolPlan> = None;

    for view in drivers {
        let driver = &view.driver;
        if driver.is_idle() || !driver.has_spare_seat() {
            continue;
        }

        // Committed route today: location, then every pickup, then every
        // drop-off, in passenger order.
        let mut base_stops: Vec<NodeId> = Vec::with_capacity(1 + driver.passengers.len() * 2);
        base_stops.push(driver.location.clone());
        base_stops.extend(driver.passengers.iter().map(|p| p.source.clone()));
        base_stops.extend(driver.passengers.iter().map(|p| p.destination.clone()));
        let base_distance = planner.compose(graph, &base_stops).distance;

        let mut waypoints = Vec::with_capacity((driver.passengers.len() + 1) * 2);
        for (index, passenger) in driver.passengers.iter().chain([request]).enumerate() {
            waypoints.push(Waypoint {
                node: passenger.source.clone(),
                passenger: index,
                kind: WaypointKind::Pickup,
            });
            waypoints.push(Waypoint {
                node: passenger.destination.clone(),
                passenger: index,
                kind: WaypointKind::DropOff,
            });
        }

        let passenger_count = driver.passengers.len() + 1;
        let mut sequence: Vec<usize> = Vec::with_capacity(waypoints.len());
        let mut used = vec![false; waypoints.len()];
        let mut picked_up = vec![false; passenger_count];

        search_orderings(
            &waypoints,
            &mut sequence,
            &mut used,
            &mut picked_up,
            &mut |ordering: &[usize]| {
                let mut stops: Vec<NodeId> = Vec::with_capacity(ordering.len() + 1);
                stops.push(driver.location.clone());
                stops.extend(ordering.iter().map(|&i| waypoints[i].node.clone()));

                let route = planner.compose(graph, &stops);
                if route.is_unreachable() {
                    return;
                }
                let detour_ratio =
                    (route.distance - base_distance) / base_distance.max(MIN_BASE_DISTANCE);
                if detour_ratio > MAX_DETOUR_RATIO {
                    return;
                }
                let improves = best
                    .as_ref()
                    .map_or(true, |plan| route.distance < plan.route.distance);
                if improves {
                    best = Some(PoolPlan {
                        driver: view.entity,
                        stops,
                        route,
                        detour_ratio,
                    });
                }
            },
        );
    }

    best
}

/// Depth-first enumeration of every ordering whose drop-offs follow their
/// own pickups. Candidates are tried in waypoint index order at every depth,
/// so the visit order is deterministic and first-found wins ties.
fn search_orderings(
    waypoints: &[Waypoint],
    sequence: &mut Vec<usize>,
    used: &mut [bool],
    picked_up: &mut [bool],
    visit: &mut impl FnMut(&[usize]),
) {
    if sequence.len() == waypoints.len() {
        visit(sequence);
        return;
    }
    for index in 0..waypoints.len() {
        if used[index] {
            continue;
        }
        let waypoint = &waypoints[index];
        match waypoint.kind {
            WaypointKind::Pickup => picked_up[waypoint.passenger] = true,
            WaypointKind::DropOff => {
                if !picked_up[waypoint.passenger] {
                    continue;
                }
            }
        }
        used[index] = true;
        sequence.push(index);
        search_orderings(waypoints, sequence, used, picked_up, &mut *visit);
        sequence.pop();
        used[index] = false;
        if waypoint.kind == WaypointKind::Pickup {
            picked_up[waypoint.passenger] = false;
        }
    }
}
