//! Nearest idle driver assignment, the last tier before queueing.

use crate::ecs::RideRequest;
use crate::graph::RoadGraph;
use crate::routing::RoutePlanner;

use super::types::{AssignPlan, DriverView};

/// Pick the idle driver with the smallest shortest-path distance to the
/// rider's source, then price the full pickup-and-deliver route.
///
/// Ties keep the earlier driver in iteration order. Returns `None` when no
/// driver is idle, no idle driver can reach the pickup, or the full route
/// is unreachable; the caller then queues the request.
pub fn assign_nearest_idle(
    request: &RideRequest,
    drivers: &[DriverView],
    graph: &RoadGraph,
    planner: &RoutePlanner,
) -> Option<AssignPlan> {
    let mut nearest: Option<&DriverView> = None;
    let mut nearest_distance = f64::INFINITY;
    for view in drivers {
        if !view.driver.is_idle() {
            continue;
        }
        let pickup = planner
            .shortest_path(graph, &view.driver.location, &request.source)
            .distance;
        if pickup < nearest_distance {
            nearest = Some(view);
            nearest_distance = pickup;
        }
    }

    let view = nearest?;
    let stops = vec![
        view.driver.location.clone(),
        request.source.clone(),
        request.destination.clone(),
    ];
    let route = planner.compose(graph, &stops);
    if route.is_unreachable() {
        return None;
    }

    Some(AssignPlan {
        driver: view.entity,
        pickup_distance: nearest_distance,
        route,
    })
}
