//! The owned simulation state and its boundary operations.
//!
//! [`SimulationState`] wraps a `bevy_ecs` [`World`]: drivers live as
//! entities, everything else (graph, route planner, pending queue, ride
//! history, id source) as resources. Each operation is one synchronous
//! read-modify-write with no suspension point, so the state can be exposed
//! concurrently behind a single mutex without further coordination.

use std::fmt;

use bevy_ecs::prelude::{Entity, World};
use serde::Serialize;

use crate::ecs::{Driver, DriverState, RideRequest};
use crate::graph::{NodeId, RoadGraph};
use crate::ids::RequestIdSource;
use crate::matching::types::{AssignPlan, PoolPlan, WaitingPoolPlan};
use crate::matching::{
    assign_nearest_idle, find_best_pool, pair_with_waiting, DriverView, WaitingPoolOutcome,
};
use crate::routing::{Route, RoutePlanner};
use crate::telemetry::{HistoryEntry, PendingRequests, RideEventKind, RideHistory, StatusSnapshot};

/// Recoverable dispatch failures reported at the boundary.
///
/// None of these are fatal; each leaves the state unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A submission field was missing or blank.
    MissingField(&'static str),
    /// Completion referenced a driver id that does not exist.
    DriverNotFound(String),
    /// Completion on a driver that is not currently en route.
    DriverNotEnRoute(String),
    /// An en-route driver had neither stops nor passengers to land on.
    NoFinalStop(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::MissingField(field) => write!(f, "missing required field `{field}`"),
            DispatchError::DriverNotFound(id) => write!(f, "driver `{id}` not found"),
            DispatchError::DriverNotEnRoute(id) => write!(f, "driver `{id}` is not en route"),
            DispatchError::NoFinalStop(id) => {
                write!(f, "driver `{id}` has no stop to complete at")
            }
        }
    }
}

impl std::error::Error for DispatchError {}

/// Result of a submission. `success == false` means the request was queued,
/// a valid terminal state pending future matches, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
    pub assigned_route: Option<Route>,
}

/// Result of a successful ride completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionOutcome {
    pub message: String,
    pub driver_id: String,
    /// Node the driver now rests at.
    pub location: NodeId,
}

/// The only mutable shared state of the simulation: driver roster, pending
/// queue, and ride history, all owned by one ECS world.
pub struct SimulationState {
    world: World,
}

impl SimulationState {
    /// Build a state over `graph` with the given fleet. Driver locations
    /// must name graph nodes, otherwise every route for that driver
    /// resolves as unreachable.
    pub fn new(graph: RoadGraph, fleet: Vec<Driver>) -> Self {
        Self::with_id_source(graph, fleet, RequestIdSource::default())
    }

    /// Same as [`SimulationState::new`] with an explicit id source.
    pub fn with_id_source(graph: RoadGraph, fleet: Vec<Driver>, ids: RequestIdSource) -> Self {
        let mut world = World::new();
        world.insert_resource(graph);
        world.insert_resource(RoutePlanner::default());
        world.insert_resource(PendingRequests::default());
        world.insert_resource(RideHistory::default());
        world.insert_resource(ids);
        for driver in fleet {
            world.spawn(driver);
        }
        Self { world }
    }

    /// Submit a ride request and try the three matching tiers in order:
    /// pool into an active driver, pair with a waiting request, assign the
    /// nearest idle driver. When all three fail the request joins the
    /// pending queue.
    pub fn submit_request(
        &mut self,
        user_id: &str,
        source: &str,
        destination: &str,
    ) -> Result<SubmitOutcome, DispatchError> {
        if user_id.trim().is_empty() {
            return Err(DispatchError::MissingField("userId"));
        }
        if source.trim().is_empty() {
            return Err(DispatchError::MissingField("source"));
        }
        if destination.trim().is_empty() {
            return Err(DispatchError::MissingField("destination"));
        }

        let id = self.world.resource_mut::<RequestIdSource>().mint();
        let request = RideRequest {
            id,
            user_id: user_id.to_string(),
            source: source.to_string(),
            destination: destination.to_string(),
        };

        let drivers = self.driver_views();
        let queue: Vec<RideRequest> = self
            .world
            .resource::<PendingRequests>()
            .0
            .iter()
            .cloned()
            .collect();

        let pooled = {
            let graph = self.world.resource::<RoadGraph>();
            let planner = self.world.resource::<RoutePlanner>();
            find_best_pool(&request, &drivers, graph, planner)
        };
        if let Some(plan) = pooled {
            return Ok(self.apply_active_pool(request, plan));
        }

        let waiting = {
            let graph = self.world.resource::<RoadGraph>();
            let planner = self.world.resource::<RoutePlanner>();
            pair_with_waiting(&request, &queue, &drivers, graph, planner)
        };
        if let WaitingPoolOutcome::Matched(plan) = waiting {
            return Ok(self.apply_waiting_pool(request, plan));
        }
        // `NoIdleDriver` only stops the waiting scan; the idle tier below
        // cannot succeed either, so the request falls through to the queue.

        let assigned = {
            let graph = self.world.resource::<RoadGraph>();
            let planner = self.world.resource::<RoutePlanner>();
            assign_nearest_idle(&request, &drivers, graph, planner)
        };
        if let Some(plan) = assigned {
            return Ok(self.apply_assignment(request, plan));
        }

        self.world
            .resource_mut::<PendingRequests>()
            .0
            .push_back(request);
        Ok(SubmitOutcome {
            success: false,
            message: "No drivers available; request queued.".to_string(),
            assigned_route: None,
        })
    }

    /// Finish a driver's trip: the driver relocates to its final stop,
    /// sheds passengers and stops, and returns to `Idle`.
    pub fn complete_ride(&mut self, driver_id: &str) -> Result<CompletionOutcome, DispatchError> {
        let entity = self
            .find_driver(driver_id)
            .ok_or_else(|| DispatchError::DriverNotFound(driver_id.to_string()))?;
        let snapshot = self
            .world
            .entity(entity)
            .get::<Driver>()
            .cloned()
            .expect("fleet entities carry a Driver component");

        if snapshot.state != DriverState::EnRoute {
            return Err(DispatchError::DriverNotEnRoute(driver_id.to_string()));
        }
        let final_stop = snapshot
            .final_stop()
            .ok_or_else(|| DispatchError::NoFinalStop(driver_id.to_string()))?;

        let trip_distance = if snapshot.stops.len() >= 2 {
            let graph = self.world.resource::<RoadGraph>();
            let planner = self.world.resource::<RoutePlanner>();
            planner.compose(graph, &snapshot.stops).distance
        } else {
            0.0
        };
        let rider_ids: Vec<String> = snapshot
            .passengers
            .iter()
            .map(|p| p.user_id.clone())
            .collect();

        {
            let mut entity_mut = self.world.entity_mut(entity);
            let mut driver = entity_mut
                .get_mut::<Driver>()
                .expect("fleet entities carry a Driver component");
            driver.location = final_stop.clone();
            driver.passengers.clear();
            driver.stops.clear();
            driver.state = DriverState::Idle;
        }

        self.world.resource_mut::<RideHistory>().record(HistoryEntry {
            kind: RideEventKind::Completed,
            driver_id: driver_id.to_string(),
            rider_ids,
            distance: trip_distance,
        });

        Ok(CompletionOutcome {
            message: format!("{driver_id} is now idle at {final_stop}"),
            driver_id: driver_id.to_string(),
            location: final_stop,
        })
    }

    /// Read-only snapshot of the whole state.
    pub fn status(&mut self) -> StatusSnapshot {
        let drivers = self.drivers();
        let graph = self.world.resource::<RoadGraph>();
        StatusSnapshot {
            nodes: graph.nodes_sorted(),
            edges: graph.edges().to_vec(),
            drivers,
            pending_requests: self
                .world
                .resource::<PendingRequests>()
                .0
                .iter()
                .cloned()
                .collect(),
            history: self.world.resource::<RideHistory>().entries().to_vec(),
        }
    }

    /// Current fleet, in spawn order.
    pub fn drivers(&mut self) -> Vec<Driver> {
        let mut query = self.world.query::<&Driver>();
        query.iter(&self.world).cloned().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.world.resource::<PendingRequests>().0.len()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.world.resource::<RideHistory>().entries()
    }

    fn apply_active_pool(&mut self, request: RideRequest, plan: PoolPlan) -> SubmitOutcome {
        let user = request.user_id.clone();
        let (driver_id, rider_ids) = {
            let mut entity_mut = self.world.entity_mut(plan.driver);
            let mut driver = entity_mut
                .get_mut::<Driver>()
                .expect("pool plan points at a fleet entity");
            driver.passengers.push(request);
            driver.stops = plan.stops;
            driver.state = DriverState::EnRoute;
            let riders: Vec<String> = driver.passengers.iter().map(|p| p.user_id.clone()).collect();
            (driver.id.clone(), riders)
        };

        self.world.resource_mut::<RideHistory>().record(HistoryEntry {
            kind: RideEventKind::Pooled,
            driver_id: driver_id.clone(),
            rider_ids,
            distance: plan.route.distance,
        });

        SubmitOutcome {
            success: true,
            message: format!(
                "Pooled {user} with {driver_id} (detour {:.1}%)",
                plan.detour_ratio * 100.0
            ),
            assigned_route: Some(plan.route),
        }
    }

    fn apply_waiting_pool(&mut self, request: RideRequest, plan: WaitingPoolPlan) -> SubmitOutcome {
        let other = self
            .world
            .resource_mut::<PendingRequests>()
            .0
            .remove(plan.partner_index)
            .expect("partner index points into the pending queue");
        let user = request.user_id.clone();
        let partner = other.user_id.clone();

        let driver_id = {
            let mut entity_mut = self.world.entity_mut(plan.driver);
            let mut driver = entity_mut
                .get_mut::<Driver>()
                .expect("waiting-pool plan points at a fleet entity");
            driver.passengers = vec![request, other];
            driver.stops = plan.stops;
            driver.state = DriverState::EnRoute;
            driver.id.clone()
        };

        self.world.resource_mut::<RideHistory>().record(HistoryEntry {
            kind: RideEventKind::Pooled,
            driver_id,
            rider_ids: vec![user.clone(), partner.clone()],
            distance: plan.route.distance,
        });

        SubmitOutcome {
            success: true,
            message: format!(
                "{user} pooled with {partner} (shared route {:.1}%)",
                plan.overlap * 100.0
            ),
            assigned_route: Some(plan.route),
        }
    }

    fn apply_assignment(&mut self, request: RideRequest, plan: AssignPlan) -> SubmitOutcome {
        let user = request.user_id.clone();
        let stops = vec![request.source.clone(), request.destination.clone()];

        let driver_id = {
            let mut entity_mut = self.world.entity_mut(plan.driver);
            let mut driver = entity_mut
                .get_mut::<Driver>()
                .expect("assignment plan points at a fleet entity");
            driver.passengers = vec![request];
            driver.stops = stops;
            driver.state = DriverState::EnRoute;
            driver.id.clone()
        };

        self.world.resource_mut::<RideHistory>().record(HistoryEntry {
            kind: RideEventKind::Assigned,
            driver_id: driver_id.clone(),
            rider_ids: vec![user.clone()],
            distance: plan.route.distance,
        });

        SubmitOutcome {
            success: true,
            message: format!("Assigned {driver_id} to {user}"),
            assigned_route: Some(plan.route),
        }
    }

    fn find_driver(&mut self, driver_id: &str) -> Option<Entity> {
        let mut query = self.world.query::<(Entity, &Driver)>();
        query
            .iter(&self.world)
            .find(|(_, driver)| driver.id == driver_id)
            .map(|(entity, _)| entity)
    }

    fn driver_views(&mut self) -> Vec<DriverView> {
        let mut query = self.world.query::<(Entity, &Driver)>();
        query
            .iter(&self.world)
            .map(|(entity, driver)| DriverView {
                entity,
                driver: driver.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::ecs::SEAT_CAPACITY;
    use crate::scenario::{build_state, sample_graph, ScenarioParams};
    use crate::test_helpers::{corridor_graph, corridor_state, corridor_with_island};

    #[test]
    fn blank_fields_are_rejected_without_state_change() {
        let mut state = corridor_state();
        assert_eq!(
            state.submit_request("", "A", "E"),
            Err(DispatchError::MissingField("userId"))
        );
        assert_eq!(
            state.submit_request("U1", " ", "E"),
            Err(DispatchError::MissingField("source"))
        );
        assert_eq!(
            state.submit_request("U1", "A", ""),
            Err(DispatchError::MissingField("destination"))
        );
        assert_eq!(state.pending_count(), 0);
        assert!(state.history().is_empty());
        assert!(state.drivers()[0].is_idle());
    }

    #[test]
    fn first_request_gets_the_idle_driver() {
        let mut state = corridor_state();
        let outcome = state
            .submit_request("U1", "B", "E")
            .expect("fields are present");

        assert!(outcome.success);
        let route = outcome.assigned_route.expect("a route was assigned");
        // Pickup leg A -> B plus trip B -> E.
        assert!((route.distance - 4.0).abs() < 1e-9);

        let driver = &state.drivers()[0];
        assert_eq!(driver.state, DriverState::EnRoute);
        assert_eq!(driver.passengers.len(), 1);
        assert_eq!(driver.stops, vec!["B", "E"]);

        let history = state.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, RideEventKind::Assigned);
        assert_eq!(history[0].rider_ids, vec!["U1"]);
    }

    #[test]
    fn with_no_fleet_the_request_queues_exactly_once() {
        let mut state = SimulationState::new(corridor_graph(), Vec::new());
        let outcome = state
            .submit_request("U1", "A", "E")
            .expect("fields are present");

        assert!(!outcome.success);
        assert!(outcome.assigned_route.is_none());
        assert_eq!(state.pending_count(), 1);
        assert!(state.history().is_empty());

        let snapshot = state.status();
        assert_eq!(snapshot.pending_requests.len(), 1);
        assert_eq!(snapshot.pending_requests[0].user_id, "U1");
    }

    #[test]
    fn second_overlapping_request_pools_onto_the_active_driver() {
        let mut state = corridor_state();
        state
            .submit_request("U1", "A", "E")
            .expect("fields are present");
        let outcome = state
            .submit_request("U2", "A", "D")
            .expect("fields are present");

        assert!(outcome.success);
        assert_eq!(state.pending_count(), 0);

        let driver = &state.drivers()[0];
        assert_eq!(driver.passengers.len(), 2);
        assert_eq!(driver.state, DriverState::EnRoute);

        let pooled: Vec<_> = state
            .history()
            .iter()
            .filter(|e| e.kind == RideEventKind::Pooled)
            .collect();
        assert_eq!(pooled.len(), 1);
        assert_eq!(pooled[0].rider_ids, vec!["U1", "U2"]);
    }

    #[test]
    fn waiting_requests_pair_when_a_driver_idles_out_of_reach() {
        // The only driver rests on a disconnected island: it cannot be
        // assigned, but it can serve a waiting pair formed at the source.
        let graph = corridor_with_island();
        let mut state = SimulationState::new(graph, vec![Driver::idle_at("Driver-1", "Z")]);

        let first = state
            .submit_request("U1", "A", "D")
            .expect("fields are present");
        assert!(!first.success);
        assert_eq!(state.pending_count(), 1);

        let second = state
            .submit_request("U2", "A", "E")
            .expect("fields are present");
        assert!(second.success);
        assert_eq!(state.pending_count(), 0);

        let driver = &state.drivers()[0];
        assert_eq!(driver.state, DriverState::EnRoute);
        assert_eq!(driver.passengers.len(), 2);
        assert_eq!(driver.stops, vec!["A", "D", "E"]);

        let history = state.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, RideEventKind::Pooled);
        assert_eq!(history[0].rider_ids, vec!["U2", "U1"]);
    }

    #[test]
    fn a_full_car_sends_the_next_request_to_the_queue() {
        let mut state = corridor_state();
        state.submit_request("U1", "A", "E").expect("submits");
        state.submit_request("U2", "A", "E").expect("submits");
        state.submit_request("U3", "A", "E").expect("submits");
        let driver = &state.drivers()[0];
        assert_eq!(driver.passengers.len(), SEAT_CAPACITY);

        let overflow = state.submit_request("U4", "A", "E").expect("submits");
        assert!(!overflow.success);
        assert_eq!(state.pending_count(), 1);
        assert_eq!(state.drivers()[0].passengers.len(), SEAT_CAPACITY);
    }

    #[test]
    fn completion_returns_the_driver_idle_at_its_final_stop() {
        let mut state = corridor_state();
        state.submit_request("U1", "B", "E").expect("submits");

        let outcome = state.complete_ride("Driver-1").expect("driver is en route");
        assert_eq!(outcome.location, "E");

        let driver = &state.drivers()[0];
        assert!(driver.is_idle());
        assert_eq!(driver.location, "E");
        assert!(driver.passengers.is_empty());
        assert!(driver.stops.is_empty());

        let completed: Vec<_> = state
            .history()
            .iter()
            .filter(|e| e.kind == RideEventKind::Completed)
            .collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].rider_ids, vec!["U1"]);
    }

    #[test]
    fn completing_an_idle_driver_is_an_error() {
        let mut state = corridor_state();
        assert_eq!(
            state.complete_ride("Driver-1"),
            Err(DispatchError::DriverNotEnRoute("Driver-1".to_string()))
        );
    }

    #[test]
    fn completing_an_unknown_driver_is_an_error() {
        let mut state = corridor_state();
        assert_eq!(
            state.complete_ride("Driver-42"),
            Err(DispatchError::DriverNotFound("Driver-42".to_string()))
        );
    }

    #[test]
    fn completing_twice_fails_the_second_time() {
        let mut state = corridor_state();
        state.submit_request("U1", "B", "E").expect("submits");
        state.complete_ride("Driver-1").expect("first completion");
        assert_eq!(
            state.complete_ride("Driver-1"),
            Err(DispatchError::DriverNotEnRoute("Driver-1".to_string()))
        );
    }

    #[test]
    fn request_ids_are_reproducible_across_identical_runs() {
        let run = || {
            let mut state = SimulationState::new(corridor_graph(), Vec::new());
            state.submit_request("U1", "A", "E").expect("submits");
            state.submit_request("U2", "B", "D").expect("submits");
            state
                .status()
                .pending_requests
                .iter()
                .map(|r| r.id.clone())
                .collect::<Vec<_>>()
        };
        let first = run();
        assert_eq!(first, vec!["R-0001", "R-0002"]);
        assert_eq!(first, run());
    }

    #[test]
    fn status_reports_the_static_network() {
        let mut state = corridor_state();
        let snapshot = state.status();
        assert_eq!(snapshot.nodes.len(), 5);
        assert_eq!(snapshot.edges.len(), 4);
        assert_eq!(snapshot.nodes[0].id, "A");
        assert_eq!(snapshot.drivers.len(), 1);
    }

    #[test]
    fn invariants_hold_over_random_operation_interleavings() {
        let mut state = build_state(&ScenarioParams::default().with_drivers(3).with_seed(11));
        let graph = sample_graph();
        let nodes = graph.node_ids();
        let mut rng = StdRng::seed_from_u64(13);

        for step in 0..300 {
            if rng.gen_bool(0.7) {
                let source = &nodes[rng.gen_range(0..nodes.len())];
                let destination = &nodes[rng.gen_range(0..nodes.len())];
                if source == destination {
                    continue;
                }
                state
                    .submit_request(&format!("U-{step}"), source, destination)
                    .expect("fields are present");
            } else {
                let busy = state
                    .drivers()
                    .into_iter()
                    .find(|d| d.state == DriverState::EnRoute);
                if let Some(driver) = busy {
                    state.complete_ride(&driver.id).expect("driver is en route");
                }
            }

            for driver in state.drivers() {
                assert!(driver.passengers.len() <= SEAT_CAPACITY);
                let empty = driver.passengers.is_empty();
                assert_eq!(driver.is_idle(), empty, "state/passenger mismatch");
                assert_eq!(driver.stops.is_empty(), empty, "state/stops mismatch");
                assert!(graph.contains(&driver.location));
            }

            let snapshot = state.status();
            let mut ids: Vec<_> = snapshot.pending_requests.iter().map(|r| &r.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), snapshot.pending_requests.len());
        }
    }
}
