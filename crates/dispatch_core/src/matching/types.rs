use bevy_ecs::prelude::Entity;

use crate::ecs::Driver;
use crate::graph::NodeId;
use crate::routing::Route;

/// Cloned view of one fleet entity, detached from the ECS borrow so the
/// search functions stay pure.
#[derive(Debug, Clone)]
pub struct DriverView {
    pub entity: Entity,
    pub driver: Driver,
}

/// Winning plan of the active-driver pool search.
#[derive(Debug, Clone)]
pub struct PoolPlan {
    pub driver: Entity,
    /// Full stop sequence to install, starting at the driver's location.
    pub stops: Vec<NodeId>,
    pub route: Route,
    pub detour_ratio: f64,
}

/// Winning plan of the waiting-request pairing search.
#[derive(Debug, Clone)]
pub struct WaitingPoolPlan {
    pub driver: Entity,
    /// Index of the matched partner in the pending queue.
    pub partner_index: usize,
    pub stops: Vec<NodeId>,
    pub route: Route,
    pub overlap: f64,
}

/// Outcome of scanning the waiting queue.
#[derive(Debug, Clone)]
pub enum WaitingPoolOutcome {
    Matched(WaitingPoolPlan),
    /// A compatible partner exists but no driver is idle. The scan stops
    /// here instead of trying later queue entries; kept from the original
    /// dispatcher, see DESIGN.md.
    NoIdleDriver,
    NoMatch,
}

/// Winning plan of the nearest-idle-driver search.
#[derive(Debug, Clone)]
pub struct AssignPlan {
    pub driver: Entity,
    /// Shortest-path distance from the driver's resting node to the pickup.
    pub pickup_distance: f64,
    pub route: Route,
}
