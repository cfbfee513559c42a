//! Fleet data model: driver entities and ride request records.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Maximum passengers a driver carries at once.
///
/// The active-pool search enumerates pickup/drop-off orderings, which grows
/// factorially with the passenger count; raising this constant requires
/// replacing that search with something smarter (see
/// `matching::pool_active`), not just bumping the number.
pub const SEAT_CAPACITY: usize = 3;

/// Driver availability: `Idle` = no passengers, awaiting dispatch;
/// `EnRoute` = actively serving one or more passengers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriverState {
    Idle,
    EnRoute,
}

/// A rider's trip request. Created on submission; leaves the pending queue
/// when matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: String,
    pub user_id: String,
    pub source: NodeId,
    pub destination: NodeId,
}

/// One vehicle of the fixed fleet.
///
/// `location` is the last known/resting node; `stops` is the committed
/// pickup/drop-off sequence. Invariant: `state == Idle` exactly when
/// `passengers` and `stops` are both empty.
#[derive(Debug, Clone, PartialEq, Component, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub location: NodeId,
    pub state: DriverState,
    pub passengers: Vec<RideRequest>,
    pub stops: Vec<NodeId>,
}

impl Driver {
    /// A fresh idle driver resting at `location`.
    pub fn idle_at(id: impl Into<String>, location: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
            state: DriverState::Idle,
            passengers: Vec::new(),
            stops: Vec::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == DriverState::Idle
    }

    pub fn has_spare_seat(&self) -> bool {
        self.passengers.len() < SEAT_CAPACITY
    }

    /// Final node of the committed trip: the last stop, or the last
    /// passenger's destination when no stop list was installed.
    pub fn final_stop(&self) -> Option<NodeId> {
        self.stops
            .last()
            .cloned()
            .or_else(|| self.passengers.last().map(|p| p.destination.clone()))
    }
}
