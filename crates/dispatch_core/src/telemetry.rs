//! Ride history and status snapshots: the append-only dispatch log and the
//! read-only view handed to the transport layer.

use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::ecs::{Driver, RideRequest};
use crate::graph::{Edge, Node};

/// What happened to a ride: first assignment, pooled pickup, or trip end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideEventKind {
    Assigned,
    Pooled,
    Completed,
}

/// One history record. Entries are append-only; they are never mutated or
/// removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: RideEventKind,
    pub driver_id: String,
    pub rider_ids: Vec<String>,
    pub distance: f64,
}

/// Append-only ride history log.
#[derive(Debug, Default, Resource)]
pub struct RideHistory {
    entries: Vec<HistoryEntry>,
}

impl RideHistory {
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Requests that could not be matched yet, in submission order.
#[derive(Debug, Default, Resource)]
pub struct PendingRequests(pub VecDeque<RideRequest>);

/// Read-only snapshot of the whole simulation state.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub drivers: Vec<Driver>,
    pub pending_requests: Vec<RideRequest>,
    pub history: Vec<HistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_accumulates_in_order() {
        let mut history = RideHistory::default();
        assert!(history.is_empty());
        history.record(HistoryEntry {
            kind: RideEventKind::Assigned,
            driver_id: "Driver-1".to_string(),
            rider_ids: vec!["U1".to_string()],
            distance: 4.0,
        });
        history.record(HistoryEntry {
            kind: RideEventKind::Completed,
            driver_id: "Driver-1".to_string(),
            rider_ids: vec!["U1".to_string()],
            distance: 4.0,
        });
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].kind, RideEventKind::Assigned);
        assert_eq!(history.entries()[1].kind, RideEventKind::Completed);
    }
}
