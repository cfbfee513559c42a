//! Metrics extraction from finished simulations.

use dispatch_core::telemetry::{RideEventKind, StatusSnapshot};

/// Aggregated metrics from a single experiment run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExperimentResult {
    /// Total number of requests submitted.
    pub total_requests: usize,
    /// Requests assigned to an idle driver.
    pub assigned: usize,
    /// Pooling events (active-ride and waiting-pair combined).
    pub pooled: usize,
    /// Completed trips.
    pub completed: usize,
    /// Requests still pending when the run ended.
    pub still_pending: usize,
    /// Share of submissions that matched immediately.
    pub match_rate: f64,
    /// Mean route distance over assignment and pooling events.
    pub avg_match_distance: f64,
}

/// Compute metrics from a final status snapshot.
pub fn extract_result(total_requests: usize, snapshot: &StatusSnapshot) -> ExperimentResult {
    let mut assigned = 0;
    let mut pooled = 0;
    let mut completed = 0;
    let mut distance_sum = 0.0;
    for entry in &snapshot.history {
        match entry.kind {
            RideEventKind::Assigned => {
                assigned += 1;
                distance_sum += entry.distance;
            }
            RideEventKind::Pooled => {
                pooled += 1;
                distance_sum += entry.distance;
            }
            RideEventKind::Completed => completed += 1,
        }
    }

    let matched = assigned + pooled;
    ExperimentResult {
        total_requests,
        assigned,
        pooled,
        completed,
        still_pending: snapshot.pending_requests.len(),
        match_rate: if total_requests > 0 {
            matched as f64 / total_requests as f64
        } else {
            0.0
        },
        avg_match_distance: if matched > 0 {
            distance_sum / matched as f64
        } else {
            0.0
        },
    }
}
