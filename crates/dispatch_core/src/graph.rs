//! Road network: named location nodes, weighted undirected edges, and
//! single-source shortest paths.
//!
//! This module provides:
//!
//! - **Node / Edge**: the static load-time inputs of the simulation
//! - **RoadGraph**: adjacency storage keyed by node id
//! - **Shortest path**: label-setting Dijkstra with predecessor-based path
//!   reconstruction
//!
//! Edge weights are abstract road distances and must be non-negative. An
//! unreachable target (or an endpoint that is not a graph node) resolves to
//! an infinite-distance [`Route`] with an empty path, never an error.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::routing::Route;

/// Identifier of a graph node. Node identity is the id alone; coordinates
/// and display names are payload.
pub type NodeId = String;

/// A named location with geographic coordinates, vertex of the routing graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Undirected weighted edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    pub weight: f64,
}

/// Weighted undirected graph over named location nodes.
///
/// Built once from a static node/edge set; adjacency is keyed by node id,
/// each entry listing `(neighbor_id, weight)`.
#[derive(Debug, Clone, Default, Resource)]
pub struct RoadGraph {
    nodes: HashMap<NodeId, Node>,
    adjacency: HashMap<NodeId, Vec<(NodeId, f64)>>,
    edges: Vec<Edge>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str, name: &str, lat: f64, lng: f64) {
        self.nodes.insert(
            id.to_string(),
            Node {
                id: id.to_string(),
                name: name.to_string(),
                lat,
                lng,
            },
        );
        self.adjacency.entry(id.to_string()).or_default();
    }

    /// Insert an undirected edge; both endpoints gain an adjacency entry.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) {
        debug_assert!(weight >= 0.0, "edge weight must be non-negative");
        self.adjacency
            .entry(a.to_string())
            .or_default()
            .push((b.to_string(), weight));
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .push((a.to_string(), weight));
        self.edges.push(Edge {
            a: a.to_string(),
            b: b.to_string(),
            weight,
        });
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All node ids, sorted, so callers that shuffle or iterate get the same
    /// order for the same graph.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// All nodes sorted by id, for stable snapshots.
    pub fn nodes_sorted(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Straight-line distance between two nodes in raw coordinate space
    /// (degrees). This is the pickup-proximity proxy, not a road distance.
    pub fn coordinate_distance(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.node(a)?;
        let b = self.node(b)?;
        Some((a.lat - b.lat).hypot(a.lng - b.lng))
    }

    /// Dijkstra shortest path from `source` to `target`.
    ///
    /// Label-setting over non-negative edge weights: the unsettled node with
    /// the smallest tentative distance is extracted until the target itself
    /// is extracted. Stale frontier entries (a shorter label was settled
    /// after the push) are skipped, not reprocessed. `source == target`
    /// yields the zero-distance single-node path.
    pub fn shortest_path(&self, source: &str, target: &str) -> Route {
        if !self.contains(source) || !self.contains(target) {
            return Route::unreachable();
        }

        let mut distances: HashMap<NodeId, f64> = self
            .nodes
            .keys()
            .map(|id| (id.clone(), f64::INFINITY))
            .collect();
        let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
        distances.insert(source.to_string(), 0.0);

        let mut frontier = BinaryHeap::new();
        frontier.push(PendingVisit {
            distance: 0.0,
            node: source.to_string(),
        });

        while let Some(PendingVisit { distance, node }) = frontier.pop() {
            if distance > distances[&node] {
                continue;
            }
            // The target is settled once extracted, not merely reached.
            if node == target {
                break;
            }
            let Some(neighbors) = self.adjacency.get(&node) else {
                continue;
            };
            for (neighbor, weight) in neighbors {
                // Edges may name ids that were never added as nodes; those
                // endpoints are not routable.
                let Some(&best) = distances.get(neighbor) else {
                    continue;
                };
                let candidate = distance + weight;
                if candidate < best {
                    distances.insert(neighbor.clone(), candidate);
                    previous.insert(neighbor.clone(), node.clone());
                    frontier.push(PendingVisit {
                        distance: candidate,
                        node: neighbor.clone(),
                    });
                }
            }
        }

        let total = distances[target];
        if !total.is_finite() {
            return Route::unreachable();
        }

        let mut path = vec![target.to_string()];
        let mut current = target;
        while let Some(prev) = previous.get(current) {
            path.push(prev.clone());
            current = prev;
        }
        path.reverse();

        Route {
            distance: total,
            path,
        }
    }
}

/// Frontier entry. `Ord` is reversed so the std max-heap pops the smallest
/// tentative distance first; ties fall back to node id so extraction order
/// is deterministic for a fixed graph.
#[derive(Debug, Clone, PartialEq)]
struct PendingVisit {
    distance: f64,
    node: NodeId,
}

impl Eq for PendingVisit {}

impl Ord for PendingVisit {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for PendingVisit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::sample_graph;
    use crate::test_helpers::{corridor_with_island, triangle_graph};

    #[test]
    fn two_hop_route_beats_heavier_direct_edge() {
        let graph = triangle_graph();
        let route = graph.shortest_path("A", "C");
        assert!((route.distance - 8.0).abs() < 1e-9);
        assert_eq!(route.path, vec!["A", "B", "C"]);
    }

    #[test]
    fn path_to_self_is_single_node_at_zero_distance() {
        let graph = triangle_graph();
        let route = graph.shortest_path("B", "B");
        assert_eq!(route.distance, 0.0);
        assert_eq!(route.path, vec!["B"]);
    }

    #[test]
    fn disconnected_target_is_unreachable() {
        let graph = corridor_with_island();
        let route = graph.shortest_path("A", "Z");
        assert!(route.is_unreachable());
        assert!(route.path.is_empty());
    }

    #[test]
    fn edges_to_unregistered_ids_are_ignored() {
        let mut graph = triangle_graph();
        graph.add_edge("B", "ghost", 0.5);

        // Traversal must skip the dangling endpoint, not panic on it, and
        // routing through B stays intact.
        let route = graph.shortest_path("A", "C");
        assert!((route.distance - 8.0).abs() < 1e-9);
        assert_eq!(route.path, vec!["A", "B", "C"]);
        assert!(graph.shortest_path("A", "ghost").is_unreachable());
    }

    #[test]
    fn unknown_endpoint_is_unreachable() {
        let graph = triangle_graph();
        assert!(graph.shortest_path("A", "nope").is_unreachable());
        assert!(graph.shortest_path("nope", "A").is_unreachable());
    }

    #[test]
    fn shortest_path_is_symmetric_on_sample_graph() {
        let graph = sample_graph();
        let ids = graph.node_ids();
        for a in &ids {
            for b in &ids {
                let forward = graph.shortest_path(a, b).distance;
                let backward = graph.shortest_path(b, a).distance;
                assert!(
                    (forward - backward).abs() < 1e-9,
                    "asymmetric distance {a} -> {b}: {forward} vs {backward}"
                );
            }
        }
    }

    #[test]
    fn triangle_inequality_holds_along_paths() {
        let graph = sample_graph();
        let ids = graph.node_ids();
        for a in &ids {
            for b in &ids {
                let route = graph.shortest_path(a, b);
                for via in &route.path {
                    let detoured = graph.shortest_path(a, via).distance
                        + graph.shortest_path(via, b).distance;
                    assert!(
                        route.distance <= detoured + 1e-9,
                        "detour via {via} undercuts {a} -> {b}"
                    );
                }
            }
        }
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let graph = sample_graph();
        let first = graph.shortest_path("A", "F");
        let second = graph.shortest_path("A", "F");
        assert_eq!(first, second);
    }

    #[test]
    fn coordinate_distance_is_euclidean_over_degrees() {
        let mut graph = RoadGraph::new();
        graph.add_node("P", "P", 0.0, 0.0);
        graph.add_node("Q", "Q", 0.003, 0.004);
        let d = graph.coordinate_distance("P", "Q").expect("both known");
        assert!((d - 0.005).abs() < 1e-12);
        assert!(graph.coordinate_distance("P", "missing").is_none());
    }
}
