//! Small fixture networks shared by unit tests and benchmarks.

use crate::ecs::Driver;
use crate::graph::RoadGraph;
use crate::simulation::SimulationState;

/// Three nodes where the direct A-C edge costs more than going via B.
pub fn triangle_graph() -> RoadGraph {
    let mut graph = RoadGraph::default();
    graph.add_node("A", "Alpha", 0.0, 0.0);
    graph.add_node("B", "Beta", 0.0, 0.005);
    graph.add_node("C", "Gamma", 0.0, 0.010);
    graph.add_edge("A", "B", 5.0);
    graph.add_edge("B", "C", 3.0);
    graph.add_edge("A", "C", 10.0);
    graph
}

/// A straight line A-B-C-D-E with unit edges, nodes a pickup-proximity
/// step apart so any pair of sources passes the coordinate gate.
pub fn corridor_graph() -> RoadGraph {
    let mut graph = RoadGraph::default();
    let ids = ["A", "B", "C", "D", "E"];
    for (i, id) in ids.iter().enumerate() {
        graph.add_node(id, id, 0.0, i as f64 * 0.005);
    }
    for pair in ids.windows(2) {
        graph.add_edge(pair[0], pair[1], 1.0);
    }
    graph
}

/// The corridor plus an isolated node Z with no edges.
pub fn corridor_with_island() -> RoadGraph {
    let mut graph = corridor_graph();
    graph.add_node("Z", "Island", 1.0, 1.0);
    graph
}

/// A one-driver simulation on the corridor, the driver idle at A.
pub fn corridor_state() -> SimulationState {
    SimulationState::new(corridor_graph(), vec![Driver::idle_at("Driver-1", "A")])
}
