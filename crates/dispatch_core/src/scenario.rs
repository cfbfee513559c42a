//! Canned scenario used by demos, benchmarks, and the experiment runner:
//! an 11-node city network and a small randomly placed fleet.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::ecs::Driver;
use crate::graph::RoadGraph;
use crate::simulation::SimulationState;

/// (id, name, lat, lng) per node of the sample network.
const SAMPLE_NODES: [(&str, &str, f64, f64); 11] = [
    ("A", "Downtown", 40.7128, -74.0060),
    ("B", "Midtown", 40.7580, -73.9855),
    ("C", "Uptown", 40.7829, -73.9850),
    ("D", "West Side", 40.7489, -74.0020),
    ("E", "East Side", 40.7489, -73.9680),
    ("F", "North End", 40.8000, -73.9500),
    ("G", "South End", 40.7000, -74.0100),
    ("H", "Harbor", 40.7050, -74.0200),
    ("I", "Central Park", 40.7711, -73.9742),
    ("J", "Brooklyn Edge", 40.6900, -73.9900),
    ("K", "Queens Bridge", 40.7570, -73.9550),
];

/// (a, b, weight) per bidirectional road of the sample network.
const SAMPLE_EDGES: [(&str, &str, f64); 16] = [
    ("A", "B", 5.2),
    ("A", "D", 3.1),
    ("A", "G", 2.5),
    ("A", "J", 1.8),
    ("B", "C", 3.8),
    ("B", "E", 2.9),
    ("B", "I", 1.5),
    ("C", "F", 2.2),
    ("D", "E", 4.5),
    ("D", "H", 2.8),
    ("E", "C", 4.1),
    ("E", "K", 3.3),
    ("F", "I", 1.9),
    ("G", "H", 1.9),
    ("J", "G", 1.0),
    ("K", "B", 2.5),
];

/// Build the standard demo network.
pub fn sample_graph() -> RoadGraph {
    let mut graph = RoadGraph::default();
    for (id, name, lat, lng) in SAMPLE_NODES {
        graph.add_node(id, name, lat, lng);
    }
    for (a, b, weight) in SAMPLE_EDGES {
        graph.add_edge(a, b, weight);
    }
    graph
}

/// Knobs for a canned scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub num_drivers: usize,
    /// `None` shuffles from entropy; a fixed seed reproduces the fleet.
    pub seed: Option<u64>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_drivers: 3,
            seed: None,
        }
    }
}

impl ScenarioParams {
    pub fn with_drivers(mut self, num_drivers: usize) -> Self {
        self.num_drivers = num_drivers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Spawn `num_drivers` idle drivers across the graph's nodes. Locations
/// cycle through a shuffled node list so small fleets still spread out.
pub fn initial_fleet(graph: &RoadGraph, params: &ScenarioParams) -> Vec<Driver> {
    let mut locations = graph.node_ids();
    if locations.is_empty() {
        return Vec::new();
    }
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    locations.shuffle(&mut rng);

    (0..params.num_drivers)
        .map(|i| {
            Driver::idle_at(
                format!("Driver-{}", i + 1),
                locations[i % locations.len()].clone(),
            )
        })
        .collect()
}

/// Assemble a full simulation over the sample network.
pub fn build_state(params: &ScenarioParams) -> SimulationState {
    let graph = sample_graph();
    let fleet = initial_fleet(&graph, params);
    SimulationState::new(graph, fleet)
}
