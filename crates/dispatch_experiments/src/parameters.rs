//! Parameter variation framework for exploring the dispatch parameter space.
//!
//! Defines parameter spaces and generates parameter sets for parallel
//! experimentation via grid search (Cartesian product).

/// A single parameter configuration for an experiment run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ParameterSet {
    /// Run ID within the sweep (index into the generated grid).
    pub run_id: usize,
    /// Fleet size.
    pub num_drivers: usize,
    /// Number of ride requests to submit.
    pub num_requests: usize,
    /// Complete the first en-route driver after every N submissions.
    pub complete_every: usize,
    /// Seed for fleet placement and workload (ensures reproducibility).
    pub seed: u64,
}

/// Defines a parameter space for exploration.
///
/// Empty dimensions fall back to a single default value, so a sweep over
/// one knob stays a one-dimensional grid.
#[derive(Debug, Clone, Default)]
pub struct ParameterSpace {
    num_drivers: Vec<usize>,
    num_requests: Vec<usize>,
    complete_every: Vec<usize>,
    seeds: Vec<u64>,
}

impl ParameterSpace {
    /// Start a grid-search parameter space.
    pub fn grid() -> Self {
        Self::default()
    }

    pub fn num_drivers(mut self, values: Vec<usize>) -> Self {
        self.num_drivers = values;
        self
    }

    pub fn num_requests(mut self, values: Vec<usize>) -> Self {
        self.num_requests = values;
        self
    }

    pub fn complete_every(mut self, values: Vec<usize>) -> Self {
        self.complete_every = values;
        self
    }

    pub fn seeds(mut self, values: Vec<u64>) -> Self {
        self.seeds = values;
        self
    }

    /// Generate all combinations as a Cartesian product, run ids assigned
    /// in generation order.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let num_drivers = or_default(&self.num_drivers, 3);
        let num_requests = or_default(&self.num_requests, 50);
        let complete_every = or_default(&self.complete_every, 5);
        let seeds = or_default(&self.seeds, 42);

        let mut sets = Vec::new();
        for &drivers in &num_drivers {
            for &requests in &num_requests {
                for &complete in &complete_every {
                    for &seed in &seeds {
                        sets.push(ParameterSet {
                            run_id: sets.len(),
                            num_drivers: drivers,
                            num_requests: requests,
                            complete_every: complete,
                            seed,
                        });
                    }
                }
            }
        }
        sets
    }
}

fn or_default<T: Copy>(values: &[T], default: T) -> Vec<T> {
    if values.is_empty() {
        vec![default]
    } else {
        values.to_vec()
    }
}
