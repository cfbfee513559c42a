//! Parallel experimentation framework for dispatch parameter sweeps.
//!
//! This crate runs many dispatch simulations in parallel with varying
//! parameters, extracting match-rate and pooling metrics to analyze how
//! fleet size and demand volume affect dispatch outcomes.
//!
//! # Quick Start
//!
//! ```no_run
//! use dispatch_experiments::{run_parallel_experiments, ParameterSpace};
//!
//! // Define parameter space (grid search)
//! let space = ParameterSpace::grid()
//!     .num_drivers(vec![2, 5, 10])
//!     .num_requests(vec![50, 100]);
//!
//! // Generate parameter sets and run in parallel
//! let parameter_sets = space.generate();
//! let results = run_parallel_experiments(parameter_sets, None);
//! ```
//!
//! # Architecture
//!
//! - [`parameters`]: Parameter variation framework (grid search)
//! - [`workload`]: Deterministic request stream generation
//! - [`runner`]: Parallel simulation execution using rayon
//! - [`metrics`]: Metrics extraction from finished simulations
//! - [`export`]: Result export to CSV/JSON

pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;
pub mod workload;

pub use export::{export_to_csv, export_to_json};
pub use metrics::ExperimentResult;
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::{run_parallel_experiments, run_single_experiment};
pub use workload::generate_workload;
