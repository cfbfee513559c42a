//! Parallel simulation execution using rayon.
//!
//! Runs single experiments to completion and executes whole parameter
//! sweeps concurrently across available CPU cores.

use dispatch_core::ecs::DriverState;
use dispatch_core::scenario::{build_state, sample_graph, ScenarioParams};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::metrics::{extract_result, ExperimentResult};
use crate::parameters::ParameterSet;
use crate::workload::generate_workload;

/// Run one parameter set to completion over the sample network.
///
/// Submits the generated workload in order; after every `complete_every`
/// submissions the first en-route driver finishes its trip, so the fleet
/// keeps turning over instead of saturating.
pub fn run_single_experiment(param_set: &ParameterSet) -> ExperimentResult {
    let params = ScenarioParams::default()
        .with_drivers(param_set.num_drivers)
        .with_seed(param_set.seed);
    let mut state = build_state(&params);
    let workload = generate_workload(&sample_graph(), param_set.num_requests, param_set.seed);

    for (i, request) in workload.iter().enumerate() {
        state
            .submit_request(&request.user_id, &request.source, &request.destination)
            .expect("generated workloads have no blank fields");

        if param_set.complete_every > 0 && (i + 1) % param_set.complete_every == 0 {
            let busy = state
                .drivers()
                .into_iter()
                .find(|d| d.state == DriverState::EnRoute);
            if let Some(driver) = busy {
                state
                    .complete_ride(&driver.id)
                    .expect("driver was observed en route");
            }
        }
    }

    extract_result(workload.len(), &state.status())
}

/// Run multiple experiments in parallel.
///
/// Each experiment runs independently with no shared state. Results come
/// back in the same order as the input parameter sets.
pub fn run_parallel_experiments(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
) -> Vec<ExperimentResult> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Same as [`run_parallel_experiments`] with the progress bar optional.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Vec<ExperimentResult> {
    let bar = if show_progress && !parameter_sets.is_empty() {
        let bar = ProgressBar::new(parameter_sets.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("sweep [{elapsed_precise}] {bar:32} {pos}/{len} runs ({eta})")
                .expect("static template parses")
                .progress_chars("=> "),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build().expect("rayon pool must build");

    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_experiment(param_set);
                bar.inc(1);
                result
            })
            .collect()
    });
    bar.finish();

    results
}
