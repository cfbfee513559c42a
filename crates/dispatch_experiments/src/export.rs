//! Result export utilities.
//!
//! Writes sweep results to CSV (one row per run, parameters joined by
//! index) or JSON (the raw result array).

use std::fs::File;
use std::path::Path;

use crate::metrics::ExperimentResult;
use crate::parameters::ParameterSet;

/// Export results with their parameters to CSV.
///
/// Results and parameter sets are paired by index; mismatched lengths are
/// an error.
pub fn export_to_csv(
    results: &[ExperimentResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.len() != parameter_sets.len() {
        return Err(format!(
            "Results length ({}) doesn't match parameter_sets length ({})",
            results.len(),
            parameter_sets.len()
        )
        .into());
    }
    if results.is_empty() {
        return Err("No results to export".into());
    }

    let file = File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "run_id",
        "num_drivers",
        "num_requests",
        "complete_every",
        "seed",
        "assigned",
        "pooled",
        "completed",
        "still_pending",
        "match_rate",
        "avg_match_distance",
    ])?;

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        wtr.write_record([
            param_set.run_id.to_string(),
            param_set.num_drivers.to_string(),
            param_set.num_requests.to_string(),
            param_set.complete_every.to_string(),
            param_set.seed.to_string(),
            result.assigned.to_string(),
            result.pooled.to_string(),
            result.completed.to_string(),
            result.still_pending.to_string(),
            result.match_rate.to_string(),
            result.avg_match_distance.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Export the raw result array as pretty-printed JSON.
pub fn export_to_json(
    results: &[ExperimentResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, results)?;
    Ok(())
}
