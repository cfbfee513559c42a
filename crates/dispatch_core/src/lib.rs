pub mod ecs;
pub mod graph;
pub mod ids;
pub mod matching;
pub mod routing;
pub mod scenario;
pub mod simulation;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
