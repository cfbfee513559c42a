//! Three-tier matching engine: pooling into an active driver's route,
//! pairing with a waiting request, and nearest-idle assignment.
//!
//! Every search here is a pure function over [`DriverView`] snapshots and
//! returns a plan; the simulation applies the winning plan as one
//! transaction. The admission thresholds are deliberate greedy heuristics,
//! not a global optimum.

pub mod assign_idle;
pub mod pool_active;
pub mod pool_waiting;
pub mod types;

pub use assign_idle::assign_nearest_idle;
pub use pool_active::find_best_pool;
pub use pool_waiting::pair_with_waiting;
pub use types::{AssignPlan, DriverView, PoolPlan, WaitingPoolOutcome, WaitingPoolPlan};

/// Maximum fractional route growth a pooled insertion may cause.
pub const MAX_DETOUR_RATIO: f64 = 0.3;

/// Floor for the detour-ratio denominator, avoiding blow-up when the
/// committed route is (nearly) zero-length.
pub const MIN_BASE_DISTANCE: f64 = 0.1;

/// Source proximity gate for waiting-request pairing, in raw coordinate
/// degrees. Roughly 1.5 km at city latitudes.
pub const PICKUP_PROXIMITY_DEG: f64 = 0.015;

/// Fraction of path nodes two direct routes must share to pair riders.
pub const MIN_PATH_OVERLAP: f64 = 0.4;
