//! fleet-tour-planner
//!
//! Time-dependent multi-vehicle tour planning over a weighted road network.
//! Link distances scale with an hour-of-day traffic multiplier; stops are
//! split across vehicles, each vehicle gets a closed tour from the depot, and
//! tours are rebalanced until no vehicle carries far more than another.

pub mod traits;
pub mod error;
pub mod traffic;
pub mod graph;
pub mod path;
pub mod dijkstra;
pub mod cache;
pub mod tour;
pub mod cluster;
pub mod evaluator;
pub mod balancer;
pub mod expander;
pub mod solver;

pub use error::{PlannerError, Result};
pub use graph::{Graph, Link, Location};
pub use solver::{PlanRequest, PlannerResult, SolveOptions, solve, solve_across_hours};
pub use traffic::{HOURS_PER_DAY, Hour, LinkTraffic};
pub use traits::{TourSolver, TrafficStore};
