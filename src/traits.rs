//! Core seams of the planner.
//!
//! These are intentionally minimal. Front ends can plug in their own traffic
//! feeds or tour heuristics without touching the pipeline.

use std::collections::HashMap;

use crate::error::Result;
use crate::traffic::Hour;

/// Provides hour-of-day traffic multipliers per link.
pub trait TrafficStore {
    /// Multiplier applied to the link's base distance at `hour`.
    fn multiplier(&self, link_id: &str, hour: Hour) -> Option<f64>;

    /// Snapshot of every known link's multiplier at `hour`.
    fn multipliers_for_hour(&self, hour: Hour) -> HashMap<String, f64>;
}

/// Builds and scores closed tours over cached distances.
///
/// A tour starts and ends at the depot. Implementations compose: an
/// improvement heuristic wraps a construction heuristic.
pub trait TourSolver {
    /// Produces a closed tour from `depot` visiting every entry of `stops`.
    /// The depot may appear in `stops`; it is not visited twice.
    fn solve(&self, stops: &[String], depot: &str) -> Result<Vec<String>>;

    /// Sum of cached distances between consecutive tour positions.
    fn score(&self, tour: &[String]) -> Result<f64>;
}
