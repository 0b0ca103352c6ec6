//! Greedy rebalancing of stops between vehicles.
//!
//! Each step moves one stop from the longest tour's cluster to the shortest
//! tour's cluster and re-solves every tour from scratch. A step is kept only
//! if it strictly lowers the imbalance ratio; the first step that does not
//! ends the search. There is no backtracking.

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::PathCache;
use crate::cluster::Cluster;
use crate::error::{PlannerError, Result};
use crate::evaluator::{RouteEvaluator, RouteInfo, imbalance_ratio};
use crate::traffic::Hour;
use crate::traits::TourSolver;

pub const DEFAULT_IMBALANCE_THRESHOLD: f64 = 1.3;
pub const DEFAULT_REBALANCE_ITERATIONS: usize = 10;

/// Why rebalancing stopped. None of these are failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RebalanceStatus {
    /// The initial configuration was already within the threshold.
    AlreadyBalanced,
    /// A move brought the ratio within the threshold.
    Balanced,
    IterationLimit,
    /// The last attempted move did not lower the ratio, or there was no
    /// move to attempt.
    NoImprovement,
}

#[derive(Debug, Clone, Serialize)]
pub struct RebalanceOutcome {
    pub clusters: Vec<Cluster>,
    pub routes: Vec<RouteInfo>,
    pub imbalance_ratio: f64,
    /// Moves attempted, accepted or not.
    pub iterations: usize,
    pub status: RebalanceStatus,
}

pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if threshold.is_finite() && threshold >= 1.0 {
        Ok(threshold)
    } else {
        Err(PlannerError::InvalidThreshold(threshold))
    }
}

pub struct LoadBalancer<'a, S> {
    cache: &'a PathCache,
    solver: S,
    threshold: f64,
    max_iterations: usize,
}

impl<'a, S: TourSolver> LoadBalancer<'a, S> {
    pub fn new(cache: &'a PathCache, solver: S) -> Self {
        Self {
            cache,
            solver,
            threshold: DEFAULT_IMBALANCE_THRESHOLD,
            max_iterations: DEFAULT_REBALANCE_ITERATIONS,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        self.threshold = validate_threshold(threshold)?;
        Ok(self)
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Solves and scores one closed tour per cluster, in cluster order.
    pub fn solve_routes(
        &self,
        clusters: &[Cluster],
        depot: &str,
        hour: Hour,
    ) -> Result<Vec<RouteInfo>> {
        let evaluator = RouteEvaluator::new(self.cache);
        clusters
            .iter()
            .map(|cluster| {
                let tour = self.solver.solve(&cluster.all_nodes(), depot)?;
                evaluator.evaluate_route(cluster.vehicle_id, tour, hour)
            })
            .collect()
    }

    pub fn rebalance(
        &self,
        clusters: Vec<Cluster>,
        depot: &str,
        hour: Hour,
    ) -> Result<RebalanceOutcome> {
        let mut best_clusters = clusters;
        let mut best_routes = self.solve_routes(&best_clusters, depot, hour)?;
        let mut best_ratio = imbalance_ratio(&best_routes);
        let mut iterations = 0;

        debug!(imbalance = best_ratio, threshold = self.threshold, "initial imbalance");

        let status = if best_ratio <= self.threshold {
            RebalanceStatus::AlreadyBalanced
        } else {
            loop {
                if iterations >= self.max_iterations {
                    break RebalanceStatus::IterationLimit;
                }

                let (longest, shortest) = extremes(&best_routes);
                // Stops iterate in id order, so the smallest id moves.
                let stop = match best_clusters[longest].stops().next() {
                    Some(stop) if longest != shortest => stop.clone(),
                    _ => break RebalanceStatus::NoImprovement,
                };

                let mut candidate = best_clusters.clone();
                candidate[longest].remove_stop(&stop);
                candidate[shortest].add_stop(stop.as_str());
                iterations += 1;

                let routes = self.solve_routes(&candidate, depot, hour)?;
                let ratio = imbalance_ratio(&routes);
                debug!(
                    iteration = iterations,
                    imbalance = ratio,
                    stop = %stop,
                    from = best_clusters[longest].vehicle_id,
                    to = best_clusters[shortest].vehicle_id,
                    "attempted move"
                );

                if ratio >= best_ratio {
                    break RebalanceStatus::NoImprovement;
                }

                best_clusters = candidate;
                best_routes = routes;
                best_ratio = ratio;
                if best_ratio <= self.threshold {
                    break RebalanceStatus::Balanced;
                }
            }
        };

        for cluster in &mut best_clusters {
            cluster.refresh_distance(self.cache)?;
        }

        info!(?status, iterations, imbalance = best_ratio, "rebalancing finished");
        Ok(RebalanceOutcome {
            clusters: best_clusters,
            routes: best_routes,
            imbalance_ratio: best_ratio,
            iterations,
            status,
        })
    }
}

/// Positions of the first longest and first shortest route.
fn extremes(routes: &[RouteInfo]) -> (usize, usize) {
    let mut longest = 0;
    let mut shortest = 0;
    for (idx, route) in routes.iter().enumerate() {
        if route.total_distance > routes[longest].total_distance {
            longest = idx;
        }
        if route.total_distance < routes[shortest].total_distance {
            shortest = idx;
        }
    }
    (longest, shortest)
}
