//! Planning pipeline.
//!
//! cache -> assignment -> tours -> evaluation -> optional rebalancing ->
//! expansion, all for a single hour and a single request.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::balancer::{
    DEFAULT_IMBALANCE_THRESHOLD, DEFAULT_REBALANCE_ITERATIONS, LoadBalancer, RebalanceStatus,
    validate_threshold,
};
use crate::cache::build_cache;
use crate::cluster::{Cluster, DEFAULT_PENALTY_WEIGHT, GreedyBalancedAssigner, validate_assignment};
use crate::error::{PlannerError, Result};
use crate::evaluator::{BalanceReport, FleetMetrics, RouteInfo};
use crate::expander::{DetailedRoute, RouteExpander};
use crate::graph::Graph;
use crate::tour::{DEFAULT_TWO_OPT_ITERATIONS, NearestNeighbor, TwoOpt};
use crate::traffic::{Hour, validate_hour};
use crate::traits::TrafficStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Trade-off between compact clusters (0.0) and equal headcount (1.0).
    pub penalty_weight: f64,
    /// Largest acceptable longest/shortest tour ratio.
    pub imbalance_threshold: f64,
    /// Maximum improving 2-opt moves per tour.
    pub two_opt_max_iterations: usize,
    /// Maximum stop moves attempted by the load balancer.
    pub rebalance_max_iterations: usize,
    pub rebalance: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
            imbalance_threshold: DEFAULT_IMBALANCE_THRESHOLD,
            two_opt_max_iterations: DEFAULT_TWO_OPT_ITERATIONS,
            rebalance_max_iterations: DEFAULT_REBALANCE_ITERATIONS,
            rebalance: true,
        }
    }
}

impl SolveOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.penalty_weight) {
            return Err(PlannerError::InvalidPenaltyWeight(self.penalty_weight));
        }
        validate_threshold(self.imbalance_threshold)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub depot: String,
    pub stops: Vec<String>,
    pub vehicle_count: usize,
    pub hour: Hour,
}

impl PlanRequest {
    pub fn new(
        depot: impl Into<String>,
        stops: impl IntoIterator<Item = impl Into<String>>,
        vehicle_count: usize,
        hour: Hour,
    ) -> Self {
        Self {
            depot: depot.into(),
            stops: stops.into_iter().map(Into::into).collect(),
            vehicle_count,
            hour,
        }
    }

    pub fn at_hour(&self, hour: Hour) -> Self {
        Self {
            hour,
            ..self.clone()
        }
    }

    /// Depot followed by the stops, without repeats.
    fn waypoints(&self) -> Vec<String> {
        let mut waypoints = vec![self.depot.clone()];
        for stop in &self.stops {
            if !waypoints.contains(stop) {
                waypoints.push(stop.clone());
            }
        }
        waypoints
    }

    fn distinct_stops(&self) -> usize {
        self.waypoints().len() - 1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannerResult {
    pub hour: Hour,
    pub clusters: Vec<Cluster>,
    pub routes: Vec<RouteInfo>,
    pub detailed_routes: Vec<DetailedRoute>,
    pub metrics: FleetMetrics,
    /// Set when rebalancing ran.
    pub rebalance: Option<RebalanceStatus>,
}

impl PlannerResult {
    pub fn report(&self, threshold: f64) -> BalanceReport {
        BalanceReport::new(&self.routes, threshold)
    }
}

/// Plans one request against `graph` using `traffic` for link multipliers.
pub fn solve<T: TrafficStore>(
    graph: &Graph,
    traffic: &T,
    request: &PlanRequest,
    options: &SolveOptions,
) -> Result<PlannerResult> {
    options.validate()?;
    validate_hour(request.hour)?;
    validate_assignment(request.distinct_stops(), request.vehicle_count)?;

    let hour = request.hour;
    let depot = request.depot.as_str();
    let cache = build_cache(graph, traffic, &request.waypoints(), hour)?;

    let assigner = GreedyBalancedAssigner::with_penalty_weight(&cache, options.penalty_weight)?;
    let clusters = assigner.assign(&request.stops, depot, request.vehicle_count)?;
    debug!(
        sizes = ?clusters.iter().map(Cluster::stop_count).collect::<Vec<_>>(),
        "assigned stops"
    );

    let solver = TwoOpt::with_max_iterations(
        &cache,
        NearestNeighbor::new(&cache),
        options.two_opt_max_iterations,
    );
    let balancer = LoadBalancer::new(&cache, solver)
        .with_threshold(options.imbalance_threshold)?
        .with_max_iterations(options.rebalance_max_iterations);

    let (clusters, routes, rebalance) = if options.rebalance {
        let outcome = balancer.rebalance(clusters, depot, hour)?;
        (outcome.clusters, outcome.routes, Some(outcome.status))
    } else {
        let routes = balancer.solve_routes(&clusters, depot, hour)?;
        (clusters, routes, None)
    };

    let detailed_routes = RouteExpander::new(&cache).expand_all(&routes)?;
    let metrics = FleetMetrics::from_routes(&routes);

    info!(
        hour,
        vehicles = routes.len(),
        makespan = metrics.makespan,
        total = metrics.total_distance,
        imbalance = metrics.imbalance_ratio,
        "planned fleet tours"
    );

    Ok(PlannerResult {
        hour,
        clusters,
        routes,
        detailed_routes,
        metrics,
        rebalance,
    })
}

/// Plans the same request at several hours. Each hour builds its own cache
/// and runs as an independent request; results keep the order of `hours`.
pub fn solve_across_hours<T>(
    graph: &Graph,
    traffic: &T,
    request: &PlanRequest,
    hours: &[Hour],
    options: &SolveOptions,
) -> Vec<Result<PlannerResult>>
where
    T: TrafficStore + Sync,
{
    hours
        .par_iter()
        .map(|&hour| solve(graph, traffic, &request.at_hour(hour), options))
        .collect()
}
