//! Per-vehicle and fleet-wide route metrics.

use std::fmt;

use serde::Serialize;

use crate::cache::PathCache;
use crate::error::Result;
use crate::tour::tour_distance;
use crate::traffic::Hour;

/// A vehicle's closed tour and its distance for the hour it was solved at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteInfo {
    pub vehicle_id: usize,
    pub tour: Vec<String>,
    pub total_distance: f64,
    pub hour: Hour,
}

impl RouteInfo {
    /// Mandatory stops visited, the depot at either end excluded.
    pub fn stop_count(&self) -> usize {
        self.tour.len().saturating_sub(2)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteEvaluator<'a> {
    cache: &'a PathCache,
}

impl<'a> RouteEvaluator<'a> {
    pub fn new(cache: &'a PathCache) -> Self {
        Self { cache }
    }

    /// Scores `tour`; a missing cached pair is an error, never infinity.
    pub fn evaluate_route(
        &self,
        vehicle_id: usize,
        tour: Vec<String>,
        hour: Hour,
    ) -> Result<RouteInfo> {
        let total_distance = tour_distance(self.cache, &tour)?;
        Ok(RouteInfo {
            vehicle_id,
            tour,
            total_distance,
            hour,
        })
    }
}

/// Longest single tour, zero for an empty fleet.
pub fn makespan(routes: &[RouteInfo]) -> f64 {
    routes
        .iter()
        .map(|route| route.total_distance)
        .fold(0.0, f64::max)
}

pub fn total_distance(routes: &[RouteInfo]) -> f64 {
    routes.iter().map(|route| route.total_distance).sum()
}

/// Longest over shortest tour distance.
///
/// An empty fleet, or one where nobody travels, is balanced (1.0). A fleet
/// where one vehicle stays home while another travels is infinitely
/// imbalanced.
pub fn imbalance_ratio(routes: &[RouteInfo]) -> f64 {
    if routes.is_empty() {
        return 1.0;
    }
    let max = makespan(routes);
    let min = routes
        .iter()
        .map(|route| route.total_distance)
        .fold(f64::INFINITY, f64::min);

    if min == 0.0 {
        return if max > 0.0 { f64::INFINITY } else { 1.0 };
    }
    max / min
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FleetMetrics {
    pub makespan: f64,
    pub total_distance: f64,
    pub imbalance_ratio: f64,
}

impl FleetMetrics {
    pub fn from_routes(routes: &[RouteInfo]) -> Self {
        Self {
            makespan: makespan(routes),
            total_distance: total_distance(routes),
            imbalance_ratio: imbalance_ratio(routes),
        }
    }

    pub fn is_balanced(&self, threshold: f64) -> bool {
        self.imbalance_ratio <= threshold
    }
}

/// Fleet summary for presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub metrics: FleetMetrics,
    pub threshold: f64,
    pub vehicles: Vec<VehicleSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleSummary {
    pub vehicle_id: usize,
    pub distance: f64,
    pub stops: usize,
}

impl BalanceReport {
    pub fn new(routes: &[RouteInfo], threshold: f64) -> Self {
        Self {
            metrics: FleetMetrics::from_routes(routes),
            threshold,
            vehicles: routes
                .iter()
                .map(|route| VehicleSummary {
                    vehicle_id: route.vehicle_id,
                    distance: route.total_distance,
                    stops: route.stop_count(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.metrics.is_balanced(self.threshold) {
            "BALANCED"
        } else {
            "IMBALANCED"
        };
        writeln!(f, "Makespan: {:.2}", self.metrics.makespan)?;
        writeln!(f, "Total distance: {:.2}", self.metrics.total_distance)?;
        writeln!(f, "Imbalance ratio: {:.2}", self.metrics.imbalance_ratio)?;
        writeln!(f, "Status: {status}")?;
        for vehicle in &self.vehicles {
            writeln!(
                f,
                "  Vehicle {}: {:.2}, stops: {}",
                vehicle.vehicle_id, vehicle.distance, vehicle.stops
            )?;
        }
        Ok(())
    }
}
