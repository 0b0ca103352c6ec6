//! Load-aware partitioning of mandatory stops across vehicles.
//!
//! Stops are taken nearest-to-depot first. Each goes to the cluster that
//! minimises the mean cached distance to the cluster's current members plus a
//! headcount penalty scaled by the penalty weight. Equal costs go to the
//! lowest vehicle id.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::cache::PathCache;
use crate::error::{PlannerError, Result};

pub const DEFAULT_PENALTY_WEIGHT: f64 = 0.5;

/// Scale of the headcount term relative to distance units.
pub const BALANCE_SCALE: f64 = 1000.0;

/// The stops one vehicle must visit, anchored at the depot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub vehicle_id: usize,
    pub depot: String,
    stops: BTreeSet<String>,
    /// Sum of depot-to-stop distances. Informational, not the tour length.
    pub total_distance: f64,
}

impl Cluster {
    pub fn new(vehicle_id: usize, depot: impl Into<String>) -> Self {
        Self {
            vehicle_id,
            depot: depot.into(),
            stops: BTreeSet::new(),
            total_distance: 0.0,
        }
    }

    /// Adds a stop; the depot and duplicates are ignored.
    pub fn add_stop(&mut self, stop: impl Into<String>) -> bool {
        let stop = stop.into();
        if stop == self.depot {
            return false;
        }
        self.stops.insert(stop)
    }

    pub fn remove_stop(&mut self, stop: &str) -> bool {
        self.stops.remove(stop)
    }

    /// Assigned stops in id order.
    pub fn stops(&self) -> impl Iterator<Item = &String> {
        self.stops.iter()
    }

    /// Depot followed by the assigned stops.
    pub fn all_nodes(&self) -> Vec<String> {
        std::iter::once(self.depot.clone())
            .chain(self.stops.iter().cloned())
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn contains(&self, stop: &str) -> bool {
        self.stops.contains(stop)
    }

    pub(crate) fn refresh_distance(&mut self, cache: &PathCache) -> Result<()> {
        self.total_distance = self
            .stops
            .iter()
            .map(|stop| cache.distance(&self.depot, stop))
            .sum::<Result<f64>>()?;
        Ok(())
    }
}

/// Rejects vehicle counts and stop sets the assigner cannot partition.
pub fn validate_assignment(stop_count: usize, vehicle_count: usize) -> Result<()> {
    if vehicle_count == 0 {
        return Err(PlannerError::InvalidVehicleCount);
    }
    if stop_count == 0 {
        return Err(PlannerError::NoStops);
    }
    if vehicle_count > stop_count {
        return Err(PlannerError::TooManyVehicles {
            vehicles: vehicle_count,
            stops: stop_count,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct GreedyBalancedAssigner<'a> {
    cache: &'a PathCache,
    /// 0.0 favours compact clusters, 1.0 favours equal headcount.
    penalty_weight: f64,
}

impl<'a> GreedyBalancedAssigner<'a> {
    pub fn new(cache: &'a PathCache) -> Self {
        Self {
            cache,
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
        }
    }

    pub fn with_penalty_weight(cache: &'a PathCache, penalty_weight: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&penalty_weight) {
            return Err(PlannerError::InvalidPenaltyWeight(penalty_weight));
        }
        Ok(Self {
            cache,
            penalty_weight,
        })
    }

    /// Partitions `stops` into exactly `vehicle_count` clusters at `depot`.
    pub fn assign(
        &self,
        stops: &[String],
        depot: &str,
        vehicle_count: usize,
    ) -> Result<Vec<Cluster>> {
        let unique: BTreeSet<&str> = stops
            .iter()
            .map(String::as_str)
            .filter(|stop| *stop != depot)
            .collect();
        validate_assignment(unique.len(), vehicle_count)?;

        let mut clusters: Vec<Cluster> = (0..vehicle_count)
            .map(|vehicle_id| Cluster::new(vehicle_id, depot))
            .collect();

        let mut ordered = unique
            .into_iter()
            .map(|stop| self.cache.distance(depot, stop).map(|distance| (stop, distance)))
            .collect::<Result<Vec<(&str, f64)>>>()?;
        // Stable sort keeps id order among equidistant stops.
        ordered.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (stop, _) in ordered {
            let largest = clusters.iter().map(Cluster::stop_count).max().unwrap_or(0);

            let mut best: Option<(usize, f64)> = None;
            for (idx, cluster) in clusters.iter().enumerate() {
                let cost = self.distance_cost(cluster, stop)?
                    + self.penalty_weight * balance_cost(cluster, largest);
                if best.is_none_or(|(_, lowest)| cost < lowest) {
                    best = Some((idx, cost));
                }
            }

            if let Some((idx, _)) = best {
                clusters[idx].add_stop(stop);
            }
        }

        for cluster in &mut clusters {
            cluster.refresh_distance(self.cache)?;
        }
        Ok(clusters)
    }

    /// Mean cached distance from `stop` to the cluster's assigned stops,
    /// zero while the cluster is still empty.
    fn distance_cost(&self, cluster: &Cluster, stop: &str) -> Result<f64> {
        if cluster.is_empty() {
            return Ok(0.0);
        }
        let total = cluster
            .stops()
            .map(|member| self.cache.distance(member, stop))
            .sum::<Result<f64>>()?;
        Ok(total / cluster.stop_count() as f64)
    }
}

fn balance_cost(cluster: &Cluster, largest: usize) -> f64 {
    if largest == 0 {
        return 0.0;
    }
    cluster.stop_count() as f64 / largest as f64 * BALANCE_SCALE
}
