//! Expansion of waypoint tours into node-by-node routes.

use serde::Serialize;

use crate::cache::PathCache;
use crate::error::Result;
use crate::evaluator::RouteInfo;
use crate::traffic::Hour;

/// One waypoint-to-waypoint hop and the road nodes it passes through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub from: String,
    pub to: String,
    pub nodes: Vec<String>,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedRoute {
    pub vehicle_id: usize,
    /// Depot and mandatory stops in visiting order.
    pub waypoints: Vec<String>,
    /// Every road node traversed, junctions listed once.
    pub full_path: Vec<String>,
    pub segments: Vec<RouteSegment>,
    pub total_distance: f64,
    pub hour: Hour,
}

impl DetailedRoute {
    pub fn node_count(&self) -> usize {
        self.full_path.len()
    }

    pub fn segment_distance(&self) -> f64 {
        self.segments.iter().map(|segment| segment.distance).sum()
    }

    /// Turn-by-turn lines, one per segment.
    pub fn directions(&self) -> Vec<String> {
        self.segments
            .iter()
            .enumerate()
            .map(|(step, segment)| {
                format!(
                    "{}. {} to {} ({:.2}) via {}",
                    step + 1,
                    segment.from,
                    segment.to,
                    segment.distance,
                    segment.nodes.join(" -> ")
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteExpander<'a> {
    cache: &'a PathCache,
}

impl<'a> RouteExpander<'a> {
    pub fn new(cache: &'a PathCache) -> Self {
        Self { cache }
    }

    /// Concatenates the cached path of every consecutive waypoint pair.
    pub fn expand(&self, route: &RouteInfo) -> Result<DetailedRoute> {
        let mut full_path: Vec<String> = Vec::new();
        let mut segments = Vec::with_capacity(route.tour.len().saturating_sub(1));

        for pair in route.tour.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let path = self.cache.require(from, to)?;

            let nodes = path.nodes();
            let skip = match (full_path.last(), nodes.first()) {
                (Some(last), Some(first)) if last == first => 1,
                _ => 0,
            };
            full_path.extend(nodes[skip..].iter().cloned());

            segments.push(RouteSegment {
                from: from.clone(),
                to: to.clone(),
                nodes: nodes.to_vec(),
                distance: path.distance(),
            });
        }

        if full_path.is_empty() {
            full_path = route.tour.clone();
        }

        Ok(DetailedRoute {
            vehicle_id: route.vehicle_id,
            waypoints: route.tour.clone(),
            full_path,
            segments,
            total_distance: route.total_distance,
            hour: route.hour,
        })
    }

    pub fn expand_all(&self, routes: &[RouteInfo]) -> Result<Vec<DetailedRoute>> {
        routes.iter().map(|route| self.expand(route)).collect()
    }
}
