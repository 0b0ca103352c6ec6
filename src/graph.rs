//! Road network: named locations joined by bidirectional links.
//!
//! Validation of the source description (positive distances, positive
//! multipliers) belongs to whoever loads the network. The graph only checks
//! that a link's endpoints were registered first.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::traffic::{Hour, TrafficTable};

/// A named vertex of the road network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    /// Planar coordinates, only meaningful to map renderers.
    pub position: Option<(f64, f64)>,
}

impl Location {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: None,
        }
    }

    pub fn at(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            position: Some((x, y)),
        }
    }
}

/// A logical road segment between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Base distance, before traffic.
    pub distance: f64,
    pub traffic: TrafficTable,
}

impl Link {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        distance: f64,
        traffic: TrafficTable,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            distance,
            traffic,
        }
    }

    pub fn effective_distance(&self, hour: Hour) -> Option<f64> {
        self.traffic.get(hour).map(|multiplier| self.distance * multiplier)
    }
}

/// One traversal direction of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Index into [`Graph::links`].
    pub link: usize,
    /// Index of the location this edge leads to, see [`Graph::location_at`].
    target: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    locations: Vec<Location>,
    index: BTreeMap<String, usize>,
    links: Vec<Link>,
    adjacency: HashMap<usize, Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a location. Re-registering an id replaces its coordinates.
    pub fn add_location(&mut self, location: Location) {
        match self.index.get(&location.id) {
            Some(&idx) => self.locations[idx] = location,
            None => {
                self.index.insert(location.id.clone(), self.locations.len());
                self.locations.push(location);
            }
        }
    }

    /// Adds a link as two directed edges sharing its id, distance and table.
    pub fn add_link(&mut self, link: Link) -> Result<()> {
        let from = self.position_of(&link.from)?;
        let to = self.position_of(&link.to)?;
        if from == to {
            return Err(PlannerError::InvalidLink {
                id: link.id,
                reason: "link must join two distinct locations".to_string(),
            });
        }

        let link_idx = self.links.len();
        self.links.push(link);
        self.adjacency.entry(from).or_default().push(Edge {
            link: link_idx,
            target: to,
        });
        self.adjacency.entry(to).or_default().push(Edge {
            link: link_idx,
            target: from,
        });
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.index.get(id).map(|&idx| &self.locations[idx])
    }

    /// Locations in lexicographic id order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.index.values().map(|&idx| &self.locations[idx])
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link(&self, edge: &Edge) -> &Link {
        &self.links[edge.link]
    }

    pub fn location_at(&self, edge: &Edge) -> &Location {
        &self.locations[edge.target]
    }

    /// Outgoing edges of `id`; empty for isolated or unknown locations.
    pub fn neighbors(&self, id: &str) -> &[Edge] {
        self.index
            .get(id)
            .and_then(|idx| self.adjacency.get(idx))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn position_of(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| PlannerError::UnknownLocation(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::HOURS_PER_DAY;

    fn uniform() -> TrafficTable {
        [1.0; HOURS_PER_DAY]
    }

    #[test]
    fn test_link_creates_edges_both_ways() {
        let mut graph = Graph::new();
        graph.add_location(Location::new("A"));
        graph.add_location(Location::new("B"));
        graph.add_link(Link::new("L1", "A", "B", 3.0, uniform())).unwrap();

        let forward = graph.neighbors("A");
        let backward = graph.neighbors("B");
        assert_eq!(forward.len(), 1);
        assert_eq!(backward.len(), 1);
        assert_eq!(graph.location_at(&forward[0]).id, "B");
        assert_eq!(graph.location_at(&backward[0]).id, "A");
        assert_eq!(graph.link(&forward[0]).id, graph.link(&backward[0]).id);
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let mut graph = Graph::new();
        graph.add_location(Location::new("A"));
        let err = graph
            .add_link(Link::new("L1", "A", "Z", 3.0, uniform()))
            .unwrap_err();
        assert_eq!(err, PlannerError::UnknownLocation("Z".to_string()));
        assert!(graph.links().is_empty());
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut graph = Graph::new();
        graph.add_location(Location::new("A"));
        let err = graph
            .add_link(Link::new("L1", "A", "A", 1.0, uniform()))
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidLink { .. }));
    }

    #[test]
    fn test_isolated_location_has_no_neighbors() {
        let mut graph = Graph::new();
        graph.add_location(Location::at("A", 1.0, 2.0));
        assert!(graph.neighbors("A").is_empty());
        assert!(graph.neighbors("missing").is_empty());
        assert_eq!(graph.location("A").unwrap().position, Some((1.0, 2.0)));
    }

    #[test]
    fn test_locations_sorted_by_id() {
        let mut graph = Graph::new();
        for id in ["N3", "N1", "N2"] {
            graph.add_location(Location::new(id));
        }
        let ids: Vec<&str> = graph.locations().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["N1", "N2", "N3"]);
    }

    #[test]
    fn test_effective_distance() {
        let mut table = uniform();
        table[17] = 1.5;
        let link = Link::new("L1", "A", "B", 4.0, table);
        assert_eq!(link.effective_distance(17), Some(6.0));
        assert_eq!(link.effective_distance(3), Some(4.0));
        assert_eq!(link.effective_distance(24), None);
    }
}
