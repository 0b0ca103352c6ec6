//! Time-dependent shortest path search.
//!
//! Edge weight is the link's base distance times its multiplier at the query
//! hour. Stale heap entries are skipped on pop instead of decreasing keys.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::error::{PlannerError, Result};
use crate::graph::Graph;
use crate::path::Path;
use crate::traffic::{Hour, validate_hour};
use crate::traits::TrafficStore;

#[derive(Debug, Clone)]
struct HeapItem<'g> {
    node: &'g str,
    distance: f64,
}

impl PartialEq for HeapItem<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem<'_> {}

impl PartialOrd for HeapItem<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip distance to make this a min-heap
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(self.node))
    }
}

pub struct ShortestPath<'a, T: TrafficStore> {
    graph: &'a Graph,
    traffic: &'a T,
}

impl<'a, T: TrafficStore> ShortestPath<'a, T> {
    pub fn new(graph: &'a Graph, traffic: &'a T) -> Self {
        Self { graph, traffic }
    }

    fn effective_weight(&self, link_id: &str, distance: f64, hour: Hour) -> Result<f64> {
        let multiplier =
            self.traffic
                .multiplier(link_id, hour)
                .ok_or_else(|| PlannerError::MissingTraffic {
                    link: link_id.to_string(),
                    hour,
                })?;
        Ok(distance * multiplier)
    }

    /// Least effective-distance path from `source` to `target` at `hour`.
    ///
    /// Returns [`Path::unreachable`] when no route exists. Errors only on
    /// unknown endpoints, an out-of-range hour, or a link the traffic store
    /// has no multiplier for.
    pub fn find(&self, source: &str, target: &str, hour: Hour) -> Result<Path> {
        validate_hour(hour)?;
        let source = self.known(source)?;
        let target = self.known(target)?;

        if source == target {
            return Ok(Path::to_self(source));
        }

        let mut distances: HashMap<&'a str, f64> = HashMap::new();
        let mut parents: HashMap<&'a str, &'a str> = HashMap::new();
        let mut settled: HashSet<&'a str> = HashSet::new();
        let mut heap = BinaryHeap::new();

        distances.insert(source, 0.0);
        heap.push(HeapItem {
            node: source,
            distance: 0.0,
        });

        while let Some(HeapItem { node, distance }) = heap.pop() {
            if !settled.insert(node) {
                continue;
            }
            if node == target {
                break;
            }

            for edge in self.graph.neighbors(node) {
                let next = self.graph.location_at(edge).id.as_str();
                if settled.contains(next) {
                    continue;
                }

                let link = self.graph.link(edge);
                let candidate = distance + self.effective_weight(&link.id, link.distance, hour)?;
                let best = distances.get(next).copied().unwrap_or(f64::INFINITY);
                if candidate < best {
                    distances.insert(next, candidate);
                    parents.insert(next, node);
                    heap.push(HeapItem {
                        node: next,
                        distance: candidate,
                    });
                }
            }
        }

        let Some(&total) = distances.get(target) else {
            return Ok(Path::unreachable());
        };

        let mut nodes = vec![target.to_string()];
        let mut current = target;
        while let Some(&parent) = parents.get(current) {
            nodes.push(parent.to_string());
            current = parent;
        }
        nodes.reverse();

        Ok(Path::new(nodes, total))
    }

    fn known(&self, id: &str) -> Result<&'a str> {
        self.graph
            .location(id)
            .map(|location| location.id.as_str())
            .ok_or_else(|| PlannerError::UnknownLocation(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, Location};
    use crate::traffic::{HOURS_PER_DAY, LinkTraffic};

    fn network() -> Graph {
        let mut graph = Graph::new();
        for id in ["N1", "N2", "N3", "N4", "N5", "N6"] {
            graph.add_location(Location::new(id));
        }
        let links = [
            ("E1", "N1", "N2", 2.0),
            ("E2", "N2", "N3", 3.0),
            ("E3", "N1", "N4", 4.0),
            ("E4", "N3", "N5", 2.0),
            ("E5", "N4", "N5", 5.0),
        ];
        for (id, from, to, distance) in links {
            graph
                .add_link(Link::new(id, from, to, distance, [1.0; HOURS_PER_DAY]))
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_shortest_path_n1_to_n5() {
        let graph = network();
        let traffic = LinkTraffic::from_graph(&graph);
        let path = ShortestPath::new(&graph, &traffic).find("N1", "N5", 0).unwrap();
        assert_eq!(path.nodes(), ["N1", "N2", "N3", "N5"]);
        assert!((path.distance() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_path() {
        let graph = network();
        let traffic = LinkTraffic::from_graph(&graph);
        let path = ShortestPath::new(&graph, &traffic).find("N3", "N3", 5).unwrap();
        assert_eq!(path.nodes(), ["N3"]);
        assert_eq!(path.distance(), 0.0);
    }

    #[test]
    fn test_unreachable_target() {
        let graph = network();
        let traffic = LinkTraffic::from_graph(&graph);
        let path = ShortestPath::new(&graph, &traffic).find("N1", "N6", 0).unwrap();
        assert!(!path.is_reachable());
        assert!(path.nodes().is_empty());
        assert!(path.distance().is_infinite());
    }

    #[test]
    fn test_traffic_changes_route() {
        let graph = network();
        let mut traffic = LinkTraffic::from_graph(&graph);
        let mut rush = [1.0; HOURS_PER_DAY];
        rush[8] = 3.0;
        traffic.set_table("E2", rush);

        let search = ShortestPath::new(&graph, &traffic);
        let morning = search.find("N1", "N5", 8).unwrap();
        // N1-N2-N3-N5 costs 2 + 9 + 2 = 13 at 08:00, N1-N4-N5 costs 9
        assert_eq!(morning.nodes(), ["N1", "N4", "N5"]);
        assert!((morning.distance() - 9.0).abs() < 1e-9);

        let night = search.find("N1", "N5", 2).unwrap();
        assert!((night.distance() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_distances() {
        let graph = network();
        let traffic = LinkTraffic::from_graph(&graph);
        let search = ShortestPath::new(&graph, &traffic);
        let forward = search.find("N4", "N3", 0).unwrap();
        let backward = search.find("N3", "N4", 0).unwrap();
        assert!((forward.distance() - backward.distance()).abs() < 1e-9);
    }

    #[test]
    fn test_errors() {
        let graph = network();
        let traffic = LinkTraffic::from_graph(&graph);
        let search = ShortestPath::new(&graph, &traffic);
        assert_eq!(
            search.find("N1", "N9", 0).unwrap_err(),
            PlannerError::UnknownLocation("N9".to_string())
        );
        assert_eq!(
            search.find("N1", "N5", 24).unwrap_err(),
            PlannerError::InvalidHour(24)
        );

        let empty = LinkTraffic::default();
        let err = ShortestPath::new(&graph, &empty).find("N1", "N5", 0).unwrap_err();
        assert!(matches!(err, PlannerError::MissingTraffic { hour: 0, .. }));
    }
}
