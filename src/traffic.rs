//! Hour-of-day traffic multipliers.

use std::collections::HashMap;

use crate::error::{PlannerError, Result};
use crate::graph::Graph;
use crate::traits::TrafficStore;

/// Hour of day, `0..HOURS_PER_DAY`.
pub type Hour = usize;

pub const HOURS_PER_DAY: usize = 24;

/// One multiplier per hour of day.
pub type TrafficTable = [f64; HOURS_PER_DAY];

pub fn validate_hour(hour: Hour) -> Result<Hour> {
    if hour < HOURS_PER_DAY {
        Ok(hour)
    } else {
        Err(PlannerError::InvalidHour(hour))
    }
}

/// Traffic store backed by the multiplier tables carried on each link.
#[derive(Debug, Clone, Default)]
pub struct LinkTraffic {
    tables: HashMap<String, TrafficTable>,
}

impl LinkTraffic {
    pub fn from_graph(graph: &Graph) -> Self {
        let tables = graph
            .links()
            .iter()
            .map(|link| (link.id.clone(), link.traffic))
            .collect();
        Self { tables }
    }

    /// Overrides one link's table, e.g. with a live feed.
    pub fn set_table(&mut self, link_id: impl Into<String>, table: TrafficTable) {
        self.tables.insert(link_id.into(), table);
    }
}

impl TrafficStore for LinkTraffic {
    fn multiplier(&self, link_id: &str, hour: Hour) -> Option<f64> {
        self.tables
            .get(link_id)
            .and_then(|table| table.get(hour).copied())
    }

    fn multipliers_for_hour(&self, hour: Hour) -> HashMap<String, f64> {
        self.tables
            .iter()
            .filter_map(|(id, table)| table.get(hour).map(|value| (id.clone(), *value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, Location};

    fn two_node_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_location(Location::new("A"));
        graph.add_location(Location::new("B"));
        let mut table = [1.0; HOURS_PER_DAY];
        table[8] = 2.5;
        graph
            .add_link(Link::new("L1", "A", "B", 4.0, table))
            .unwrap();
        graph
    }

    #[test]
    fn test_validate_hour() {
        assert_eq!(validate_hour(0), Ok(0));
        assert_eq!(validate_hour(23), Ok(23));
        assert_eq!(validate_hour(24), Err(PlannerError::InvalidHour(24)));
    }

    #[test]
    fn test_multiplier_from_link_table() {
        let traffic = LinkTraffic::from_graph(&two_node_graph());
        assert_eq!(traffic.multiplier("L1", 8), Some(2.5));
        assert_eq!(traffic.multiplier("L1", 9), Some(1.0));
        assert_eq!(traffic.multiplier("L1", 24), None);
        assert_eq!(traffic.multiplier("missing", 8), None);
    }

    #[test]
    fn test_snapshot_for_hour() {
        let mut traffic = LinkTraffic::from_graph(&two_node_graph());
        traffic.set_table("L2", [3.0; HOURS_PER_DAY]);
        let snapshot = traffic.multipliers_for_hour(8);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["L1"], 2.5);
        assert_eq!(snapshot["L2"], 3.0);
    }
}
