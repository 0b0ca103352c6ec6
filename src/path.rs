//! Shortest-path results.

use serde::{Deserialize, Serialize};

/// An ordered walk between two locations with its effective distance for one
/// hour. An empty walk with infinite distance marks an unreachable target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    nodes: Vec<String>,
    distance: f64,
}

impl Path {
    pub fn new(nodes: Vec<String>, distance: f64) -> Self {
        Self { nodes, distance }
    }

    /// Zero-length path from a location to itself.
    pub fn to_self(id: impl Into<String>) -> Self {
        Self {
            nodes: vec![id.into()],
            distance: 0.0,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            nodes: Vec::new(),
            distance: f64::INFINITY,
        }
    }

    pub fn is_reachable(&self) -> bool {
        !self.nodes.is_empty() && self.distance.is_finite()
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn start(&self) -> Option<&str> {
        self.nodes.first().map(String::as_str)
    }

    pub fn end(&self) -> Option<&str> {
        self.nodes.last().map(String::as_str)
    }

    /// Same walk traversed backwards; links are symmetric so the distance holds.
    pub fn reversed(&self) -> Self {
        Self {
            nodes: self.nodes.iter().rev().cloned().collect(),
            distance: self.distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_reversed_keeps_distance() {
        let path = Path::new(nodes(&["N1", "N2", "N3"]), 5.0);
        let back = path.reversed();
        assert_eq!(back.nodes(), nodes(&["N3", "N2", "N1"]).as_slice());
        assert_eq!(back.distance(), 5.0);
        assert_eq!(back.reversed(), path);
    }

    #[test]
    fn test_self_path() {
        let path = Path::to_self("N1");
        assert!(path.is_reachable());
        assert_eq!(path.nodes(), nodes(&["N1"]).as_slice());
        assert_eq!(path.distance(), 0.0);
        assert_eq!(path.start(), path.end());
    }

    #[test]
    fn test_unreachable() {
        let path = Path::unreachable();
        assert!(!path.is_reachable());
        assert!(path.nodes().is_empty());
        assert!(path.distance().is_infinite());
        assert_eq!(path.start(), None);
    }
}
