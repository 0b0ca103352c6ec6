//! Pairwise path cache for one hour.
//!
//! Every downstream stage reads distances from here. A missing pair is a hard
//! error: either the pair was unreachable or the cache was built for another
//! node set.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::dijkstra::ShortestPath;
use crate::error::{PlannerError, Result};
use crate::graph::Graph;
use crate::path::Path;
use crate::traffic::{Hour, validate_hour};
use crate::traits::TrafficStore;

#[derive(Debug, Clone, Default)]
pub struct PathCache {
    paths: HashMap<String, HashMap<String, Path>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `path` for `(from, to)` and its reverse for `(to, from)`.
    pub fn insert(&mut self, from: &str, to: &str, path: Path) {
        let reversed = path.reversed();
        self.paths
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string(), reversed);
        self.paths
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), path);
    }

    pub fn get(&self, from: &str, to: &str) -> Option<&Path> {
        self.paths.get(from).and_then(|row| row.get(to))
    }

    pub fn require(&self, from: &str, to: &str) -> Result<&Path> {
        self.get(from, to)
            .ok_or_else(|| PlannerError::missing_path(from, to))
    }

    pub fn distance(&self, from: &str, to: &str) -> Result<f64> {
        self.require(from, to).map(Path::distance)
    }

    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.get(from, to).is_some()
    }

    /// Number of stored directed entries, self paths included.
    pub fn len(&self) -> usize {
        self.paths.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Builds the cache over `locations` for `hour`.
///
/// Each unordered pair is searched once; unreachable pairs are left out so
/// that any later lookup fails loudly.
pub fn build_cache<T: TrafficStore>(
    graph: &Graph,
    traffic: &T,
    locations: &[String],
    hour: Hour,
) -> Result<PathCache> {
    validate_hour(hour)?;

    let mut unique: Vec<&str> = Vec::with_capacity(locations.len());
    for id in locations {
        if !graph.contains(id) {
            return Err(PlannerError::UnknownLocation(id.clone()));
        }
        if !unique.contains(&id.as_str()) {
            unique.push(id);
        }
    }

    let search = ShortestPath::new(graph, traffic);
    let mut cache = PathCache::new();

    for id in &unique {
        cache.insert(id, id, Path::to_self(*id));
    }

    let mut unreachable = 0;
    for (i, from) in unique.iter().enumerate() {
        for to in &unique[i + 1..] {
            let path = search.find(from, to, hour)?;
            if path.is_reachable() {
                cache.insert(from, to, path);
            } else {
                warn!(from = %from, to = %to, hour, "no route between locations");
                unreachable += 1;
            }
        }
    }

    debug!(
        locations = unique.len(),
        entries = cache.len(),
        unreachable,
        hour,
        "built path cache"
    );
    Ok(cache)
}
