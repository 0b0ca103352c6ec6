//! Tour construction and local improvement.
//!
//! [`NearestNeighbor`] builds a tour greedily; [`TwoOpt`] wraps any other
//! [`TourSolver`] and reverses segments while that shortens the tour.

use std::collections::BTreeSet;

use tracing::debug;

use crate::cache::PathCache;
use crate::error::Result;
use crate::traits::TourSolver;

pub const DEFAULT_TWO_OPT_ITERATIONS: usize = 100;

/// Scores a tour by summing cached distances along consecutive positions.
/// Tours with fewer than two positions score zero.
pub fn tour_distance(cache: &PathCache, tour: &[String]) -> Result<f64> {
    tour.windows(2)
        .map(|pair| cache.distance(&pair[0], &pair[1]))
        .sum()
}

#[derive(Debug, Clone, Copy)]
pub struct NearestNeighbor<'a> {
    cache: &'a PathCache,
}

impl<'a> NearestNeighbor<'a> {
    pub fn new(cache: &'a PathCache) -> Self {
        Self { cache }
    }
}

impl TourSolver for NearestNeighbor<'_> {
    fn solve(&self, stops: &[String], depot: &str) -> Result<Vec<String>> {
        // Ordered so that distance ties go to the smallest id.
        let mut remaining: BTreeSet<&str> = stops
            .iter()
            .map(String::as_str)
            .filter(|stop| *stop != depot)
            .collect();

        let mut tour = Vec::with_capacity(remaining.len() + 2);
        tour.push(depot.to_string());

        if remaining.len() == 1 {
            if let Some(only) = remaining.pop_first() {
                tour.push(only.to_string());
            }
        }

        let mut current = depot;
        while !remaining.is_empty() {
            let mut nearest: Option<(&str, f64)> = None;
            for candidate in &remaining {
                let distance = self.cache.distance(current, candidate)?;
                if nearest.is_none_or(|(_, best)| distance < best) {
                    nearest = Some((*candidate, distance));
                }
            }
            let Some((next, _)) = nearest else { break };
            remaining.remove(next);
            tour.push(next.to_string());
            current = next;
        }

        tour.push(depot.to_string());
        Ok(tour)
    }

    fn score(&self, tour: &[String]) -> Result<f64> {
        tour_distance(self.cache, tour)
    }
}

/// First-improvement 2-opt over the tour produced by `inner`.
#[derive(Debug, Clone)]
pub struct TwoOpt<'a, S> {
    cache: &'a PathCache,
    inner: S,
    max_iterations: usize,
}

impl<'a, S: TourSolver> TwoOpt<'a, S> {
    pub fn new(cache: &'a PathCache, inner: S) -> Self {
        Self::with_max_iterations(cache, inner, DEFAULT_TWO_OPT_ITERATIONS)
    }

    pub fn with_max_iterations(cache: &'a PathCache, inner: S, max_iterations: usize) -> Self {
        Self {
            cache,
            inner,
            max_iterations,
        }
    }

    /// Repeatedly applies the first improving segment reversal, restarting
    /// the scan after each one. The depot at both ends never moves.
    pub fn improve(&self, mut tour: Vec<String>) -> Result<Vec<String>> {
        if tour.len() <= 3 {
            return Ok(tour);
        }

        let mut best = tour_distance(self.cache, &tour)?;
        let mut applied = 0;

        'scan: while applied < self.max_iterations {
            for i in 1..tour.len() - 2 {
                for j in i + 1..tour.len() - 1 {
                    tour[i..=j].reverse();
                    let candidate = tour_distance(self.cache, &tour)?;
                    if candidate < best {
                        best = candidate;
                        applied += 1;
                        continue 'scan;
                    }
                    tour[i..=j].reverse();
                }
            }
            break;
        }

        debug!(swaps = applied, distance = best, "2-opt finished");
        Ok(tour)
    }
}

impl<S: TourSolver> TourSolver for TwoOpt<'_, S> {
    fn solve(&self, stops: &[String], depot: &str) -> Result<Vec<String>> {
        let tour = self.inner.solve(stops, depot)?;
        self.improve(tour)
    }

    fn score(&self, tour: &[String]) -> Result<f64> {
        tour_distance(self.cache, tour)
    }
}
