//! Hand-built road networks.

use fleet_tour_planner::graph::{Graph, Link, Location};
use fleet_tour_planner::traffic::{HOURS_PER_DAY, TrafficTable};

pub const FLAT: TrafficTable = [1.0; HOURS_PER_DAY];

pub const RUSH_HOURS: std::ops::RangeInclusive<usize> = 7..=9;
pub const EVENING_HOUR: usize = 17;

/// Uniform table with `factor` applied to `hours`.
pub fn peak(hours: std::ops::RangeInclusive<usize>, factor: f64) -> TrafficTable {
    let mut table = FLAT;
    for hour in hours {
        table[hour] = factor;
    }
    table
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ============================================================================
// Five-location loop
// ============================================================================

/// N1-N2 (2), N2-N3 (3), N1-N4 (4), N3-N5 (2), N4-N5 (5), plus an isolated N6.
///
/// At flat traffic N1 to N5 is 7.0 through N2 and N3.
pub fn five_node_network() -> Graph {
    loop_network(FLAT)
}

/// Same loop, but N2-N3 costs three times its length during rush hours,
/// which pushes N1 to N5 onto the N4 side (9.0).
pub fn rush_hour_network() -> Graph {
    loop_network(peak(RUSH_HOURS, 3.0))
}

fn loop_network(n2_n3: TrafficTable) -> Graph {
    let mut graph = Graph::new();
    for (id, x, y) in [
        ("N1", 0.0, 0.0),
        ("N2", 2.0, 0.0),
        ("N3", 2.0, 3.0),
        ("N4", 0.0, 4.0),
        ("N5", 1.0, 5.0),
        ("N6", 9.0, 9.0),
    ] {
        graph.add_location(Location::at(id, x, y));
    }
    let links = [
        Link::new("E1", "N1", "N2", 2.0, FLAT),
        Link::new("E2", "N2", "N3", 3.0, n2_n3),
        Link::new("E3", "N1", "N4", 4.0, FLAT),
        Link::new("E4", "N3", "N5", 2.0, FLAT),
        Link::new("E5", "N4", "N5", 5.0, FLAT),
    ];
    for link in links {
        graph.add_link(link).expect("fixture link endpoints are registered");
    }
    graph
}

// ============================================================================
// Grid
// ============================================================================

/// Location id of a grid cell.
pub fn cell(row: usize, col: usize) -> String {
    format!("R{row}C{col}")
}

/// `size` x `size` grid of unit-length streets. East-west streets double in
/// length at [`EVENING_HOUR`].
pub fn grid_network(size: usize) -> Graph {
    let mut graph = Graph::new();
    for row in 0..size {
        for col in 0..size {
            graph.add_location(Location::at(cell(row, col), col as f64, row as f64));
        }
    }

    let evening = peak(EVENING_HOUR..=EVENING_HOUR, 2.0);
    for row in 0..size {
        for col in 0..size {
            if col + 1 < size {
                let id = format!("H{row}{col}");
                let link = Link::new(id, cell(row, col), cell(row, col + 1), 1.0, evening);
                graph.add_link(link).expect("fixture link endpoints are registered");
            }
            if row + 1 < size {
                let id = format!("V{row}{col}");
                let link = Link::new(id, cell(row, col), cell(row + 1, col), 1.0, FLAT);
                graph.add_link(link).expect("fixture link endpoints are registered");
            }
        }
    }
    graph
}

/// Every grid cell except the top-left corner, which serves as the depot.
pub fn grid_stops(size: usize) -> Vec<String> {
    (0..size)
        .flat_map(|row| (0..size).map(move |col| (row, col)))
        .filter(|&(row, col)| (row, col) != (0, 0))
        .map(|(row, col)| cell(row, col))
        .collect()
}

/// True when `to` is one link away from `from`.
pub fn adjacent(graph: &Graph, from: &str, to: &str) -> bool {
    graph
        .neighbors(from)
        .iter()
        .any(|edge| graph.location_at(edge).id == to)
}
