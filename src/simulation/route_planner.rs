//! Dijkstra-family route planning over the road network
//!
//! All planners share one search skeleton and differ only in how an edge
//! extends a path's cost. Searches read the network and never mutate it.

use std::fmt;

use log::debug;

use super::error::{SimError, SimResult};
use super::min_heap::MinHeap;
use super::road_network::{RoadEdge, SimRoadNetwork};
use super::types::{JunctionId, RouteWeights};

/// An ordered path of junctions with its time and distance totals.
///
/// Totals are summed from the graph edges when the route is built, so a route
/// optimised for congestion still reports its real travel time and distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Vec<JunctionId>,
    /// Hours
    pub total_time: f32,
    /// Kilometres
    pub total_distance: f32,
}

impl Route {
    /// Builds a route along `path`, summing the first matching edge of every hop
    pub fn along(network: &SimRoadNetwork, path: Vec<JunctionId>) -> Self {
        let (total_time, total_distance) = path
            .windows(2)
            .filter_map(|hop| network.edge(hop[0], hop[1]))
            .fold((0.0, 0.0), |(time, distance), edge| {
                (time + edge.weight, distance + edge.road.length)
            });

        Self {
            path,
            total_time,
            total_distance,
        }
    }

    /// Number of junctions on the route
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// A route of at most one junction needs no movement
    pub fn is_trivial(&self) -> bool {
        self.path.len() <= 1
    }

    pub fn origin(&self) -> Option<JunctionId> {
        self.path.first().copied()
    }

    pub fn destination(&self) -> Option<JunctionId> {
        self.path.last().copied()
    }

    /// Worst single-road congestion along the route
    pub fn bottleneck_congestion(&self, network: &SimRoadNetwork) -> f32 {
        self.path
            .windows(2)
            .filter_map(|hop| network.edge(hop[0], hop[1]))
            .map(|edge| edge.road.congestion())
            .fold(0.0, f32::max)
    }

    /// Renders the route hop by hop against the network it was planned on
    pub fn describe<'a>(&'a self, network: &'a SimRoadNetwork) -> RouteDescription<'a> {
        RouteDescription {
            route: self,
            network,
        }
    }
}

/// How a path's cost grows when it is extended by one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostModel {
    /// Accumulated travel time
    TravelTime,
    /// Worst congestion seen so far (a bottleneck, not a sum)
    Bottleneck,
    /// Accumulated weighted blend of time, distance and congestion
    Weighted(RouteWeights),
}

impl CostModel {
    fn extend(&self, path_cost: f32, edge: &RoadEdge) -> f32 {
        match self {
            CostModel::TravelTime => path_cost + edge.weight,
            CostModel::Bottleneck => path_cost.max(edge.road.congestion()),
            CostModel::Weighted(weights) => {
                path_cost
                    + weights.time * edge.weight
                    + weights.distance * edge.road.length
                    + weights.congestion * edge.road.congestion()
            }
        }
    }
}

/// Route minimising total travel time
pub fn find_shortest_path(
    network: &SimRoadNetwork,
    src: JunctionId,
    dest: JunctionId,
) -> SimResult<Option<Route>> {
    find_path(network, src, dest, CostModel::TravelTime)
}

/// Same as [`find_shortest_path`]: both minimise total travel time
pub fn find_fastest_path(
    network: &SimRoadNetwork,
    src: JunctionId,
    dest: JunctionId,
) -> SimResult<Option<Route>> {
    find_shortest_path(network, src, dest)
}

/// Route whose single most congested road is as free as possible
pub fn find_least_congested_path(
    network: &SimRoadNetwork,
    src: JunctionId,
    dest: JunctionId,
) -> SimResult<Option<Route>> {
    find_path(network, src, dest, CostModel::Bottleneck)
}

/// Route minimising `time*travel_time + distance*length + congestion*congestion`
/// summed over its roads
pub fn find_optimal_path(
    network: &SimRoadNetwork,
    src: JunctionId,
    dest: JunctionId,
    weights: RouteWeights,
) -> SimResult<Option<Route>> {
    find_path(network, src, dest, CostModel::Weighted(weights))
}

/// Single-source Dijkstra from `src`, stopping once `dest` is popped.
///
/// Returns `Ok(None)` when `dest` cannot be reached. Negative or non-finite
/// weights are rejected with `InvalidWeights` before the search starts.
pub fn find_path(
    network: &SimRoadNetwork,
    src: JunctionId,
    dest: JunctionId,
    model: CostModel,
) -> SimResult<Option<Route>> {
    let junction_count = network.junction_count();
    for id in [src, dest] {
        if !network.contains(id) {
            return Err(SimError::junction(id.index()));
        }
    }
    if let CostModel::Weighted(weights) = model {
        weights.validate()?;
    }

    let mut cost = vec![f32::INFINITY; junction_count];
    let mut prev: Vec<Option<JunctionId>> = vec![None; junction_count];
    let mut visited = vec![false; junction_count];

    cost[src.index()] = 0.0;
    let mut heap = MinHeap::with_capacity(junction_count);
    heap.insert(src, 0.0, 0.0)?;

    while !heap.is_empty() {
        let u = heap.extract_min()?.vertex;
        if u == dest {
            break;
        }
        if visited[u.index()] {
            continue;
        }
        visited[u.index()] = true;

        for (v, edge) in network.outgoing(u)? {
            if visited[v.index()] {
                continue;
            }
            let candidate = model.extend(cost[u.index()], edge);
            if candidate < cost[v.index()] {
                cost[v.index()] = candidate;
                prev[v.index()] = Some(u);
                if !heap.decrease_priority(v, candidate, candidate) {
                    heap.insert(v, candidate, candidate)?;
                }
            }
        }
    }

    let Some(path) = reconstruct_path(&prev, src, dest) else {
        debug!("No {model:?} route from {src} to {dest}");
        return Ok(None);
    };

    Ok(Some(Route::along(network, path)))
}

/// Walks predecessor links back from `dest`; `None` unless the chain ends at `src`
fn reconstruct_path(
    prev: &[Option<JunctionId>],
    src: JunctionId,
    dest: JunctionId,
) -> Option<Vec<JunctionId>> {
    let mut path = vec![dest];
    let mut current = dest;

    while let Some(previous) = prev[current.index()] {
        // A predecessor chain longer than the graph would mean a cycle
        if path.len() > prev.len() {
            return None;
        }
        path.push(previous);
        current = previous;
    }

    if current != src {
        return None;
    }
    path.reverse();
    Some(path)
}

pub struct RouteDescription<'a> {
    route: &'a Route,
    network: &'a SimRoadNetwork,
}

impl fmt::Display for RouteDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = &self.route.path;
        writeln!(f, "Route ({} junctions):", path.len())?;
        for (step, junction) in path.iter().enumerate() {
            writeln!(
                f,
                "  {}. Junction {}",
                step + 1,
                self.network.junction_label(*junction)
            )?;
            if let Some(next) = path.get(step + 1) {
                if let Some(edge) = self.network.edge(*junction, *next) {
                    let road = &edge.road;
                    writeln!(
                        f,
                        "     lanes={}, length={:.2} km, limit={:.2} km/h, capacity={}, load={}, time={:.2} h",
                        road.lanes,
                        road.length,
                        road.speed_limit,
                        road.capacity,
                        road.current_load,
                        edge.weight
                    )?;
                }
            }
        }
        writeln!(f, "Total travel time: {:.2} h", self.route.total_time)?;
        write!(f, "Total distance: {:.2} km", self.route.total_distance)
    }
}

/// Side-by-side comparison of two routes
#[derive(Debug, Clone, PartialEq)]
pub struct RouteComparison {
    /// `first.total_time - second.total_time`
    pub time_difference: f32,
    /// `first.total_distance - second.total_distance`
    pub distance_difference: f32,
    /// `first.len() - second.len()`
    pub junction_difference: isize,
    first_time: f32,
    second_time: f32,
    first_distance: f32,
    second_distance: f32,
    first_junctions: usize,
    second_junctions: usize,
}

impl RouteComparison {
    pub fn between(first: &Route, second: &Route) -> Self {
        Self {
            time_difference: first.total_time - second.total_time,
            distance_difference: first.total_distance - second.total_distance,
            junction_difference: first.len() as isize - second.len() as isize,
            first_time: first.total_time,
            second_time: second.total_time,
            first_distance: first.total_distance,
            second_distance: second.total_distance,
            first_junctions: first.len(),
            second_junctions: second.len(),
        }
    }
}

fn percent_of(difference: f32, base: f32) -> f32 {
    if base > 0.0 {
        difference / base * 100.0
    } else {
        0.0
    }
}

impl fmt::Display for RouteComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Travel time:")?;
        writeln!(f, "  Route 1: {:.2} h", self.first_time)?;
        writeln!(f, "  Route 2: {:.2} h", self.second_time)?;
        if self.time_difference > 0.0 {
            writeln!(
                f,
                "  Route 2 is faster by {:.2} h ({:.2}%)",
                self.time_difference,
                percent_of(self.time_difference, self.first_time)
            )?;
        } else if self.time_difference < 0.0 {
            writeln!(
                f,
                "  Route 1 is faster by {:.2} h ({:.2}%)",
                -self.time_difference,
                percent_of(-self.time_difference, self.second_time)
            )?;
        } else {
            writeln!(f, "  Same travel time")?;
        }

        writeln!(f, "Distance:")?;
        writeln!(f, "  Route 1: {:.2} km", self.first_distance)?;
        writeln!(f, "  Route 2: {:.2} km", self.second_distance)?;
        if self.distance_difference > 0.0 {
            writeln!(
                f,
                "  Route 2 is shorter by {:.2} km ({:.2}%)",
                self.distance_difference,
                percent_of(self.distance_difference, self.first_distance)
            )?;
        } else if self.distance_difference < 0.0 {
            writeln!(
                f,
                "  Route 1 is shorter by {:.2} km ({:.2}%)",
                -self.distance_difference,
                percent_of(-self.distance_difference, self.second_distance)
            )?;
        } else {
            writeln!(f, "  Same distance")?;
        }

        writeln!(f, "Junctions:")?;
        writeln!(f, "  Route 1: {}", self.first_junctions)?;
        writeln!(f, "  Route 2: {}", self.second_junctions)?;
        match self.junction_difference {
            d if d > 0 => write!(f, "  Route 2 passes {d} fewer junctions"),
            d if d < 0 => write!(f, "  Route 1 passes {} fewer junctions", -d),
            _ => write!(f, "  Same number of junctions"),
        }
    }
}
