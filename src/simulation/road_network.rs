//! Road network graph with congestion-sensitive travel times
//!
//! Junctions are the nodes of a petgraph `DiGraph` and each directed edge
//! owns the `SimRoad` for that direction. Node indices equal junction ids
//! because every junction is created up front, in order.

use std::fmt;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::error::{SimError, SimResult};
use super::types::{JunctionId, SimRoad};

/// A road intersection
#[derive(Debug, Clone, PartialEq)]
pub struct SimJunction {
    pub id: JunctionId,
    pub name: Option<String>,
    pub has_signal: bool,
}

impl SimJunction {
    fn new(id: JunctionId) -> Self {
        Self {
            id,
            name: None,
            has_signal: false,
        }
    }
}

/// Edge data for the road network graph
#[derive(Debug, Clone, PartialEq)]
pub struct RoadEdge {
    pub road: SimRoad,
    /// Travel time in hours, derived from `road`
    pub weight: f32,
}

impl RoadEdge {
    pub fn from_road(road: SimRoad) -> Self {
        let weight = road.travel_time();
        Self { road, weight }
    }

    /// Re-derive the weight from the road's current load
    pub fn recompute_weight(&mut self) {
        self.weight = self.road.travel_time();
    }
}

/// Fixed-size road network.
///
/// Outgoing edges of a junction iterate most-recently-added first, which is
/// petgraph's adjacency order for `DiGraph`.
#[derive(Debug, Clone)]
pub struct SimRoadNetwork {
    graph: DiGraph<SimJunction, RoadEdge>,
}

impl SimRoadNetwork {
    /// Creates `junction_count` unnamed, unsignalized junctions with no roads
    pub fn new(junction_count: usize) -> Self {
        let mut graph = DiGraph::with_capacity(junction_count, 0);
        for id in 0..junction_count {
            graph.add_node(SimJunction::new(JunctionId(id)));
        }
        Self { graph }
    }

    pub fn junction_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn road_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: JunctionId) -> bool {
        id.index() < self.junction_count()
    }

    fn node(&self, id: JunctionId) -> SimResult<NodeIndex> {
        if self.contains(id) {
            Ok(NodeIndex::new(id.index()))
        } else {
            Err(SimError::junction(id.index()))
        }
    }

    pub fn set_junction(
        &mut self,
        id: JunctionId,
        name: Option<&str>,
        has_signal: bool,
    ) -> SimResult<()> {
        let node = self.node(id)?;
        let junction = &mut self.graph[node];
        junction.name = name.map(str::to_owned);
        junction.has_signal = has_signal;
        Ok(())
    }

    pub fn junction(&self, id: JunctionId) -> Option<&SimJunction> {
        self.node(id).ok().map(|node| &self.graph[node])
    }

    /// All junctions in id order
    pub fn junctions(&self) -> impl Iterator<Item = &SimJunction> {
        self.graph.node_weights()
    }

    /// Adds a one-way road, placing it at the front of `src`'s edge list
    pub fn add_directed_edge(
        &mut self,
        src: JunctionId,
        dest: JunctionId,
        road: SimRoad,
    ) -> SimResult<()> {
        let src_node = self.node(src)?;
        let dest_node = self.node(dest)?;
        self.graph
            .add_edge(src_node, dest_node, RoadEdge::from_road(road));
        Ok(())
    }

    /// Adds one independent road in each direction
    pub fn add_two_way_road(
        &mut self,
        a: JunctionId,
        b: JunctionId,
        road: SimRoad,
    ) -> SimResult<()> {
        self.node(a)?;
        self.node(b)?;
        self.add_directed_edge(a, b, road.clone())?;
        self.add_directed_edge(b, a, road)
    }

    /// Outgoing roads of `id` as `(destination, edge)` in adjacency order
    pub fn outgoing(
        &self,
        id: JunctionId,
    ) -> SimResult<impl Iterator<Item = (JunctionId, &RoadEdge)> + '_> {
        let node = self.node(id)?;
        Ok(self
            .graph
            .edges(node)
            .map(|edge| (JunctionId(edge.target().index()), edge.weight())))
    }

    /// First outgoing edge from `src` to `dest`
    pub fn find_edge(&self, src: JunctionId, dest: JunctionId) -> Option<EdgeIndex> {
        let src_node = self.node(src).ok()?;
        let dest_node = self.node(dest).ok()?;
        self.graph
            .edges(src_node)
            .find(|edge| edge.target() == dest_node)
            .map(|edge| edge.id())
    }

    pub fn edge(&self, src: JunctionId, dest: JunctionId) -> Option<&RoadEdge> {
        self.find_edge(src, dest)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    pub fn edge_mut(&mut self, src: JunctionId, dest: JunctionId) -> Option<&mut RoadEdge> {
        self.find_edge(src, dest)
            .and_then(|edge| self.graph.edge_weight_mut(edge))
    }

    pub(crate) fn require_edge_mut(
        &mut self,
        src: JunctionId,
        dest: JunctionId,
    ) -> SimResult<&mut RoadEdge> {
        self.node(src)?;
        self.node(dest)?;
        self.edge_mut(src, dest)
            .ok_or(SimError::NoRoad { from: src, to: dest })
    }

    /// Adjusts a road's load by `delta`, clamping at zero.
    ///
    /// The edge weight is left stale until the next recompute.
    pub fn add_load(&mut self, src: JunctionId, dest: JunctionId, delta: i64) -> SimResult<()> {
        let edge = self.require_edge_mut(src, dest)?;
        let load = (i64::from(edge.road.current_load) + delta).clamp(0, i64::from(u32::MAX));
        edge.road.current_load = load as u32;
        Ok(())
    }

    /// Re-derives every edge weight from its road's current load
    pub fn recompute_all_weights(&mut self) {
        for edge in self.graph.edge_weights_mut() {
            edge.recompute_weight();
        }
    }

    /// Sum of loads over sum of capacities of the junction's outgoing roads,
    /// clamped to [0, 1]. Zero for a junction with no outgoing roads.
    pub fn junction_congestion(&self, id: JunctionId) -> SimResult<f32> {
        let (load, capacity) = self
            .outgoing(id)?
            .fold((0u64, 0u64), |(load, capacity), (_, edge)| {
                (
                    load + u64::from(edge.road.current_load),
                    capacity + u64::from(edge.road.capacity),
                )
            });

        if capacity == 0 {
            return Ok(0.0);
        }
        Ok((load as f32 / capacity as f32).clamp(0.0, 1.0))
    }

    /// Every road as `(source, destination, edge)`, junction by junction
    pub fn roads(&self) -> impl Iterator<Item = (JunctionId, JunctionId, &RoadEdge)> + '_ {
        self.graph.node_indices().flat_map(move |node| {
            self.graph.edges(node).map(move |edge| {
                (
                    JunctionId(node.index()),
                    JunctionId(edge.target().index()),
                    edge.weight(),
                )
            })
        })
    }

    pub fn junction_label(&self, id: JunctionId) -> String {
        match self.junction(id).and_then(|junction| junction.name.as_deref()) {
            Some(name) => format!("{id} ({name})"),
            None => id.to_string(),
        }
    }
}

impl fmt::Display for SimRoadNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Road Network: {} junctions", self.junction_count())?;
        for junction in self.junctions() {
            writeln!(f)?;
            writeln!(f, "Junction {}", self.junction_label(junction.id))?;
            writeln!(
                f,
                "  Traffic signal: {}",
                if junction.has_signal { "yes" } else { "no" }
            )?;
            for (dest, edge) in self.outgoing(junction.id).map_err(|_| fmt::Error)? {
                let road = &edge.road;
                writeln!(f, "  -> {}", self.junction_label(dest))?;
                writeln!(
                    f,
                    "     lanes={}, length={:.2} km, limit={:.2} km/h, capacity={}, load={}",
                    road.lanes, road.length, road.speed_limit, road.capacity, road.current_load
                )?;
                writeln!(f, "     travel time: {:.2} h", edge.weight)?;
            }
        }
        Ok(())
    }
}
