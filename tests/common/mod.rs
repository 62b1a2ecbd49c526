//! Small hand-built networks shared by the integration tests

#![allow(dead_code)]

use traffic_sim::simulation::{JunctionId, SimRoad, SimRoadNetwork};

pub fn j(id: usize) -> JunctionId {
    JunctionId(id)
}

pub fn road(length: f32, speed_limit: f32, capacity: u32) -> SimRoad {
    SimRoad::new(1, length, speed_limit, capacity).unwrap()
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

/// 0 -> 1 -> 2, each road 1 km at 60 km/h with capacity 10
pub fn line_network() -> SimRoadNetwork {
    let mut network = SimRoadNetwork::new(3);
    network.add_directed_edge(j(0), j(1), road(1.0, 60.0, 10)).unwrap();
    network.add_directed_edge(j(1), j(2), road(1.0, 60.0, 10)).unwrap();
    network
}

/// Two ways from 0 to 3: through 1 or through 2. All roads capacity 10.
pub fn diamond_network() -> SimRoadNetwork {
    let mut network = SimRoadNetwork::new(4);
    network.add_directed_edge(j(0), j(1), road(1.0, 60.0, 10)).unwrap();
    network.add_directed_edge(j(1), j(3), road(1.0, 60.0, 10)).unwrap();
    network.add_directed_edge(j(0), j(2), road(1.0, 60.0, 10)).unwrap();
    network.add_directed_edge(j(2), j(3), road(1.0, 60.0, 10)).unwrap();
    network
}
