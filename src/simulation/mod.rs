//! Route-planning and dynamic traffic simulation core
//!
//! Everything here is synchronous and single-threaded. A caller that shares
//! a `SimWorld` between threads must serialize ticks and route queries.

mod error;
mod min_heap;
mod priority_queue;
mod report;
mod road_network;
mod route_planner;
pub mod scenario;
mod traffic_signal;
mod types;
mod vehicle;
mod world;

pub use error::{IdKind, SimError, SimResult};
pub use priority_queue::PriorityQueue;
pub use report::{
    CongestedRoad, SimulationReport, SimulationStatus, VehicleSnapshot, STATUS_VEHICLE_SAMPLE,
};
pub use road_network::{RoadEdge, SimJunction, SimRoadNetwork};
pub use route_planner::{
    find_fastest_path, find_least_congested_path, find_optimal_path, find_path,
    find_shortest_path, CostModel, Route, RouteComparison, RouteDescription,
};
pub use traffic_signal::{
    Direction, LightState, SignalPhase, SignalSystem, TrafficSignal, BASE_PHASE_SECONDS,
    DEFAULT_PHASE_SECONDS, MAX_EXTRA_PHASE_SECONDS,
};
pub use types::{
    JunctionId, RouteWeights, SimRoad, VehicleId, CONGESTION_SPEED_PENALTY,
    CONGESTION_TIME_FACTOR, SECONDS_PER_TICK, VEHICLE_ROUTE_WEIGHTS,
};
pub use vehicle::{SimVehicle, VehicleUpdateResult};
pub use world::SimWorld;
