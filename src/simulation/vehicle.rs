//! Vehicle movement logic for the traffic simulation

use log::debug;

use super::error::{SimError, SimResult};
use super::road_network::SimRoadNetwork;
use super::route_planner::Route;
use super::types::{JunctionId, VehicleId, CONGESTION_SPEED_PENALTY, SECONDS_PER_TICK};

/// Result of a vehicle update indicating what happened this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    /// Completed or never departed
    Idle,
    /// Still travelling along the same road
    Moving,
    /// Finished a road and entered the one towards this junction
    ChangedRoad(JunctionId),
    /// Reached its destination
    Arrived(JunctionId),
}

/// A vehicle in the traffic simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub origin: JunctionId,
    pub destination: JunctionId,
    pub route: Route,
    /// Index in `route.path` of the next junction to reach
    pub route_index: usize,
    /// Destination junction of the road being driven, `None` when not on a road
    pub current_road: Option<JunctionId>,
    /// Metres travelled along the current road
    pub position: f32,
    /// km/h
    pub speed: f32,
    pub completed: bool,
}

impl SimVehicle {
    /// Places a vehicle at the start of `route`.
    ///
    /// A route with no hops leaves the vehicle completed on the spot. Otherwise
    /// it occupies the first road straight away at that road's speed limit.
    pub fn depart(
        id: VehicleId,
        origin: JunctionId,
        destination: JunctionId,
        route: Route,
        network: &mut SimRoadNetwork,
    ) -> SimResult<Self> {
        let mut vehicle = Self {
            id,
            origin,
            destination,
            route,
            route_index: 0,
            current_road: None,
            position: 0.0,
            speed: 0.0,
            completed: false,
        };

        if vehicle.route.is_trivial() {
            vehicle.completed = true;
            return Ok(vehicle);
        }

        let (src, dest) = (vehicle.route.path[0], vehicle.route.path[1]);
        let edge = network.require_edge_mut(src, dest)?;
        edge.road.add_vehicle();
        edge.recompute_weight();

        vehicle.speed = edge.road.speed_limit;
        vehicle.current_road = Some(dest);
        vehicle.route_index = 1;
        Ok(vehicle)
    }

    /// Position along the current road in kilometres
    pub fn position_km(&self) -> f32 {
        self.position / 1000.0
    }

    /// The road being driven as `(from, to)`
    pub fn current_hop(&self) -> Option<(JunctionId, JunctionId)> {
        self.current_road?;
        let from = *self.route.path.get(self.route_index.checked_sub(1)?)?;
        let to = *self.route.path.get(self.route_index)?;
        Some((from, to))
    }

    /// Advance the vehicle by one tick
    pub fn update(&mut self, network: &mut SimRoadNetwork) -> SimResult<VehicleUpdateResult> {
        if self.completed {
            return Ok(VehicleUpdateResult::Idle);
        }
        let Some((src, dest)) = self.current_hop() else {
            return Ok(VehicleUpdateResult::Idle);
        };

        let road_length_m = network
            .edge(src, dest)
            .ok_or(SimError::NoRoad {
                from: src,
                to: dest,
            })?
            .road
            .length
            * 1000.0;

        let metres_per_tick = self.speed / 3600.0 * 1000.0 * SECONDS_PER_TICK;
        let position = self.position + metres_per_tick;

        if position < road_length_m {
            self.position = position;
            return Ok(VehicleUpdateResult::Moving);
        }

        // Resolve the next road before touching any load
        let next_dest = if dest == self.destination {
            None
        } else {
            let next = self.route.path.get(self.route_index + 1).copied();
            if let Some(next) = next {
                network
                    .find_edge(dest, next)
                    .ok_or(SimError::NoRoad { from: dest, to: next })?;
            }
            next
        };

        let finished = network.require_edge_mut(src, dest)?;
        finished.road.remove_vehicle();
        finished.recompute_weight();

        let Some(next_dest) = next_dest else {
            self.completed = true;
            self.current_road = None;
            self.position = road_length_m;
            debug!("Vehicle {} arrived at junction {}", self.id, dest);
            return Ok(VehicleUpdateResult::Arrived(dest));
        };

        let next = network.require_edge_mut(dest, next_dest)?;
        self.route_index += 1;
        next.road.add_vehicle();
        next.recompute_weight();

        let congestion = next.road.congestion();
        self.speed = next.road.speed_limit * (1.0 - CONGESTION_SPEED_PENALTY * congestion);
        self.current_road = Some(next_dest);
        self.position = 0.0;

        debug!(
            "Vehicle {} entered road {} -> {} at {:.1} km/h",
            self.id, dest, next_dest, self.speed
        );
        Ok(VehicleUpdateResult::ChangedRoad(next_dest))
    }

    /// Marks the vehicle completed, giving back the road it was occupying
    pub fn retire(&mut self, network: &mut SimRoadNetwork) {
        if let Some((src, dest)) = self.current_hop() {
            if let Some(edge) = network.edge_mut(src, dest) {
                edge.road.remove_vehicle();
                edge.recompute_weight();
            }
        }
        self.current_road = None;
        self.completed = true;
    }
}
