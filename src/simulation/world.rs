//! Main simulation world that ties everything together
//!
//! `SimWorld` owns the road network, the signal system and every vehicle.
//! It is driven one tick at a time by a single caller.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::error::{IdKind, SimError, SimResult};
use super::road_network::SimRoadNetwork;
use super::route_planner::find_optimal_path;
use super::traffic_signal::SignalSystem;
use super::types::{JunctionId, VehicleId, VEHICLE_ROUTE_WEIGHTS};
use super::vehicle::{SimVehicle, VehicleUpdateResult};

/// The main simulation world
pub struct SimWorld {
    /// Road network shared by the planner, the signals and the vehicles
    pub road_network: SimRoadNetwork,

    /// Signals of every signalized junction
    pub signal_system: SignalSystem,

    /// Vehicles in id order
    vehicles: Vec<SimVehicle>,

    max_vehicles: usize,

    /// Ticks processed while running
    time_step: u64,

    is_running: bool,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl SimWorld {
    fn new_internal(
        road_network: SimRoadNetwork,
        signal_system: SignalSystem,
        max_vehicles: usize,
        rng: Option<StdRng>,
    ) -> Self {
        Self {
            road_network,
            signal_system,
            vehicles: Vec::new(),
            max_vehicles,
            time_step: 0,
            is_running: false,
            rng,
        }
    }

    /// Create a stopped simulation with signals built from the network
    pub fn new(road_network: SimRoadNetwork, max_vehicles: usize) -> SimResult<Self> {
        let signal_system = SignalSystem::new(&road_network)?;
        Ok(Self::new_internal(
            road_network,
            signal_system,
            max_vehicles,
            None,
        ))
    }

    /// Create a SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(
        road_network: SimRoadNetwork,
        max_vehicles: usize,
        seed: u64,
    ) -> SimResult<Self> {
        let signal_system = SignalSystem::new(&road_network)?;
        Ok(Self::new_internal(
            road_network,
            signal_system,
            max_vehicles,
            Some(StdRng::seed_from_u64(seed)),
        ))
    }

    /// Create a simulation around an existing signal system
    pub fn with_signal_system(
        road_network: SimRoadNetwork,
        signal_system: SignalSystem,
        max_vehicles: usize,
    ) -> Self {
        Self::new_internal(road_network, signal_system, max_vehicles, None)
    }

    /// Get a random index below `bound`, using seeded RNG if available
    fn random_index(&mut self, bound: usize) -> usize {
        match &mut self.rng {
            Some(rng) => rng.random_range(0..bound),
            None => rand::rng().random_range(0..bound),
        }
    }

    pub fn start(&mut self) {
        self.is_running = true;
        info!("Starting traffic simulation");
    }

    pub fn stop(&mut self) {
        self.is_running = false;
        info!("Stopping traffic simulation");
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    pub fn max_vehicles(&self) -> usize {
        self.max_vehicles
    }

    pub fn vehicles(&self) -> &[SimVehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.get(id.0)
    }

    pub fn completed_count(&self) -> usize {
        self.vehicles.iter().filter(|vehicle| vehicle.completed).count()
    }

    /// Create a vehicle on its optimal route and put it on its first road.
    ///
    /// Nothing changes if the call fails.
    pub fn add_vehicle(&mut self, origin: JunctionId, destination: JunctionId) -> SimResult<VehicleId> {
        if self.vehicles.len() >= self.max_vehicles {
            return Err(SimError::CapacityExceeded {
                max: self.max_vehicles,
            });
        }

        let route = find_optimal_path(
            &self.road_network,
            origin,
            destination,
            VEHICLE_ROUTE_WEIGHTS,
        )?
        .ok_or(SimError::NoPath {
            from: origin,
            to: destination,
        })?;

        let id = VehicleId(self.vehicles.len());
        let vehicle = SimVehicle::depart(id, origin, destination, route, &mut self.road_network)?;
        debug!(
            "Vehicle {} added: {} -> {} via {:?}",
            id, origin, destination, vehicle.route.path
        );
        self.vehicles.push(vehicle);
        Ok(id)
    }

    /// Advance a single vehicle by one tick
    pub fn update_vehicle(&mut self, id: VehicleId) -> SimResult<VehicleUpdateResult> {
        let vehicle = self.vehicles.get_mut(id.0).ok_or(SimError::InvalidId {
            kind: IdKind::Vehicle,
            id: id.0,
        })?;
        vehicle.update(&mut self.road_network)
    }

    /// Main simulation tick. Does nothing while stopped.
    pub fn tick(&mut self) {
        if !self.is_running {
            return;
        }
        self.time_step += 1;

        if let Err(e) = self.signal_system.update(&self.road_network) {
            warn!("Signal update failed at step {}: {:#}", self.time_step, e);
        }

        for vehicle in &mut self.vehicles {
            if let Err(e) = vehicle.update(&mut self.road_network) {
                warn!(
                    "Vehicle {} could not advance at step {}: {:#}",
                    vehicle.id, self.time_step, e
                );
            }
        }

        self.road_network.recompute_all_weights();
    }

    /// Inject `count` vehicles between random distinct junctions.
    ///
    /// Pairs without a route are skipped. Returns the ids actually created.
    pub fn generate_random_traffic(&mut self, count: usize) -> SimResult<Vec<VehicleId>> {
        if count == 0 {
            return Err(SimError::InvalidTrafficVolume(count));
        }
        if self.vehicles.len() + count > self.max_vehicles {
            return Err(SimError::CapacityExceeded {
                max: self.max_vehicles,
            });
        }
        let junction_count = self.road_network.junction_count();
        if junction_count < 2 {
            return Err(SimError::NotEnoughJunctions);
        }

        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let origin = self.random_index(junction_count);
            // Draw among the other junctions so the destination differs
            let mut destination = self.random_index(junction_count - 1);
            if destination >= origin {
                destination += 1;
            }

            match self.add_vehicle(JunctionId(origin), JunctionId(destination)) {
                Ok(id) => created.push(id),
                Err(SimError::NoPath { from, to }) => {
                    debug!("Skipping random trip {} -> {}: no route", from, to);
                }
                Err(e) => return Err(e),
            }
        }

        info!("Generated {} random vehicles", created.len());
        Ok(created)
    }

    /// Complete every vehicle at once, freeing the roads they occupy
    pub fn retire_all_vehicles(&mut self) {
        for vehicle in &mut self.vehicles {
            vehicle.retire(&mut self.road_network);
        }
        self.road_network.recompute_all_weights();
    }
}
