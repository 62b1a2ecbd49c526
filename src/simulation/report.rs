//! Read-only snapshots of a running simulation for console reporting

use std::fmt;

use super::types::{JunctionId, VehicleId};
use super::world::SimWorld;

/// Vehicles shown in a status snapshot
pub const STATUS_VEHICLE_SAMPLE: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub origin: JunctionId,
    pub destination: JunctionId,
    pub completed: bool,
    pub current_road: Option<JunctionId>,
    /// Kilometres along the current road
    pub position_km: f32,
    /// km/h
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationStatus {
    pub time_step: u64,
    pub is_running: bool,
    pub vehicle_count: usize,
    pub max_vehicles: usize,
    pub completed_count: usize,
    /// The first few vehicles by id
    pub sample: Vec<VehicleSnapshot>,
}

/// Most congested road as `(from, to, congestion)`
pub type CongestedRoad = (JunctionId, JunctionId, f32);

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub time_step: u64,
    pub total_vehicles: usize,
    pub completed_vehicles: usize,
    /// Percentage of vehicles that reached their destination
    pub completion_rate: f32,
    /// Mean clamped congestion over every road
    pub average_congestion: f32,
    /// `None` when no road carries any load
    pub most_congested: Option<CongestedRoad>,
}

impl SimWorld {
    pub fn status(&self) -> SimulationStatus {
        let sample = self
            .vehicles()
            .iter()
            .take(STATUS_VEHICLE_SAMPLE)
            .map(|vehicle| VehicleSnapshot {
                id: vehicle.id,
                origin: vehicle.origin,
                destination: vehicle.destination,
                completed: vehicle.completed,
                current_road: vehicle.current_road,
                position_km: vehicle.position_km(),
                speed: vehicle.speed,
            })
            .collect();

        SimulationStatus {
            time_step: self.time_step(),
            is_running: self.is_running(),
            vehicle_count: self.vehicles().len(),
            max_vehicles: self.max_vehicles(),
            completed_count: self.completed_count(),
            sample,
        }
    }

    pub fn analyze(&self) -> SimulationReport {
        let total_vehicles = self.vehicles().len();
        let completed_vehicles = self.completed_count();
        let completion_rate = if total_vehicles > 0 {
            completed_vehicles as f32 / total_vehicles as f32 * 100.0
        } else {
            0.0
        };

        let mut total_congestion = 0.0;
        let mut road_count = 0usize;
        let mut most_congested: Option<CongestedRoad> = None;

        for (from, to, edge) in self.road_network.roads() {
            let congestion = edge.road.congestion();
            total_congestion += congestion;
            road_count += 1;

            let busiest = most_congested.map_or(0.0, |(_, _, c)| c);
            if congestion > busiest {
                most_congested = Some((from, to, congestion));
            }
        }

        let average_congestion = if road_count > 0 {
            total_congestion / road_count as f32
        } else {
            0.0
        };

        SimulationReport {
            time_step: self.time_step(),
            total_vehicles,
            completed_vehicles,
            completion_rate,
            average_congestion,
            most_congested,
        }
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation status at t={}s", self.time_step)?;
        writeln!(
            f,
            "Status: {}",
            if self.is_running { "running" } else { "stopped" }
        )?;
        writeln!(f, "Vehicles: {} / {}", self.vehicle_count, self.max_vehicles)?;
        writeln!(f, "Reached destination: {}", self.completed_count)?;
        for vehicle in &self.sample {
            write!(
                f,
                "  Vehicle {}: {} -> {}, ",
                vehicle.id, vehicle.origin, vehicle.destination
            )?;
            match (vehicle.completed, vehicle.current_road) {
                (true, _) => writeln!(f, "arrived")?,
                (false, Some(road)) => writeln!(
                    f,
                    "on road to {} at {:.2} km, {:.1} km/h",
                    road, vehicle.position_km, vehicle.speed
                )?,
                (false, None) => writeln!(f, "waiting")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation results at t={}s", self.time_step)?;
        writeln!(f, "Total vehicles: {}", self.total_vehicles)?;
        writeln!(
            f,
            "Reached destination: {} ({:.2}%)",
            self.completed_vehicles, self.completion_rate
        )?;
        write!(
            f,
            "Average congestion: {:.2}%",
            self.average_congestion * 100.0
        )?;
        if let Some((from, to, congestion)) = self.most_congested {
            write!(
                f,
                "\nMost congested road: {} -> {} ({:.2}%)",
                from,
                to,
                congestion * 100.0
            )?;
        }
        Ok(())
    }
}
