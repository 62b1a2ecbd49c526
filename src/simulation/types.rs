//! Core types for the traffic simulation
//!
//! Identifiers, the road record carried by every directed edge, and the
//! model constants shared by the planner, the signals and the vehicles.

use std::fmt;

use super::error::{SimError, SimResult};

/// A junction (graph vertex) identifier. Dense and zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JunctionId(pub usize);

impl JunctionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for JunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vehicle identifier, assigned in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub usize);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical and load attributes of one direction of a street.
///
/// A two-way street is two independent `SimRoad`s, so load and congestion
/// are directional.
#[derive(Debug, Clone, PartialEq)]
pub struct SimRoad {
    pub lanes: u32,
    /// Length in kilometres
    pub length: f32,
    /// Speed limit in km/h
    pub speed_limit: f32,
    /// Maximum number of vehicles the road is designed to carry
    pub capacity: u32,
    /// Vehicles currently on the road
    pub current_load: u32,
}

impl SimRoad {
    pub fn new(lanes: u32, length: f32, speed_limit: f32, capacity: u32) -> SimResult<Self> {
        if !(length >= 0.0) {
            return Err(SimError::InvalidRoad(format!("length {length} km")));
        }
        if !(speed_limit > 0.0) {
            return Err(SimError::InvalidRoad(format!(
                "speed limit {speed_limit} km/h"
            )));
        }
        if capacity == 0 {
            return Err(SimError::InvalidRoad("capacity 0".to_string()));
        }

        Ok(Self {
            lanes,
            length,
            speed_limit,
            capacity,
            current_load: 0,
        })
    }

    /// Load over capacity, clamped to [0, 1]
    pub fn congestion(&self) -> f32 {
        (self.current_load as f32 / self.capacity as f32).clamp(0.0, 1.0)
    }

    /// Travel time in hours: free-flow time inflated quadratically by congestion
    pub fn travel_time(&self) -> f32 {
        let base = self.length / self.speed_limit;
        let congestion = self.congestion();
        base * (1.0 + CONGESTION_TIME_FACTOR * congestion * congestion)
    }

    pub fn add_vehicle(&mut self) {
        self.current_load += 1;
    }

    /// Never drops below zero
    pub fn remove_vehicle(&mut self) {
        self.current_load = self.current_load.saturating_sub(1);
    }
}

/// Multiplier on squared congestion in the travel-time formula
pub const CONGESTION_TIME_FACTOR: f32 = 4.0;

/// Simulated seconds covered by one tick
pub const SECONDS_PER_TICK: f32 = 1.0;

/// Fraction of the speed limit lost on a fully congested road
pub const CONGESTION_SPEED_PENALTY: f32 = 0.7;

/// Cost weights used when a vehicle plans its own route
pub const VEHICLE_ROUTE_WEIGHTS: RouteWeights = RouteWeights {
    time: 0.6,
    distance: 0.2,
    congestion: 0.2,
};

/// Weights for the multi-factor route cost.
///
/// Non-negative; they need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteWeights {
    pub time: f32,
    pub distance: f32,
    pub congestion: f32,
}

impl RouteWeights {
    pub fn new(time: f32, distance: f32, congestion: f32) -> Self {
        Self {
            time,
            distance,
            congestion,
        }
    }

    /// Every weight must be finite and non-negative for Dijkstra to hold
    pub fn validate(&self) -> SimResult<()> {
        let named = [
            ("time", self.time),
            ("distance", self.distance),
            ("congestion", self.congestion),
        ];
        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SimError::InvalidWeights(format!("{name} weight {weight}")));
            }
        }
        Ok(())
    }
}
