//! Traffic Simulation Library
//!
//! A road network with congestion-sensitive travel times, multi-criteria
//! route planning, adaptive traffic signals and tick-driven vehicles.

pub mod simulation;
