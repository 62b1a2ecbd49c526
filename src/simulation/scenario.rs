//! Reference network and rush-hour traffic injection used by the CLI

use log::{info, warn};

use super::error::SimResult;
use super::road_network::SimRoadNetwork;
use super::types::{JunctionId, SimRoad};
use super::world::SimWorld;

pub const MAIN: JunctionId = JunctionId(0);
pub const NORTH: JunctionId = JunctionId(1);
pub const EAST: JunctionId = JunctionId(2);
pub const SOUTH: JunctionId = JunctionId(3);
pub const WEST: JunctionId = JunctionId(4);
pub const BUSINESS_DISTRICT: JunctionId = JunctionId(5);

/// Vehicles per suburb for a rush hour: north, east, south, west
const RUSH_HOUR_VOLUMES: [(JunctionId, usize); 4] =
    [(NORTH, 50), (EAST, 30), (SOUTH, 60), (WEST, 40)];

/// Six signalized junctions: a hub, four suburbs on a ring, and a business
/// district reachable from the hub, the east and the west
pub fn sample_network() -> SimResult<SimRoadNetwork> {
    let mut network = SimRoadNetwork::new(6);

    let names = [
        (MAIN, "Main Intersection"),
        (NORTH, "North Intersection"),
        (EAST, "East Intersection"),
        (SOUTH, "South Intersection"),
        (WEST, "West Intersection"),
        (BUSINESS_DISTRICT, "Business District"),
    ];
    for (id, name) in names {
        network.set_junction(id, Some(name), true)?;
    }

    // (from, to, lanes, km, km/h, capacity)
    let roads = [
        (MAIN, NORTH, 3, 2.0, 60.0, 300),
        (MAIN, EAST, 2, 1.5, 50.0, 200),
        (MAIN, SOUTH, 3, 2.0, 60.0, 300),
        (MAIN, WEST, 2, 1.5, 50.0, 200),
        (MAIN, BUSINESS_DISTRICT, 4, 1.0, 40.0, 400),
        (NORTH, MAIN, 3, 2.0, 60.0, 300),
        (EAST, MAIN, 2, 1.5, 50.0, 200),
        (SOUTH, MAIN, 3, 2.0, 60.0, 300),
        (WEST, MAIN, 2, 1.5, 50.0, 200),
        (BUSINESS_DISTRICT, MAIN, 4, 1.0, 40.0, 400),
        (NORTH, EAST, 2, 3.0, 70.0, 250),
        (EAST, SOUTH, 2, 3.0, 70.0, 250),
        (SOUTH, WEST, 2, 3.0, 70.0, 250),
        (WEST, NORTH, 2, 3.0, 70.0, 250),
        (EAST, BUSINESS_DISTRICT, 3, 1.2, 45.0, 350),
        (BUSINESS_DISTRICT, EAST, 3, 1.2, 45.0, 350),
        (WEST, BUSINESS_DISTRICT, 3, 1.2, 45.0, 350),
        (BUSINESS_DISTRICT, WEST, 3, 1.2, 45.0, 350),
    ];
    for (from, to, lanes, length, speed_limit, capacity) in roads {
        network.add_directed_edge(from, to, SimRoad::new(lanes, length, speed_limit, capacity)?)?;
    }

    Ok(network)
}

/// Inbound rush hour: every suburb sends its volume to the business district.
/// Returns how many vehicles were added.
pub fn morning_rush(world: &mut SimWorld) -> usize {
    let added = RUSH_HOUR_VOLUMES
        .iter()
        .map(|&(suburb, volume)| inject(world, suburb, BUSINESS_DISTRICT, volume))
        .sum();
    info!("Morning rush hour: added {} vehicles bound for the business district", added);
    added
}

/// Outbound rush hour: the business district sends each suburb its volume
pub fn evening_rush(world: &mut SimWorld) -> usize {
    let added = RUSH_HOUR_VOLUMES
        .iter()
        .map(|&(suburb, volume)| inject(world, BUSINESS_DISTRICT, suburb, volume))
        .sum();
    info!("Evening rush hour: added {} vehicles leaving the business district", added);
    added
}

fn inject(world: &mut SimWorld, from: JunctionId, to: JunctionId, volume: usize) -> usize {
    let mut added = 0;
    for _ in 0..volume {
        match world.add_vehicle(from, to) {
            Ok(_) => added += 1,
            Err(e) => {
                warn!("Stopped injecting {} -> {}: {}", from, to, e);
                break;
            }
        }
    }
    added
}
