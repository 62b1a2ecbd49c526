//! Road network and route planner behaviour

mod common;

use common::{approx_eq, diamond_network, j, line_network, road};
use traffic_sim::simulation::{
    find_fastest_path, find_least_congested_path, find_optimal_path, find_shortest_path,
    scenario, IdKind, RouteComparison, RouteWeights, SimError, SimRoad, SimRoadNetwork,
};

#[test]
fn test_road_rejects_invalid_attributes() {
    assert!(matches!(
        SimRoad::new(1, 1.0, 0.0, 10),
        Err(SimError::InvalidRoad(_))
    ));
    assert!(matches!(
        SimRoad::new(1, 1.0, 50.0, 0),
        Err(SimError::InvalidRoad(_))
    ));
    assert!(matches!(
        SimRoad::new(1, -1.0, 50.0, 10),
        Err(SimError::InvalidRoad(_))
    ));
}

#[test]
fn test_travel_time_grows_with_congestion() {
    let mut road = road(2.0, 50.0, 10);
    assert!(approx_eq(road.travel_time(), 0.04));

    road.current_load = 5;
    // 0.04 * (1 + 4 * 0.25)
    assert!(approx_eq(road.travel_time(), 0.08));

    road.current_load = 10;
    assert!(approx_eq(road.travel_time(), 0.2));
}

#[test]
fn test_congestion_is_clamped_above_capacity() {
    let mut network = line_network();
    network.add_load(j(0), j(1), 50).unwrap();

    let edge = network.edge(j(0), j(1)).unwrap();
    assert_eq!(edge.road.current_load, 50);
    assert_eq!(edge.road.congestion(), 1.0);

    network.recompute_all_weights();
    let edge = network.edge(j(0), j(1)).unwrap();
    assert!(approx_eq(edge.weight, (1.0 / 60.0) * 5.0));
}

#[test]
fn test_load_never_drops_below_zero() {
    let mut network = line_network();
    network.add_load(j(0), j(1), -3).unwrap();
    assert_eq!(network.edge(j(0), j(1)).unwrap().road.current_load, 0);
    assert_eq!(network.edge(j(0), j(1)).unwrap().road.congestion(), 0.0);
}

#[test]
fn test_invalid_ids_are_rejected_by_the_network() {
    let mut network = SimRoadNetwork::new(2);
    assert_eq!(
        network.set_junction(j(2), Some("Nowhere"), true),
        Err(SimError::InvalidId {
            kind: IdKind::Junction,
            id: 2
        })
    );
    assert_eq!(
        network.add_directed_edge(j(0), j(5), road(1.0, 50.0, 10)),
        Err(SimError::junction(5))
    );
    assert_eq!(network.road_count(), 0);
}

#[test]
fn test_outgoing_roads_are_most_recent_first() {
    let mut network = SimRoadNetwork::new(4);
    network.add_directed_edge(j(0), j(1), road(1.0, 50.0, 10)).unwrap();
    network.add_directed_edge(j(0), j(2), road(1.0, 50.0, 10)).unwrap();
    network.add_directed_edge(j(0), j(3), road(1.0, 50.0, 10)).unwrap();

    let order: Vec<usize> = network
        .outgoing(j(0))
        .unwrap()
        .map(|(dest, _)| dest.index())
        .collect();
    assert_eq!(order, vec![3, 2, 1]);
}

#[test]
fn test_find_edge_returns_first_match_for_duplicates() {
    let mut network = SimRoadNetwork::new(2);
    network.add_directed_edge(j(0), j(1), road(1.0, 50.0, 10)).unwrap();
    network.add_directed_edge(j(0), j(1), road(7.0, 50.0, 10)).unwrap();

    assert_eq!(network.edge(j(0), j(1)).unwrap().road.length, 7.0);
    assert!(network.edge(j(1), j(0)).is_none());
}

#[test]
fn test_recompute_all_weights_is_idempotent() {
    let mut network = scenario::sample_network().unwrap();
    network.add_load(j(0), j(5), 250).unwrap();
    network.add_load(j(1), j(2), 100).unwrap();

    network.recompute_all_weights();
    let first: Vec<f32> = network.roads().map(|(_, _, edge)| edge.weight).collect();
    network.recompute_all_weights();
    let second: Vec<f32> = network.roads().map(|(_, _, edge)| edge.weight).collect();

    assert_eq!(first, second);
}

#[test]
fn test_shortest_path_time_matches_stored_weights() {
    let mut network = scenario::sample_network().unwrap();
    network.add_load(j(0), j(5), 300).unwrap();
    network.add_load(j(4), j(5), 100).unwrap();
    network.recompute_all_weights();

    for src in 0..network.junction_count() {
        for dest in 0..network.junction_count() {
            let route = find_shortest_path(&network, j(src), j(dest))
                .unwrap()
                .expect("sample network is strongly connected");

            assert_eq!(route.origin(), Some(j(src)));
            assert_eq!(route.destination(), Some(j(dest)));

            let expected: f32 = route
                .path
                .windows(2)
                .map(|hop| network.edge(hop[0], hop[1]).unwrap().weight)
                .sum();
            assert!(
                approx_eq(route.total_time, expected),
                "{src} -> {dest}: {} != {}",
                route.total_time,
                expected
            );
        }
    }
}

#[test]
fn test_shortest_path_avoids_congested_branch() {
    let mut network = diamond_network();
    network.add_load(j(0), j(1), 10).unwrap();
    network.recompute_all_weights();

    let route = find_shortest_path(&network, j(0), j(3)).unwrap().unwrap();
    assert_eq!(route.path, vec![j(0), j(2), j(3)]);
    assert!(approx_eq(route.total_distance, 2.0));
    assert!(approx_eq(route.total_time, 2.0 / 60.0));

    let fastest = find_fastest_path(&network, j(0), j(3)).unwrap().unwrap();
    assert_eq!(fastest, route);
}

#[test]
fn test_least_congested_path_minimises_the_bottleneck() {
    let mut network = diamond_network();
    // Through 1: 0.5 then 0.1 (sum 0.6, worst 0.5)
    network.add_load(j(0), j(1), 5).unwrap();
    network.add_load(j(1), j(3), 1).unwrap();
    // Through 2: 0.4 then 0.4 (sum 0.8, worst 0.4)
    network.add_load(j(0), j(2), 4).unwrap();
    network.add_load(j(2), j(3), 4).unwrap();
    network.recompute_all_weights();

    let route = find_least_congested_path(&network, j(0), j(3))
        .unwrap()
        .unwrap();
    assert_eq!(route.path, vec![j(0), j(2), j(3)]);

    let alternative = traffic_sim::simulation::Route::along(&network, vec![j(0), j(1), j(3)]);
    assert!(route.bottleneck_congestion(&network) <= alternative.bottleneck_congestion(&network));
    assert!(approx_eq(route.bottleneck_congestion(&network), 0.4));
}

#[test]
fn test_optimal_path_follows_its_weights() {
    let mut network = SimRoadNetwork::new(3);
    // Direct: long but fast
    network.add_directed_edge(j(0), j(1), road(10.0, 100.0, 100)).unwrap();
    // Detour: short but slow
    network.add_directed_edge(j(0), j(2), road(2.0, 20.0, 100)).unwrap();
    network.add_directed_edge(j(2), j(1), road(2.0, 20.0, 100)).unwrap();

    let by_time = find_optimal_path(&network, j(0), j(1), RouteWeights::new(1.0, 0.0, 0.0))
        .unwrap()
        .unwrap();
    assert_eq!(by_time.path, vec![j(0), j(1)]);
    assert!(approx_eq(by_time.total_time, 0.1));

    let by_distance = find_optimal_path(&network, j(0), j(1), RouteWeights::new(0.0, 1.0, 0.0))
        .unwrap()
        .unwrap();
    assert_eq!(by_distance.path, vec![j(0), j(2), j(1)]);
    assert!(approx_eq(by_distance.total_distance, 4.0));
    assert!(approx_eq(by_distance.total_time, 0.2));

    let comparison = RouteComparison::between(&by_time, &by_distance);
    assert!(approx_eq(comparison.distance_difference, 6.0));
    assert!(comparison.time_difference < 0.0);
    assert_eq!(comparison.junction_difference, -1);
}

#[test]
fn test_optimal_path_rejects_negative_or_nan_weights() {
    let mut network = SimRoadNetwork::new(3);
    network.add_directed_edge(j(0), j(1), road(1.0, 50.0, 10)).unwrap();
    network.add_directed_edge(j(0), j(2), road(5.0, 50.0, 10)).unwrap();
    network.add_directed_edge(j(2), j(1), road(5.0, 50.0, 10)).unwrap();

    let negative = find_optimal_path(&network, j(0), j(1), RouteWeights::new(0.0, -1.0, 0.0));
    assert!(matches!(negative, Err(SimError::InvalidWeights(_))));

    let nan = find_optimal_path(&network, j(0), j(1), RouteWeights::new(f32::NAN, 0.2, 0.2));
    assert!(matches!(nan, Err(SimError::InvalidWeights(_))));

    let direct = find_optimal_path(&network, j(0), j(1), RouteWeights::new(0.0, 1.0, 0.0))
        .unwrap()
        .unwrap();
    assert_eq!(direct.path, vec![j(0), j(1)]);
}

#[test]
fn test_unreachable_destination_yields_no_route() {
    let mut network = SimRoadNetwork::new(4);
    network.add_directed_edge(j(0), j(1), road(1.0, 60.0, 10)).unwrap();
    network.add_directed_edge(j(2), j(3), road(1.0, 60.0, 10)).unwrap();

    assert_eq!(find_shortest_path(&network, j(0), j(3)), Ok(None));
    assert_eq!(find_shortest_path(&network, j(1), j(0)), Ok(None));
    assert_eq!(
        find_optimal_path(&network, j(0), j(3), RouteWeights::new(0.6, 0.2, 0.2)),
        Ok(None)
    );
    assert_eq!(find_least_congested_path(&network, j(3), j(2)), Ok(None));
}

#[test]
fn test_out_of_range_endpoints_are_errors() {
    let network = line_network();
    assert_eq!(
        find_shortest_path(&network, j(0), j(3)),
        Err(SimError::junction(3))
    );
    assert_eq!(
        find_least_congested_path(&network, j(9), j(0)),
        Err(SimError::junction(9))
    );
}

#[test]
fn test_route_to_self_is_trivial() {
    let network = line_network();
    let route = find_shortest_path(&network, j(1), j(1)).unwrap().unwrap();

    assert_eq!(route.path, vec![j(1)]);
    assert!(route.is_trivial());
    assert_eq!(route.total_time, 0.0);
    assert_eq!(route.total_distance, 0.0);
}

#[test]
fn test_junction_congestion_sums_outgoing_roads() {
    let mut network = SimRoadNetwork::new(3);
    network.add_directed_edge(j(0), j(1), road(1.0, 60.0, 10)).unwrap();
    network.add_directed_edge(j(0), j(2), road(1.0, 60.0, 30)).unwrap();
    network.add_load(j(0), j(1), 10).unwrap();

    assert!(approx_eq(network.junction_congestion(j(0)).unwrap(), 0.25));
    assert_eq!(network.junction_congestion(j(2)).unwrap(), 0.0);
    assert_eq!(
        network.junction_congestion(j(3)),
        Err(SimError::junction(3))
    );
}

#[test]
fn test_route_description_lists_every_junction() {
    let mut network = line_network();
    network.set_junction(j(0), Some("Depot"), false).unwrap();

    let route = find_shortest_path(&network, j(0), j(2)).unwrap().unwrap();
    let text = route.describe(&network).to_string();

    assert!(text.contains("Route (3 junctions)"));
    assert!(text.contains("0 (Depot)"));
    assert!(text.contains("Total distance: 2.00 km"));
}
