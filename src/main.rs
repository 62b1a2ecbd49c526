use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info};

use traffic_sim::simulation::{
    find_fastest_path, find_least_congested_path, find_optimal_path, find_shortest_path,
    scenario, Route, RouteComparison, SimRoadNetwork, SimWorld, SimulationReport,
    VEHICLE_ROUTE_WEIGHTS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Inbound morning rush followed by an outbound evening rush
    RushHour,
    /// Vehicles between random junction pairs
    Random,
}

#[derive(Parser)]
#[command(name = "traffic_sim")]
#[command(about = "Headless traffic simulation with adaptive signals and congestion-aware routing")]
struct Cli {
    /// Number of ticks to simulate per traffic phase (one tick is one second)
    #[arg(long, default_value = "300")]
    ticks: u32,

    /// Seed for reproducible random traffic
    #[arg(long)]
    seed: Option<u64>,

    /// Which traffic pattern to inject
    #[arg(long, value_enum, default_value = "rush-hour")]
    scenario: Scenario,

    /// Vehicles to inject in the random scenario
    #[arg(long, default_value = "100")]
    vehicles: usize,

    /// Maximum number of vehicles the simulation accepts
    #[arg(long, default_value = "500")]
    max_vehicles: usize,

    /// Print a status snapshot every this many ticks
    #[arg(long, default_value = "60")]
    status_every: u32,
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,traffic_sim=info"),
    )
    .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("Simulation failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    println!("=== Traffic Simulation ===");
    println!();

    let network = scenario::sample_network().context("Failed to build the sample network")?;
    println!("{network}");

    let mut world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(network, cli.max_vehicles, seed),
        None => SimWorld::new(network, cli.max_vehicles),
    }
    .context("Failed to create the simulation")?;
    println!("{}", world.signal_system);

    world.start();

    match cli.scenario {
        Scenario::RushHour => {
            println!("=== Morning Rush Hour (Inbound) ===");
            scenario::morning_rush(&mut world);
            run_ticks(&mut world, cli);
            log_report("Morning", &world.analyze());

            world.retire_all_vehicles();

            println!("=== Evening Rush Hour (Outbound) ===");
            scenario::evening_rush(&mut world);
            run_ticks(&mut world, cli);
            log_report("Evening", &world.analyze());
        }
        Scenario::Random => {
            let created = world
                .generate_random_traffic(cli.vehicles)
                .context("Failed to generate random traffic")?;
            info!("Injected {} random vehicles", created.len());
            run_ticks(&mut world, cli);
            log_report("Random traffic", &world.analyze());
        }
    }

    world.stop();
    compare_routes(&world.road_network)?;

    info!("=== SIMULATION COMPLETE ===");
    Ok(())
}

fn run_ticks(world: &mut SimWorld, cli: &Cli) {
    for tick in 0..cli.ticks {
        world.tick();
        if cli.status_every > 0 && tick % cli.status_every == 0 {
            println!("{}", world.status());
        }
    }
}

fn log_report(label: &str, report: &SimulationReport) {
    println!("=== {label} Results ===");
    println!("{report}");
    println!();

    info!("{} results after {} ticks", label, report.time_step);
    info!("Total vehicles: {}", report.total_vehicles);
    info!("Vehicles completed: {}", report.completed_vehicles);
    info!("Completion rate: {:.1}%", report.completion_rate);
    info!(
        "Average congestion: {:.1}%",
        report.average_congestion * 100.0
    );
}

fn print_route(label: &str, network: &SimRoadNetwork, route: Option<&Route>) {
    println!("{label}:");
    match route {
        Some(route) => println!("{}", route.describe(network)),
        None => println!("No route"),
    }
    println!();
}

fn compare_routes(network: &SimRoadNetwork) -> Result<()> {
    let (from, to) = (scenario::NORTH, scenario::BUSINESS_DISTRICT);
    println!("=== Route Finding: junction {from} to junction {to} ===");

    let shortest = find_shortest_path(network, from, to).context("Shortest path query failed")?;
    let least_congested = find_least_congested_path(network, from, to)
        .context("Least congested path query failed")?;
    let fastest = find_fastest_path(network, from, to).context("Fastest path query failed")?;
    let optimal = find_optimal_path(network, from, to, VEHICLE_ROUTE_WEIGHTS)
        .context("Optimal path query failed")?;

    print_route("Shortest path", network, shortest.as_ref());
    print_route("Least congested path", network, least_congested.as_ref());
    print_route("Fastest path", network, fastest.as_ref());
    print_route("Optimal multi-factor path", network, optimal.as_ref());

    if let (Some(a), Some(b)) = (&shortest, &least_congested) {
        println!("Shortest vs least congested:");
        println!("{}", RouteComparison::between(a, b));
        println!();
    }
    if let (Some(a), Some(b)) = (&fastest, &optimal) {
        println!("Fastest vs optimal:");
        println!("{}", RouteComparison::between(a, b));
    }
    Ok(())
}
