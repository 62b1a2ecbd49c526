use std::process::{Command, Output};

fn run_simulation(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_traffic_sim"))
        .args(args)
        .env("RUST_LOG", "warn,traffic_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the rush-hour simulation runs to completion
#[test]
fn test_rush_hour_simulation_runs() {
    let output = run_simulation(&["--ticks", "120", "--status-every", "0"]);

    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Morning Rush Hour"));
    assert!(stdout.contains("Evening Rush Hour"));
    assert!(stdout.contains("Optimal multi-factor path"));
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = run_simulation(&["--ticks", "60", "--status-every", "0"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Total vehicles: 180"),
        "Missing morning vehicle count. stderr: {}",
        stderr
    );
    for statistic in ["Vehicles completed:", "Completion rate:", "Average congestion:"] {
        assert!(stderr.contains(statistic), "Missing '{}' statistic", statistic);
    }
}

/// Test that the whole morning rush reaches the business district
#[test]
fn test_morning_rush_completes() {
    let output = run_simulation(&["--ticks", "400", "--status-every", "0"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let rate_line = stderr
        .lines()
        .find(|line| line.contains("Completion rate:"))
        .expect("Could not find 'Completion rate' line");

    // Format: "[2026-01-01T00:00:00Z INFO  traffic_sim] Completion rate: 100.0%"
    let rate: f32 = rate_line
        .split("Completion rate:")
        .nth(1)
        .and_then(|s| s.trim().strip_suffix('%'))
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| panic!("Could not parse completion rate from: {}", rate_line));

    assert_eq!(rate, 100.0, "Morning rush did not finish: {}%", rate);
}

/// Test that a seeded random scenario injects the requested traffic
#[test]
fn test_random_scenario_with_seed() {
    let output = run_simulation(&[
        "--scenario",
        "random",
        "--seed",
        "42",
        "--vehicles",
        "100",
        "--ticks",
        "60",
        "--status-every",
        "30",
    ]);
    assert!(
        output.status.success(),
        "Random scenario failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Injected 100 random vehicles"));
    assert!(stderr.contains("SIMULATION COMPLETE"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Simulation status at t="));
}

/// Test that capacity overflow is reported as a failure
#[test]
fn test_random_scenario_over_capacity_fails() {
    let output = run_simulation(&[
        "--scenario",
        "random",
        "--vehicles",
        "20",
        "--max-vehicles",
        "10",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to generate random traffic"));
}
