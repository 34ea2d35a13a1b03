//! CLI tests for `gridworld solve`, `check` and `generate`.
//!
//! Spawns the gridworld binary and verifies stdout and exit codes for
//! reachable, unreachable and invalid grids.

use std::process::Command;

use gridworld::exit_codes;
use gridworld::io::grid_file::parse_grid;
use gridworld::test_support::{ENCLOSED_5X5, Fixtures, OPEN_5X5, WALL_5X5};

fn gridworld() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gridworld"))
}

#[test]
fn solve_reachable_grid_exits_ok() {
    let fixtures = Fixtures::new().expect("fixtures");
    let grid = fixtures.write_layout("grid.toml", &WALL_5X5).expect("write grid");

    let output = gridworld()
        .arg("solve")
        .arg(&grid)
        .output()
        .expect("gridworld solve");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("values:"));
    assert!(stdout.contains("policy:"));
    assert!(stdout.ends_with("(4, 4)\n"), "{stdout}");
}

#[test]
fn solve_json_reports_path() {
    let fixtures = Fixtures::new().expect("fixtures");
    let grid = fixtures.write_layout("grid.toml", &OPEN_5X5).expect("write grid");

    let output = gridworld()
        .args(["solve", "--format", "json"])
        .arg(&grid)
        .output()
        .expect("gridworld solve");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["status"], "solved");
    assert_eq!(report["path"].as_array().map(Vec::len), Some(9));
    assert_eq!(report["solution"]["converged"], true);
}

#[test]
fn solve_trace_shows_path_per_sweep() {
    let fixtures = Fixtures::new().expect("fixtures");
    let grid = fixtures.write_layout("grid.toml", &OPEN_5X5).expect("write grid");

    let output = gridworld()
        .args(["solve", "--trace", "--format", "json"])
        .arg(&grid)
        .output()
        .expect("gridworld solve");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json report");
    let trace = report["solution"]["trace"].as_array().expect("trace");
    assert_eq!(Some(trace.len() as u64), report["solution"]["iterations"].as_u64());
    assert_eq!(trace.last(), Some(&report["path"]));
    assert_eq!(report["solution"]["values"][0].as_array().map(Vec::len), Some(5));

    let output = gridworld()
        .args(["solve", "--trace"])
        .arg(&grid)
        .output()
        .expect("gridworld solve");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("trace:\nsweep 1: (0, 0) -> "), "{stdout}");
}

#[test]
fn solve_unreachable_grid_exits_with_unreachable_code() {
    let fixtures = Fixtures::new().expect("fixtures");
    let grid = fixtures
        .write_layout("grid.toml", &ENCLOSED_5X5)
        .expect("write grid");

    let output = gridworld()
        .arg("solve")
        .arg(&grid)
        .output()
        .expect("gridworld solve");

    assert_eq!(output.status.code(), Some(exit_codes::UNREACHABLE));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "no path from (0, 0) to (4, 4)\n"
    );
}

#[test]
fn solve_without_goal_is_invalid() {
    let fixtures = Fixtures::new().expect("fixtures");
    let grid = fixtures
        .write("grid.toml", "size = 5\nstart = [0, 0]\n")
        .expect("write grid");

    let output = gridworld()
        .arg("solve")
        .arg(&grid)
        .output()
        .expect("gridworld solve");

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("start and a goal"));
}

#[test]
fn solve_rejects_invalid_overrides() {
    let fixtures = Fixtures::new().expect("fixtures");
    let grid = fixtures.write_layout("grid.toml", &OPEN_5X5).expect("write grid");

    let status = gridworld()
        .args(["solve", "--gamma", "1.5"])
        .arg(&grid)
        .status()
        .expect("gridworld solve");

    assert_eq!(status.code(), Some(exit_codes::INVALID));
}

#[test]
fn solve_uses_config_file() {
    let fixtures = Fixtures::new().expect("fixtures");
    let grid = fixtures.write_layout("grid.toml", &OPEN_5X5).expect("write grid");
    let config = fixtures
        .write("gridworld.toml", "[solver]\nmax_iterations = 1\n")
        .expect("write config");

    let output = gridworld()
        .args(["solve", "--format", "json", "--config"])
        .arg(&config)
        .arg(&grid)
        .output()
        .expect("gridworld solve");

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["solution"]["iterations"], 1);
    assert_eq!(report["solution"]["converged"], false);
}

#[test]
fn check_reports_reachability() {
    let fixtures = Fixtures::new().expect("fixtures");
    let open = fixtures.write_layout("open.toml", &OPEN_5X5).expect("write grid");
    let enclosed = fixtures
        .write_layout("enclosed.toml", &ENCLOSED_5X5)
        .expect("write grid");

    let output = gridworld().arg("check").arg(&open).output().expect("check");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "reachable\n");

    let output = gridworld()
        .arg("check")
        .arg(&enclosed)
        .output()
        .expect("check");
    assert_eq!(output.status.code(), Some(exit_codes::UNREACHABLE));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "unreachable\n");
}

#[test]
fn generate_prints_loadable_grid() {
    let output = gridworld()
        .args(["generate", "--size", "7", "--obstacles", "4", "--seed", "9"])
        .output()
        .expect("generate");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let grid = parse_grid(&String::from_utf8_lossy(&output.stdout)).expect("parse output");
    assert_eq!(grid.size(), 7);
    assert_eq!(grid.obstacle_count(), 4);
    assert!(grid.endpoints().is_ok());
}

#[test]
fn config_init_refuses_to_overwrite() {
    let fixtures = Fixtures::new().expect("fixtures");
    let path = fixtures.path().join("gridworld.toml");

    let status = gridworld()
        .args(["config", "init", "--path"])
        .arg(&path)
        .status()
        .expect("config init");
    assert_eq!(status.code(), Some(exit_codes::OK));
    assert!(path.exists());

    let status = gridworld()
        .args(["config", "init", "--path"])
        .arg(&path)
        .status()
        .expect("config init");
    assert_eq!(status.code(), Some(exit_codes::INVALID));
}
