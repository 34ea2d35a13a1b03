//! Grid-world planner CLI.
//!
//! Loads a grid description, checks reachability, runs value iteration and
//! prints the value matrix, policy matrix and the path it implies.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use gridworld::core::generate::random_grid;
use gridworld::core::reachability::path_exists;
use gridworld::exit_codes;
use gridworld::io::config::{SolverConfig, SolverOverrides, load_config, write_config};
use gridworld::io::grid_file::{grid_to_toml, load_grid};
use gridworld::plan::{PlanOutcome, plan};
use gridworld::render::{plan_json, render_plan};

#[derive(Parser)]
#[command(
    name = "gridworld",
    version,
    about = "Value-iteration planner for small grid worlds"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a grid and print values, policy and the resulting path.
    Solve {
        /// Grid description (TOML).
        grid: PathBuf,
        /// Solver config (TOML). Defaults apply when absent.
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: SolverOverrides,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Record the greedy path after every sweep.
        #[arg(long)]
        trace: bool,
    },
    /// Report whether the goal is reachable from the start.
    Check {
        /// Grid description (TOML).
        grid: PathBuf,
    },
    /// Print a random reachable grid in TOML layout form.
    Generate {
        #[arg(long, default_value_t = 5)]
        size: usize,
        /// Obstacle count (random within the size's budget when omitted).
        #[arg(long)]
        obstacles: Option<usize>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Manage the solver config file.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write the default config.
    Init {
        #[arg(long, default_value = "gridworld.toml")]
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    gridworld::logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Solve {
            grid,
            config,
            overrides,
            format,
            trace,
        } => cmd_solve(&grid, config.as_deref(), &overrides, format, trace),
        Command::Check { grid } => cmd_check(&grid),
        Command::Generate {
            size,
            obstacles,
            seed,
        } => cmd_generate(size, obstacles, seed),
        Command::Config {
            command: ConfigCommand::Init { path, force },
        } => cmd_config_init(&path, force),
    }
}

fn cmd_solve(
    grid_path: &Path,
    config_path: Option<&Path>,
    overrides: &SolverOverrides,
    format: Format,
    trace: bool,
) -> Result<i32> {
    let grid = load_grid(grid_path)?;
    let base = match config_path {
        Some(path) => {
            if !path.exists() {
                bail!("config {} not found", path.display());
            }
            load_config(path)?
        }
        None => SolverConfig::default(),
    };
    let cfg = overrides.apply(base).context("apply solver overrides")?;
    debug!(?cfg, "solver config");

    let mut params = cfg.params();
    params.trace_paths = trace;
    let outcome = plan(&grid, &params)?;
    match format {
        Format::Text => print!("{}", render_plan(&grid, &outcome)),
        Format::Json => println!("{}", plan_json(&grid, &outcome)?),
    }

    Ok(match &outcome {
        PlanOutcome::Unreachable { .. } => exit_codes::UNREACHABLE,
        PlanOutcome::Solved(plan) if !plan.complete => exit_codes::INCOMPLETE,
        PlanOutcome::Solved(_) => exit_codes::OK,
    })
}

fn cmd_check(grid_path: &Path) -> Result<i32> {
    let grid = load_grid(grid_path)?;
    let (start, goal) = grid.endpoints()?;
    if path_exists(&grid, start, goal) {
        println!("reachable");
        Ok(exit_codes::OK)
    } else {
        println!("unreachable");
        Ok(exit_codes::UNREACHABLE)
    }
}

fn cmd_generate(size: usize, obstacles: Option<usize>, seed: u64) -> Result<i32> {
    let grid = random_grid(size, obstacles, seed)?;
    print!("{}", grid_to_toml(&grid)?);
    Ok(exit_codes::OK)
}

fn cmd_config_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &SolverConfig::default())?;
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_solve_with_overrides() {
        let cli = Cli::parse_from([
            "gridworld",
            "solve",
            "grid.toml",
            "--gamma",
            "0.8",
            "--step-cost",
            "-0.1",
            "--format",
            "json",
        ]);
        let Command::Solve {
            grid,
            overrides,
            format,
            config,
            trace,
        } = cli.command
        else {
            panic!("expected solve");
        };
        assert_eq!(grid, PathBuf::from("grid.toml"));
        assert_eq!(config, None);
        assert_eq!(overrides.gamma, Some(0.8));
        assert_eq!(overrides.step_cost, Some(-0.1));
        assert_eq!(overrides.theta, None);
        assert_eq!(format, Format::Json);
        assert!(!trace);
    }

    #[test]
    fn parse_solve_trace_flag() {
        let cli = Cli::parse_from(["gridworld", "solve", "grid.toml", "--trace"]);
        assert!(matches!(cli.command, Command::Solve { trace: true, .. }));
    }

    #[test]
    fn parse_generate_defaults() {
        let cli = Cli::parse_from(["gridworld", "generate"]);
        assert!(matches!(
            cli.command,
            Command::Generate {
                size: 5,
                obstacles: None,
                seed: 0
            }
        ));
    }

    #[test]
    fn parse_config_init_force() {
        let cli = Cli::parse_from(["gridworld", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Command::Config {
                command: ConfigCommand::Init { force: true, .. }
            }
        ));
    }
}
