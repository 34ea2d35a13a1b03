mod case;
mod cli;
mod judge;
mod outcome;
mod report;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scenarios", version, about = "Scenario harness for the gridworld planner")]
struct Cli {
    /// Directory holding case files.
    #[arg(long, global = true, default_value = "scenarios/cases")]
    cases: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    List,
    Run {
        /// Case id to run.
        case_id: Option<String>,
        /// Run every case and print an aggregated report.
        #[arg(long, conflicts_with = "case_id")]
        all: bool,
        /// One JSON object per case instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    gridworld::logging::init();
    let cli = Cli::parse();
    let succeeded = match cli.command {
        Command::List => {
            cli::list_cases(&cli.cases)?;
            true
        }
        Command::Run {
            case_id: Some(case_id),
            json,
            ..
        } => cli::run_case_by_id(&cli.cases, &case_id, json)?,
        Command::Run {
            case_id: None,
            all: true,
            json,
        } => cli::run_all(&cli.cases, json)?,
        Command::Run { .. } => bail!("pass a case id or --all"),
    };
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
