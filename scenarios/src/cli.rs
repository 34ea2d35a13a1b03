//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::case::discover_cases;
use crate::report::{ReportSummary, aggregate};
use crate::run::{RunOutcome, run_case_recorded};

/// List all available cases.
pub fn list_cases(cases_dir: &Path) -> Result<()> {
    let cases = discover_cases(cases_dir)?;
    for case in cases {
        println!("{}\t{}", case.case.id, case.case.description);
    }
    Ok(())
}

/// Run a single case by id. Returns whether it succeeded.
pub fn run_case_by_id(cases_dir: &Path, case_id: &str, json: bool) -> Result<bool> {
    let cases = discover_cases(cases_dir)?;
    let case = cases
        .iter()
        .find(|case| case.case.id == case_id)
        .ok_or_else(|| anyhow!("case {} not found in {}", case_id, cases_dir.display()))?;
    debug!(case_id, "case loaded");

    let run = run_case_recorded(case);
    print_run(&run, json)?;
    Ok(run.outcome == crate::outcome::Outcome::Success)
}

/// Run every case and print the aggregated report. Returns whether all
/// cases succeeded.
pub fn run_all(cases_dir: &Path, json: bool) -> Result<bool> {
    let cases = discover_cases(cases_dir)?;
    info!(count = cases.len(), "running all cases");

    let mut runs = Vec::with_capacity(cases.len());
    for case in &cases {
        let run = run_case_recorded(case);
        print_run(&run, json)?;
        runs.push(run);
    }

    let summary = aggregate(&runs);
    print_report(&summary);
    Ok(summary.all_succeeded())
}

fn print_run(run: &RunOutcome, json: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(run).context("serialize run")?;
        println!("{line}");
        return Ok(());
    }
    println!("run: case={} outcome={:?}", run.case_id, run.outcome);
    for check in &run.checks {
        let mark = if check.passed { "pass" } else { "FAIL" };
        println!("  {mark} {}", check.label);
    }
    if let Some(error) = &run.error {
        println!("  error: {error}");
    }
    Ok(())
}

fn print_report(summary: &ReportSummary) {
    println!("report: runs={}", summary.runs);
    println!(
        "report: success={} fail={} unreachable={} error={}",
        summary.success, summary.fail, summary.unreachable, summary.error
    );
    if let Some(avg) = summary.avg_iterations {
        println!("report: avg_iterations={:.2}", avg);
    }
    for (label, (passed, total)) in &summary.check_pass_rates {
        println!("report: check {} {}/{}", label, passed, total);
    }
}
