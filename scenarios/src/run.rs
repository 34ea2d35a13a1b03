//! Case execution.
//!
//! Builds the case's grid and solver config, plans in-process and judges the
//! result. Nothing is written to disk.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use gridworld::{PlanOutcome, plan};

use crate::case::CaseFile;
use crate::judge::{CheckOutcome, run_checks};
use crate::outcome::{Outcome, classify_outcome};

/// Result of running a single case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub case_id: String,
    pub outcome: Outcome,
    /// Solver sweeps, when the solver ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    pub checks: Vec<CheckOutcome>,
    /// Error chain when the case could not be planned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunOutcome {
    /// Record a case that failed before its checks could run.
    pub fn errored(case_id: &str, err: &anyhow::Error) -> Self {
        Self {
            case_id: case_id.to_string(),
            outcome: Outcome::Error,
            iterations: None,
            checks: Vec::new(),
            error: Some(format!("{err:#}")),
        }
    }
}

/// Run a case end-to-end: grid, config, plan, checks.
#[instrument(skip_all, fields(case_id = %case.case.id))]
pub fn run_case(case: &CaseFile) -> Result<RunOutcome> {
    debug!("case run started");
    let grid = case.grid.to_grid().context("build grid")?;
    let cfg = case.solver_config()?;

    let plan_outcome = plan(&grid, &cfg.params()).context("plan")?;
    let iterations = match &plan_outcome {
        PlanOutcome::Solved(plan) => Some(plan.solution.iterations),
        PlanOutcome::Unreachable { .. } => None,
    };

    let judgment = run_checks(&case.checks, &plan_outcome);
    let outcome = classify_outcome(&plan_outcome, &judgment);
    if outcome == Outcome::Success {
        info!(?outcome, "case run complete");
    } else {
        warn!(?outcome, "case run complete");
    }

    Ok(RunOutcome {
        case_id: case.case.id.clone(),
        outcome,
        iterations,
        checks: judgment.checks,
        error: None,
    })
}

/// Like [`run_case`], but folds errors into an [`Outcome::Error`] record.
pub fn run_case_recorded(case: &CaseFile) -> RunOutcome {
    run_case(case).unwrap_or_else(|err| RunOutcome::errored(&case.case.id, &err))
}
