//! End-to-end planning: reachability gate, solve, then path reconstruction.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::core::grid::Grid;
use crate::core::path::{is_complete, reconstruct_path};
use crate::core::reachability::{path_exists, reachable_cells};
use crate::core::types::Position;
use crate::core::value_iteration::{SolveParams, Solution, solve};
use crate::error::Result;

/// Structured planning outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// Obstacles separate start from goal; the solver was not run.
    Unreachable { start: Position, goal: Position },
    /// Solver ran and a path was walked.
    Solved(Plan),
}

/// Solved matrices plus the walked path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub start: Position,
    pub goal: Position,
    pub solution: Solution,
    pub path: Vec<Position>,
    /// False when the walk stopped before reaching the goal.
    pub complete: bool,
}

/// Plan a route across `grid`.
///
/// Errors only when the grid lacks a start or goal.
#[instrument(skip_all, fields(size = grid.size()))]
pub fn plan(grid: &Grid, params: &SolveParams) -> Result<PlanOutcome> {
    let (start, goal) = grid.endpoints()?;

    if !path_exists(grid, start, goal) {
        info!(
            %start,
            %goal,
            reachable = reachable_cells(grid, start).len(),
            "goal unreachable; skipping solve"
        );
        return Ok(PlanOutcome::Unreachable { start, goal });
    }

    let solution = solve(grid, params)?;
    debug!(
        iterations = solution.iterations,
        converged = solution.converged,
        "solved"
    );

    let path = reconstruct_path(&solution.policy, start, goal, grid);
    let complete = is_complete(&path, goal);
    if complete {
        info!(steps = path.len() - 1, "path reaches goal");
    } else {
        warn!(
            steps = path.len() - 1,
            stopped_at = %path.last().copied().unwrap_or(start),
            "path stopped before goal"
        );
    }

    Ok(PlanOutcome::Solved(Plan {
        start,
        goal,
        solution,
        path,
        complete,
    }))
}
